//! Serve a [`meridian::Router`] with [`hyper`].
//!
//! The whole request body is read before the router runs. Bodies larger
//! than [`Config::max_body`] are answered with `413 Payload Too Large`
//! without reaching the router.

use std::convert::Infallible;
use std::future::{ready, Future, Ready};
use std::io;
use std::net::*;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::body::HttpBody;
use hyper::server::conn::AddrIncoming;
use hyper::service::Service;
use hyper::{Body, StatusCode};
use meridian::http::{Bytes, Method};
use meridian::Router;

pub use hyper::Server;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The address to listen on.
    pub addr: SocketAddr,

    /// The maximum number of body bytes read for a single request.
    pub max_body: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_body: 2_097_152, // (~2mb)
        }
    }
}

impl Config {
    /// Set the address to listen on, resolving it if necessary.
    pub fn addr(mut self, addr: impl ToSocketAddr) -> io::Result<Self> {
        self.addr = addr.to_socket_addr()?;
        Ok(self)
    }

    /// Set the maximum body size.
    pub fn max_body(mut self, max_body: usize) -> Self {
        self.max_body = max_body;
        self
    }
}

/// An error running the server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: hyper::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] hyper::Error),
}

/// Bind a server to the configured address.
pub fn bind(router: Router, config: Config) -> Result<Server<AddrIncoming, MakeService>, Error> {
    let addr = config.addr;
    let builder = Server::try_bind(&addr).map_err(|source| Error::Bind { addr, source })?;

    tracing::info!(%addr, "listening");
    Ok(builder.serve(MakeService::new(router, config)))
}

/// Serve the router until the server fails.
pub async fn serve(router: Router, config: Config) -> Result<(), Error> {
    bind(router, config)?.await.map_err(Error::Serve)
}

/// Serve the router until `signal` completes, then finish the
/// in-flight requests and return.
pub async fn serve_with_shutdown<F>(router: Router, config: Config, signal: F) -> Result<(), Error>
where
    F: Future<Output = ()>,
{
    bind(router, config)?
        .with_graceful_shutdown(signal)
        .await
        .map_err(Error::Serve)
}

/// Creates a [`MeridianService`] for every connection.
pub struct MakeService {
    service: MeridianService,
}

impl MakeService {
    pub fn new(router: Router, config: Config) -> Self {
        Self {
            service: MeridianService::new(router, config),
        }
    }
}

impl<T> Service<T> for MakeService {
    type Response = MeridianService;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Infallible>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        ready(Ok(self.service.clone()))
    }
}

/// A hyper service that dispatches requests to a router.
#[derive(Clone)]
pub struct MeridianService {
    router: Arc<Router>,
    max_body: usize,
}

impl MeridianService {
    pub fn new(router: Router, config: Config) -> Self {
        Self {
            router: Arc::new(router),
            max_body: config.max_body,
        }
    }
}

impl Service<hyper::Request<Body>> for MeridianService {
    type Response = hyper::Response<Body>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: hyper::Request<Body>) -> Self::Future {
        let router = self.router.clone();
        let max_body = self.max_body;

        Box::pin(async move {
            let req = match into_request(req, max_body).await {
                Ok(req) => req,
                Err(status) => return Ok(empty(status)),
            };

            Ok(from_response(router.serve(req).await))
        })
    }
}

async fn into_request(
    req: hyper::Request<Body>,
    max_body: usize,
) -> Result<meridian::Request, StatusCode> {
    let (parts, body) = req.into_parts();

    let method = Method::try_from(&parts.method).map_err(|err| {
        tracing::debug!(%err, "rejecting request");
        StatusCode::NOT_IMPLEMENTED
    })?;

    let body = read_body(body, max_body).await?;

    let uri = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |path| path.as_str());

    let mut builder = meridian::Request::builder().method(method).uri(uri).body(body);

    for (name, value) in &parts.headers {
        builder = builder.header((
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        ));
    }

    Ok(builder.build())
}

async fn read_body(mut body: Body, max_body: usize) -> Result<Bytes, StatusCode> {
    if body.size_hint().lower() > max_body as u64 {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let mut buf = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|err| {
            tracing::warn!(%err, "failed to read request body");
            StatusCode::BAD_REQUEST
        })?;

        if buf.len() + chunk.len() > max_body {
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }

        buf.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buf))
}

fn from_response(response: meridian::Response) -> hyper::Response<Body> {
    let mut builder = hyper::Response::builder().status(response.status);

    for (name, value) in response.headers.iter() {
        builder = builder.header(name, value);
    }

    builder.body(Body::from(response.body)).unwrap_or_else(|err| {
        tracing::warn!(%err, "invalid response");
        empty(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

fn empty(status: StatusCode) -> hyper::Response<Body> {
    let mut response = hyper::Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// A type that can be resolved to a socket address.
pub trait ToSocketAddr {
    fn to_socket_addr(self) -> io::Result<SocketAddr>;
}

impl ToSocketAddr for SocketAddr {
    fn to_socket_addr(self) -> io::Result<SocketAddr> {
        Ok(self)
    }
}

macro_rules! to_socket_addr {
    ($($ty:ty),*) => {$(
        impl ToSocketAddr for $ty {
            fn to_socket_addr(self) -> io::Result<SocketAddr> {
                self.to_socket_addrs()?.next().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "no socket address found")
                })
            }
        }
    )*}
}

to_socket_addr! {
    &str,
    String,
    (&str, u16),
    (IpAddr, u16),
    (String, u16),
    (Ipv4Addr, u16),
    (Ipv6Addr, u16),
    SocketAddrV4,
    SocketAddrV6
}

#[cfg(test)]
mod tests {
    use super::*;

    use meridian::{extract, handler_fn};

    fn service(max_body: usize) -> MeridianService {
        let router = Router::new().post(
            "/echo/{name}",
            handler_fn(
                (extract::query::<u8>("times"), extract::json::<String>()),
                |(times, body)| async move { body.repeat(times.into()) },
            ),
        );

        MeridianService::new(router, Config::default().max_body(max_body))
    }

    fn request(method: &str, uri: &str, body: &'static str) -> hyper::Request<Body> {
        hyper::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body(response: hyper::Response<Body>) -> Bytes {
        hyper::body::to_bytes(response.into_body()).await.unwrap()
    }

    #[tokio::test]
    async fn serves_requests() {
        let response = service(1024)
            .call(request("POST", "/echo/a?times=3", r#""ab""#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body(response).await, "ababab");
    }

    #[tokio::test]
    async fn binding_errors() {
        let response = service(1024)
            .call(request("POST", "/echo/a", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body(response).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("missing_query_parameter"), "{}", text);
        assert!(text.contains("missing_body"), "{}", text);
    }

    #[tokio::test]
    async fn oversized_bodies() {
        let response = service(4)
            .call(request("POST", "/echo/a?times=1", r#""too long""#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unsupported_methods() {
        let response = service(1024)
            .call(request("BREW", "/echo/a", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn socket_addrs() {
        let config = Config::default().addr("127.0.0.1:3000").unwrap();
        assert_eq!(config.addr.port(), 3000);

        let config = Config::default().addr((Ipv4Addr::LOCALHOST, 4000)).unwrap();
        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 4000)));
    }
}
