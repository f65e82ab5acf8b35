//! Request dispatch.

mod scope;
pub use scope::Scope;

use crate::error::NotFound;
use crate::handler::{self, Erased, Handler};
use crate::http::{Method, Request, Response};
use crate::route::{MatchedRoute, Matcher};
use crate::Reject;

/// Dispatches requests to the first matching route.
///
/// Routes and [`Scope`]s are tried in the order they were registered,
/// so when two routes overlap the one registered first wins.
///
/// ```
/// use meridian::{handler_fn, Router};
/// use meridian::http::{Method, Request, StatusCode};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let router = Router::new()
///     .get("/", handler_fn((), |()| async { "index" }))
///     .get("/{id}", handler_fn((), |()| async { "item" }));
///
/// let req = Request::builder().method(Method::Get).uri("/abc").build();
/// assert_eq!(router.serve(req).await.body, "item");
///
/// let req = Request::builder().method(Method::Delete).uri("/").build();
/// assert_eq!(router.serve(req).await.status, StatusCode::NOT_FOUND);
/// # }
/// ```
#[derive(Default)]
pub struct Router {
    entries: Vec<Entry>,
}

enum Entry {
    Route(Route),
    Scope(Scope),
}

struct Route {
    matcher: Matcher,
    handler: Box<dyn Erased>,
}

struct Found<'a> {
    req: Request,
    matched: MatchedRoute,
    route: &'a Route,
}

macro_rules! insert_route {
    ($name:ident => $method:ident) => {
        #[doc = concat!("Insert a route for the `", stringify!($method), "` method.")]
        pub fn $name<H>(self, matcher: impl Into<Matcher>, handler: H) -> Self
        where
            H: Handler,
        {
            self.route(Matcher::method(Method::$method, matcher), handler)
        }
    };
}

pub(crate) use insert_route;

impl Router {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route.
    ///
    /// The handler's inputs are declared here, once.
    pub fn route<H>(mut self, matcher: impl Into<Matcher>, handler: H) -> Self
    where
        H: Handler,
    {
        let matcher = matcher.into();
        tracing::trace!(route = %matcher, "registering route");

        self.entries.push(Entry::Route(Route {
            matcher,
            handler: handler::erase(handler),
        }));
        self
    }

    insert_route!(get => Get);
    insert_route!(put => Put);
    insert_route!(post => Post);
    insert_route!(head => Head);
    insert_route!(patch => Patch);
    insert_route!(delete => Delete);
    insert_route!(options => Options);

    /// Insert a group of routes under a common prefix.
    pub fn scope(mut self, scope: Scope) -> Self {
        tracing::trace!(prefix = %scope.prefix(), "registering scope");
        self.entries.push(Entry::Scope(scope));
        self
    }

    /// Returns the parameters captured by the route that would handle `req`.
    pub fn find(&self, req: &Request) -> Option<MatchedRoute> {
        self.lookup(req).map(|found| found.matched)
    }

    fn lookup(&self, req: &Request) -> Option<Found<'_>> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Route(route) => route.matcher.matches(req).map(|matched| Found {
                req: req.clone(),
                matched,
                route,
            }),
            Entry::Scope(scope) => req
                .strip_prefix(scope.prefix())
                .and_then(|req| scope.router().lookup(&req)),
        })
    }

    /// Route a request to its handler and produce the response.
    ///
    /// Requests that match no route are answered with `404 Not Found`,
    /// requests whose inputs fail to bind with `400 Bad Request`.
    pub async fn serve(&self, req: Request) -> Response {
        let Found {
            req: scoped,
            matched,
            route,
        } = match self.lookup(&req) {
            Some(found) => found,
            None => {
                tracing::debug!(method = %req.method(), path = req.path(), "no route found");
                return NotFound::route(req.method(), req.path()).reject();
            }
        };

        tracing::trace!(route = %route.matcher, params = ?matched, "matched route");

        let future = match route.handler.call(&scoped, &matched) {
            Ok(future) => future,
            Err(errors) => {
                tracing::debug!(route = %route.matcher, %errors, "failed to bind request");
                return errors.reject();
            }
        };

        match future.await {
            Ok(response) => response,
            Err(rejection) => {
                tracing::debug!(route = %route.matcher, %rejection, "handler rejected request");
                rejection.reject()
            }
        }
    }
}
