use std::borrow::Cow;
use std::convert::Infallible;

use crate::error::NotFound;
use crate::http::{Bytes, Response, StatusCode};
use crate::reject::{IntoRejection, Rejection};

use serde::Serialize;

/// A type that can be converted into an HTTP response.
pub trait Respond {
    /// An error that can occur during the conversion.
    type Rejection: IntoRejection;

    /// Convert into an HTTP response.
    fn respond(self) -> Result<Response, Self::Rejection>;

    /// Returns a new responder that adds the provided status
    /// code to the response.
    fn with_status(self, status: StatusCode) -> (StatusCode, Self)
    where
        Self: Sized,
    {
        (status, self)
    }
}

impl Respond for () {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(Response::default())
    }
}

impl Respond for Response {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(self)
    }
}

impl Respond for StatusCode {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(Response::from(self))
    }
}

impl<T> Respond for (StatusCode, T)
where
    T: Respond,
{
    type Rejection = T::Rejection;

    fn respond(self) -> Result<Response, T::Rejection> {
        self.1.respond().map(|response| response.status(self.0))
    }
}

impl<T, E> Respond for Result<T, E>
where
    T: Respond,
    E: IntoRejection,
{
    type Rejection = Rejection;

    fn respond(self) -> Result<Response, Rejection> {
        self.map_err(Rejection::new)
            .and_then(|ok| ok.respond().map_err(Rejection::new))
    }
}

impl<T> Respond for Option<T>
where
    T: Respond,
{
    type Rejection = Rejection;

    fn respond(self) -> Result<Response, Rejection> {
        match self {
            Some(responder) => responder.respond().map_err(Rejection::new),
            None => Err(NotFound::new().into()),
        }
    }
}

macro_rules! with_content_type {
    ($($ty:ty $(|$into:ident)? => $content_type:literal),* $(,)?) => { $(
        impl Respond for $ty {
            type Rejection = Infallible;

            fn respond(self) -> Result<Response, Infallible> {
                Ok(Response::new()
                    .header(("Content-Type", $content_type))
                    .body(self $(.$into())?))
            }
        })*
    }
}

with_content_type! {
    Bytes => "application/octet-stream",
    Vec<u8> => "application/octet-stream",
    &'static [u8] => "application/octet-stream",
    Cow<'static, [u8]> | into_owned => "application/octet-stream",
    String => "text/plain; charset=utf-8",
    &'static str => "text/plain; charset=utf-8",
    Cow<'static, str> | into_owned => "text/plain; charset=utf-8",
}

/// Serializes the given value as a JSON response body.
///
/// A value that fails to serialize is answered with
/// `500 Internal Server Error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Respond for Json<T>
where
    T: Serialize,
{
    type Rejection = StatusCode;

    fn respond(self) -> Result<Response, StatusCode> {
        match serde_json::to_vec(&self.0) {
            Ok(body) => Ok(Response::new()
                .header(("Content-Type", "application/json"))
                .body(body)),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    #[test]
    fn text_and_status() {
        let response = "hello".with_status(StatusCode::CREATED).respond().unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, "hello");
        assert_eq!(
            response.headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn json() {
        let response = Json(vec![1, 2, 3]).respond().unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "[1,2,3]");

        let mut map = HashMap::new();
        map.insert(vec![1u8], "non-string keys");
        assert_eq!(
            Json(map).respond().unwrap_err(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_option_is_not_found() {
        let response = None::<()>.respond().unwrap_err().reject();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
