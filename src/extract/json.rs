use super::Extract;
use crate::error::BindingError;
use crate::http::Request;
use crate::route::MatchedRoute;

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

/// Deserialize the given type as JSON from the request body.
///
/// The request must use a method that carries a body, and declare a
/// JSON content type (`application/json`, or any `+json` media type).
/// An empty body is an error, use [`JsonBody::optional`] to accept it.
///
/// ```
/// use meridian::extract::{self, Extract};
/// use meridian::route::MatchedRoute;
/// use meridian::http::{Method, Request};
///
/// #[derive(serde::Deserialize)]
/// struct NewTodo {
///     title: String,
/// }
///
/// let req = Request::builder()
///     .method(Method::Post)
///     .uri("/todos")
///     .header(("Content-Type", "application/json"))
///     .body(r#"{"title":"write docs"}"#)
///     .build();
///
/// let todo: NewTodo = extract::json().extract(&req, &MatchedRoute::new()).unwrap();
/// assert_eq!(todo.title, "write docs");
/// ```
pub fn json<T>() -> JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    JsonBody { _t: PhantomData }
}

/// The extractor returned by [`json`].
pub struct JsonBody<T> {
    _t: PhantomData<fn() -> T>,
}

impl<T> JsonBody<T> {
    /// Resolve an empty body to `None` instead of failing.
    pub fn optional(self) -> OptionalJsonBody<T> {
        OptionalJsonBody { _t: PhantomData }
    }
}

impl<T> Extract for JsonBody<T>
where
    T: DeserializeOwned + Send,
{
    type Output = T;

    fn extract(&self, req: &Request, _: &MatchedRoute) -> Result<T, BindingError> {
        read(req)?.ok_or(BindingError::MissingBody)
    }
}

/// The extractor returned by [`JsonBody::optional`].
pub struct OptionalJsonBody<T> {
    _t: PhantomData<fn() -> T>,
}

impl<T> Extract for OptionalJsonBody<T>
where
    T: DeserializeOwned + Send,
{
    type Output = Option<T>;

    fn extract(&self, req: &Request, _: &MatchedRoute) -> Result<Option<T>, BindingError> {
        read(req)
    }
}

// `None` means the body was empty.
fn read<T>(req: &Request) -> Result<Option<T>, BindingError>
where
    T: DeserializeOwned,
{
    if !req.method().allows_body() {
        return Err(BindingError::UnexpectedBody {
            method: req.method(),
        });
    }

    if !is_json(req) {
        return Err(BindingError::ContentType);
    }

    if req.body().is_empty() {
        return Ok(None);
    }

    serde_json::from_slice(req.body())
        .map(Some)
        .map_err(|source| BindingError::BodyDecoding {
            ty: std::any::type_name::<T>(),
            source,
        })
}

fn is_json(req: &Request) -> bool {
    let mime = || {
        req.headers()
            .get("content-type")?
            .parse::<mime::Mime>()
            .ok()
    };

    match mime() {
        Some(mime) => mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON),
        None => false,
    }
}

impl<T> Clone for JsonBody<T> {
    fn clone(&self) -> Self {
        Self { _t: PhantomData }
    }
}

impl<T> Clone for OptionalJsonBody<T> {
    fn clone(&self) -> Self {
        Self { _t: PhantomData }
    }
}

impl<T> fmt::Debug for JsonBody<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonBody<{}>", std::any::type_name::<T>())
    }
}

impl<T> fmt::Debug for OptionalJsonBody<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionalJsonBody<{}>", std::any::type_name::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Patch {
        title: Option<String>,
        order: Option<i32>,
    }

    fn request(method: Method, content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method(method).uri("/todos/1").body(body);
        if let Some(content_type) = content_type {
            builder = builder.header(("Content-Type", content_type));
        }
        builder.build()
    }

    fn extract<E: Extract>(extractor: E, req: &Request) -> Result<E::Output, BindingError> {
        extractor.extract(req, &MatchedRoute::new())
    }

    #[test]
    fn decodes_body() {
        let req = request(Method::Patch, Some("application/json"), r#"{"order":3}"#);
        assert_eq!(
            extract(json::<Patch>(), &req).unwrap(),
            Patch {
                title: None,
                order: Some(3)
            }
        );
    }

    #[test]
    fn json_media_types() {
        for content_type in [
            "application/json",
            "application/json; charset=utf-8",
            "application/vnd.api+json",
        ] {
            let req = request(Method::Post, Some(content_type), "{}");
            assert!(extract(json::<serde_json::Value>(), &req).is_ok(), "{}", content_type);
        }
    }

    #[test]
    fn body_on_get_is_always_unexpected() {
        for body in ["", "{}", "not json"] {
            let req = request(Method::Get, Some("application/json"), body);
            assert!(matches!(
                extract(json::<Patch>(), &req),
                Err(BindingError::UnexpectedBody { method: Method::Get })
            ));
            assert!(matches!(
                extract(json::<Patch>().optional(), &req),
                Err(BindingError::UnexpectedBody { .. })
            ));
        }
    }

    #[test]
    fn content_type() {
        let missing = request(Method::Post, None, "{}");
        let text = request(Method::Post, Some("text/plain"), "{}");
        let garbage = request(Method::Post, Some("json"), "{}");

        for req in [missing, text, garbage] {
            assert!(matches!(
                extract(json::<Patch>(), &req),
                Err(BindingError::ContentType)
            ));
        }
    }

    #[test]
    fn empty_body() {
        let req = request(Method::Put, Some("application/json"), "");

        assert!(matches!(
            extract(json::<Patch>(), &req),
            Err(BindingError::MissingBody)
        ));
        assert_eq!(extract(json::<Patch>().optional(), &req).unwrap(), None);
    }

    #[test]
    fn decoding_error_names_type() {
        let req = request(Method::Post, Some("application/json"), r#"{"order":"x"}"#);

        match extract(json::<Patch>().optional(), &req) {
            Err(BindingError::BodyDecoding { ty, source }) => {
                assert!(ty.ends_with("Patch"));
                assert!(source.is_data());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
