use crate::error::{BindingError, BindingErrors, NotFound};
use crate::http::{Response, StatusCode};
use crate::respond::Json;
use crate::Respond;

use std::convert::Infallible;
use std::fmt::{self, Debug, Display};

use serde::Serialize;

/// An error capable of rejecting a request with an HTTP error response.
pub trait Reject: Debug + Display {
    /// Reject the request with an HTTP error response.
    fn reject(self) -> Response;
}

impl Reject for StatusCode {
    fn reject(self) -> Response {
        Response::from(self)
    }
}

impl Reject for Infallible {
    fn reject(self) -> Response {
        match self {}
    }
}

/// Every binding error is rendered as a `400 Bad Request`, with one
/// entry per failed input.
impl Reject for BindingErrors {
    fn reject(self) -> Response {
        render(StatusCode::BAD_REQUEST, self.iter().map(ErrorBody::from).collect())
    }
}

impl Reject for NotFound {
    fn reject(self) -> Response {
        let message = self.to_string();
        render(
            StatusCode::NOT_FOUND,
            vec![ErrorBody {
                kind: "not_found",
                message,
            }],
        )
    }
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl From<&BindingError> for ErrorBody {
    fn from(err: &BindingError) -> Self {
        ErrorBody {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct Errors {
    errors: Vec<ErrorBody>,
}

fn render(status: StatusCode, errors: Vec<ErrorBody>) -> Response {
    match Json(Errors { errors }).respond() {
        Ok(response) => response.status(status),
        Err(status) => Response::from(status),
    }
}

/// A dynamically typed rejection.
pub struct Rejection {
    inner: Box<dyn BoxedReject + Send>,
}

impl Rejection {
    /// Create a new `Rejection`.
    pub fn new<E>(err: E) -> Self
    where
        E: IntoRejection,
    {
        err.into_rejection()
    }

    /// Convert this error into an HTTP response.
    ///
    /// This method is analogous to [`Reject::reject`],
    /// which cannot be implemented directly due to
    /// coherence rules.
    pub fn reject(self) -> Response {
        self.inner.reject_boxed()
    }
}

trait BoxedReject: Reject {
    fn reject_boxed(self: Box<Self>) -> Response;
}

impl<T: Reject> BoxedReject for T {
    fn reject_boxed(self: Box<Self>) -> Response {
        Reject::reject(*self)
    }
}

impl fmt::Debug for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<E> From<E> for Rejection
where
    E: Reject + Send + 'static,
{
    fn from(err: E) -> Self {
        Self {
            inner: Box::new(err),
        }
    }
}

/// A type that can be converted into a [`Rejection`].
///
/// This trait allows [`Rejection`] and [`Response`]
/// to be used as rejections while not implementing
/// [`Reject`] directly.
pub trait IntoRejection {
    fn into_rejection(self) -> Rejection;
}

impl<E> IntoRejection for E
where
    E: Reject + Send + 'static,
{
    fn into_rejection(self) -> Rejection {
        self.into()
    }
}

impl IntoRejection for Rejection {
    fn into_rejection(self) -> Rejection {
        self
    }
}

impl IntoRejection for Response {
    fn into_rejection(self) -> Rejection {
        struct Impl(Response);

        impl fmt::Debug for Impl {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self.0)
            }
        }

        impl fmt::Display for Impl {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "status {}", self.0.status)
            }
        }

        impl Reject for Impl {
            fn reject(self) -> Response {
                self.0
            }
        }

        Impl(self).into()
    }
}
