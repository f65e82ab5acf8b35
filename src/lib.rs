//! A small web framework with declarative request binding.
//!
//! Routes are [`Matcher`](route::Matcher)s compiled from templates such
//! as `/todos/{id}`. Each route is served by a [`Handler`] that declares
//! its inputs as a tuple of [extractors](extract). Every input is bound
//! before the handler runs, and when some of them fail the client is
//! told about all of the failures in a single `400 Bad Request`.
//!
//! ```
//! use meridian::{extract, handler_fn, Json, Router, Scope};
//! use meridian::route::Matcher;
//!
//! meridian::parameter_key!(Id => "id": u64);
//!
//! let router = Router::new().scope(
//!     Scope::new("/todos")
//!         .get(
//!             Matcher::root(),
//!             handler_fn((extract::query::<bool>("completed").optional(),), |(completed,)| async move {
//!                 Json(completed)
//!             }),
//!         )
//!         .get(
//!             "/{id}",
//!             handler_fn((extract::url_param::<Id>(),), |(id,)| async move { Json(id) }),
//!         ),
//! );
//! ```

pub mod extract;
pub mod http;
pub mod param;
pub mod route;

mod bind;
mod error;
mod handler;
mod reject;
mod respond;
mod router;

pub use async_trait::async_trait;
pub use bind::Bind;
pub use error::{BindingError, BindingErrors, BoxError, NotFound};
pub use handler::{handler_fn, Handler, HandlerFn};
pub use crate::http::{Request, Response};
pub use reject::{IntoRejection, Reject, Rejection};
pub use respond::{Json, Respond};
pub use router::{Router, Scope};
