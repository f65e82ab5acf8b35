//! Asynchronous handlers that can respond to HTTP requests.

mod erased;
mod function;

pub(crate) use erased::{erase, Erased};
pub use function::{handler_fn, HandlerFn};

use crate::bind::Bind;
use crate::reject::IntoRejection;
use crate::Respond;

/// An asynchronous HTTP handler.
///
/// A handler declares its inputs once, when it is registered with a
/// [`Router`](crate::Router). For every request routed to it, the inputs
/// are bound and passed to [`call`](Handler::call). If any input fails
/// to bind, the handler is not called at all.
///
/// ```
/// use meridian::{extract, Handler, Json, NotFound};
/// use meridian::extract::UrlParameter;
///
/// meridian::parameter_key!(Id => "id": u32);
///
/// struct ShowUser;
///
/// #[meridian::async_trait]
/// impl Handler for ShowUser {
///     type Inputs = (UrlParameter<Id>,);
///     type Response = Json<String>;
///     type Rejection = NotFound;
///
///     fn inputs(&self) -> Self::Inputs {
///         (extract::url_param(),)
///     }
///
///     async fn call(&self, (id,): (u32,)) -> Result<Json<String>, NotFound> {
///         match id {
///             1 => Ok(Json("ferris".to_owned())),
///             _ => Err(NotFound::new()),
///         }
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Handler: Send + Sync + 'static {
    /// The extractors for the handler's inputs.
    type Inputs: Bind + Send + Sync + 'static;

    /// The handler's response.
    type Response: Respond;

    /// An error that can occur when calling the handler.
    type Rejection: IntoRejection;

    /// Declare the handler's inputs.
    ///
    /// Called once, when the handler is registered.
    fn inputs(&self) -> Self::Inputs;

    /// Call the handler with its bound inputs.
    async fn call(
        &self,
        inputs: <Self::Inputs as Bind>::Output,
    ) -> Result<Self::Response, Self::Rejection>;
}
