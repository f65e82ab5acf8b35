use crate::bind::Bind;
use crate::handler::Handler;
use crate::Respond;

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

/// Create a [`Handler`] from a set of inputs and an async closure.
///
/// The closure receives the bound inputs as a tuple. Returning a
/// `Result` lets the closure reject the request.
///
/// ```
/// use meridian::{extract, handler_fn, Json, Router};
///
/// let router = Router::new().get(
///     "/hello",
///     handler_fn((extract::query::<String>("name"),), |(name,)| async move {
///         Json(format!("hello {}", name))
///     }),
/// );
/// ```
pub fn handler_fn<I, F, Fut>(inputs: I, f: F) -> HandlerFn<I, F, Fut>
where
    I: Bind + Clone + Send + Sync + 'static,
    F: Fn(I::Output) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: Respond + 'static,
{
    HandlerFn {
        inputs,
        f,
        _fut: PhantomData,
    }
}

/// The handler returned by [`handler_fn`].
pub struct HandlerFn<I, F, Fut> {
    inputs: I,
    f: F,
    _fut: PhantomData<fn() -> Fut>,
}

#[async_trait::async_trait]
impl<I, F, Fut> Handler for HandlerFn<I, F, Fut>
where
    I: Bind + Clone + Send + Sync + 'static,
    F: Fn(I::Output) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: Respond + 'static,
{
    type Inputs = I;
    type Response = Fut::Output;
    type Rejection = Infallible;

    fn inputs(&self) -> I {
        self.inputs.clone()
    }

    async fn call(&self, inputs: I::Output) -> Result<Fut::Output, Infallible> {
        Ok((self.f)(inputs).await)
    }
}

impl<I, F, Fut> fmt::Debug for HandlerFn<I, F, Fut>
where
    I: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn")
            .field("inputs", &self.inputs)
            .finish()
    }
}
