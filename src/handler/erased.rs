use crate::bind::Bind;
use crate::error::BindingErrors;
use crate::handler::Handler;
use crate::http::{Request, Response};
use crate::route::MatchedRoute;
use crate::{Rejection, Respond};

use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased [`Handler`], stored by the router.
pub trait Erased: Send + Sync {
    /// Bind the handler's inputs and return the handler's future.
    ///
    /// Binding happens before the future is created, so a request
    /// with invalid inputs never reaches the handler.
    fn call<'a>(
        &'a self,
        req: &Request,
        route: &MatchedRoute,
    ) -> Result<BoxFuture<'a, Result<Response, Rejection>>, BindingErrors>;
}

pub fn erase<H>(handler: H) -> Box<dyn Erased>
where
    H: Handler,
{
    let inputs = handler.inputs();
    Box::new(Bound { handler, inputs })
}

struct Bound<H: Handler> {
    handler: H,
    inputs: H::Inputs,
}

impl<H> Erased for Bound<H>
where
    H: Handler,
{
    fn call<'a>(
        &'a self,
        req: &Request,
        route: &MatchedRoute,
    ) -> Result<BoxFuture<'a, Result<Response, Rejection>>, BindingErrors> {
        let inputs = self.inputs.bind(req, route)?;

        Ok(Box::pin(async move {
            let response = self.handler.call(inputs).await.map_err(Rejection::new)?;
            response.respond().map_err(Rejection::new)
        }))
    }
}
