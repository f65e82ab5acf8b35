//! Field extractors.
//!
//! An extractor resolves one handler input from the request: a path
//! capture ([`url_param`]), a query item ([`query`], [`flag`]) or the
//! JSON body ([`json`]). Extractors are declared once, when a handler
//! is registered, and evaluated for every matching request by the
//! [`Bind`](crate::Bind) implementation of the handler's inputs.

mod json;
mod path;
mod query;

pub use json::{json, JsonBody, OptionalJsonBody};
pub use path::{url_param, UrlParameter};
pub use query::{flag, query, DecodeStrategy, Flag, OptionalFlag, OptionalQuery, Present, Query};

use crate::error::BindingError;
use crate::http::Request;
use crate::route::MatchedRoute;

/// Resolves a single handler input.
pub trait Extract {
    /// The value produced on success.
    type Output: Send;

    /// Extract the value from a request and the route it matched.
    fn extract(&self, req: &Request, route: &MatchedRoute) -> Result<Self::Output, BindingError>;
}
