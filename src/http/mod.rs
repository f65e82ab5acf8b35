pub mod header;
pub mod query;

mod method;
mod request;
mod response;

pub use bytes::Bytes;
pub use header::{Headers, IntoHeader};
pub use ::http::StatusCode;
pub use method::{Method, ParseMethodError};
pub use query::QueryItem;
pub use request::{Request, RequestBuilder};
pub use response::Response;
