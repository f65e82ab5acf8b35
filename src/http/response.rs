use super::{Headers, IntoHeader, StatusCode};

use bytes::Bytes;

/// An HTTP response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// The response's status
    pub status: StatusCode,

    /// The response's headers
    pub headers: Headers,

    /// The response body
    pub body: Bytes,
}

impl Response {
    /// Create an empty `200 OK` response.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set a header, replacing existing values with the same name.
    pub fn header<H>(mut self, header: H) -> Self
    where
        H: IntoHeader,
    {
        self.headers.insert(header);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

impl From<StatusCode> for Response {
    fn from(status: StatusCode) -> Self {
        Response::new().status(status)
    }
}
