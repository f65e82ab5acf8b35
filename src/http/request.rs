use super::{query, Headers, IntoHeader, Method, QueryItem};

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::OnceCell;

/// An HTTP request.
///
/// A request is an immutable snapshot of everything the transport
/// received: the method, path, headers, query string and body.
/// Cloning a request is cheap, all clones share the same data.
#[derive(Clone)]
pub struct Request {
    path: Arc<str>,
    shared: Arc<Shared>,
}

struct Shared {
    method: Method,
    headers: Headers,
    query: Option<String>,
    query_items: OnceCell<Vec<QueryItem>>,
    body: Bytes,
}

impl Request {
    /// Create a [`RequestBuilder`].
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// The request's method.
    pub fn method(&self) -> Method {
        self.shared.method
    }

    /// The request's path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request's headers.
    pub fn headers(&self) -> &Headers {
        &self.shared.headers
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.shared.query.as_deref()
    }

    /// The items of the query string, in the order they were sent.
    pub fn query_items(&self) -> &[QueryItem] {
        self.shared
            .query_items
            .get_or_init(|| self.query().map(query::parse).unwrap_or_default())
    }

    /// Returns the first query item with the given name.
    pub fn query_item(&self, name: &str) -> Option<&QueryItem> {
        self.query_items().iter().find(|item| item.name == name)
    }

    /// The request body.
    pub fn body(&self) -> &Bytes {
        &self.shared.body
    }

    /// Returns a view of this request with `prefix` removed from the path.
    ///
    /// The prefix must be followed by a `/` or the end of the path, so
    /// `/todos` strips `/todos/1` to `/1` and `/todos` to the empty path,
    /// but does not strip `/todosx`. A prefix ending in `/` only matches
    /// paths with another `/` after it.
    pub fn strip_prefix(&self, prefix: &str) -> Option<Request> {
        let rest = self.path.strip_prefix(prefix)?;

        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }

        Some(Request {
            path: rest.into(),
            shared: self.shared.clone(),
        })
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("headers", self.headers())
            .field("body", &self.body().len())
            .finish()
    }
}

/// A builder for [`Request`].
///
/// This is how the transport layer hands a request to the framework.
#[derive(Default)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    headers: Headers,
    query: Option<String>,
    query_items: Option<Vec<QueryItem>>,
    body: Bytes,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the path and query string from a request target,
    /// such as `/todos?completed=true`.
    ///
    /// Any fragment is discarded.
    pub fn uri(mut self, uri: &str) -> Self {
        let uri = uri.split_once('#').map_or(uri, |(uri, _)| uri);

        match uri.split_once('?') {
            Some((path, query)) => {
                self.path = path.to_owned();
                self.query = Some(query.to_owned());
            }
            None => {
                self.path = uri.to_owned();
                self.query = None;
            }
        }

        self
    }

    /// Set the path, leaving the query string untouched.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Add an already parsed query item.
    ///
    /// Items added this way take the place of any query string
    /// set through [`uri`](Self::uri).
    pub fn query_item(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.query_items
            .get_or_insert_with(Vec::new)
            .push(QueryItem::new(name, value));
        self
    }

    /// Append a header.
    pub fn header<H>(mut self, header: H) -> Self
    where
        H: IntoHeader,
    {
        self.headers.append(header);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        let query_items = OnceCell::new();
        if let Some(items) = self.query_items {
            let _ = query_items.set(items);
        }

        Request {
            path: self.path.into(),
            shared: Arc::new(Shared {
                method: self.method,
                headers: self.headers,
                query: self.query,
                query_items,
                body: self.body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_splits_path_and_query() {
        let req = Request::builder().uri("/todos?completed=true#top").build();

        assert_eq!(req.path(), "/todos");
        assert_eq!(req.query(), Some("completed=true"));
        assert_eq!(req.query_item("completed").unwrap().value.as_deref(), Some("true"));
    }

    #[test]
    fn explicit_query_items() {
        let req = Request::builder()
            .uri("/?ignored=1")
            .query_item("done", None)
            .query_item("page", Some("2"))
            .build();

        assert_eq!(req.query_items().len(), 2);
        assert!(req.query_item("ignored").is_none());
        assert_eq!(req.query_item("done").unwrap().value, None);
    }

    #[test]
    fn first_query_item_wins() {
        let req = Request::builder().uri("/?a=1&a=2").build();
        assert_eq!(req.query_item("a").unwrap().value.as_deref(), Some("1"));
    }

    #[test]
    fn strip_prefix() {
        let req = Request::builder()
            .method(Method::Post)
            .uri("/todos/5")
            .body("{}")
            .build();

        let stripped = req.strip_prefix("/todos").unwrap();
        assert_eq!(stripped.path(), "/5");
        assert_eq!(stripped.method(), Method::Post);
        assert_eq!(stripped.body().as_ref(), b"{}");

        let root = Request::builder().uri("/todos").build();
        assert_eq!(root.strip_prefix("/todos").unwrap().path(), "");

        let other = Request::builder().uri("/todosx").build();
        assert!(other.strip_prefix("/todos").is_none());

        assert_eq!(req.strip_prefix("").unwrap().path(), "/todos/5");
    }

    #[test]
    fn strip_prefix_keeps_the_separator() {
        let req = Request::builder().uri("/todos/5").build();
        assert!(req.strip_prefix("/todos/").is_none());

        let nested = Request::builder().uri("/todos//5").build();
        assert_eq!(nested.strip_prefix("/todos/").unwrap().path(), "/5");
    }
}
