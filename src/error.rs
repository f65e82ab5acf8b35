use crate::http::Method;

use std::error::Error as StdError;
use std::fmt;

/// A dynamically typed error.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// An error produced by a single field extractor.
///
/// Extractor failures never abort a binding pass. They are collected
/// into [`BindingErrors`] so every malformed input is reported at once.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BindingError {
    /// The matched route did not capture the named placeholder.
    #[error("missing URL parameter `{name}`")]
    MissingUrlParameter { name: &'static str },

    /// The captured text could not be decoded into the target type.
    #[error("URL parameter `{name}` could not be decoded as `{ty}`: {source}")]
    UrlParameterDecoding {
        name: &'static str,
        ty: &'static str,
        source: BoxError,
    },

    /// No query item with the given name was sent.
    #[error("missing query parameter `{key}`")]
    MissingQueryParameter { key: String },

    /// The query item was sent as a bare name, without a value.
    #[error("query parameter `{key}` has no value")]
    NoValueQueryParameter { key: String },

    /// The query value could not be decoded into the target type.
    #[error("query parameter `{key}` could not be decoded as `{ty}`: {source}")]
    QueryParameterDecoding {
        key: String,
        ty: &'static str,
        source: serde_json::Error,
    },

    /// The request method does not allow a body to be read.
    #[error("{method} requests cannot have a JSON body")]
    UnexpectedBody { method: Method },

    /// The content type header is missing or not a JSON media type.
    #[error("expected content type `application/json`")]
    ContentType,

    /// The request body was required but empty.
    #[error("missing request body")]
    MissingBody,

    /// The request body could not be decoded into the target type.
    #[error("request body could not be decoded as `{ty}`: {source}")]
    BodyDecoding {
        ty: &'static str,
        source: serde_json::Error,
    },
}

impl BindingError {
    /// A stable, machine readable tag for the kind of error.
    pub fn kind(&self) -> &'static str {
        match self {
            BindingError::MissingUrlParameter { .. } => "missing_url_parameter",
            BindingError::UrlParameterDecoding { .. } => "url_parameter_decoding",
            BindingError::MissingQueryParameter { .. } => "missing_query_parameter",
            BindingError::NoValueQueryParameter { .. } => "no_value_query_parameter",
            BindingError::QueryParameterDecoding { .. } => "query_parameter_decoding",
            BindingError::UnexpectedBody { .. } => "unexpected_body",
            BindingError::ContentType => "content_type",
            BindingError::MissingBody => "missing_body",
            BindingError::BodyDecoding { .. } => "body_decoding",
        }
    }
}

/// Every error collected while binding the inputs of one request.
///
/// Never empty. Errors are kept in the order the extractors were declared.
#[derive(Debug)]
pub struct BindingErrors(Vec<BindingError>);

impl BindingErrors {
    pub(crate) fn new(errors: Vec<BindingError>) -> Self {
        debug_assert!(!errors.is_empty());
        BindingErrors(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BindingError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<BindingError> {
        self.0
    }
}

impl fmt::Display for BindingErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            fmt::Display::fmt(err, f)?;
        }
        Ok(())
    }
}

impl StdError for BindingErrors {}

impl IntoIterator for BindingErrors {
    type Item = BindingError;
    type IntoIter = std::vec::IntoIter<BindingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BindingErrors {
    type Item = &'a BindingError;
    type IntoIter = std::slice::Iter<'a, BindingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// No resource matched the request.
///
/// The router returns this before any extractor runs. Handlers may
/// also return it for resources that do not exist.
#[derive(Debug, Clone)]
pub struct NotFound {
    route: Option<(Method, String)>,
}

impl NotFound {
    pub fn new() -> Self {
        Self { route: None }
    }

    pub(crate) fn route(method: Method, path: impl Into<String>) -> Self {
        Self {
            route: Some((method, path.into())),
        }
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.route {
            Some((method, path)) => write!(f, "no route found for {} {}", method, path),
            None => write!(f, "not found"),
        }
    }
}

impl StdError for NotFound {}

impl Default for NotFound {
    fn default() -> Self {
        Self::new()
    }
}
