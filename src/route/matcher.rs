use super::{MatchedRoute, PatternError, Template};
use crate::http::{Method, Request};

use std::fmt;
use std::sync::Arc;

/// Decides whether a route applies to a request.
///
/// A matcher is a pure function from a [`Request`] to either no match
/// or a [`MatchedRoute`] holding the captured placeholders. Matchers
/// are immutable, cheap to clone and can be shared between threads.
///
/// ```
/// use meridian::route::Matcher;
/// use meridian::http::{Method, Request};
///
/// let matcher = Matcher::first_of([
///     Matcher::get("/"),
///     Matcher::get("/{id}"),
/// ]);
///
/// let req = Request::builder().method(Method::Get).uri("/abc").build();
/// assert_eq!(matcher.matches(&req).unwrap().get("id"), Some("abc"));
///
/// let req = Request::builder().method(Method::Delete).uri("/").build();
/// assert!(matcher.matches(&req).is_none());
/// ```
#[derive(Clone)]
pub struct Matcher {
    description: Arc<str>,
    matches: Arc<dyn Fn(&Request) -> Option<MatchedRoute> + Send + Sync>,
}

impl Matcher {
    /// Create a matcher from a function.
    ///
    /// The description is only used for logging and debugging.
    pub fn new<F>(description: impl Into<String>, matches: F) -> Self
    where
        F: Fn(&Request) -> Option<MatchedRoute> + Send + Sync + 'static,
    {
        Self {
            description: description.into().into(),
            matches: Arc::new(matches),
        }
    }

    /// Evaluate the matcher against a request.
    pub fn matches(&self, req: &Request) -> Option<MatchedRoute> {
        (self.matches)(req)
    }

    /// Matches requests whose path is exactly `path`.
    pub fn path(path: impl Into<String>) -> Self {
        let path = path.into();
        let description = path.clone();

        Self::new(description, move |req| {
            (req.path() == path).then(MatchedRoute::new)
        })
    }

    /// Matches only the empty path.
    ///
    /// Inside a [`Scope`](crate::Scope) this is the path of the
    /// scope's prefix itself.
    pub fn root() -> Self {
        Self::path("")
    }

    /// Matches every request.
    pub fn any() -> Self {
        Self::new("*", |_| Some(MatchedRoute::new()))
    }

    /// Compile a route template such as `/todos/{id}`.
    ///
    /// # Panics
    ///
    /// Panics if the template is malformed. Use [`try_pattern`](Self::try_pattern)
    /// to handle the error instead.
    pub fn pattern(template: &str) -> Self {
        match Self::try_pattern(template) {
            Ok(matcher) => matcher,
            Err(err) => panic!("failed to compile route: {}", err),
        }
    }

    /// Compile a route template, returning an error if it is malformed.
    pub fn try_pattern(template: &str) -> Result<Self, PatternError> {
        Template::parse(template)?.compile()
    }

    /// Matches if the request method is `method` and `inner` matches.
    ///
    /// The path is never inspected when the method differs.
    pub fn method(method: Method, inner: impl Into<Matcher>) -> Self {
        let inner = inner.into();

        Self::new(format!("{} {}", method, inner.description), move |req| {
            if req.method() == method {
                inner.matches(req)
            } else {
                None
            }
        })
    }

    /// Evaluates each matcher in order and returns the first match.
    pub fn first_of<I>(matchers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Matcher>,
    {
        let matchers: Vec<Matcher> = matchers.into_iter().map(Into::into).collect();

        let description = matchers
            .iter()
            .map(|m| m.description.as_ref())
            .collect::<Vec<_>>()
            .join(" | ");

        Self::new(description, move |req| {
            matchers.iter().find_map(|m| m.matches(req))
        })
    }
}

macro_rules! method {
    ($name:ident => Method::$method:ident) => {
        #[doc = concat!("Matches `", stringify!($method), "` requests that `inner` matches.")]
        pub fn $name(inner: impl Into<Matcher>) -> Self {
            Self::method(Method::$method, inner)
        }
    };
}

impl Matcher {
    method!(get => Method::Get);
    method!(put => Method::Put);
    method!(post => Method::Post);
    method!(head => Method::Head);
    method!(patch => Method::Patch);
    method!(delete => Method::Delete);
    method!(options => Method::Options);
}

impl From<&str> for Matcher {
    fn from(template: &str) -> Self {
        Matcher::pattern(template)
    }
}

impl From<String> for Matcher {
    fn from(template: String) -> Self {
        Matcher::pattern(&template)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Matcher").field(&self.description).finish()
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
