use super::{insert_route, Router};
use crate::handler::Handler;
use crate::http::Method;
use crate::route::Matcher;

/// Routes scoped under a common prefix.
///
/// Routes inside a scope are matched against the rest of the path after
/// the prefix, so [`Matcher::root`] matches the prefix itself.
///
/// ```
/// use meridian::{handler_fn, Router, Scope};
/// use meridian::route::Matcher;
/// use meridian::http::{Method, Request};
///
/// let router = Router::new().scope(
///     Scope::new("/todos")
///         .get(Matcher::root(), handler_fn((), |()| async { "list" }))
///         .get("/{id}", handler_fn((), |()| async { "show" })),
/// );
///
/// let req = Request::builder().method(Method::Get).uri("/todos/12").build();
/// assert_eq!(router.find(&req).unwrap().get("id"), Some("12"));
/// ```
pub struct Scope {
    prefix: String,
    router: Router,
}

impl Scope {
    /// Create a scope.
    ///
    /// A leading `/` is added to the prefix if missing and trailing
    /// slashes are removed, so `"todos/"` is the same as `"/todos"`.
    /// `"/"` and `""` both become the empty prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.starts_with('/') {
            prefix.insert(0, '/');
        }

        let len = prefix.trim_end_matches('/').len();
        prefix.truncate(len);

        Self {
            prefix,
            router: Router::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn router(&self) -> &Router {
        &self.router
    }

    /// Insert a route into the scope.
    pub fn route<H>(mut self, matcher: impl Into<Matcher>, handler: H) -> Self
    where
        H: Handler,
    {
        self.router = self.router.route(matcher, handler);
        self
    }

    insert_route!(get => Get);
    insert_route!(put => Put);
    insert_route!(post => Post);
    insert_route!(head => Head);
    insert_route!(patch => Patch);
    insert_route!(delete => Delete);
    insert_route!(options => Options);

    /// Nest another scope under this one.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.router = self.router.scope(scope);
        self
    }
}
