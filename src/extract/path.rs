use super::Extract;
use crate::error::BindingError;
use crate::http::Request;
use crate::param::ParameterKey;
use crate::route::MatchedRoute;

use std::fmt;
use std::marker::PhantomData;

/// Extracts a route parameter from the request path.
///
/// The captured text is decoded into the key's
/// [`Decode`](ParameterKey::Decode) type. Path parameters are always
/// required: a template cannot match without its placeholders.
///
/// ```
/// use meridian::extract::{self, Extract};
/// use meridian::route::Matcher;
/// use meridian::http::Request;
///
/// meridian::parameter_key!(Age => "age": u8);
///
/// let req = Request::builder().uri("/users/31").build();
/// let matched = Matcher::pattern("/users/{age}").matches(&req).unwrap();
///
/// let age = extract::url_param::<Age>().extract(&req, &matched).unwrap();
/// assert_eq!(age, 31);
/// ```
pub fn url_param<K>() -> UrlParameter<K>
where
    K: ParameterKey,
{
    UrlParameter { _key: PhantomData }
}

/// The extractor returned by [`url_param`].
pub struct UrlParameter<K> {
    _key: PhantomData<fn() -> K>,
}

impl<K> Extract for UrlParameter<K>
where
    K: ParameterKey,
{
    type Output = K::Decode;

    fn extract(&self, _: &Request, route: &MatchedRoute) -> Result<K::Decode, BindingError> {
        route.parameter::<K>()
    }
}

impl<K> Clone for UrlParameter<K> {
    fn clone(&self) -> Self {
        Self { _key: PhantomData }
    }
}

impl<K> fmt::Debug for UrlParameter<K>
where
    K: ParameterKey,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UrlParameter").field(&K::NAME).finish()
    }
}
