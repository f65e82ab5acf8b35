use super::Extract;
use crate::error::BindingError;
use crate::http::Request;
use crate::route::MatchedRoute;

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extracts a query parameter from the request.
///
/// The raw value is decoded with each [`DecodeStrategy`] in turn, so
/// the same extractor accepts `?age=5` for a number and `?name=bob`
/// for a string without the client quoting anything. If the name is
/// sent more than once, the first occurrence is used.
///
/// The parameter is required: a missing item or a bare name without a
/// value is an error. Use [`Query::optional`] to accept both.
///
/// ```
/// use meridian::extract::{self, Extract};
/// use meridian::route::MatchedRoute;
/// use meridian::http::Request;
///
/// let req = Request::builder().uri("/search?limit=10&name=bob").build();
/// let route = MatchedRoute::new();
///
/// let limit: u32 = extract::query("limit").extract(&req, &route).unwrap();
/// let name: String = extract::query("name").extract(&req, &route).unwrap();
/// let page: Option<u32> = extract::query("page").optional().extract(&req, &route).unwrap();
///
/// assert_eq!((limit, name.as_str(), page), (10, "bob", None));
/// ```
pub fn query<T>(key: impl Into<String>) -> Query<T>
where
    T: DeserializeOwned + Send,
{
    Query {
        key: key.into(),
        _t: PhantomData,
    }
}

/// Extracts a presence-only query parameter, such as `?done`.
///
/// Only the existence of the item matters, any value is ignored.
pub fn flag(key: impl Into<String>) -> Flag {
    Flag { key: key.into() }
}

/// A strategy for decoding the raw text of a query value.
///
/// [`ORDER`](DecodeStrategy::ORDER) lists the strategies in the order
/// query extractors try them. The first one that succeeds wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Decode the text as any JSON value: a number, boolean or `null`,
    /// and also an array or object, so `?tags=[1,2]` decodes to a
    /// `Vec<u32>`.
    Literal,
    /// Decode the text as if it were a JSON string.
    QuotedString,
}

impl DecodeStrategy {
    pub const ORDER: [DecodeStrategy; 2] = [DecodeStrategy::Literal, DecodeStrategy::QuotedString];

    /// Decode `raw` into `T` using this strategy.
    pub fn decode<T>(self, raw: &str) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        match self {
            DecodeStrategy::Literal => serde_json::from_str(raw),
            DecodeStrategy::QuotedString => serde_json::from_value(Value::String(raw.to_owned())),
        }
    }
}

/// Reports the error of the last strategy tried when none succeed.
fn decode<T>(key: &str, raw: &str) -> Result<T, BindingError>
where
    T: DeserializeOwned,
{
    let [first, rest @ ..] = DecodeStrategy::ORDER;

    rest.iter()
        .fold(first.decode(raw), |result, strategy| {
            result.or_else(|_| strategy.decode(raw))
        })
        .map_err(|source| BindingError::QueryParameterDecoding {
            key: key.to_owned(),
            ty: std::any::type_name::<T>(),
            source,
        })
}

/// The extractor returned by [`query`].
pub struct Query<T> {
    key: String,
    _t: PhantomData<fn() -> T>,
}

impl<T> Query<T> {
    /// Accept requests where the parameter is missing or has no value.
    ///
    /// A value that is present but cannot be decoded is still an error.
    pub fn optional(self) -> OptionalQuery<T> {
        OptionalQuery {
            key: self.key,
            _t: PhantomData,
        }
    }
}

impl<T> Extract for Query<T>
where
    T: DeserializeOwned + Send,
{
    type Output = T;

    fn extract(&self, req: &Request, _: &MatchedRoute) -> Result<T, BindingError> {
        let item = req
            .query_item(&self.key)
            .ok_or_else(|| BindingError::MissingQueryParameter {
                key: self.key.clone(),
            })?;

        let raw = item
            .value
            .as_deref()
            .ok_or_else(|| BindingError::NoValueQueryParameter {
                key: self.key.clone(),
            })?;

        decode(&self.key, raw)
    }
}

/// The extractor returned by [`Query::optional`].
pub struct OptionalQuery<T> {
    key: String,
    _t: PhantomData<fn() -> T>,
}

impl<T> Extract for OptionalQuery<T>
where
    T: DeserializeOwned + Send,
{
    type Output = Option<T>;

    fn extract(&self, req: &Request, _: &MatchedRoute) -> Result<Option<T>, BindingError> {
        match req.query_item(&self.key).and_then(|item| item.value.as_deref()) {
            Some(raw) => decode(&self.key, raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Marks a presence-only query parameter as sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Present;

/// The extractor returned by [`flag`].
#[derive(Debug, Clone)]
pub struct Flag {
    key: String,
}

impl Flag {
    /// Resolve to `None` instead of failing when the flag is missing.
    pub fn optional(self) -> OptionalFlag {
        OptionalFlag { key: self.key }
    }
}

impl Extract for Flag {
    type Output = Present;

    fn extract(&self, req: &Request, _: &MatchedRoute) -> Result<Present, BindingError> {
        req.query_item(&self.key)
            .map(|_| Present)
            .ok_or_else(|| BindingError::MissingQueryParameter {
                key: self.key.clone(),
            })
    }
}

/// The extractor returned by [`Flag::optional`].
#[derive(Debug, Clone)]
pub struct OptionalFlag {
    key: String,
}

impl Extract for OptionalFlag {
    type Output = Option<Present>;

    fn extract(&self, req: &Request, _: &MatchedRoute) -> Result<Option<Present>, BindingError> {
        Ok(req.query_item(&self.key).map(|_| Present))
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _t: PhantomData,
        }
    }
}

impl<T> Clone for OptionalQuery<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _t: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&self.key).finish()
    }
}

impl<T> fmt::Debug for OptionalQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OptionalQuery").field(&self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract<E: Extract>(extractor: E, uri: &str) -> Result<E::Output, BindingError> {
        let req = Request::builder().uri(uri).build();
        extractor.extract(&req, &MatchedRoute::new())
    }

    #[test]
    fn literal_then_quoted_string() {
        assert_eq!(extract(query::<i64>("n"), "/?n=5").unwrap(), 5);
        assert!(extract(query::<bool>("b"), "/?b=true").unwrap());
        assert_eq!(extract(query::<String>("s"), "/?s=hello").unwrap(), "hello");
        assert_eq!(extract(query::<String>("s"), "/?s=5").unwrap(), "5");
        assert_eq!(extract(query::<Option<u8>>("s"), "/?s=null").unwrap(), None);
        assert_eq!(extract(query::<f64>("f"), "/?f=1.5").unwrap(), 1.5);
    }

    #[test]
    fn quoted_string_phase_handles_quotes() {
        assert_eq!(
            extract(query::<String>("s"), "/?s=a%22b").unwrap(),
            "a\"b"
        );
    }

    #[test]
    fn enums_decode_from_bare_words() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        enum Order {
            Asc,
            Desc,
        }

        assert_eq!(extract(query::<Order>("o"), "/?o=desc").unwrap(), Order::Desc);
        assert!(extract(query::<Order>("o"), "/?o=sideways").is_err());
    }

    #[test]
    fn required_errors() {
        assert!(matches!(
            extract(query::<u32>("n"), "/"),
            Err(BindingError::MissingQueryParameter { key }) if key == "n"
        ));
        assert!(matches!(
            extract(query::<u32>("n"), "/?n"),
            Err(BindingError::NoValueQueryParameter { key }) if key == "n"
        ));
        assert!(matches!(
            extract(query::<u32>("n"), "/?n=five"),
            Err(BindingError::QueryParameterDecoding { key, ty: "u32", .. }) if key == "n"
        ));
    }

    #[test]
    fn decoding_errors_keep_the_diagnostic() {
        let err = extract(query::<u32>("n"), "/?n=five").unwrap_err();

        assert!(std::error::Error::source(&err).is_some());
        let message = err.to_string();
        assert!(message.starts_with("query parameter `n` could not be decoded as `u32`: "));
        assert!(message.contains("five"), "{}", message);
    }

    #[test]
    fn literal_phase_accepts_arrays_and_objects() {
        assert_eq!(extract(query::<Vec<u32>>("tags"), "/?tags=[1,2]").unwrap(), vec![1, 2]);

        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Range {
            from: u32,
            to: u32,
        }

        assert_eq!(
            extract(query::<Range>("r"), "/?r=%7B%22from%22:1,%22to%22:3%7D").unwrap(),
            Range { from: 1, to: 3 }
        );
    }

    #[test]
    fn optional_absence_is_not_an_error() {
        assert_eq!(extract(query::<u32>("n").optional(), "/").unwrap(), None);
        assert_eq!(extract(query::<u32>("n").optional(), "/?n").unwrap(), None);
        assert_eq!(extract(query::<u32>("n").optional(), "/?n=3").unwrap(), Some(3));
        assert!(matches!(
            extract(query::<u32>("n").optional(), "/?n=x"),
            Err(BindingError::QueryParameterDecoding { .. })
        ));
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(extract(query::<u32>("n"), "/?n=1&n=2").unwrap(), 1);
    }

    #[test]
    fn flags() {
        assert_eq!(extract(flag("done"), "/?done").unwrap(), Present);
        assert_eq!(extract(flag("done"), "/?done=no").unwrap(), Present);
        assert!(matches!(
            extract(flag("done"), "/"),
            Err(BindingError::MissingQueryParameter { .. })
        ));

        assert_eq!(extract(flag("done").optional(), "/?done").unwrap(), Some(Present));
        assert_eq!(extract(flag("done").optional(), "/").unwrap(), None);
    }
}
