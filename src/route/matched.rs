use crate::error::BindingError;
use crate::param::{FromParam, ParameterKey};

/// The result of a successful route match.
///
/// Holds the text captured for each placeholder of the matched
/// template, in declaration order. Captures are taken verbatim from
/// the request path, no percent-decoding is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedRoute {
    params: Vec<(String, String)>,
}

impl MatchedRoute {
    /// A match without any captures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text captured for the placeholder `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Decode the parameter identified by the key `K`.
    ///
    /// Fails with [`BindingError::MissingUrlParameter`] if the matched template
    /// did not declare the placeholder, and with [`BindingError::UrlParameterDecoding`]
    /// if the captured text cannot be decoded into `K::Decode`.
    pub fn parameter<K>(&self) -> Result<K::Decode, BindingError>
    where
        K: ParameterKey,
    {
        let raw = self
            .get(K::NAME)
            .ok_or(BindingError::MissingUrlParameter { name: K::NAME })?;

        K::Decode::from_param(raw).map_err(|err| BindingError::UrlParameterDecoding {
            name: K::NAME,
            ty: std::any::type_name::<K::Decode>(),
            source: Box::new(err),
        })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over the `(name, captured text)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<N, V> FromIterator<(N, V)> for MatchedRoute
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (N, V)>,
    {
        MatchedRoute {
            params: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::parameter_key!(Id => "id": u64);
    crate::parameter_key!(Name => "name": String);

    #[test]
    fn typed_lookup() {
        let matched: MatchedRoute = [("id", "12"), ("name", "bob")].into_iter().collect();

        assert_eq!(matched.parameter::<Id>().unwrap(), 12);
        assert_eq!(matched.parameter::<Name>().unwrap(), "bob");
        assert_eq!(matched.get("name"), matched.get("name"));
    }

    #[test]
    fn missing_and_undecodable() {
        let matched: MatchedRoute = [("id", "abc")].into_iter().collect();

        assert!(matches!(
            matched.parameter::<Id>(),
            Err(BindingError::UrlParameterDecoding { name: "id", .. })
        ));
        assert!(matches!(
            matched.parameter::<Name>(),
            Err(BindingError::MissingUrlParameter { name: "name" })
        ));
    }
}
