use std::fmt;

/// The headers of an HTTP request or response.
///
/// Headers keep their insertion order. Lookups ignore ASCII case,
/// and when a name appears more than once the value inserted last
/// is the one returned by [`get`](Headers::get).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Headers {
        Headers {
            entries: Vec::with_capacity(16),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the most recently inserted value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, replacing any existing values with the same name.
    ///
    /// Returns `true` if a value was replaced.
    pub fn insert<H>(&mut self, header: H) -> bool
    where
        H: IntoHeader,
    {
        let (name, value) = header.into_header();
        let before = self.entries.len();
        self.entries.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        let replaced = self.entries.len() != before;
        self.entries.push((name, value));
        replaced
    }

    /// Adds a header, keeping existing values with the same name.
    pub fn append<H>(&mut self, header: H)
    where
        H: IntoHeader,
    {
        self.entries.push(header.into_header());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<H> FromIterator<H> for Headers
where
    H: IntoHeader,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = H>,
    {
        Headers {
            entries: iter.into_iter().map(IntoHeader::into_header).collect(),
        }
    }
}

/// Types that represent an HTTP header.
pub trait IntoHeader {
    /// Returns the name and value of the header.
    fn into_header(self) -> (String, String);
}

impl<N, V> IntoHeader for (N, V)
where
    N: Into<String>,
    V: Into<String>,
{
    fn into_header(self) -> (String, String) {
        (self.0.into(), self.1.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive() {
        let mut headers = Headers::new();
        headers.append(("Content-Type", "application/json"));

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert!(headers.get("accept").is_none());
    }

    #[test]
    fn last_value_wins() {
        let headers: Headers = [("A", "1"), ("a", "2"), ("B", "3")].into_iter().collect();

        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("A"), Some("2"));
        assert!(headers.get_all("a").eq(["1", "2"]));
    }

    #[test]
    fn insert_replaces() {
        let mut headers = Headers::new();
        assert!(!headers.insert(("A", "A")));
        headers.append(("a", "B"));
        assert!(headers.insert(("A", "C")));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("a"), Some("C"));
    }
}
