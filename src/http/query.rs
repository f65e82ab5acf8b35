use std::borrow::Cow;

/// A single item of a URL query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItem {
    /// The percent-decoded name of the item.
    pub name: String,

    /// The percent-decoded value of the item.
    ///
    /// `None` for a bare name, such as `done` in `?done&page=2`.
    pub value: Option<String>,
}

impl QueryItem {
    pub fn new(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            value: value.map(Into::into),
        }
    }
}

/// Parse a raw query string (without the leading `?`) into its items.
///
/// Order and duplicates are preserved, empty segments are skipped.
pub fn parse(query: &str) -> Vec<QueryItem> {
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, value)) => QueryItem {
                name: decode(name),
                value: Some(decode(value)),
            },
            None => QueryItem {
                name: decode(segment),
                value: None,
            },
        })
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .unwrap_or(Cow::Borrowed(raw))
        .into_owned()
}
