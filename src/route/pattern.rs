use super::{MatchedRoute, Matcher};
use crate::param::ParameterKey;

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// A route template: literal path text with named `{placeholders}`.
///
/// Templates are either parsed from a string, such as `/todos/{id}`, or
/// assembled piece by piece so placeholders can be declared through a
/// typed [`ParameterKey`]. Each placeholder matches one non-empty path
/// segment, without any `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Template {
    /// An empty template, matching only the empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut rest = template;

        while !rest.is_empty() {
            match rest.find(|c: char| c == '{' || c == '}') {
                Some(i) if rest.as_bytes()[i] == b'}' => {
                    return Err(PatternError::UnexpectedClose {
                        template: template.to_owned(),
                    })
                }
                Some(open) => {
                    if open > 0 {
                        segments.push(Segment::Literal(rest[..open].to_owned()));
                    }

                    let after = &rest[open + 1..];
                    let close = after
                        .find(|c: char| c == '{' || c == '}')
                        .filter(|&i| after.as_bytes()[i] == b'}')
                        .ok_or_else(|| PatternError::Unclosed {
                            template: template.to_owned(),
                        })?;

                    segments.push(Segment::Param(after[..close].to_owned()));
                    rest = &after[close + 1..];
                }
                None => {
                    segments.push(Segment::Literal(rest.to_owned()));
                    rest = "";
                }
            }
        }

        Ok(Template { segments })
    }

    /// Append literal path text.
    pub fn literal(mut self, literal: impl Into<String>) -> Self {
        self.segments.push(Segment::Literal(literal.into()));
        self
    }

    /// Append a placeholder by name.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Param(name.into()));
        self
    }

    /// Append the placeholder declared by the key `K`.
    pub fn key<K>(self) -> Self
    where
        K: ParameterKey,
    {
        self.param(K::NAME)
    }

    /// The placeholder names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Compile the template into a [`Matcher`].
    ///
    /// The compiled matcher is anchored at both ends of the path. A
    /// successful match captures exactly one value per placeholder.
    pub fn compile(&self) -> Result<Matcher, PatternError> {
        let mut names: Vec<String> = Vec::new();
        let mut expr = String::from("^");

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => expr.push_str(&regex::escape(literal)),
                Segment::Param(name) => {
                    if name.is_empty() {
                        return Err(PatternError::EmptyName {
                            template: self.to_string(),
                        });
                    }

                    if names.iter().any(|n| n == name) {
                        return Err(PatternError::DuplicateName {
                            name: name.clone(),
                            template: self.to_string(),
                        });
                    }

                    expr.push_str("([^/]+)");
                    names.push(name.clone());
                }
            }
        }

        expr.push('$');

        let description = self.to_string();

        if names.is_empty() {
            return Ok(Matcher::path(description));
        }

        let regex = Regex::new(&expr)?;
        let names: Arc<[String]> = names.into();

        Ok(Matcher::new(description, move |req| {
            let captures = regex.captures(req.path())?;

            Some(
                names
                    .iter()
                    .zip(captures.iter().skip(1))
                    .filter_map(|(name, capture)| Some((name.as_str(), capture?.as_str())))
                    .collect::<MatchedRoute>(),
            )
        }))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => f.write_str(literal)?,
                Segment::Param(name) => write!(f, "{{{}}}", name)?,
            }
        }
        Ok(())
    }
}

/// An error compiling a route template.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("placeholder `{name}` is declared twice in route template `{template}`")]
    DuplicateName { name: String, template: String },

    #[error("empty placeholder name in route template `{template}`")]
    EmptyName { template: String },

    #[error("unclosed `{{` in route template `{template}`")]
    Unclosed { template: String },

    #[error("unexpected `}}` in route template `{template}`")]
    UnexpectedClose { template: String },

    #[error("invalid route template: {0}")]
    Regex(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;

    fn get(path: &str) -> Request {
        Request::builder().uri(path).build()
    }

    #[test]
    fn parse_and_display() {
        let template = Template::parse("/users/{user}/posts/{post}").unwrap();

        assert!(template.names().eq(["user", "post"]));
        assert_eq!(template.to_string(), "/users/{user}/posts/{post}");
        assert_eq!(
            template,
            Template::new()
                .literal("/users/")
                .param("user")
                .literal("/posts/")
                .param("post")
        );
    }

    #[test]
    fn malformed() {
        assert!(matches!(
            Template::parse("/{id"),
            Err(PatternError::Unclosed { .. })
        ));
        assert!(matches!(
            Template::parse("/{a{b}}"),
            Err(PatternError::Unclosed { .. })
        ));
        assert!(matches!(
            Template::parse("/id}"),
            Err(PatternError::UnexpectedClose { .. })
        ));
        assert!(matches!(
            Template::parse("/{}").unwrap().compile(),
            Err(PatternError::EmptyName { .. })
        ));
        assert!(matches!(
            Template::parse("/{id}/{id}").unwrap().compile(),
            Err(PatternError::DuplicateName { name, .. }) if name == "id"
        ));
    }

    #[test]
    fn captures_in_order() {
        let matcher = Template::parse("/users/{user}/posts/{post}")
            .unwrap()
            .compile()
            .unwrap();

        let matched = matcher.matches(&get("/users/bob/posts/42")).unwrap();
        assert!(matched.iter().eq([("user", "bob"), ("post", "42")]));
    }

    #[test]
    fn anchored() {
        let matcher = Template::parse("/items/{id}").unwrap().compile().unwrap();

        assert!(matcher.matches(&get("/items/5")).is_some());
        assert!(matcher.matches(&get("/items/5/extra")).is_none());
        assert!(matcher.matches(&get("/api/items/5")).is_none());
        assert!(matcher.matches(&get("/items/")).is_none());
        assert!(matcher.matches(&get("/items")).is_none());
    }

    #[test]
    fn literal_text_is_escaped() {
        let matcher = Template::parse("/files/{name}.json").unwrap().compile().unwrap();

        let matched = matcher.matches(&get("/files/report.json")).unwrap();
        assert_eq!(matched.get("name"), Some("report"));
        assert!(matcher.matches(&get("/files/reportxjson")).is_none());
    }

    #[test]
    fn captures_are_not_decoded() {
        let matcher = Template::parse("/{name}").unwrap().compile().unwrap();

        let matched = matcher.matches(&get("/a%20b")).unwrap();
        assert_eq!(matched.get("name"), Some("a%20b"));
    }
}
