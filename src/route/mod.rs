//! Route matching.
//!
//! Route templates are compiled into [`Matcher`]s, which can be combined
//! by method and by ordered alternation.

mod matched;
mod matcher;
mod pattern;

pub use matched::MatchedRoute;
pub use matcher::Matcher;
pub use pattern::{PatternError, Template};
