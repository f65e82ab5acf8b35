//! Typed route parameter keys.
//!
//! A [`ParameterKey`] ties a placeholder name to the type its captured
//! text decodes into. The same key is used to declare the placeholder
//! in a [`Template`](crate::route::Template) and to read it back out of
//! a [`MatchedRoute`](crate::route::MatchedRoute):
//!
//! ```
//! use meridian::route::{Matcher, Template};
//! use meridian::http::{Method, Request};
//!
//! meridian::parameter_key!(pub TodoId => "id": u32);
//!
//! let matcher = Matcher::get(Template::new().literal("/todos/").key::<TodoId>().compile().unwrap());
//!
//! let req = Request::builder().method(Method::Get).uri("/todos/7").build();
//! let matched = matcher.matches(&req).unwrap();
//! assert_eq!(matched.parameter::<TodoId>().unwrap(), 7);
//! ```

use std::convert::Infallible;
use std::error::Error;
use std::net::*;
use std::num::*;
use std::str::FromStr;

/// A named route parameter with a statically known decode type.
///
/// Usually declared with [`parameter_key!`](crate::parameter_key).
pub trait ParameterKey: 'static {
    /// The placeholder name, as written between braces in a route template.
    const NAME: &'static str;

    /// The type the captured text is decoded into.
    type Decode: FromParam + Send;
}

/// Declare a [`ParameterKey`].
///
/// ```
/// meridian::parameter_key!(pub UserId => "user_id": u64);
/// meridian::parameter_key!(Slug => "slug": String);
///
/// use meridian::param::ParameterKey;
/// assert_eq!(UserId::NAME, "user_id");
/// ```
#[macro_export]
macro_rules! parameter_key {
    ($vis:vis $key:ident => $name:literal : $ty:ty) => {
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $key;

        impl $crate::param::ParameterKey for $key {
            const NAME: &'static str = $name;
            type Decode = $ty;
        }
    };
}

/// A type that can be decoded from the text of a route parameter.
///
/// Textual types take the captured text verbatim, other types
/// use their [`FromStr`] implementation.
pub trait FromParam: Sized {
    /// Errors that can occur in [`from_param`](FromParam::from_param).
    type Error: Error + Send + Sync + 'static;

    /// Decode the type from a captured path segment.
    fn from_param(param: &str) -> Result<Self, Self::Error>;
}

impl FromParam for String {
    type Error = Infallible;

    fn from_param(param: &str) -> Result<Self, Self::Error> {
        Ok(param.to_owned())
    }
}

macro_rules! from_param {
    ($($ty:ty),*) => ($(
        impl FromParam for $ty {
            type Error = <$ty as FromStr>::Err;

            #[inline]
            fn from_param(param: &str) -> Result<Self, Self::Error> {
                <$ty as FromStr>::from_str(param)
            }
        }
    )*)
}

from_param! {
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    bool, char, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6, SocketAddr,
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize,
    NonZeroU8, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize
}
