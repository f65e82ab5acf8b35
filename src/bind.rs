//! The binding coordinator.

use crate::error::{BindingError, BindingErrors};
use crate::extract::Extract;
use crate::http::Request;
use crate::route::MatchedRoute;

/// Resolves every input of a handler.
///
/// Implemented for tuples of up to eight [`Extract`]ors. Each
/// extractor fills the slot at the same position of the output tuple.
/// All extractors run, even after one of them fails, and every failure
/// is reported in declaration order.
///
/// ```
/// use meridian::{extract, Bind};
/// use meridian::http::{Method, Request};
/// use meridian::route::MatchedRoute;
///
/// let inputs = (extract::query::<u32>("page"), extract::json::<String>());
///
/// let req = Request::builder().method(Method::Post).uri("/?page=x").build();
/// let errors = inputs.bind(&req, &MatchedRoute::new()).unwrap_err();
///
/// let kinds: Vec<_> = errors.iter().map(|err| err.kind()).collect();
/// assert_eq!(kinds, ["query_parameter_decoding", "content_type"]);
/// ```
pub trait Bind {
    /// The bound values.
    type Output: Send;

    /// Run every extractor against the request.
    fn bind(&self, req: &Request, route: &MatchedRoute) -> Result<Self::Output, BindingErrors>;
}

impl Bind for () {
    type Output = ();

    fn bind(&self, _: &Request, _: &MatchedRoute) -> Result<(), BindingErrors> {
        Ok(())
    }
}

fn collect(errors: impl IntoIterator<Item = Option<BindingError>>) -> BindingErrors {
    BindingErrors::new(errors.into_iter().flatten().collect())
}

macro_rules! bind_tuple {
    ($($ty:ident => $result:ident),*) => {
        impl<$($ty),*> Bind for ($($ty,)*)
        where
            $($ty: Extract),*
        {
            type Output = ($($ty::Output,)*);

            #[allow(non_snake_case)]
            fn bind(&self, req: &Request, route: &MatchedRoute) -> Result<Self::Output, BindingErrors> {
                let ($($ty,)*) = self;
                let ($($result,)*) = ($($ty.extract(req, route),)*);

                match ($($result,)*) {
                    ($(Ok($result),)*) => Ok(($($result,)*)),
                    ($($result,)*) => Err(collect([$($result.err()),*])),
                }
            }
        }
    };
}

bind_tuple!(A => a);
bind_tuple!(A => a, B => b);
bind_tuple!(A => a, B => b, C => c);
bind_tuple!(A => a, B => b, C => c, D => d);
bind_tuple!(A => a, B => b, C => c, D => d, E => e);
bind_tuple!(A => a, B => b, C => c, D => d, E => e, F => f);
bind_tuple!(A => a, B => b, C => c, D => d, E => e, F => f, G => g);
bind_tuple!(A => a, B => b, C => c, D => d, E => e, F => f, G => g, H => h);
