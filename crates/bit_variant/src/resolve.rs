use core::any::TypeId;

use crate::{Alternative, ResolveError};

/// How a source value reaches its alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// The source type is the alternative itself.
    Exact,
    /// The source converts through an entry of [`Alternative::IMPLICIT`].
    Implicit,
}

/// The outcome of resolving a source type against an alternative list.
///
/// ```
/// use bit_variant::{Rank, Variant};
///
/// let r = Variant::<(f64, i32)>::resolve::<i32>().unwrap();
/// assert_eq!((r.index(), r.rank()), (1, Rank::Exact));
///
/// let r = Variant::<(f64, String)>::resolve::<i32>().unwrap();
/// assert_eq!((r.index(), r.rank()), (0, Rank::Implicit));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    index: usize,
    conversion: Option<usize>,
}

impl Resolution {
    /// Position of the selected alternative.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether the value is taken as is or converted.
    #[inline]
    pub const fn rank(&self) -> Rank {
        match self.conversion {
            None => Rank::Exact,
            Some(_) => Rank::Implicit,
        }
    }

    /// Position in the target's [`Alternative::IMPLICIT`] table, if any.
    #[inline]
    pub(crate) const fn conversion(&self) -> Option<usize> {
        self.conversion
    }
}

// -----------------------------------------------------------------------------
// Resolver

#[derive(Clone, Copy)]
struct Candidate {
    index: usize,
    conversion: Option<usize>,
    name: &'static str,
}

/// Collects candidates while the alternatives of a list are offered in order.
///
/// Exact matches and implicit conversions are counted separately. The
/// resolution succeeds when there is one exact match, or no exact match and
/// one implicit candidate.
pub(crate) struct Resolver {
    input: TypeId,
    input_name: &'static str,
    exact: Option<Candidate>,
    exact_dup: Option<&'static str>,
    implicit: Option<Candidate>,
    implicit_dup: Option<&'static str>,
    exact_count: usize,
    implicit_count: usize,
}

impl Resolver {
    pub(crate) fn new<S: 'static>() -> Self {
        Self {
            input: TypeId::of::<S>(),
            input_name: core::any::type_name::<S>(),
            exact: None,
            exact_dup: None,
            implicit: None,
            implicit_dup: None,
            exact_count: 0,
            implicit_count: 0,
        }
    }

    /// Offers the alternative at `index`.
    pub(crate) fn offer<T: Alternative>(&mut self, index: usize) {
        let name = core::any::type_name::<T>();

        if TypeId::of::<T>() == self.input {
            self.exact_count += 1;
            match self.exact {
                None => {
                    self.exact = Some(Candidate {
                        index,
                        conversion: None,
                        name,
                    });
                }
                Some(_) if self.exact_dup.is_none() => self.exact_dup = Some(name),
                Some(_) => {}
            }
            return;
        }

        let Some(conversion) = T::IMPLICIT.iter().position(|c| c.accepts(self.input)) else {
            return;
        };

        self.implicit_count += 1;
        match self.implicit {
            None => {
                self.implicit = Some(Candidate {
                    index,
                    conversion: Some(conversion),
                    name,
                });
            }
            Some(_) if self.implicit_dup.is_none() => self.implicit_dup = Some(name),
            Some(_) => {}
        }
    }

    /// Picks the winner. `target` names the alternative list in errors.
    pub(crate) fn finish(self, target: &'static str) -> Result<Resolution, ResolveError> {
        let (winner, dup, count) = if self.exact.is_some() {
            (self.exact, self.exact_dup, self.exact_count)
        } else {
            (self.implicit, self.implicit_dup, self.implicit_count)
        };

        match (winner, dup) {
            (Some(c), None) => Ok(Resolution {
                index: c.index,
                conversion: c.conversion,
            }),
            (Some(c), Some(second)) => {
                log::debug!(
                    "ambiguous conversion from `{}` into `{target}`: {count} candidates",
                    self.input_name,
                );
                Err(ResolveError::Ambiguous {
                    input: self.input_name,
                    first: c.name,
                    second,
                    candidates: count,
                })
            }
            (None, _) => {
                log::debug!(
                    "no alternative of `{target}` accepts `{}`",
                    self.input_name
                );
                Err(ResolveError::NoViableAlternative {
                    input: self.input_name,
                    target,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{Rank, Resolver};
    use crate::ResolveError;

    fn resolve2<S: 'static, A: crate::Alternative, B: crate::Alternative>()
    -> Result<(usize, Rank), ResolveError> {
        let mut r = Resolver::new::<S>();
        r.offer::<A>(0);
        r.offer::<B>(1);
        r.finish("test").map(|res| (res.index(), res.rank()))
    }

    #[test]
    fn exact_beats_implicit() {
        assert_eq!(resolve2::<i32, f64, i32>(), Ok((1, Rank::Exact)));
        assert_eq!(resolve2::<i32, i32, i64>(), Ok((0, Rank::Exact)));
    }

    #[test]
    fn single_implicit() {
        assert_eq!(resolve2::<&'static str, i32, String>(), Ok((1, Rank::Implicit)));
        assert_eq!(resolve2::<char, u8, String>(), Ok((1, Rank::Implicit)));
    }

    #[test]
    fn ambiguous() {
        let err = resolve2::<i32, i64, f64>().unwrap_err();
        assert_eq!(
            err,
            ResolveError::Ambiguous {
                input: "i32",
                first: "i64",
                second: "f64",
                candidates: 2,
            }
        );

        assert!(matches!(
            resolve2::<u8, u8, u8>(),
            Err(ResolveError::Ambiguous { candidates: 2, .. })
        ));
    }

    #[test]
    fn no_viable() {
        let err = resolve2::<f64, i32, f32>().unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoViableAlternative {
                input: "f64",
                target: "test",
            }
        );
    }
}
