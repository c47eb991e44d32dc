//! Alternative lists and the traits derived from them.
//!
//! An alternative list is a tuple of 1 to 12 [`Alternative`] types. The tuple
//! implements [`Alternatives`], which describes the storage layout and the
//! lifecycle rows, plus one capability trait per operation that needs a bound
//! on every alternative: [`CloneAll`] when each alternative is `Clone`,
//! [`HashAll`] when each is `Hash`, and so on.
//!
//! Positions are named at the type level with [`Index<N>`]. [`Member<T, I>`]
//! finds the position of `T` and [`At<N>`] finds the type at position `N`.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::ManuallyDrop;

use bit_ptr::{OwningPtr, Ptr, PtrMut, SlotPtr};
use bit_utils::range_invoke;

use crate::resolve::Resolver;
use crate::{Alternative, AlternativeMeta, Resolution, ResolveError, Visit, VisitMut, Visitor};

// -----------------------------------------------------------------------------
// Alternatives

mod sealed {
    pub trait Sealed {}
}

/// A tuple of [`Alternative`] types usable as `Variant<L>`.
///
/// This trait is sealed and implemented for tuples of 1 to 12 elements.
pub trait Alternatives: sealed::Sealed + Sized + 'static {
    /// Number of alternatives.
    const LEN: usize;

    /// One lifecycle row per alternative, in order.
    const TABLE: &'static [AlternativeMeta];

    /// A type with the size and alignment of the largest alternative.
    #[doc(hidden)]
    type Union;

    /// Resolves a source type against the list.
    #[doc(hidden)]
    fn resolve<S: 'static>() -> Result<Resolution, ResolveError>;

    /// Moves the value behind `value` into `slot`, converting it as `resolution` says.
    ///
    /// # Safety
    ///
    /// - `resolution` must come from [`resolve`](Self::resolve) for the pointee type.
    /// - `slot` must be sized and aligned for [`Union`](Self::Union).
    #[doc(hidden)]
    unsafe fn convert_at(resolution: Resolution, value: OwningPtr<'_>, slot: SlotPtr<'_>);
}

/// A type-level alternative position.
pub struct Index<const N: usize>;

/// `T` occurs in the list at position `I`.
///
/// `I` is always inferred; when `T` occurs more than once the position is
/// ambiguous and the index-based API must be used instead.
pub trait Member<T, I>: Alternatives {
    const INDEX: usize;
}

/// The alternative at position `N`.
pub trait At<const N: usize>: Alternatives {
    type Output: Alternative;
}

#[doc(hidden)]
#[repr(C)]
pub union Slot<H, T> {
    pub head: ManuallyDrop<H>,
    pub tail: ManuallyDrop<T>,
}

macro_rules! union_of {
    ($last:ident) => { $last };
    ($head:ident, $($rest:ident),+) => { Slot<$head, union_of!($($rest),+)> };
}

#[cold]
#[inline(never)]
#[track_caller]
fn invalid_index(index: usize, len: usize) -> ! {
    panic!("alternative index {index} is out of range for a list of {len}")
}

// -----------------------------------------------------------------------------
// Capabilities

/// Every alternative is [`Clone`].
pub trait CloneAll: Alternatives {
    /// # Safety
    ///
    /// `src` must point to a live alternative `index`; `dst` must fit the union.
    #[doc(hidden)]
    unsafe fn clone_at(index: usize, src: Ptr<'_>, dst: SlotPtr<'_>);

    /// # Safety
    ///
    /// Both pointers must point to live alternatives `index`.
    #[doc(hidden)]
    unsafe fn clone_from_at(index: usize, dst: PtrMut<'_>, src: Ptr<'_>);
}

/// Every alternative is [`PartialEq`].
pub trait PartialEqAll: Alternatives {
    /// # Safety
    ///
    /// Both pointers must point to live alternatives `index`.
    #[doc(hidden)]
    unsafe fn eq_at(index: usize, a: Ptr<'_>, b: Ptr<'_>) -> bool;
}

/// Every alternative is [`Eq`].
pub trait EqAll: PartialEqAll {}

/// Every alternative is [`PartialOrd`].
pub trait PartialOrdAll: PartialEqAll {
    /// # Safety
    ///
    /// Both pointers must point to live alternatives `index`.
    #[doc(hidden)]
    unsafe fn partial_cmp_at(index: usize, a: Ptr<'_>, b: Ptr<'_>) -> Option<Ordering>;
}

/// Every alternative is [`Ord`].
pub trait OrdAll: EqAll + PartialOrdAll {
    /// # Safety
    ///
    /// Both pointers must point to live alternatives `index`.
    #[doc(hidden)]
    unsafe fn cmp_at(index: usize, a: Ptr<'_>, b: Ptr<'_>) -> Ordering;
}

/// Every alternative is [`Hash`].
pub trait HashAll: Alternatives {
    /// # Safety
    ///
    /// `ptr` must point to a live alternative `index`.
    #[doc(hidden)]
    unsafe fn hash_at<H: Hasher>(index: usize, ptr: Ptr<'_>, state: &mut H);
}

/// Every alternative is [`Debug`](fmt::Debug).
pub trait DebugAll: Alternatives {
    /// # Safety
    ///
    /// `ptr` must point to a live alternative `index`.
    #[doc(hidden)]
    unsafe fn fmt_at(index: usize, ptr: Ptr<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// `V` implements [`Visit`] for every alternative.
pub trait VisitAll<V: Visitor>: Alternatives {
    /// # Safety
    ///
    /// `ptr` must point to a live alternative `index`.
    #[doc(hidden)]
    unsafe fn visit_at(index: usize, ptr: Ptr<'_>, visitor: V) -> V::Output;
}

/// `V` implements [`VisitMut`] for every alternative.
pub trait VisitMutAll<V: Visitor>: Alternatives {
    /// # Safety
    ///
    /// `ptr` must point to a live alternative `index`.
    #[doc(hidden)]
    unsafe fn visit_mut_at(index: usize, ptr: PtrMut<'_>, visitor: V) -> V::Output;
}

/// `H` is a tuple with one `FnOnce(&T) -> R` handler per alternative.
pub trait MatchAll<H, R>: Alternatives {
    /// # Safety
    ///
    /// `ptr` must point to a live alternative `index`.
    #[doc(hidden)]
    unsafe fn match_at(index: usize, ptr: Ptr<'_>, handlers: H) -> R;
}

// -----------------------------------------------------------------------------
// Tuple implementations

macro_rules! impl_alternatives {
    ([$($idx:tt: $p:ident $f:ident),+]) => {
        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative),+> sealed::Sealed for ($($p,)+) {}

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative),+> Alternatives for ($($p,)+) {
            const LEN: usize = [$($idx),+].len();
            const TABLE: &'static [AlternativeMeta] = &[$(AlternativeMeta::of::<$p>()),+];

            type Union = union_of!($($p),+);

            fn resolve<S: 'static>() -> Result<Resolution, ResolveError> {
                let mut resolver = Resolver::new::<S>();
                $( resolver.offer::<$p>($idx); )+
                resolver.finish(core::any::type_name::<Self>())
            }

            unsafe fn convert_at(resolution: Resolution, value: OwningPtr<'_>, slot: SlotPtr<'_>) {
                match resolution.index() {
                    $($idx => unsafe {
                        let value: $p = match resolution.conversion() {
                            None => value.read::<$p>(),
                            Some(k) => <$p as Alternative>::IMPLICIT[k].convert(value),
                        };
                        slot.write(value);
                    },)+
                    index => invalid_index(index, Self::LEN),
                }
            }
        }

        impl_alternatives!(@positions [$($p),+]; $($idx $p),+);

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative + Clone),+> CloneAll for ($($p,)+) {
            unsafe fn clone_at(index: usize, src: Ptr<'_>, dst: SlotPtr<'_>) {
                match index {
                    $($idx => unsafe {
                        dst.write(src.cast_ref::<$p>().clone());
                    },)+
                    _ => invalid_index(index, Self::LEN),
                }
            }

            unsafe fn clone_from_at(index: usize, mut dst: PtrMut<'_>, src: Ptr<'_>) {
                match index {
                    $($idx => unsafe { dst.cast_mut::<$p>().clone_from(src.cast_ref::<$p>()) },)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative + PartialEq),+> PartialEqAll for ($($p,)+) {
            unsafe fn eq_at(index: usize, a: Ptr<'_>, b: Ptr<'_>) -> bool {
                match index {
                    $($idx => unsafe { a.cast_ref::<$p>() == b.cast_ref::<$p>() },)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative + Eq),+> EqAll for ($($p,)+) {}

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative + PartialOrd),+> PartialOrdAll for ($($p,)+) {
            unsafe fn partial_cmp_at(index: usize, a: Ptr<'_>, b: Ptr<'_>) -> Option<Ordering> {
                match index {
                    $($idx => unsafe { a.cast_ref::<$p>().partial_cmp(b.cast_ref::<$p>()) },)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative + Ord),+> OrdAll for ($($p,)+) {
            unsafe fn cmp_at(index: usize, a: Ptr<'_>, b: Ptr<'_>) -> Ordering {
                match index {
                    $($idx => unsafe { a.cast_ref::<$p>().cmp(b.cast_ref::<$p>()) },)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative + Hash),+> HashAll for ($($p,)+) {
            unsafe fn hash_at<H: Hasher>(index: usize, ptr: Ptr<'_>, state: &mut H) {
                match index {
                    $($idx => unsafe { ptr.cast_ref::<$p>().hash(state) },)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($p: Alternative + fmt::Debug),+> DebugAll for ($($p,)+) {
            unsafe fn fmt_at(index: usize, ptr: Ptr<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match index {
                    $($idx => unsafe { fmt::Debug::fmt(ptr.cast_ref::<$p>(), f) },)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<V: Visitor $(+ Visit<$p>)+, $($p: Alternative),+> VisitAll<V> for ($($p,)+) {
            unsafe fn visit_at(index: usize, ptr: Ptr<'_>, visitor: V) -> V::Output {
                match index {
                    $($idx => <V as Visit<$p>>::visit(visitor, unsafe { ptr.cast_ref::<$p>() }),)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<V: Visitor $(+ VisitMut<$p>)+, $($p: Alternative),+> VisitMutAll<V> for ($($p,)+) {
            unsafe fn visit_mut_at(index: usize, ptr: PtrMut<'_>, visitor: V) -> V::Output {
                match index {
                    $($idx => <V as VisitMut<$p>>::visit_mut(visitor, unsafe { ptr.into_mut::<$p>() }),)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<R, $($p: Alternative, $f: FnOnce(&$p) -> R),+> MatchAll<($($f,)+), R> for ($($p,)+) {
            unsafe fn match_at(index: usize, ptr: Ptr<'_>, handlers: ($($f,)+)) -> R {
                match index {
                    $($idx => (handlers.$idx)(unsafe { ptr.cast_ref::<$p>() }),)+
                    _ => invalid_index(index, Self::LEN),
                }
            }
        }

        crate::cfg::serde! {
            #[cfg_attr(docsrs, doc(hidden))]
            impl<$($p: Alternative + serde_core::Serialize),+> crate::SerializeAll for ($($p,)+) {
                unsafe fn serialize_element_at<T: serde_core::ser::SerializeTuple>(
                    index: usize,
                    ptr: Ptr<'_>,
                    tuple: &mut T,
                ) -> Result<(), T::Error> {
                    match index {
                        $($idx => tuple.serialize_element(unsafe { ptr.cast_ref::<$p>() }),)+
                        _ => invalid_index(index, Self::LEN),
                    }
                }
            }

            #[cfg_attr(docsrs, doc(hidden))]
            impl<'de, $($p: Alternative + serde_core::Deserialize<'de>),+> crate::DeserializeAll<'de> for ($($p,)+) {
                fn next_element_at<A: serde_core::de::SeqAccess<'de>>(
                    index: usize,
                    seq: &mut A,
                ) -> Result<Option<crate::Variant<Self>>, A::Error> {
                    match index {
                        $($idx => Ok(seq.next_element::<$p>()?.map(crate::Variant::<Self>::new_at::<$idx>)),)+
                        _ => invalid_index(index, Self::LEN),
                    }
                }
            }
        }
    };
    (@positions $all:tt; $($idx:tt $p:ident),+) => {
        $( impl_alternatives!(@position $all; $idx $p); )+
    };
    (@position [$($all:ident),+]; $idx:tt $p:ident) => {
        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($all: Alternative),+> Member<$p, Index<$idx>> for ($($all,)+) {
            const INDEX: usize = $idx;
        }

        #[cfg_attr(docsrs, doc(hidden))]
        impl<$($all: Alternative),+> At<$idx> for ($($all,)+) {
            type Output = $p;
        }
    };
}

range_invoke!(
    impl_alternatives,
    [
        0: P0 F0, 1: P1 F1, 2: P2 F2, 3: P3 F3, 4: P4 F4, 5: P5 F5,
        6: P6 F6, 7: P7 F7, 8: P8 F8, 9: P9 F9, 10: P10 F10, 11: P11 F11
    ]
);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{Alternatives, At, Member};
    use crate::Alternative;

    struct Big([u8; 40]);
    impl Alternative for Big {}

    fn position<L: Member<T, I>, T, I>() -> usize {
        L::INDEX
    }

    #[test]
    fn positions() {
        type L = (u8, String, f64);

        assert_eq!(L::LEN, 3);
        assert_eq!(position::<L, u8, _>(), 0);
        assert_eq!(position::<L, f64, _>(), 2);

        let s: <L as At<1>>::Output = String::from("at");
        assert_eq!(s, "at");
    }

    #[test]
    fn union_fits_every_alternative() {
        type L = (u8, String, u128, Big);
        type U = <L as Alternatives>::Union;

        assert!(size_of::<U>() >= 40);
        assert!(size_of::<U>() >= size_of::<String>());
        assert_eq!(align_of::<U>(), align_of::<u128>());
        assert_eq!(size_of::<<(u16,) as Alternatives>::Union>(), 2);
    }

    #[test]
    fn table_rows_follow_list_order() {
        let names: alloc::vec::Vec<_> = <(i32, bool)>::TABLE.iter().map(|r| r.type_name()).collect();
        assert_eq!(names, ["i32", "bool"]);
    }
}
