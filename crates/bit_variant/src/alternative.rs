use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use bit_ptr::OwningPtr;

use crate::Monostate;

// -----------------------------------------------------------------------------
// Alternative

/// A type that may appear in the alternative list of a [`Variant`].
///
/// The trait carries two tables used by conversion and default construction:
///
/// - [`IMPLICIT`](Self::IMPLICIT) lists the source types that may be converted
///   into `Self` by [`Variant::make`]. A value of type `Self` is always accepted
///   and never needs an entry.
/// - [`DEFAULT`](Self::DEFAULT) is the constructor used by
///   [`Variant::default`](Default::default).
///
/// Both are empty by default, so user types opt in with a bare impl:
///
/// ```
/// use bit_variant::{Alternative, Conversion, Variant};
///
/// #[derive(Debug, PartialEq)]
/// struct Meters(f64);
///
/// impl From<u32> for Meters {
///     fn from(v: u32) -> Self {
///         Meters(v as f64)
///     }
/// }
///
/// impl Alternative for Meters {
///     const IMPLICIT: &'static [Conversion<Self>] = &[Conversion::from::<u32>()];
/// }
///
/// let v = Variant::<(Meters, bool)>::make(3_u32).unwrap();
/// assert_eq!(v.get::<Meters, _>(), Some(&Meters(3.0)));
/// ```
///
/// [`Variant`]: crate::Variant
/// [`Variant::make`]: crate::Variant::make
pub trait Alternative: Sized + 'static {
    /// Source types that convert into `Self` without an explicit cast.
    const IMPLICIT: &'static [Conversion<Self>] = &[];

    /// Constructor for a default value, if the type has one.
    const DEFAULT: Option<fn() -> Self> = None;
}

// -----------------------------------------------------------------------------
// Conversion

/// One entry of an [`Alternative::IMPLICIT`] table.
///
/// It pairs the identity of a source type with a function that moves a value
/// of that type out of erased storage and converts it.
pub struct Conversion<T> {
    source: fn() -> TypeId,
    source_name: fn() -> &'static str,
    convert: unsafe fn(OwningPtr<'_>) -> T,
}

unsafe fn convert_from<S: Into<T>, T>(value: OwningPtr<'_>) -> T {
    // SAFETY: the caller checked that the pointee is an `S`.
    unsafe { value.read::<S>() }.into()
}

impl<T> Conversion<T> {
    /// A conversion backed by `S: Into<T>`.
    pub const fn from<S: Into<T> + 'static>() -> Self {
        Self {
            source: TypeId::of::<S>,
            source_name: core::any::type_name::<S>,
            convert: convert_from::<S, T>,
        }
    }

    /// The [`TypeId`] of the source type.
    #[inline]
    pub fn source(&self) -> TypeId {
        (self.source)()
    }

    /// The name of the source type.
    #[inline]
    pub fn source_name(&self) -> &'static str {
        (self.source_name)()
    }

    /// Whether a value with type id `source` is accepted.
    #[inline]
    pub fn accepts(&self, source: TypeId) -> bool {
        self.source() == source
    }

    /// Consumes the pointee and converts it.
    ///
    /// # Safety
    ///
    /// - The pointee must have the type identified by [`source`](Self::source).
    /// - The pointee is moved out; it must not be used or dropped afterwards.
    #[inline]
    pub unsafe fn convert(&self, value: OwningPtr<'_>) -> T {
        // SAFETY: see function docs.
        unsafe { (self.convert)(value) }
    }
}

impl<T> Clone for Conversion<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Conversion<T> {}

impl<T> fmt::Debug for Conversion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conversion({} -> {})",
            self.source_name(),
            core::any::type_name::<T>()
        )
    }
}

// -----------------------------------------------------------------------------
// Implementations

macro_rules! impl_alternative {
    ($ty:ty $(: $($src:ty),+)?) => {
        impl Alternative for $ty {
            const IMPLICIT: &'static [Conversion<Self>] = &[$($(Conversion::from::<$src>()),+)?];
            const DEFAULT: Option<fn() -> Self> = Some(<$ty as Default>::default as fn() -> Self);
        }
    };
}

// Integers accept every narrower type whose values they can represent.
impl_alternative!(i8: bool);
impl_alternative!(i16: bool, i8, u8);
impl_alternative!(i32: bool, i8, i16, u8, u16);
impl_alternative!(i64: bool, i8, i16, i32, u8, u16, u32);
impl_alternative!(i128: bool, i8, i16, i32, i64, u8, u16, u32, u64);
impl_alternative!(isize: bool, i8, i16, u8);
impl_alternative!(u8: bool);
impl_alternative!(u16: bool, u8);
impl_alternative!(u32: bool, u8, u16, char);
impl_alternative!(u64: bool, u8, u16, u32, char);
impl_alternative!(u128: bool, u8, u16, u32, u64, char);
impl_alternative!(usize: bool, u8, u16);

impl_alternative!(f32: bool, i8, i16, u8, u16);
impl_alternative!(f64: bool, i8, i16, i32, u8, u16, u32, f32);

impl_alternative!(bool);
impl_alternative!(char: u8);
impl_alternative!(());
impl_alternative!(Monostate);

impl_alternative!(String: &'static str, char, Box<str>, Cow<'static, str>);
impl_alternative!(Box<str>: &'static str, String);

impl<T: 'static> Alternative for Vec<T> {
    const IMPLICIT: &'static [Conversion<Self>] = &[Conversion::from::<Box<[T]>>()];
    const DEFAULT: Option<fn() -> Self> = Some(Vec::new as fn() -> Self);
}

impl<T: 'static> Alternative for Option<T> {
    const IMPLICIT: &'static [Conversion<Self>] = &[Conversion::from::<T>()];
    const DEFAULT: Option<fn() -> Self> = Some(<Self as Default>::default as fn() -> Self);
}

impl<T: 'static> Alternative for Box<T> {
    const IMPLICIT: &'static [Conversion<Self>] = &[Conversion::from::<T>()];
}
