use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::debug_check_align;

// -----------------------------------------------------------------------------
// Ptr

/// A borrowed value whose type was erased.
///
/// ```
/// use bit_ptr::Ptr;
///
/// let words = [String::from("a"), String::from("bc")];
/// let erased: Vec<Ptr<'_>> = words.iter().map(Ptr::from_ref).collect();
///
/// let len = unsafe { erased[1].cast_ref::<String>() }.len();
/// assert_eq!(len, 2);
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Ptr<'a> {
    raw: NonNull<u8>,
    _borrow: PhantomData<&'a ()>,
}

impl<'a> Ptr<'a> {
    /// Erases the type of a shared borrow.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(value: &'a T) -> Self {
        Self {
            raw: NonNull::from_ref(value).cast(),
            _borrow: PhantomData,
        }
    }

    /// Restores the type of the borrow.
    ///
    /// # Safety
    ///
    /// The pointee must be a live `T`.
    #[inline(always)]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn cast_ref<T>(self) -> &'a T {
        debug_check_align::<T>(self.raw, "Ptr");
        // SAFETY: the pointee is a live `T` borrowed for `'a`.
        unsafe { self.raw.cast::<T>().as_ref() }
    }
}

impl fmt::Debug for Ptr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ptr").field(&self.raw).finish()
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// An exclusively borrowed value whose type was erased.
///
/// ```
/// use bit_ptr::PtrMut;
///
/// let mut count = 1_u32;
/// let mut erased = PtrMut::from_mut(&mut count);
///
/// unsafe { *erased.cast_mut::<u32>() += 1 };
/// let total = unsafe { erased.into_mut::<u32>() };
/// *total *= 10;
///
/// assert_eq!(count, 20);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a> {
    raw: NonNull<u8>,
    _borrow: PhantomData<&'a mut ()>,
}

impl<'a> PtrMut<'a> {
    /// Erases the type of an exclusive borrow.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(value: &'a mut T) -> Self {
        Self {
            raw: NonNull::from_mut(value).cast(),
            _borrow: PhantomData,
        }
    }

    /// Creates an erased exclusive borrow from a raw pointer.
    ///
    /// # Safety
    ///
    /// `raw` must point to a live value that nothing else accesses for `'a`.
    #[inline(always)]
    pub(crate) const unsafe fn from_raw(raw: NonNull<u8>) -> Self {
        Self {
            raw,
            _borrow: PhantomData,
        }
    }

    /// Restores the type, borrowing from `self`.
    ///
    /// # Safety
    ///
    /// The pointee must be a live `T`.
    #[inline(always)]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn cast_mut<T>(&mut self) -> &mut T {
        debug_check_align::<T>(self.raw, "PtrMut");
        // SAFETY: the pointee is a live `T` and `self` is borrowed exclusively.
        unsafe { self.raw.cast::<T>().as_mut() }
    }

    /// Restores the type for the whole lifetime `'a`.
    ///
    /// # Safety
    ///
    /// The pointee must be a live `T`.
    #[inline(always)]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn into_mut<T>(self) -> &'a mut T {
        debug_check_align::<T>(self.raw, "PtrMut");
        // SAFETY: the pointee is a live `T` borrowed exclusively for `'a`.
        unsafe { self.raw.cast::<T>().as_mut() }
    }
}

impl fmt::Debug for PtrMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PtrMut").field(&self.raw).finish()
    }
}
