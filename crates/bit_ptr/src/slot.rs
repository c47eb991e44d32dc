use core::fmt;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

use crate::{PtrMut, debug_check_align};

/// Uninitialized storage for a value whose type was erased.
///
/// The storage is usually sized and aligned for several types at once. The
/// code that knows which type belongs there calls [`write`](Self::write)
/// exactly once.
///
/// ```
/// use bit_ptr::SlotPtr;
/// use core::mem::MaybeUninit;
///
/// let mut slot = MaybeUninit::<u64>::uninit();
/// let mut live = unsafe { SlotPtr::from_uninit(&mut slot).write(7_u64) };
/// unsafe { *live.cast_mut::<u64>() += 1 };
///
/// assert_eq!(unsafe { slot.assume_init() }, 8);
/// ```
pub struct SlotPtr<'a> {
    raw: NonNull<u8>,
    _slot: PhantomData<&'a mut ()>,
}

impl<'a> SlotPtr<'a> {
    /// Points at the storage of a [`MaybeUninit`].
    ///
    /// Whatever the slot holds is overwritten by [`write`](Self::write)
    /// without being dropped.
    #[inline(always)]
    pub const fn from_uninit<T>(slot: &'a mut MaybeUninit<T>) -> Self {
        Self {
            raw: NonNull::from_mut(slot).cast(),
            _slot: PhantomData,
        }
    }

    /// Moves `value` into the slot and returns a pointer to the live value.
    ///
    /// # Safety
    ///
    /// The slot must be large enough and aligned for `T`.
    #[inline]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn write<T>(self, value: T) -> PtrMut<'a> {
        debug_check_align::<T>(self.raw, "SlotPtr");
        // SAFETY: the caller guarantees size and alignment; the slot is
        // borrowed exclusively for `'a`.
        unsafe {
            self.raw.cast::<T>().write(value);
            PtrMut::from_raw(self.raw)
        }
    }
}

impl fmt::Debug for SlotPtr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotPtr").field(&self.raw).finish()
    }
}
