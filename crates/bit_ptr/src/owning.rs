use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr::NonNull;

use crate::debug_check_align;

/// Ownership of a value whose type was erased, without ownership of its memory.
///
/// The memory belongs to someone else: a union slot, or a stack local wrapped by
/// [`with`](Self::with). Dropping an `OwningPtr` does nothing, so the holder
/// must hand the value on with [`read`](Self::read) or destroy it with
/// [`drop_in_place`](Self::drop_in_place).
pub struct OwningPtr<'a> {
    raw: NonNull<u8>,
    _owned: PhantomData<&'a mut ()>,
}

impl<'a> OwningPtr<'a> {
    /// Takes ownership of the value at `raw`.
    ///
    /// # Safety
    ///
    /// - `raw` must point to a live value that nothing else accesses for `'a`.
    /// - Nobody else may drop that value.
    #[inline(always)]
    pub const unsafe fn new(raw: NonNull<u8>) -> Self {
        Self {
            raw,
            _owned: PhantomData,
        }
    }

    /// Lends `value` to `f` as an `OwningPtr`.
    ///
    /// `f` decides what happens to the value; if it neither reads nor drops it,
    /// the value is leaked.
    ///
    /// ```
    /// use bit_ptr::OwningPtr;
    ///
    /// let moved = OwningPtr::with(vec![1, 2, 3], |ptr| unsafe { ptr.read::<Vec<i32>>() });
    /// assert_eq!(moved, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn with<T, R>(value: T, f: impl FnOnce(OwningPtr<'_>) -> R) -> R {
        let mut value = ManuallyDrop::new(value);
        // SAFETY: the local is live for the call and `ManuallyDrop` never drops it.
        f(unsafe { OwningPtr::new(NonNull::from_mut(&mut value).cast()) })
    }

    /// Moves the value out.
    ///
    /// # Safety
    ///
    /// The pointee must be a live `T`.
    #[inline(always)]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn read<T>(self) -> T {
        debug_check_align::<T>(self.raw, "OwningPtr");
        // SAFETY: the pointee is a live `T` owned by `self`.
        unsafe { self.raw.cast::<T>().read() }
    }

    /// Runs the destructor of the value.
    ///
    /// # Safety
    ///
    /// The pointee must be a live `T`.
    #[inline(always)]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn drop_in_place<T>(self) {
        debug_check_align::<T>(self.raw, "OwningPtr");
        // SAFETY: the pointee is a live `T` owned by `self`.
        unsafe { self.raw.cast::<T>().drop_in_place() }
    }
}

impl fmt::Debug for OwningPtr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwningPtr").field(&self.raw).finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::rc::Rc;

    use super::OwningPtr;

    #[test]
    fn drop_in_place_runs_destructor_once() {
        let shared = Rc::new(());
        let clone = shared.clone();
        assert_eq!(Rc::strong_count(&shared), 2);

        OwningPtr::with(clone, |ptr| unsafe { ptr.drop_in_place::<Rc<()>>() });
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn unread_value_leaks() {
        let shared = Rc::new(());
        OwningPtr::with(shared.clone(), |_| ());
        assert_eq!(Rc::strong_count(&shared), 2);
    }
}
