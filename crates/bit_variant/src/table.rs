use core::any::{Any, TypeId};
use core::fmt;

use bit_ptr::{OwningPtr, Ptr, PtrMut, SlotPtr};

use crate::Alternative;

/// The type-erased lifecycle row of one alternative.
///
/// Every alternative list exposes one row per position through
/// [`Alternatives::TABLE`](crate::list::Alternatives::TABLE). Operations that
/// need no extra trait bounds are dispatched through these rows; the rest go
/// through the capability traits in [`list`](crate::list).
#[derive(Clone, Copy)]
pub struct AlternativeMeta {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    drop: unsafe fn(OwningPtr<'_>),
    default: Option<unsafe fn(SlotPtr<'_>)>,
    as_any: unsafe fn(Ptr<'_>) -> &dyn Any,
    as_any_mut: unsafe fn(PtrMut<'_>) -> &mut dyn Any,
}

impl AlternativeMeta {
    /// Builds the row for `T`.
    pub const fn of<T: Alternative>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
            drop: drop_erased::<T>,
            default: match T::DEFAULT {
                Some(_) => Some(default_erased::<T> as unsafe fn(SlotPtr<'_>)),
                None => None,
            },
            as_any: as_any_erased::<T>,
            as_any_mut: as_any_mut_erased::<T>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Whether the alternative can be default-constructed.
    #[inline]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Drops the pointee.
    ///
    /// # Safety
    ///
    /// The pointee must be a live value of this row's type.
    #[inline]
    pub(crate) unsafe fn destroy(&self, value: OwningPtr<'_>) {
        // SAFETY: see function docs.
        unsafe { (self.drop)(value) }
    }

    /// Writes a default value into `slot`, returning `false` when there is none.
    ///
    /// # Safety
    ///
    /// The slot must be sized and aligned for this row's type.
    #[inline]
    pub(crate) unsafe fn write_default(&self, slot: SlotPtr<'_>) -> bool {
        match self.default {
            Some(f) => {
                // SAFETY: see function docs.
                unsafe { f(slot) };
                true
            }
            None => false,
        }
    }

    /// # Safety
    ///
    /// The pointee must be a live value of this row's type.
    #[inline]
    pub(crate) unsafe fn as_any<'a>(&self, value: Ptr<'a>) -> &'a dyn Any {
        // SAFETY: see function docs.
        unsafe { (self.as_any)(value) }
    }

    /// # Safety
    ///
    /// The pointee must be a live value of this row's type.
    #[inline]
    pub(crate) unsafe fn as_any_mut<'a>(&self, value: PtrMut<'a>) -> &'a mut dyn Any {
        // SAFETY: see function docs.
        unsafe { (self.as_any_mut)(value) }
    }
}

impl fmt::Debug for AlternativeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlternativeMeta")
            .field("type_name", &self.type_name())
            .field("has_default", &self.has_default())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Erased rows

unsafe fn drop_erased<T>(value: OwningPtr<'_>) {
    // SAFETY: the pointee is a live `T`.
    unsafe { value.drop_in_place::<T>() }
}

unsafe fn default_erased<T: Alternative>(slot: SlotPtr<'_>) {
    if let Some(make) = T::DEFAULT {
        // SAFETY: the slot is sized and aligned for `T`.
        unsafe { slot.write(make()) };
    }
}

unsafe fn as_any_erased<T: Any>(value: Ptr<'_>) -> &dyn Any {
    // SAFETY: the pointee is a live `T`.
    unsafe { value.cast_ref::<T>() }
}

unsafe fn as_any_mut_erased<T: Any>(value: PtrMut<'_>) -> &mut dyn Any {
    // SAFETY: the pointee is a live `T`.
    unsafe { value.into_mut::<T>() }
}
