//! Type-erased pointers for storage that holds one of several value types.
//!
//! A tagged union knows the concrete type of its live value only through a
//! runtime index. The per-alternative operations (drop, clone, compare, visit)
//! are written against erased pointers, and the function selected by that
//! index casts back to the concrete type.
//!
//! | pointer             | acts like            | consumed by                               |
//! |---------------------|----------------------|-------------------------------------------|
//! | [`Ptr<'a>`]         | `&'a T`              | [`cast_ref`](Ptr::cast_ref)               |
//! | [`PtrMut<'a>`]      | `&'a mut T`          | [`into_mut`](PtrMut::into_mut)            |
//! | [`OwningPtr<'a>`]   | `&'a mut ManuallyDrop<T>` | [`read`](OwningPtr::read) or [`drop_in_place`](OwningPtr::drop_in_place) |
//! | [`SlotPtr<'a>`]     | `&'a mut MaybeUninit<T>`  | [`write`](SlotPtr::write)            |
//!
//! Every cast is `unsafe`: the caller names the type and the pointer cannot
//! check it. Alignment is checked in debug builds.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

use core::ptr::NonNull;

// -----------------------------------------------------------------------------
// Modules

mod owning;
mod shared;
mod slot;

// -----------------------------------------------------------------------------
// Top-level exports

pub use owning::OwningPtr;
pub use shared::{Ptr, PtrMut};
pub use slot::SlotPtr;

// -----------------------------------------------------------------------------
// Alignment check

#[inline(always)]
#[cfg_attr(debug_assertions, track_caller)]
fn debug_check_align<T>(raw: NonNull<u8>, kind: &str) {
    debug_assert!(
        raw.cast::<T>().is_aligned(),
        "{kind} {raw:p} is not aligned to {} for `{}`",
        align_of::<T>(),
        core::any::type_name::<T>(),
    );
}
