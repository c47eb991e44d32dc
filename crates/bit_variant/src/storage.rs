use core::mem::MaybeUninit;
use core::ptr::NonNull;

use bit_ptr::{OwningPtr, Ptr, PtrMut, SlotPtr};
use nonmax::NonMaxU8;

use crate::Resolution;
use crate::list::{Alternatives, CloneAll};

/// Raw union storage plus the tag of the live alternative.
///
/// `tag == None` means no value is live. The tag is cleared before a value is
/// destroyed and set only after a value is fully constructed, so a panic in
/// either step leaves the storage empty.
pub(crate) struct Storage<L: Alternatives> {
    tag: Option<NonMaxU8>,
    data: MaybeUninit<L::Union>,
}

impl<L: Alternatives> Storage<L> {
    #[inline]
    pub(crate) const fn empty() -> Self {
        Self {
            tag: None,
            data: MaybeUninit::uninit(),
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> Option<usize> {
        self.tag.map(|tag| tag.get() as usize)
    }

    #[inline]
    fn set_tag(&mut self, index: usize) {
        debug_assert!(index < L::LEN);
        // Lists hold at most 12 alternatives.
        self.tag = u8::try_from(index).ok().and_then(NonMaxU8::new);
    }

    #[inline]
    fn debug_assert_empty(&self) {
        crate::cfg::debug! {
            assert!(
                self.tag.is_none(),
                "constructing over live alternative {:?}",
                self.index(),
            );
        }
    }

    #[inline]
    fn slot(&mut self) -> SlotPtr<'_> {
        SlotPtr::from_uninit(&mut self.data)
    }

    /// Pointer to the live value.
    #[inline]
    pub(crate) fn ptr(&self) -> Ptr<'_> {
        Ptr::from_ref(&self.data)
    }

    #[inline]
    pub(crate) fn ptr_mut(&mut self) -> PtrMut<'_> {
        PtrMut::from_mut(&mut self.data)
    }

    /// Writes `value` as alternative `index`.
    ///
    /// # Safety
    ///
    /// - The storage must be empty.
    /// - `T` must be the alternative at `index`.
    #[inline]
    pub(crate) unsafe fn construct<T>(&mut self, index: usize, value: T) -> &mut T {
        self.debug_assert_empty();
        // SAFETY: the union is sized and aligned for every alternative.
        unsafe { self.slot().write(value) };
        self.set_tag(index);
        // SAFETY: a `T` was just written.
        unsafe { self.get_unchecked_mut::<T>() }
    }

    /// Moves and converts the pointee as `resolution` says.
    ///
    /// # Safety
    ///
    /// - The storage must be empty.
    /// - `resolution` must come from `L::resolve` for the pointee type.
    pub(crate) unsafe fn construct_with(&mut self, resolution: Resolution, value: OwningPtr<'_>) {
        self.debug_assert_empty();
        // SAFETY: see function docs.
        unsafe { L::convert_at(resolution, value, self.slot()) };
        self.set_tag(resolution.index());
    }

    /// Converts the pointee as `resolution` says, then replaces the live value.
    ///
    /// The conversion runs into a staging slot first, so the current value
    /// survives a panicking conversion.
    ///
    /// # Safety
    ///
    /// `resolution` must come from `L::resolve` for the pointee type.
    pub(crate) unsafe fn replace_with(&mut self, resolution: Resolution, value: OwningPtr<'_>) {
        let mut staged = MaybeUninit::<L::Union>::uninit();
        // SAFETY: `staged` is sized and aligned for the union; see function docs.
        unsafe { L::convert_at(resolution, value, SlotPtr::from_uninit(&mut staged)) };
        self.destroy();
        self.data = staged;
        self.set_tag(resolution.index());
    }

    /// Default-constructs alternative 0.
    ///
    /// Returns `false` and stays empty when alternative 0 has no default.
    pub(crate) fn construct_default(&mut self) -> bool {
        self.debug_assert_empty();
        // SAFETY: the storage is empty and the union fits alternative 0.
        let written = unsafe { L::TABLE[0].write_default(self.slot()) };
        if written {
            self.set_tag(0);
        }
        written
    }

    /// Clones alternative `index` from `src`.
    ///
    /// # Safety
    ///
    /// - The storage must be empty.
    /// - `src` must point to a live alternative `index`.
    pub(crate) unsafe fn construct_clone(&mut self, index: usize, src: Ptr<'_>)
    where
        L: CloneAll,
    {
        self.debug_assert_empty();
        // SAFETY: see function docs.
        unsafe { L::clone_at(index, src, self.slot()) };
        self.set_tag(index);
    }

    /// Drops the live value, if any.
    pub(crate) fn destroy(&mut self) {
        let Some(tag) = self.tag.take() else {
            return;
        };
        let index = tag.get() as usize;
        // SAFETY: the tag says a value of alternative `index` is live, and the
        // cleared tag stops it from being dropped twice.
        unsafe {
            let value = OwningPtr::new(NonNull::from_mut(&mut self.data).cast());
            L::TABLE[index].destroy(value);
        }
    }

    /// # Safety
    ///
    /// The live alternative must be a `T`.
    #[inline]
    pub(crate) unsafe fn get_unchecked<T>(&self) -> &T {
        // SAFETY: see function docs.
        unsafe { self.ptr().cast_ref::<T>() }
    }

    /// # Safety
    ///
    /// The live alternative must be a `T`.
    #[inline]
    pub(crate) unsafe fn get_unchecked_mut<T>(&mut self) -> &mut T {
        // SAFETY: see function docs.
        unsafe { self.ptr_mut().into_mut::<T>() }
    }

    /// Moves the live value out, leaving the storage empty.
    ///
    /// # Safety
    ///
    /// The live alternative must be a `T`.
    #[inline]
    pub(crate) unsafe fn take_unchecked<T>(&mut self) -> T {
        self.tag = None;
        // SAFETY: see function docs; the tag no longer owns the value.
        unsafe { self.data.as_ptr().cast::<T>().read() }
    }
}

impl<L: Alternatives> Drop for Storage<L> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::Cell;

    use bit_ptr::OwningPtr;

    use super::Storage;
    use crate::Alternative;
    use crate::list::Alternatives;

    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    impl Alternative for Counted {}

    type L = (u8, Counted, String);

    #[test]
    fn construct_and_destroy() {
        let drops = Rc::new(Cell::new(0));
        let mut storage = Storage::<L>::empty();
        assert_eq!(storage.index(), None);

        unsafe { storage.construct(1, Counted(drops.clone())) };
        assert_eq!(storage.index(), Some(1));

        storage.destroy();
        assert_eq!(storage.index(), None);
        assert_eq!(drops.get(), 1);

        storage.destroy();
        assert_eq!(drops.get(), 1);

        unsafe { storage.construct(1, Counted(drops.clone())) };
        drop(storage);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn take_leaves_empty() {
        let mut storage = Storage::<L>::empty();
        unsafe { storage.construct(2, String::from("moved")) };

        let s = unsafe { storage.take_unchecked::<String>() };
        assert_eq!(s, "moved");
        assert_eq!(storage.index(), None);
    }

    #[test]
    fn construct_with_resolution() {
        let mut storage = Storage::<L>::empty();
        let resolution = L::resolve::<&'static str>().unwrap();

        OwningPtr::with("hi", |ptr| unsafe { storage.construct_with(resolution, ptr) });
        assert_eq!(storage.index(), Some(2));
        assert_eq!(unsafe { storage.get_unchecked::<String>() }, "hi");
    }

    #[test]
    fn replace_with_swaps_value() {
        let drops = Rc::new(Cell::new(0));
        let mut storage = Storage::<L>::empty();
        unsafe { storage.construct(1, Counted(drops.clone())) };

        let resolution = L::resolve::<char>().unwrap();
        OwningPtr::with('z', |ptr| unsafe { storage.replace_with(resolution, ptr) });
        assert_eq!(drops.get(), 1);
        assert_eq!(storage.index(), Some(2));
        assert_eq!(unsafe { storage.get_unchecked::<String>() }, "z");
    }

    #[test]
    fn default_uses_first_alternative_only() {
        let mut storage = Storage::<(String, Counted)>::empty();
        assert!(storage.construct_default());
        assert_eq!(storage.index(), Some(0));
        assert_eq!(unsafe { storage.get_unchecked::<String>() }, "");

        let mut storage = Storage::<(Counted, String)>::empty();
        assert!(!storage.construct_default());
        assert_eq!(storage.index(), None);
    }
}
