use core::any::Any;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use bit_ptr::{OwningPtr, Ptr};

use crate::list::{
    Alternatives, At, CloneAll, DebugAll, EqAll, HashAll, MatchAll, Member, OrdAll, PartialEqAll,
    PartialOrdAll, VisitAll, VisitMutAll,
};
use crate::storage::Storage;
use crate::{BadVariantAccess, Resolution, ResolveError, Visitor};

// -----------------------------------------------------------------------------
// Variant

/// A value of exactly one of the types in the alternative list `L`.
///
/// A variant may also be *valueless*: freshly created by
/// [`valueless`](Self::valueless), emptied by [`reset`](Self::reset) or
/// [`take`](Self::take), or left behind when a conversion panicked during
/// [`assign`](Self::assign). A valueless variant compares less than any other,
/// and visiting it is an error.
///
/// Type-directed methods (`new`, `get`, `holds`, ...) take the alternative type
/// and an inferred position marker: `v.get::<String, _>()`. Index-directed
/// methods (`new_at`, `get_at`, ...) take the position as a const argument.
///
/// # Examples
///
/// ```
/// use bit_variant::{BadVariantAccess, Variant};
///
/// let mut v = Variant::<(i32, String)>::new(10);
/// assert!(v.holds::<i32, _>());
///
/// *v.get_mut::<i32, _>().unwrap() += 1;
/// assert_eq!(v.get_at::<0>(), Some(&11));
///
/// v.set(String::from("text"));
/// assert_eq!(v.index(), Some(1));
/// assert_eq!(
///     v.try_get::<i32, _>(),
///     Err(BadVariantAccess::WrongAlternative { expected: 0, active: 1 }),
/// );
///
/// let s: String = v.into_inner::<String, _>().unwrap();
/// assert_eq!(s, "text");
/// ```
pub struct Variant<L: Alternatives> {
    storage: Storage<L>,
}

impl<L: Alternatives> Variant<L> {
    /// Number of alternatives.
    pub const LEN: usize = L::LEN;

    // -------------------------------------------------------------------------
    // Construction

    /// Creates a variant holding `value`, whose type is one of the alternatives.
    #[inline]
    pub fn new<T, I>(value: T) -> Self
    where
        L: Member<T, I>,
    {
        let mut storage = Storage::empty();
        // SAFETY: the storage is empty and `T` is the alternative at `INDEX`.
        unsafe { storage.construct(<L as Member<T, I>>::INDEX, value) };
        Self { storage }
    }

    /// Creates a variant holding `value` as alternative `N`.
    ///
    /// Unlike [`new`](Self::new), this works when the same type appears more
    /// than once.
    ///
    /// ```
    /// use bit_variant::Variant;
    ///
    /// let v = Variant::<(u8, u8)>::new_at::<1>(3);
    /// assert_eq!(v.index(), Some(1));
    /// ```
    #[inline]
    pub fn new_at<const N: usize>(value: <L as At<N>>::Output) -> Self
    where
        L: At<N>,
    {
        let mut storage = Storage::empty();
        // SAFETY: the storage is empty and the value has the type at `N`.
        unsafe { storage.construct(N, value) };
        Self { storage }
    }

    /// Creates a variant from a value that is, or converts into, exactly one
    /// alternative.
    ///
    /// An alternative of the same type as `value` is always chosen. Otherwise
    /// the alternatives whose [`IMPLICIT`](crate::Alternative::IMPLICIT) table
    /// accepts `S` are candidates, and there must be exactly one.
    ///
    /// ```
    /// use bit_variant::{ResolveError, Variant};
    ///
    /// // `i32` widens into `f64` but not into `String`.
    /// let v = Variant::<(f64, String)>::make(2_i32).unwrap();
    /// assert_eq!(v.get::<f64, _>(), Some(&2.0));
    ///
    /// // Neither `i32` nor `f32` accepts an `f64`.
    /// let err = Variant::<(i32, f32)>::make(3.5_f64).unwrap_err();
    /// assert!(matches!(err, ResolveError::NoViableAlternative { .. }));
    /// ```
    pub fn make<S: 'static>(value: S) -> Result<Self, ResolveError> {
        let resolution = L::resolve::<S>()?;
        let mut storage = Storage::empty();
        OwningPtr::with(value, |ptr| {
            // SAFETY: the storage is empty and `resolution` was computed for `S`.
            unsafe { storage.construct_with(resolution, ptr) }
        });
        Ok(Self { storage })
    }

    /// Resolves `S` against the alternatives without constructing anything.
    #[inline]
    pub fn resolve<S: 'static>() -> Result<Resolution, ResolveError> {
        L::resolve::<S>()
    }

    /// Creates a variant that holds no value.
    #[inline]
    pub const fn valueless() -> Self {
        Self {
            storage: Storage::empty(),
        }
    }

    // -------------------------------------------------------------------------
    // Mutation

    /// Replaces the current value with `value` and returns a reference to it.
    ///
    /// The old value is dropped first.
    pub fn set<T, I>(&mut self, value: T) -> &mut T
    where
        L: Member<T, I>,
    {
        self.storage.destroy();
        // SAFETY: the storage was just emptied and `T` is the alternative at `INDEX`.
        unsafe { self.storage.construct(<L as Member<T, I>>::INDEX, value) }
    }

    /// Replaces the current value with `value` as alternative `N`.
    pub fn set_at<const N: usize>(&mut self, value: <L as At<N>>::Output) -> &mut <L as At<N>>::Output
    where
        L: At<N>,
    {
        self.storage.destroy();
        // SAFETY: the storage was just emptied and the value has the type at `N`.
        unsafe { self.storage.construct(N, value) }
    }

    /// Replaces the current value with one resolved as in [`make`](Self::make).
    ///
    /// The current value is kept on a resolution error, and also when the
    /// conversion panics. It is dropped only once the new value exists.
    ///
    /// ```
    /// use bit_variant::Variant;
    ///
    /// let mut v = Variant::<(i64, String)>::new(1_i64);
    /// v.assign('x').unwrap();
    /// assert_eq!(v.get::<String, _>().map(String::as_str), Some("x"));
    ///
    /// assert!(v.assign(1.5_f32).is_err());
    /// assert_eq!(v.index(), Some(1));
    /// ```
    pub fn assign<S: 'static>(&mut self, value: S) -> Result<(), ResolveError> {
        let resolution = L::resolve::<S>()?;
        OwningPtr::with(value, |ptr| {
            // SAFETY: `resolution` was computed for `S`.
            unsafe { self.storage.replace_with(resolution, ptr) }
        });
        Ok(())
    }

    /// Drops the current value, leaving the variant valueless.
    #[inline]
    pub fn reset(&mut self) {
        self.storage.destroy();
    }

    /// Moves the current value out into a new variant, leaving this one valueless.
    #[inline]
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::valueless())
    }

    // -------------------------------------------------------------------------
    // Observers

    /// Position of the active alternative, `None` when valueless.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.storage.index()
    }

    /// Whether no alternative is active.
    #[inline]
    pub fn is_valueless(&self) -> bool {
        self.storage.index().is_none()
    }

    /// Whether alternative `index` is active.
    #[inline]
    pub fn is_index(&self, index: usize) -> bool {
        self.storage.index() == Some(index)
    }

    /// Whether the active alternative is `T`.
    #[inline]
    pub fn holds<T, I>(&self) -> bool
    where
        L: Member<T, I>,
    {
        self.is_index(<L as Member<T, I>>::INDEX)
    }

    /// Position of `T` in the list.
    #[inline]
    pub const fn index_of<T, I>() -> usize
    where
        L: Member<T, I>,
    {
        <L as Member<T, I>>::INDEX
    }

    /// Type name of the active alternative.
    pub fn active_type_name(&self) -> Option<&'static str> {
        self.index().map(|index| L::TABLE[index].type_name())
    }

    // -------------------------------------------------------------------------
    // Access

    #[inline]
    fn check(&self, expected: usize) -> Result<(), BadVariantAccess> {
        match self.storage.index() {
            None => Err(BadVariantAccess::Valueless),
            Some(active) if active == expected => Ok(()),
            Some(active) => Err(BadVariantAccess::WrongAlternative { expected, active }),
        }
    }

    /// Returns the value if `T` is active.
    #[inline]
    pub fn get<T, I>(&self) -> Option<&T>
    where
        L: Member<T, I>,
    {
        self.try_get::<T, I>().ok()
    }

    /// Returns the value mutably if `T` is active.
    #[inline]
    pub fn get_mut<T, I>(&mut self) -> Option<&mut T>
    where
        L: Member<T, I>,
    {
        self.try_get_mut::<T, I>().ok()
    }

    /// Returns the value if alternative `N` is active.
    #[inline]
    pub fn get_at<const N: usize>(&self) -> Option<&<L as At<N>>::Output>
    where
        L: At<N>,
    {
        self.try_get_at::<N>().ok()
    }

    /// Returns the value mutably if alternative `N` is active.
    #[inline]
    pub fn get_at_mut<const N: usize>(&mut self) -> Option<&mut <L as At<N>>::Output>
    where
        L: At<N>,
    {
        match self.check(N) {
            // SAFETY: alternative `N` is live.
            Ok(()) => Some(unsafe { self.storage.get_unchecked_mut() }),
            Err(_) => None,
        }
    }

    /// Returns the value if `T` is active, or why it is not.
    pub fn try_get<T, I>(&self) -> Result<&T, BadVariantAccess>
    where
        L: Member<T, I>,
    {
        self.check(<L as Member<T, I>>::INDEX)?;
        // SAFETY: alternative `INDEX` is live and has type `T`.
        Ok(unsafe { self.storage.get_unchecked::<T>() })
    }

    /// Returns the value mutably if `T` is active, or why it is not.
    pub fn try_get_mut<T, I>(&mut self) -> Result<&mut T, BadVariantAccess>
    where
        L: Member<T, I>,
    {
        self.check(<L as Member<T, I>>::INDEX)?;
        // SAFETY: alternative `INDEX` is live and has type `T`.
        Ok(unsafe { self.storage.get_unchecked_mut::<T>() })
    }

    /// Returns the value if alternative `N` is active, or why it is not.
    pub fn try_get_at<const N: usize>(&self) -> Result<&<L as At<N>>::Output, BadVariantAccess>
    where
        L: At<N>,
    {
        self.check(N)?;
        // SAFETY: alternative `N` is live.
        Ok(unsafe { self.storage.get_unchecked() })
    }

    /// Moves the value out if `T` is active, otherwise gives the variant back.
    pub fn into_inner<T, I>(mut self) -> Result<T, Self>
    where
        L: Member<T, I>,
    {
        if self.holds::<T, I>() {
            // SAFETY: alternative `INDEX` is live and has type `T`.
            Ok(unsafe { self.storage.take_unchecked::<T>() })
        } else {
            Err(self)
        }
    }

    /// Returns the value without checking the active alternative.
    ///
    /// # Safety
    ///
    /// `T` must be the active alternative.
    #[inline]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn get_unchecked<T, I>(&self) -> &T
    where
        L: Member<T, I>,
    {
        debug_assert!(self.holds::<T, I>(), "`{}` is not active", core::any::type_name::<T>());
        // SAFETY: see function docs.
        unsafe { self.storage.get_unchecked::<T>() }
    }

    /// Returns the value mutably without checking the active alternative.
    ///
    /// # Safety
    ///
    /// `T` must be the active alternative.
    #[inline]
    #[cfg_attr(debug_assertions, track_caller)]
    pub unsafe fn get_unchecked_mut<T, I>(&mut self) -> &mut T
    where
        L: Member<T, I>,
    {
        debug_assert!(self.holds::<T, I>(), "`{}` is not active", core::any::type_name::<T>());
        // SAFETY: see function docs.
        unsafe { self.storage.get_unchecked_mut::<T>() }
    }

    crate::cfg::serde! {
        #[inline]
        pub(crate) fn storage_ptr(&self) -> Ptr<'_> {
            self.storage.ptr()
        }
    }

    /// The active value as [`Any`].
    pub fn as_any(&self) -> Option<&dyn Any> {
        let index = self.index()?;
        // SAFETY: alternative `index` is live.
        Some(unsafe { L::TABLE[index].as_any(self.storage.ptr()) })
    }

    /// The active value as mutable [`Any`].
    pub fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        let index = self.index()?;
        // SAFETY: alternative `index` is live.
        Some(unsafe { L::TABLE[index].as_any_mut(self.storage.ptr_mut()) })
    }

    // -------------------------------------------------------------------------
    // Visitation

    /// Calls the handler of the active alternative.
    ///
    /// # Panics
    ///
    /// Panics if the variant is valueless; see [`try_visit`](Self::try_visit).
    #[track_caller]
    pub fn visit<V: Visitor>(&self, visitor: V) -> V::Output
    where
        L: VisitAll<V>,
    {
        match self.try_visit(visitor) {
            Ok(output) => output,
            Err(err) => bad_access(err),
        }
    }

    /// Calls the handler of the active alternative, or reports a valueless variant.
    pub fn try_visit<V: Visitor>(&self, visitor: V) -> Result<V::Output, BadVariantAccess>
    where
        L: VisitAll<V>,
    {
        let index = self.index().ok_or(BadVariantAccess::Valueless)?;
        // SAFETY: alternative `index` is live.
        Ok(unsafe { L::visit_at(index, self.storage.ptr(), visitor) })
    }

    /// Calls the mutable handler of the active alternative.
    ///
    /// # Panics
    ///
    /// Panics if the variant is valueless.
    #[track_caller]
    pub fn visit_mut<V: Visitor>(&mut self, visitor: V) -> V::Output
    where
        L: VisitMutAll<V>,
    {
        match self.try_visit_mut(visitor) {
            Ok(output) => output,
            Err(err) => bad_access(err),
        }
    }

    /// Calls the mutable handler of the active alternative, or reports a
    /// valueless variant.
    pub fn try_visit_mut<V: Visitor>(&mut self, visitor: V) -> Result<V::Output, BadVariantAccess>
    where
        L: VisitMutAll<V>,
    {
        let index = self.index().ok_or(BadVariantAccess::Valueless)?;
        // SAFETY: alternative `index` is live.
        Ok(unsafe { L::visit_mut_at(index, self.storage.ptr_mut(), visitor) })
    }

    /// Calls the closure at the active position of `handlers`.
    ///
    /// `handlers` is a tuple with one closure per alternative, in list order.
    ///
    /// # Panics
    ///
    /// Panics if the variant is valueless.
    #[track_caller]
    pub fn match_with<H, R>(&self, handlers: H) -> R
    where
        L: MatchAll<H, R>,
    {
        match self.index() {
            // SAFETY: alternative `index` is live.
            Some(index) => unsafe { L::match_at(index, self.storage.ptr(), handlers) },
            None => bad_access(BadVariantAccess::Valueless),
        }
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn bad_access(err: BadVariantAccess) -> ! {
    panic!("bad variant access: {err}")
}

// -----------------------------------------------------------------------------
// Traits

impl<L: Alternatives> Default for Variant<L> {
    /// Default-constructs alternative 0, or creates a valueless variant when
    /// alternative 0 has no default.
    fn default() -> Self {
        let mut storage = Storage::empty();
        if !storage.construct_default() {
            log::trace!(
                "first alternative of `{}` has no default value, starting valueless",
                core::any::type_name::<L>(),
            );
        }
        Self { storage }
    }
}

impl<L: CloneAll> Clone for Variant<L> {
    fn clone(&self) -> Self {
        let mut storage = Storage::empty();
        if let Some(index) = self.index() {
            // SAFETY: the new storage is empty and `index` is live in `self`.
            unsafe { storage.construct_clone(index, self.storage.ptr()) };
        }
        Self { storage }
    }

    fn clone_from(&mut self, source: &Self) {
        match (self.index(), source.index()) {
            (Some(a), Some(b)) if a == b => {
                // SAFETY: both hold a live alternative `a`.
                unsafe { L::clone_from_at(a, self.storage.ptr_mut(), source.storage.ptr()) };
            }
            (_, index) => {
                self.storage.destroy();
                if let Some(index) = index {
                    // SAFETY: the storage was just emptied and `index` is live in `source`.
                    unsafe { self.storage.construct_clone(index, source.storage.ptr()) };
                }
            }
        }
    }
}

impl<L: PartialEqAll> PartialEq for Variant<L> {
    fn eq(&self, other: &Self) -> bool {
        match (self.index(), other.index()) {
            (None, None) => true,
            (Some(a), Some(b)) if a == b => {
                // SAFETY: both hold a live alternative `a`.
                unsafe { L::eq_at(a, self.storage.ptr(), other.storage.ptr()) }
            }
            _ => false,
        }
    }
}

impl<L: EqAll> Eq for Variant<L> {}

impl<L: PartialOrdAll> PartialOrd for Variant<L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.index(), other.index()) {
            (Some(a), Some(b)) if a == b => {
                // SAFETY: both hold a live alternative `a`.
                unsafe { L::partial_cmp_at(a, self.storage.ptr(), other.storage.ptr()) }
            }
            (a, b) => a.partial_cmp(&b),
        }
    }
}

impl<L: OrdAll> Ord for Variant<L> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.index(), other.index()) {
            (Some(a), Some(b)) if a == b => {
                // SAFETY: both hold a live alternative `a`.
                unsafe { L::cmp_at(a, self.storage.ptr(), other.storage.ptr()) }
            }
            (a, b) => a.cmp(&b),
        }
    }
}

impl<L: HashAll> Hash for Variant<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let index = self.index();
        index.hash(state);
        if let Some(index) = index {
            // SAFETY: alternative `index` is live.
            unsafe { L::hash_at(index, self.storage.ptr(), state) };
        }
    }
}

struct Active<'a, L> {
    index: usize,
    ptr: Ptr<'a>,
    _marker: PhantomData<L>,
}

impl<L: DebugAll> fmt::Debug for Active<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SAFETY: built from a live alternative `index`.
        unsafe { L::fmt_at(self.index, self.ptr, f) }
    }
}

impl<L: DebugAll> fmt::Debug for Variant<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            None => f.write_str("Variant(<valueless>)"),
            Some(index) => f
                .debug_tuple("Variant")
                .field(&index)
                .field(&Active::<L> {
                    index,
                    ptr: self.storage.ptr(),
                    _marker: PhantomData,
                })
                .finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::Cell;
    use core::hash::BuildHasher;

    use foldhash::fast::FixedState;

    use super::Variant;
    use crate::{Alternative, BadVariantAccess, Monostate, ResolveError, Visit, VisitMut, Visitor};

    #[derive(Debug)]
    struct Tracked {
        id: u32,
        drops: Rc<Cell<usize>>,
    }

    impl Tracked {
        fn new(id: u32, drops: &Rc<Cell<usize>>) -> Self {
            Self {
                id,
                drops: drops.clone(),
            }
        }
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            Self::new(self.id, &self.drops)
        }
    }

    impl PartialEq for Tracked {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl Alternative for Tracked {}

    // -------------------------------------------------------------------------
    // Resolution

    #[test]
    fn exact_and_unique_implicit() {
        type V = Variant<(i32, String)>;
        assert_eq!(V::make(42).unwrap().index(), Some(0));
        assert_eq!(V::make("hi").unwrap().index(), Some(1));

        let v = Variant::<(f64, i32)>::make(3_i32).unwrap();
        assert_eq!(v.get::<i32, _>(), Some(&3));

        let v = Variant::<(u8, String)>::make('c').unwrap();
        assert_eq!(v.get::<String, _>().map(String::as_str), Some("c"));
    }

    #[test]
    fn rejected_conversions() {
        let err = Variant::<(i64, f64)>::make(7_i32).unwrap_err();
        assert!(matches!(err, ResolveError::Ambiguous { candidates: 2, .. }));

        let err = Variant::<(i32, f32)>::make(3.5_f64).unwrap_err();
        assert_eq!(err.input(), "f64");
        assert!(matches!(err, ResolveError::NoViableAlternative { .. }));
    }

    #[test]
    fn failed_assign_keeps_value() {
        let mut v = Variant::<(i64, f64)>::new(5_i64);
        assert!(v.assign(1_u8).is_err());
        assert_eq!(v.get::<i64, _>(), Some(&5));

        v.assign(2.5_f32).unwrap();
        assert_eq!(v.get::<f64, _>(), Some(&2.5));
    }

    // -------------------------------------------------------------------------
    // Lifecycle

    #[test]
    fn copy_is_independent() {
        let v = Variant::<(i32, String)>::make("abc").unwrap();
        let mut c = v.clone();
        assert_eq!(c, v);

        c.get_mut::<String, _>().unwrap().push('d');
        assert_ne!(c, v);
        assert_eq!(v.get::<String, _>().map(String::as_str), Some("abc"));

        let empty = Variant::<(i32, String)>::valueless();
        assert!(empty.clone().is_valueless());
    }

    #[test]
    fn clone_from_reuses_or_replaces() {
        let drops = Rc::new(Cell::new(0));
        let source = Variant::<(Tracked, i32)>::new(Tracked::new(7, &drops));

        let mut same = Variant::<(Tracked, i32)>::new(Tracked::new(1, &drops));
        same.clone_from(&source);
        assert_eq!(same.get::<Tracked, _>().map(|t| t.id), Some(7));

        let mut other = Variant::<(Tracked, i32)>::new(3);
        other.clone_from(&source);
        assert_eq!(other, source);

        let mut cleared = source.clone();
        cleared.clone_from(&Variant::valueless());
        assert!(cleared.is_valueless());
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn take_leaves_valueless() {
        let drops = Rc::new(Cell::new(0));
        let mut v = Variant::<(i32, Tracked)>::new(Tracked::new(1, &drops));

        let moved = v.take();
        assert!(v.is_valueless());
        assert!(moved.holds::<Tracked, _>());
        assert_eq!(drops.get(), 0);

        drop(v);
        assert_eq!(drops.get(), 0);
        drop(moved);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn every_value_dropped_once() {
        let drops = Rc::new(Cell::new(0));
        let mut v = Variant::<(Tracked, u32)>::new(Tracked::new(1, &drops));

        v.set(Tracked::new(2, &drops));
        assert_eq!(drops.get(), 1);

        v.set(5_u32);
        assert_eq!(drops.get(), 2);

        v.set_at::<0>(Tracked::new(3, &drops));
        v.reset();
        assert_eq!(drops.get(), 3);
        v.reset();
        assert_eq!(drops.get(), 3);

        v.set(Tracked::new(4, &drops));
        let inner = v.into_inner::<Tracked, _>().unwrap();
        assert_eq!(drops.get(), 3);
        drop(inner);
        assert_eq!(drops.get(), 4);

        let v = Variant::<(Tracked, u32)>::new(Tracked::new(5, &drops));
        let v = v.into_inner::<u32, _>().unwrap_err();
        drop(v);
        assert_eq!(drops.get(), 5);
    }

    #[cfg(feature = "std")]
    #[test]
    fn panicking_conversion_keeps_old_value() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        use crate::Conversion;

        struct Fragile;

        impl From<u16> for Fragile {
            fn from(value: u16) -> Self {
                assert!(value < 8, "conversion failed");
                Fragile
            }
        }

        impl Alternative for Fragile {
            const IMPLICIT: &'static [Conversion<Self>] = &[Conversion::from::<u16>()];
        }

        let drops = Rc::new(Cell::new(0));
        let mut v = Variant::<(Tracked, Fragile)>::new(Tracked::new(1, &drops));

        let result = catch_unwind(AssertUnwindSafe(|| v.assign(9_u16)));
        assert!(result.is_err());
        assert_eq!(v.get::<Tracked, _>().map(|t| t.id), Some(1));
        assert_eq!(drops.get(), 0);

        v.assign(3_u16).unwrap();
        assert!(v.holds::<Fragile, _>());
        assert_eq!(drops.get(), 1);
    }

    // -------------------------------------------------------------------------
    // Access

    #[test]
    fn checked_access() {
        let mut v = Variant::<(i32, String)>::new(4);
        assert_eq!(v.try_get::<i32, _>(), Ok(&4));
        assert_eq!(
            v.try_get::<String, _>(),
            Err(BadVariantAccess::WrongAlternative {
                expected: 1,
                active: 0
            })
        );
        assert_eq!(v.get_at::<1>(), None);
        *v.get_at_mut::<0>().unwrap() = 8;
        assert_eq!(unsafe { *v.get_unchecked::<i32, _>() }, 8);

        v.reset();
        assert_eq!(v.try_get::<i32, _>(), Err(BadVariantAccess::Valueless));
        assert_eq!(v.try_get_at::<0>(), Err(BadVariantAccess::Valueless));
        assert_eq!(v.get::<i32, _>(), None);
    }

    #[test]
    fn observers() {
        type V = Variant<(u8, String, bool)>;
        assert_eq!(V::LEN, 3);
        assert_eq!(V::index_of::<bool, _>(), 2);

        let mut v = V::new(true);
        assert!(v.is_index(2));
        assert_eq!(v.active_type_name(), Some("bool"));
        assert_eq!(v.as_any().and_then(|a| a.downcast_ref::<bool>()), Some(&true));

        *v.as_any_mut().unwrap().downcast_mut::<bool>().unwrap() = false;
        assert_eq!(v.get::<bool, _>(), Some(&false));

        v.reset();
        assert_eq!(v.active_type_name(), None);
        assert!(v.as_any().is_none());
    }

    // -------------------------------------------------------------------------
    // Visitation

    struct Size;

    impl Visitor for Size {
        type Output = usize;
    }

    impl Visit<i32> for Size {
        fn visit(self, _: &i32) -> usize {
            4
        }
    }

    impl Visit<String> for Size {
        fn visit(self, value: &String) -> usize {
            value.len()
        }
    }

    struct Double;

    impl Visitor for Double {
        type Output = ();
    }

    impl VisitMut<i32> for Double {
        fn visit_mut(self, value: &mut i32) {
            *value *= 2;
        }
    }

    impl VisitMut<String> for Double {
        fn visit_mut(self, value: &mut String) {
            *value = value.repeat(2);
        }
    }

    #[test]
    fn visit_reaches_active_handler() {
        let mut v = Variant::<(i32, String)>::new(String::from("ab"));
        assert_eq!(v.visit(Size), 2);

        v.visit_mut(Double);
        assert_eq!(v.get::<String, _>().map(String::as_str), Some("abab"));

        v.set(21);
        v.visit_mut(Double);
        assert_eq!(v.get::<i32, _>(), Some(&42));
        assert_eq!(v.visit(Size), 4);

        let text = v.match_with((|n: &i32| format!("int {n}"), |s: &String| format!("str {s}")));
        assert_eq!(text, "int 42");

        v.reset();
        assert_eq!(v.try_visit(Size), Err(BadVariantAccess::Valueless));
        assert_eq!(v.try_visit_mut(Double), Err(BadVariantAccess::Valueless));
    }

    #[test]
    #[should_panic(expected = "bad variant access")]
    fn visiting_valueless_panics() {
        Variant::<(i32, String)>::valueless().visit(Size);
    }

    // -------------------------------------------------------------------------
    // Traits

    #[test]
    fn default_uses_first_alternative() {
        assert_eq!(Variant::<(i32, String)>::default().get::<i32, _>(), Some(&0));
        assert_eq!(Variant::<(String, i32)>::default().get::<String, _>().map(String::as_str), Some(""));
        assert!(Variant::<(Tracked, String)>::default().is_valueless());
        assert!(Variant::<(Tracked,)>::default().is_valueless());
        assert!(Variant::<(Monostate, Tracked)>::default().holds::<Monostate, _>());
    }

    #[test]
    fn ordering() {
        type V = Variant<(i32, String)>;
        let empty = V::valueless();
        let small = V::new(1);
        let large = V::new(100);
        let text = V::make("a").unwrap();

        assert!(empty < small);
        assert!(small < large);
        assert!(large < text);
        assert_eq!(V::valueless(), empty);
        assert_ne!(small, large);

        let mut all = [text.clone(), large.clone(), empty.clone(), small.clone()];
        all.sort();
        assert_eq!(all, [empty, small, large, text]);
    }

    #[test]
    fn hash_follows_index_and_value() {
        let state = FixedState::with_seed(0x6B1D_5A2E_93C4_F07D);
        type V = Variant<(u8, u8)>;

        assert_eq!(state.hash_one(&V::new_at::<0>(1)), state.hash_one(&V::new_at::<0>(1)));
        assert_ne!(state.hash_one(&V::new_at::<0>(1)), state.hash_one(&V::new_at::<1>(1)));
        assert_ne!(state.hash_one(&V::new_at::<0>(1)), state.hash_one(&V::new_at::<0>(2)));
    }

    #[test]
    fn debug_output() {
        type V = Variant<(i32, String)>;
        assert_eq!(format!("{:?}", V::new(5)), "Variant(0, 5)");
        assert_eq!(format!("{:?}", V::make("x").unwrap()), "Variant(1, \"x\")");
        assert_eq!(format!("{:?}", V::valueless()), "Variant(<valueless>)");
    }

    #[test]
    fn layout_and_auto_traits() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Variant<(i32, String)>>();

        assert_eq!(size_of::<Variant<(u32, u16)>>(), 8);
        assert_eq!(size_of::<Variant<(u8,)>>(), 2);
    }
}
