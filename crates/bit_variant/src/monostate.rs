/// A unit alternative, used to give a variant an explicit empty state.
///
/// A variant is default-constructible only through its first alternative, so
/// placing `Monostate` first makes any list default-constructible.
///
/// ```
/// use bit_variant::{Monostate, Variant};
///
/// struct Handle(u32);
/// impl bit_variant::Alternative for Handle {}
///
/// let v = Variant::<(Monostate, Handle)>::default();
/// assert!(v.holds::<Monostate, _>());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monostate;

crate::cfg::serde! {
    impl serde_core::Serialize for Monostate {
        fn serialize<S: serde_core::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_unit()
        }
    }

    impl<'de> serde_core::Deserialize<'de> for Monostate {
        fn deserialize<D: serde_core::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            <() as serde_core::Deserialize>::deserialize(deserializer).map(|()| Monostate)
        }
    }
}
