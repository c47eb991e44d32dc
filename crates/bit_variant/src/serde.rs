//! Serialization as an `(index, value)` pair.
//!
//! ```
//! use bit_variant::Variant;
//!
//! type V = Variant<(u32, String)>;
//!
//! let json = serde_json::to_string(&V::make("hi").unwrap()).unwrap();
//! assert_eq!(json, r#"[1,"hi"]"#);
//!
//! let back: V = serde_json::from_str(&json).unwrap();
//! assert_eq!(back.get::<String, _>().map(String::as_str), Some("hi"));
//! ```

use core::fmt;
use core::marker::PhantomData;

use bit_ptr::Ptr;
use serde_core::de::{self, Error as _, SeqAccess, Unexpected};
use serde_core::ser::{self, SerializeTuple};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Variant;
use crate::list::Alternatives;

// -----------------------------------------------------------------------------
// Capabilities

/// Every alternative is [`Serialize`].
pub trait SerializeAll: Alternatives {
    /// # Safety
    ///
    /// `ptr` must point to a live alternative `index`.
    #[doc(hidden)]
    unsafe fn serialize_element_at<T: SerializeTuple>(
        index: usize,
        ptr: Ptr<'_>,
        tuple: &mut T,
    ) -> Result<(), T::Error>;
}

/// Every alternative is [`Deserialize`].
pub trait DeserializeAll<'de>: Alternatives {
    /// Reads alternative `index` from the next element of `seq`.
    ///
    /// `index` must be below `Self::LEN`.
    #[doc(hidden)]
    fn next_element_at<A: SeqAccess<'de>>(
        index: usize,
        seq: &mut A,
    ) -> Result<Option<Variant<Self>>, A::Error>;
}

// -----------------------------------------------------------------------------
// Serialize

impl<L: SerializeAll> Serialize for Variant<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(index) = self.index() else {
            return Err(ser::Error::custom("cannot serialize a valueless variant"));
        };

        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&index)?;
        // SAFETY: alternative `index` is live.
        unsafe { L::serialize_element_at(index, self.storage_ptr(), &mut tuple)? };
        tuple.end()
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct VariantVisitor<L>(PhantomData<fn() -> L>);

impl<'de, L: DeserializeAll<'de>> de::Visitor<'de> for VariantVisitor<L> {
    type Value = Variant<L>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an (index, value) pair with index below {}", L::LEN)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let index: usize = seq
            .next_element()?
            .ok_or_else(|| A::Error::invalid_length(0, &self))?;

        if index >= L::LEN {
            return Err(A::Error::invalid_value(
                Unexpected::Unsigned(index as u64),
                &self,
            ));
        }

        L::next_element_at(index, &mut seq)?.ok_or_else(|| A::Error::invalid_length(1, &self))
    }
}

impl<'de, L: DeserializeAll<'de>> Deserialize<'de> for Variant<L> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(2, VariantVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use crate::{Monostate, Variant};

    type V = Variant<(u32, String, Monostate)>;

    #[test]
    fn json_round_trip() {
        let v = V::new(42_u32);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[0,42]");
        assert_eq!(serde_json::from_str::<V>(&json).unwrap(), v);

        let unit = V::new(Monostate);
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, "[2,null]");
        assert!(serde_json::from_str::<V>(&json).unwrap().holds::<Monostate, _>());
    }

    #[test]
    fn ron_round_trip() {
        let list: Vec<V> = [V::new(7_u32), V::make("ron").unwrap()].into();
        let text = ron::to_string(&list).unwrap();
        let back: Vec<V> = ron::from_str(&text).unwrap();
        assert_eq!(back, list);
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Shape {
        name: String,
        size: Variant<(u32, f64)>,
    }

    #[test]
    fn nested_in_derived_struct() {
        let shape = Shape {
            name: "disc".to_string(),
            size: Variant::make(1.5_f32).unwrap(),
        };
        let json = serde_json::to_string(&shape).unwrap();
        assert_eq!(json, r#"{"name":"disc","size":[1,1.5]}"#);
        assert_eq!(serde_json::from_str::<Shape>(&json).unwrap(), shape);
    }

    #[test]
    fn rejects_bad_input() {
        let err = serde_json::to_string(&V::valueless()).unwrap_err();
        assert!(err.to_string().contains("valueless"));

        assert!(serde_json::from_str::<V>("[3,1]").is_err());
        assert!(serde_json::from_str::<V>("[0]").is_err());
        assert!(serde_json::from_str::<V>("[1,5]").is_err());
    }
}
