//! A tagged union over a closed list of alternative types.
//!
//! [`Variant<L>`] stores exactly one value whose type is one of the tuple `L`,
//! for example `Variant<(i32, String)>`. The active alternative is tracked by an
//! index, and every lifecycle operation (drop, clone, compare, visit) is
//! dispatched on that index.
//!
//! # Construction
//!
//! - [`Variant::new`] takes a value whose type *is* one of the alternatives.
//!   The position is found at compile time.
//! - [`Variant::make`] also accepts values that convert into exactly one
//!   alternative. Each [`Alternative`] lists the source types it accepts in
//!   [`Alternative::IMPLICIT`]. An exact type match always wins; otherwise
//!   the conversion must be unique, and an ambiguous or impossible conversion is
//!   reported as a [`ResolveError`].
//!
//! ```
//! use bit_variant::{ResolveError, Variant};
//!
//! type Value = Variant<(i64, String)>;
//!
//! let n = Value::new(42_i64);
//! assert_eq!(n.index(), Some(0));
//!
//! // `&str` is not an alternative, but `String` accepts it.
//! let s = Value::make("hi").unwrap();
//! assert_eq!(s.get::<String, _>().map(String::as_str), Some("hi"));
//!
//! // Both `i64` and `f64` accept an `i32`.
//! let err = Variant::<(i64, f64)>::make(7_i32).unwrap_err();
//! assert!(matches!(err, ResolveError::Ambiguous { .. }));
//! ```
//!
//! # Visitation
//!
//! [`Variant::visit`] calls the [`Visit`] handler of the active alternative.
//! [`Variant::match_with`] does the same with one closure per alternative.
//!
//! ```
//! use bit_variant::Variant;
//!
//! let v = Variant::<(i32, String)>::new(String::from("abc"));
//! let len = v.match_with((|n: &i32| *n as usize, |s: &String| s.len()));
//! assert_eq!(len, 3);
//! ```
#![expect(unsafe_code, reason = "Variant storage is a manually managed union.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    bit_cfg::define_alias! {
        #[cfg(feature = "std")] => std,
        #[cfg(feature = "serde")] => serde,
        #[cfg(any(feature = "debug", debug_assertions))] => debug,
    }
}

// -----------------------------------------------------------------------------
// no_std support

crate::cfg::std! { extern crate std; }

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod alternative;
mod error;
mod monostate;
mod resolve;
mod storage;
mod table;
mod variant;
mod visit;

pub mod list;

crate::cfg::serde! {
    mod serde;
}

// -----------------------------------------------------------------------------
// Top-level exports

pub use alternative::{Alternative, Conversion};
pub use error::{BadVariantAccess, ResolveError};
pub use monostate::Monostate;
pub use resolve::{Rank, Resolution};
pub use table::AlternativeMeta;
pub use variant::Variant;
pub use visit::{Visit, VisitMut, Visitor};

crate::cfg::serde! {
    pub use crate::serde::{DeserializeAll, SerializeAll};
}
