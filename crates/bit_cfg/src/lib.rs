//! Compile-time condition aliases.
//!
//! [`define_alias!`] turns a `#[cfg(...)]` predicate into a macro named after the
//! alias. The generated macro expands its input when the predicate holds and
//! drops it otherwise, so feature checks read as ordinary code:
//!
//! ```
//! mod cfg {
//!     bit_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!         #[cfg(feature = "no-such-feature")] => never,
//!     }
//! }
//!
//! let mut hits = 0;
//! cfg::never! { hits += 100; }
//!
//! let checked = cfg::debug! {
//!     if { true } else { false }
//! };
//! assert_eq!(checked, cfg!(debug_assertions));
//! assert_eq!(hits, 0);
//! assert!(!cfg::never!());
//! ```
#![no_std]

/// Declares one alias macro per `#[cfg(...)] => name` pair.
///
/// Each alias accepts three forms:
///
/// - `name!()` evaluates to `true` or `false`;
/// - `name! { if { .. } else { .. } }` keeps exactly one branch;
/// - `name! { .. }` keeps the tokens only when the condition holds.
#[macro_export]
macro_rules! define_alias {
    (
        #[cfg($meta:meta)] => $alias:ident
        $(, $($rest:tt)*)?
    ) => {
        #[cfg($meta)]
        #[doc = concat!("Enabled alias for `", stringify!($meta), "`.")]
        #[doc(inline)]
        #[allow(unused_imports)]
        pub use $crate::enabled as $alias;

        #[cfg(not($meta))]
        #[doc = concat!("Disabled alias for `", stringify!($meta), "`.")]
        #[doc(inline)]
        #[allow(unused_imports)]
        pub use $crate::disabled as $alias;

        $($crate::define_alias! { $($rest)* })?
    };
    () => {};
}

/// Alias body for a condition that holds.
#[doc(hidden)]
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($then:tt)* } else { $($otherwise:tt)* }) => { $($then)* };
    ($($tokens:tt)*) => { $($tokens)* };
}

/// Alias body for a condition that does not hold.
#[doc(hidden)]
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($then:tt)* } else { $($otherwise:tt)* }) => { $($otherwise)* };
    ($($tokens:tt)*) => {};
}
