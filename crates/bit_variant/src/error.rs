use thiserror::Error;

// -----------------------------------------------------------------------------
// ResolveError

/// A value could not be matched to a single alternative.
///
/// Returned by [`Variant::make`](crate::Variant::make),
/// [`Variant::assign`](crate::Variant::assign) and
/// [`Variant::resolve`](crate::Variant::resolve).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("no alternative of `{target}` accepts a value of type `{input}`")]
    NoViableAlternative {
        input: &'static str,
        target: &'static str,
    },

    #[error(
        "conversion from `{input}` is ambiguous: {candidates} alternatives accept it, including `{first}` and `{second}`"
    )]
    Ambiguous {
        input: &'static str,
        first: &'static str,
        second: &'static str,
        candidates: usize,
    },
}

impl ResolveError {
    /// The name of the source type that was rejected.
    pub const fn input(&self) -> &'static str {
        match self {
            Self::NoViableAlternative { input, .. } | Self::Ambiguous { input, .. } => input,
        }
    }
}

// -----------------------------------------------------------------------------
// BadVariantAccess

/// A checked access asked for an alternative that is not active.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BadVariantAccess {
    #[error("the variant holds no value")]
    Valueless,

    #[error("expected alternative {expected}, but alternative {active} is active")]
    WrongAlternative { expected: usize, active: usize },
}
