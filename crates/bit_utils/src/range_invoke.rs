/// Calls the target macro once for every non-empty prefix of a list.
///
/// Each list entry is an index followed by one or more identifiers. The target
/// receives the prefix as a single bracketed list, which is the shape needed to
/// implement a trait for every tuple arity up to the length of the list.
///
/// # Example
///
/// ```ignore
/// range_invoke!(my_macro, [0: P0 F0, 1: P1 F1, 2: P2 F2]);
/// // eq  to ↓
/// my_macro!([0: P0 F0]);
/// my_macro!([0: P0 F0, 1: P1 F1]);
/// my_macro!([0: P0 F0, 1: P1 F1, 2: P2 F2]);
/// ```
///
/// Attributes written before the macro name are repeated on every call.
///
/// ```
/// use bit_utils::range_invoke;
///
/// macro_rules! arity {
///     ([$($idx:tt: $name:ident),+]) => {
///         impl Arity for ($($name,)+) {
///             const LEN: usize = [$($idx),+].len();
///         }
///     };
/// }
///
/// trait Arity {
///     const LEN: usize;
/// }
///
/// struct A;
/// struct B;
/// struct C;
///
/// range_invoke!(arity, [0: A, 1: B, 2: C]);
///
/// assert_eq!(<(A,)>::LEN, 1);
/// assert_eq!(<(A, B, C)>::LEN, 3);
/// ```
#[macro_export]
macro_rules! range_invoke {
    ($(#[$meta:meta])* $macro:ident, [$($idx:tt: $($name:ident)+),+ $(,)?]) => {
        $crate::range_invoke!(@step [$(#[$meta])*] $macro, [], [$($idx: $($name)+),+]);
    };
    (@step [$($attr:tt)*] $macro:ident, [$($done:tt)*], []) => {};
    (@step [$($attr:tt)*] $macro:ident, [$($done:tt)*], [$idx:tt: $($name:ident)+ $(, $($rest:tt)+)?]) => {
        $($attr)* $macro!([$($done)* $idx: $($name)+]);
        $crate::range_invoke!(@step [$($attr)*] $macro, [$($done)* $idx: $($name)+,], [$($($rest)+)?]);
    };
}

#[cfg(test)]
mod tests {
    trait Width {
        const IDENTS: usize;
        const LAST: usize;
    }

    macro_rules! width {
        ([$($idx:tt: $first:ident $second:ident),+]) => {
            impl<$($first),+> Width for ($($first,)+) {
                const IDENTS: usize = [$(stringify!($first), stringify!($second)),+].len();
                const LAST: usize = {
                    let all = [$($idx),+];
                    all[all.len() - 1]
                };
            }
        };
    }

    range_invoke!(width, [0: P0 F0, 1: P1 F1, 2: P2 F2, 3: P3 F3]);

    #[test]
    fn every_prefix_is_expanded() {
        assert_eq!(<(u8,)>::IDENTS, 2);
        assert_eq!(<(u8,)>::LAST, 0);

        assert_eq!(<(u8, u16)>::IDENTS, 4);
        assert_eq!(<(u8, u16)>::LAST, 1);

        assert_eq!(<(u8, u16, u32, u64)>::IDENTS, 8);
        assert_eq!(<(u8, u16, u32, u64)>::LAST, 3);
    }
}
