/// The result type shared by every handler of a visitor.
pub trait Visitor {
    type Output;
}

/// Handles a shared reference to one alternative.
///
/// A visitor for `Variant<(A, B)>` implements `Visit<A>` and `Visit<B>`, all
/// with the same [`Visitor::Output`].
///
/// ```
/// use bit_variant::{Variant, Visit, Visitor};
///
/// struct Describe;
///
/// impl Visitor for Describe {
///     type Output = &'static str;
/// }
///
/// impl Visit<i32> for Describe {
///     fn visit(self, _: &i32) -> &'static str {
///         "number"
///     }
/// }
///
/// impl Visit<String> for Describe {
///     fn visit(self, _: &String) -> &'static str {
///         "text"
///     }
/// }
///
/// let v = Variant::<(i32, String)>::new(1);
/// assert_eq!(v.visit(Describe), "number");
/// ```
pub trait Visit<T>: Visitor {
    fn visit(self, value: &T) -> Self::Output;
}

/// Handles an exclusive reference to one alternative.
pub trait VisitMut<T>: Visitor {
    fn visit_mut(self, value: &mut T) -> Self::Output;
}
