use std::fmt;
use std::sync::Arc;

/// A pure boolean test over one entity instance.
///
/// Predicates compose through logical AND only. The tagged shape lets a
/// backend flatten the tree into native query push-down or fall back to
/// in-memory evaluation; leaves must stay free of side effects because an
/// engine may evaluate them zero, one, or many times.
pub enum Predicate<E> {
    /// Matches every entity; the unit of AND composition.
    True,
    /// A single test supplied by a specification.
    Leaf(Arc<dyn Fn(&E) -> bool + Send + Sync>),
    /// Both operands must hold for the same entity instance.
    And(Box<Predicate<E>>, Box<Predicate<E>>),
}

impl<E> Predicate<E> {
    /// Wraps a closure as a leaf predicate.
    pub fn from_fn(test: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self::Leaf(Arc::new(test))
    }

    /// Combines two predicates without mutating either input.
    ///
    /// The identity predicate is elided so `True.and(p)` behaves exactly
    /// like `p`.
    #[must_use]
    pub fn and(self, other: Predicate<E>) -> Predicate<E> {
        match (self, other) {
            (Self::True, other) => other,
            (this, Self::True) => this,
            (this, other) => Self::And(Box::new(this), Box::new(other)),
        }
    }

    /// Evaluates the predicate against one entity.
    #[must_use]
    pub fn matches(&self, entity: &E) -> bool {
        match self {
            Self::True => true,
            Self::Leaf(test) => test(entity),
            Self::And(left, right) => left.matches(entity) && right.matches(entity),
        }
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        match self {
            Self::True => Self::True,
            Self::Leaf(test) => Self::Leaf(Arc::clone(test)),
            Self::And(left, right) => Self::And(left.clone(), right.clone()),
        }
    }
}

impl<E> Default for Predicate<E> {
    fn default() -> Self {
        Self::True
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => formatter.write_str("True"),
            Self::Leaf(_) => formatter.write_str("Leaf"),
            Self::And(left, right) => formatter
                .debug_tuple("And")
                .field(left)
                .field(right)
                .finish(),
        }
    }
}
