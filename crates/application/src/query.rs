//! Composable query building blocks executed by repository adapters.

mod predicate;
mod specification;

pub use predicate::Predicate;
pub use specification::{DEFAULT_PAGE_SIZE, OrderKey, SortDirection, SortValue, Specification};

#[cfg(test)]
mod tests;
