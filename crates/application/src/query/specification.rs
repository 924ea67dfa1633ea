use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::Predicate;

/// Page size applied when a filter provides no usable value.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Sort direction for a specification order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

/// Comparable value produced by an order-key accessor.
///
/// One specification type always produces a single variant, so the derived
/// cross-variant ordering is never observable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    /// Textual sort key.
    Text(String),
    /// Integral sort key.
    Integer(i64),
    /// Instant sort key.
    Timestamp(DateTime<Utc>),
}

impl SortValue {
    /// Creates a case-normalized textual sort key.
    #[must_use]
    pub fn text(value: impl AsRef<str>) -> Self {
        Self::Text(value.as_ref().to_lowercase())
    }
}

type OrderKeyFn<E> = Arc<dyn Fn(&E) -> SortValue + Send + Sync>;

/// Single-field ordering applied by repository adapters.
pub struct OrderKey<E> {
    accessor: OrderKeyFn<E>,
    direction: SortDirection,
}

impl<E> OrderKey<E> {
    /// Creates an order key from a field accessor and direction.
    pub fn new(
        accessor: impl Fn(&E) -> SortValue + Send + Sync + 'static,
        direction: SortDirection,
    ) -> Self {
        Self {
            accessor: Arc::new(accessor),
            direction,
        }
    }

    /// Creates an ascending order key.
    pub fn ascending(accessor: impl Fn(&E) -> SortValue + Send + Sync + 'static) -> Self {
        Self::new(accessor, SortDirection::Ascending)
    }

    /// Creates a descending order key.
    pub fn descending(accessor: impl Fn(&E) -> SortValue + Send + Sync + 'static) -> Self {
        Self::new(accessor, SortDirection::Descending)
    }

    /// Returns the sort direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compares two entities under this key and direction.
    #[must_use]
    pub fn compare(&self, left: &E, right: &E) -> Ordering {
        let ordering = (self.accessor)(left).cmp(&(self.accessor)(right));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl<E> Clone for OrderKey<E> {
    fn clone(&self) -> Self {
        Self {
            accessor: Arc::clone(&self.accessor),
            direction: self.direction,
        }
    }
}

impl<E> fmt::Debug for OrderKey<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OrderKey")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// An immutable bundle of predicate, eager-load paths, ordering, and paging
/// for one query.
///
/// A specification is built once per request from a filter value and
/// discarded after execution; builder methods consume and return the value
/// so a finished specification is never mutated in place.
pub struct Specification<E> {
    predicate: Predicate<E>,
    includes: Vec<String>,
    order: Option<OrderKey<E>>,
    skip: usize,
    take: usize,
    paging_enabled: bool,
}

impl<E> Specification<E> {
    /// Creates an unfiltered, unpaged specification.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicate: Predicate::True,
            includes: Vec::new(),
            order: None,
            skip: 0,
            take: 0,
            paging_enabled: false,
        }
    }

    /// AND-composes a condition into the specification predicate.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate<E>) -> Self {
        self.predicate = self.predicate.and(predicate);
        self
    }

    /// Appends a relation path to eagerly resolve; insertion order is kept
    /// for engines that optimize join order.
    #[must_use]
    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    /// Sets the single-field ordering.
    #[must_use]
    pub fn order_by(mut self, order: OrderKey<E>) -> Self {
        self.order = Some(order);
        self
    }

    /// Enables paging from one-based page inputs.
    ///
    /// Page numbers below one are clamped to the first page and
    /// non-positive page sizes fall back to [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn paged(mut self, page_number: i64, page_size: i64) -> Self {
        let page = page_number.max(1);
        let size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        self.skip = usize::try_from((page - 1).saturating_mul(size)).unwrap_or(usize::MAX);
        self.take = usize::try_from(size).unwrap_or(usize::MAX);
        self.paging_enabled = true;
        self
    }

    /// Evaluates the specification predicate against one entity.
    #[must_use]
    pub fn matches(&self, entity: &E) -> bool {
        self.predicate.matches(entity)
    }

    /// Returns the composed predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate<E> {
        &self.predicate
    }

    /// Returns the relation paths to eagerly resolve, in insertion order.
    #[must_use]
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// Returns the ordering, if one was set.
    #[must_use]
    pub fn order(&self) -> Option<&OrderKey<E>> {
        self.order.as_ref()
    }

    /// Returns the number of rows to skip when paging is enabled.
    #[must_use]
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Returns the number of rows to take when paging is enabled.
    #[must_use]
    pub fn take(&self) -> usize {
        self.take
    }

    /// Returns whether skip/take apply to list execution.
    #[must_use]
    pub fn paging_enabled(&self) -> bool {
        self.paging_enabled
    }
}

impl<E> Default for Specification<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Specification<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            includes: self.includes.clone(),
            order: self.order.clone(),
            skip: self.skip,
            take: self.take,
            paging_enabled: self.paging_enabled,
        }
    }
}

impl<E> fmt::Debug for Specification<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Specification")
            .field("predicate", &self.predicate)
            .field("includes", &self.includes)
            .field("order", &self.order)
            .field("skip", &self.skip)
            .field("take", &self.take)
            .field("paging_enabled", &self.paging_enabled)
            .finish()
    }
}
