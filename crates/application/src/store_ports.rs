use std::collections::BTreeSet;

use async_trait::async_trait;
use pawtrail_core::AppResult;
use pawtrail_domain::{AuditRecord, Entity, SoftDeletable};

use crate::query::Specification;

/// Executes specifications and stages mutations for one entity kind.
///
/// All write operations follow a two-phase stage/commit discipline: nothing
/// is durable until [`Repository::save_changes`] commits the whole unit of
/// work atomically.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Looks up one entity by identifier; absence is an empty result, never
    /// an error. Soft-deleted rows are excluded.
    async fn get(&self, entity_id: &str) -> AppResult<Option<E>>;

    /// Lists every live entity of this kind in store-default order.
    async fn list_all(&self) -> AppResult<Vec<E>>;

    /// Lists entities matching a specification: predicate, then includes,
    /// then ordering, then skip/take when paging is enabled.
    async fn list(&self, spec: &Specification<E>) -> AppResult<Vec<E>>;

    /// Counts entities matching the specification predicate; paging and
    /// ordering are ignored.
    async fn count(&self, spec: &Specification<E>) -> AppResult<usize>;

    /// Stages one entity for insertion.
    async fn create(&self, entity: E) -> AppResult<()>;

    /// Stages several entities for insertion.
    async fn create_many(&self, entities: Vec<E>) -> AppResult<()>;

    /// Stages an updated entity state for an already-identified row.
    async fn update(&self, entity: E) -> AppResult<()>;

    /// Stages a physical row removal.
    async fn delete(&self, entity: &E) -> AppResult<()>;

    /// Commits every staged change in this unit of work as one atomic batch.
    ///
    /// The change-audit interceptor runs synchronously before the physical
    /// commit; an audit failure fails the whole call and no staged change is
    /// applied.
    async fn save_changes(&self) -> AppResult<()>;
}

/// Tombstone operations for soft-deletable entity kinds.
#[async_trait]
pub trait SoftDeleteRepository<E: Entity + SoftDeletable>: Repository<E> {
    /// Stages a tombstone flag set for the identified entity.
    async fn soft_delete(&self, entity_id: &str) -> AppResult<()>;

    /// Stages a tombstone flag clear for the identified entity.
    async fn restore(&self, entity_id: &str) -> AppResult<()>;
}

/// Process-wide allow-list of entity kinds enrolled in change auditing.
///
/// Built once at composition time and read-only afterwards; the commit path
/// consults it synchronously for every staged change.
#[derive(Debug, Clone, Default)]
pub struct AuditAllowList {
    tracked: BTreeSet<String>,
}

impl AuditAllowList {
    /// Creates an empty allow-list that tracks nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrolls an entity kind for change auditing.
    #[must_use]
    pub fn track(mut self, kind: impl Into<String>) -> Self {
        self.tracked.insert(kind.into());
        self
    }

    /// Returns whether the entity kind is enrolled.
    #[must_use]
    pub fn tracks(&self, kind: &str) -> bool {
        self.tracked.contains(kind)
    }
}

/// Query inputs for reading recent audit trail records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrailQuery {
    /// Restrict to one entity kind.
    pub entity_kind: Option<String>,
    /// Restrict to one entity identifier.
    pub entity_id: Option<String>,
    /// Restrict to one acting subject.
    pub actor_subject: Option<String>,
    /// Maximum records returned.
    pub limit: usize,
    /// Number of records skipped for offset pagination.
    pub offset: usize,
}

impl Default for AuditTrailQuery {
    fn default() -> Self {
        Self {
            entity_kind: None,
            entity_id: None,
            actor_subject: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Port for the append-only audit trail.
///
/// No update or delete operation is exposed; adapters sharing the business
/// store's durability domain keep audit loss impossible without extra
/// delivery semantics.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Appends one audit record durably.
    async fn append(&self, record: AuditRecord) -> AppResult<()>;

    /// Lists recent audit records, newest first.
    async fn recent(&self, query: AuditTrailQuery) -> AppResult<Vec<AuditRecord>>;
}
