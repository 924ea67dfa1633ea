use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use pawtrail_application::{
    ChangeAuditInterceptor, ObservedChange, Repository, SoftDeleteRepository, Specification,
};
use pawtrail_core::{ActorIdentity, AppError, AppResult};
use pawtrail_domain::{AuditAction, Entity, FieldMap, SoftDeletable};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

type RowKey = (&'static str, String);

/// Committed rows shared by every unit of work in the process.
///
/// Rows are stored as serialized field maps keyed by entity kind and
/// identifier, so one store holds every kind and the audit pipeline can read
/// before-snapshots without touching typed entities.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<RowKey, FieldMap>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StagedOp {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
struct StagedChange {
    kind: &'static str,
    entity_id: String,
    op: StagedOp,
    payload: Option<FieldMap>,
}

/// One request-scoped unit of work over the in-memory store.
///
/// Repository handles for any entity kind can be bound to the same unit of
/// work; a single [`MemoryUnitOfWork::save_changes`] commits everything they
/// staged as one atomic batch, running the change-audit interceptor before
/// any row is touched.
pub struct MemoryUnitOfWork {
    store: Arc<MemoryStore>,
    interceptor: ChangeAuditInterceptor,
    actor: Option<ActorIdentity>,
    staged: Mutex<Vec<StagedChange>>,
}

impl MemoryUnitOfWork {
    /// Creates a unit of work bound to the given acting identity, or to the
    /// system sentinel when none is supplied.
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        interceptor: ChangeAuditInterceptor,
        actor: Option<ActorIdentity>,
    ) -> Self {
        Self {
            store,
            interceptor,
            actor,
            staged: Mutex::new(Vec::new()),
        }
    }

    /// Returns a typed repository handle bound to this unit of work.
    #[must_use]
    pub fn repository<E: Entity>(self: &Arc<Self>) -> MemoryRepository<E> {
        MemoryRepository {
            unit: Arc::clone(self),
            _marker: PhantomData,
        }
    }

    async fn stage(&self, change: StagedChange) {
        self.staged.lock().await.push(change);
    }

    /// Commits every staged change atomically.
    ///
    /// The whole batch is validated against the committed rows first, audit
    /// records are captured for tracked kinds, and only then are rows
    /// mutated. A validation or audit failure drops the staged batch and
    /// leaves the store untouched.
    pub async fn save_changes(&self) -> AppResult<()> {
        let staged: Vec<StagedChange> = {
            let mut staged = self.staged.lock().await;
            std::mem::take(&mut *staged)
        };

        if staged.is_empty() {
            return Ok(());
        }

        let mut rows = self.store.rows.write().await;

        // Row-state projection of the batch so far: catches duplicate
        // inserts inside one batch and gives every change the row state its
        // predecessors staged, not just the committed state.
        let mut projected: HashMap<RowKey, Option<FieldMap>> = HashMap::new();
        let mut observed = Vec::with_capacity(staged.len());

        for change in &staged {
            let key: RowKey = (change.kind, change.entity_id.clone());
            let current = match projected.get(&key) {
                Some(state) => state.clone(),
                None => rows.get(&key).cloned(),
            };

            match change.op {
                StagedOp::Insert => {
                    if current.is_some() {
                        return Err(AppError::Conflict(format!(
                            "{} '{}' already exists",
                            change.kind, change.entity_id
                        )));
                    }
                }
                StagedOp::Update | StagedOp::Delete => {
                    if current.is_none() {
                        return Err(AppError::Conflict(format!(
                            "{} '{}' does not exist",
                            change.kind, change.entity_id
                        )));
                    }
                }
            }

            observed.push(ObservedChange {
                entity_kind: change.kind.to_owned(),
                entity_id: change.entity_id.clone(),
                action: match change.op {
                    StagedOp::Insert => AuditAction::Created,
                    StagedOp::Update => AuditAction::Modified,
                    StagedOp::Delete => AuditAction::Deleted,
                },
                // Validation guarantees this is None for inserts, so Created
                // records never carry a before snapshot.
                before: current,
                after: change.payload.clone(),
            });

            // Deletes stage no payload, so the projected state becomes None.
            projected.insert(key, change.payload.clone());
        }

        // Audit capture is part of the commit's success criterion; a failing
        // append aborts the batch before any row changes.
        self.interceptor
            .capture(self.actor.as_ref(), &observed)
            .await?;

        let change_count = staged.len();
        for change in staged {
            let key: RowKey = (change.kind, change.entity_id);
            match change.op {
                StagedOp::Insert | StagedOp::Update => {
                    if let Some(payload) = change.payload {
                        rows.insert(key, payload);
                    }
                }
                StagedOp::Delete => {
                    rows.remove(&key);
                }
            }
        }

        debug!(changes = change_count, "committed unit of work");
        Ok(())
    }
}

/// Typed repository handle over one unit of work.
pub struct MemoryRepository<E: Entity> {
    unit: Arc<MemoryUnitOfWork>,
    _marker: PhantomData<E>,
}

impl<E: Entity> Clone for MemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            unit: Arc::clone(&self.unit),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    fn decode(fields: &FieldMap) -> AppResult<E> {
        let object: serde_json::Map<String, Value> = fields.clone().into_iter().collect();
        serde_json::from_value(Value::Object(object)).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode stored {} row: {error}",
                E::kind()
            ))
        })
    }

    /// Decodes every committed row of this kind, soft-deleted rows included.
    async fn load_kind(&self) -> AppResult<Vec<E>> {
        let rows = self.unit.store.rows.read().await;
        rows.iter()
            .filter(|((kind, _), _)| *kind == E::kind())
            .map(|(_, fields)| Self::decode(fields))
            .collect()
    }

    async fn stage_write(&self, entity: &E, op: StagedOp) -> AppResult<()> {
        let payload = match op {
            StagedOp::Insert | StagedOp::Update => Some(entity.field_snapshot()?),
            StagedOp::Delete => None,
        };

        self.unit
            .stage(StagedChange {
                kind: E::kind(),
                entity_id: entity.entity_id(),
                op,
                payload,
            })
            .await;
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn get(&self, entity_id: &str) -> AppResult<Option<E>> {
        let rows = self.unit.store.rows.read().await;
        let Some(fields) = rows.get(&(E::kind(), entity_id.to_owned())) else {
            return Ok(None);
        };

        let entity = Self::decode(fields)?;
        Ok((!entity.soft_deleted()).then_some(entity))
    }

    async fn list_all(&self) -> AppResult<Vec<E>> {
        let mut listed: Vec<E> = self
            .load_kind()
            .await?
            .into_iter()
            .filter(|entity| !entity.soft_deleted())
            .collect();
        listed.sort_by_key(|entity| entity.entity_id());
        Ok(listed)
    }

    async fn list(&self, spec: &Specification<E>) -> AppResult<Vec<E>> {
        let mut listed: Vec<E> = self
            .load_kind()
            .await?
            .into_iter()
            .filter(|entity| spec.matches(entity))
            .collect();

        // Includes need no work here: in-memory rows already hold the full
        // entity state.
        listed.sort_by_key(|entity| entity.entity_id());
        if let Some(order) = spec.order() {
            listed.sort_by(|left, right| order.compare(left, right));
        }

        if spec.paging_enabled() {
            listed = listed
                .into_iter()
                .skip(spec.skip())
                .take(spec.take())
                .collect();
        }

        Ok(listed)
    }

    async fn count(&self, spec: &Specification<E>) -> AppResult<usize> {
        Ok(self
            .load_kind()
            .await?
            .iter()
            .filter(|entity| spec.matches(entity))
            .count())
    }

    async fn create(&self, entity: E) -> AppResult<()> {
        self.stage_write(&entity, StagedOp::Insert).await
    }

    async fn create_many(&self, entities: Vec<E>) -> AppResult<()> {
        for entity in &entities {
            self.stage_write(entity, StagedOp::Insert).await?;
        }
        Ok(())
    }

    async fn update(&self, entity: E) -> AppResult<()> {
        self.stage_write(&entity, StagedOp::Update).await
    }

    async fn delete(&self, entity: &E) -> AppResult<()> {
        self.stage_write(entity, StagedOp::Delete).await
    }

    async fn save_changes(&self) -> AppResult<()> {
        self.unit.save_changes().await
    }
}

#[async_trait]
impl<E: Entity + SoftDeletable> SoftDeleteRepository<E> for MemoryRepository<E> {
    async fn soft_delete(&self, entity_id: &str) -> AppResult<()> {
        let mut entity = self.require_raw(entity_id).await?;
        entity.set_soft_deleted(true);
        self.stage_write(&entity, StagedOp::Update).await
    }

    async fn restore(&self, entity_id: &str) -> AppResult<()> {
        let mut entity = self.require_raw(entity_id).await?;
        entity.set_soft_deleted(false);
        self.stage_write(&entity, StagedOp::Update).await
    }
}

impl<E: Entity> MemoryRepository<E> {
    /// Reads a committed row regardless of its tombstone flag.
    async fn require_raw(&self, entity_id: &str) -> AppResult<E> {
        let rows = self.unit.store.rows.read().await;
        let fields = rows
            .get(&(E::kind(), entity_id.to_owned()))
            .ok_or_else(|| {
                AppError::NotFound(format!("{} '{}' does not exist", E::kind(), entity_id))
            })?;
        Self::decode(fields)
    }
}
