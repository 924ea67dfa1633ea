use async_trait::async_trait;
use pawtrail_application::{AuditTrail, AuditTrailQuery};
use pawtrail_core::AppResult;
use pawtrail_domain::AuditRecord;
use tokio::sync::RwLock;

/// In-memory append-only audit trail.
///
/// Shares the process durability domain with [`crate::MemoryStore`], so a
/// record appended inside a unit of work is exactly as durable as the
/// business rows it describes.
#[derive(Debug, Default)]
pub struct InMemoryAuditTrail {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditTrail {
    /// Creates an empty audit trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditTrail for InMemoryAuditTrail {
    async fn append(&self, record: AuditRecord) -> AppResult<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn recent(&self, query: AuditTrailQuery) -> AppResult<Vec<AuditRecord>> {
        let capped_limit = query.limit.clamp(1, 200);
        let capped_offset = query.offset.min(5_000);
        let records = self.records.read().await;

        Ok(records
            .iter()
            .rev()
            .filter(|record| {
                query
                    .entity_kind
                    .as_deref()
                    .is_none_or(|kind| record.entity_kind == kind)
                    && query
                        .entity_id
                        .as_deref()
                        .is_none_or(|id| record.entity_id == id)
                    && query
                        .actor_subject
                        .as_deref()
                        .is_none_or(|subject| record.actor_subject == subject)
            })
            .skip(capped_offset)
            .take(capped_limit)
            .cloned()
            .collect())
    }
}
