use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pawtrail_application::{AuditTrail, AuditTrailQuery};
use pawtrail_core::{AppError, AppResult};
use pawtrail_domain::{AuditAction, AuditRecord, FieldMap};
use sqlx::{FromRow, PgPool};
use tracing::warn;

/// PostgreSQL-backed append-only audit trail over `audit_trail_records`.
///
/// Field snapshots are stored JSON-encoded as text; callers that need the
/// same durability domain as the business rows should run inside the same
/// database. Appends made here are not rolled back when the surrounding
/// commit aborts, so a mid-batch failure can leave records for mutations
/// that were never applied.
#[derive(Clone)]
pub struct PostgresAuditTrail {
    pool: PgPool,
}

impl PostgresAuditTrail {
    /// Creates an audit trail with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditTrailRow {
    entity_kind: String,
    entity_id: String,
    action: String,
    actor_subject: String,
    before_fields: Option<String>,
    after_fields: Option<String>,
    detail: Option<String>,
    recorded_at: DateTime<Utc>,
}

fn encode_fields(fields: Option<&FieldMap>) -> AppResult<Option<String>> {
    fields
        .map(|fields| {
            serde_json::to_string(fields).map_err(|error| {
                AppError::Internal(format!("failed to encode audit field snapshot: {error}"))
            })
        })
        .transpose()
}

fn decode_fields(encoded: Option<&str>) -> AppResult<Option<FieldMap>> {
    encoded
        .map(|encoded| {
            serde_json::from_str(encoded).map_err(|error| {
                AppError::Internal(format!("failed to decode audit field snapshot: {error}"))
            })
        })
        .transpose()
}

#[async_trait]
impl AuditTrail for PostgresAuditTrail {
    async fn append(&self, record: AuditRecord) -> AppResult<()> {
        let before = encode_fields(record.before.as_ref())?;
        let after = encode_fields(record.after.as_ref())?;

        sqlx::query(
            r#"
            INSERT INTO audit_trail_records (
                entity_kind,
                entity_id,
                action,
                actor_subject,
                before_fields,
                after_fields,
                detail,
                recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.entity_kind)
        .bind(record.entity_id)
        .bind(record.action.as_str())
        .bind(record.actor_subject)
        .bind(before)
        .bind(after)
        .bind(record.detail)
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            warn!(%error, "audit trail append failed");
            AppError::Internal(format!("failed to append audit record: {error}"))
        })?;

        Ok(())
    }

    async fn recent(&self, query: AuditTrailQuery) -> AppResult<Vec<AuditRecord>> {
        let capped_limit = query.limit.clamp(1, 200) as i64;
        let capped_offset = query.offset.min(5_000) as i64;

        let rows = sqlx::query_as::<_, AuditTrailRow>(
            r#"
            SELECT
                entity_kind,
                entity_id,
                action,
                actor_subject,
                before_fields,
                after_fields,
                detail,
                recorded_at
            FROM audit_trail_records
            WHERE ($1::TEXT IS NULL OR entity_kind = $1)
                AND ($2::TEXT IS NULL OR entity_id = $2)
                AND ($3::TEXT IS NULL OR actor_subject = $3)
            ORDER BY recorded_at DESC
            LIMIT $4
            OFFSET $5
            "#,
        )
        .bind(query.entity_kind)
        .bind(query.entity_id)
        .bind(query.actor_subject)
        .bind(capped_limit)
        .bind(capped_offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list audit records: {error}")))?;

        rows.into_iter()
            .map(|row| {
                Ok(AuditRecord {
                    action: AuditAction::from_str(row.action.as_str()).map_err(|_| {
                        AppError::Internal(format!(
                            "stored audit action '{}' is not recognized",
                            row.action
                        ))
                    })?,
                    entity_kind: row.entity_kind,
                    entity_id: row.entity_id,
                    actor_subject: row.actor_subject,
                    before: decode_fields(row.before_fields.as_deref())?,
                    after: decode_fields(row.after_fields.as_deref())?,
                    recorded_at: row.recorded_at,
                    detail: row.detail,
                })
            })
            .collect()
    }
}
