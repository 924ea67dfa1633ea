use std::sync::Arc;

use chrono::Utc;
use pawtrail_core::{ActorIdentity, AppResult};
use pawtrail_domain::{AuditAction, AuditRecord, FieldMap};

use crate::store_ports::{AuditAllowList, AuditTrail};

/// One staged mutation observed at commit time.
///
/// The before snapshot is the row state immediately preceding this change,
/// earlier changes in the same batch included; the after snapshot is the
/// staged state. Created changes carry no before and Deleted changes carry
/// no after.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedChange {
    /// Stable entity-kind name of the staged row.
    pub entity_kind: String,
    /// Stringified primary identifier.
    pub entity_id: String,
    /// Staged change kind.
    pub action: AuditAction,
    /// Field snapshot before the mutation.
    pub before: Option<FieldMap>,
    /// Field snapshot after the mutation.
    pub after: Option<FieldMap>,
}

/// Captures audit records for the tracked subset of one commit's changes.
///
/// The store's commit path invokes [`ChangeAuditInterceptor::capture`]
/// synchronously before the physical commit; every emission must succeed for
/// the commit to proceed. This trades availability for traceability: a
/// failing audit store makes tracked writes fail rather than go unrecorded.
#[derive(Clone)]
pub struct ChangeAuditInterceptor {
    allow_list: Arc<AuditAllowList>,
    audit_trail: Arc<dyn AuditTrail>,
}

impl ChangeAuditInterceptor {
    /// Creates an interceptor from the allow-list and audit trail port.
    #[must_use]
    pub fn new(allow_list: Arc<AuditAllowList>, audit_trail: Arc<dyn AuditTrail>) -> Self {
        Self {
            allow_list,
            audit_trail,
        }
    }

    /// Appends one audit record per tracked, changed entity in the batch.
    ///
    /// Untracked kinds are skipped entirely. Modified changes whose before
    /// and after snapshots are identical are not recorded. Any append
    /// failure propagates and must abort the surrounding commit.
    ///
    /// Records are appended one at a time, not transactionally. When the
    /// trail lives in a different durability domain than the business store,
    /// a failure partway through leaves the already-appended records in
    /// place even though the commit they describe is aborted; readers should
    /// treat the trail as at-least-once.
    pub async fn capture(
        &self,
        actor: Option<&ActorIdentity>,
        changes: &[ObservedChange],
    ) -> AppResult<()> {
        let system = ActorIdentity::system();
        let subject = actor.unwrap_or(&system).subject();

        for change in changes {
            if !self.allow_list.tracks(change.entity_kind.as_str()) {
                continue;
            }

            if change.action == AuditAction::Modified && change.before == change.after {
                continue;
            }

            let record = AuditRecord {
                entity_kind: change.entity_kind.clone(),
                entity_id: change.entity_id.clone(),
                action: change.action,
                actor_subject: subject.to_owned(),
                before: change.before.clone(),
                after: change.after.clone(),
                recorded_at: Utc::now(),
                detail: Some(format!(
                    "{} {} '{}'",
                    change.action.as_str(),
                    change.entity_kind,
                    change.entity_id
                )),
            };

            self.audit_trail.append(record).await?;
        }

        Ok(())
    }
}
