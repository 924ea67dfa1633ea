use std::str::FromStr;

use chrono::{DateTime, Utc};
use pawtrail_core::AppError;
use serde::{Deserialize, Serialize};

use crate::entity::FieldMap;

/// Action recorded for one observed entity mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A new row was inserted.
    Created,
    /// An existing row changed state.
    Modified,
    /// A row was physically removed.
    Deleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created" => Ok(Self::Created),
            "modified" => Ok(Self::Modified),
            "deleted" => Ok(Self::Deleted),
            _ => Err(AppError::Validation(format!(
                "unknown audit action value '{value}'"
            ))),
        }
    }
}

/// Immutable record of one observed mutation of a tracked entity.
///
/// Records are created exactly once per mutation and owned by the audit
/// store; this core never updates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Stable entity-kind name.
    pub entity_kind: String,
    /// Stringified primary identifier of the mutated entity.
    pub entity_id: String,
    /// Observed mutation kind.
    pub action: AuditAction,
    /// Subject that performed the action, or the system sentinel.
    pub actor_subject: String,
    /// Field snapshot before the mutation; absent for Created.
    pub before: Option<FieldMap>,
    /// Field snapshot after the mutation; absent for Deleted.
    pub after: Option<FieldMap>,
    /// Instant the record was captured.
    pub recorded_at: DateTime<Utc>,
    /// Optional human-readable detail.
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::AuditAction;

    #[test]
    fn action_round_trips_storage_value() {
        let action = AuditAction::Modified;
        let restored = AuditAction::from_str(action.as_str());
        assert_eq!(restored.unwrap_or(AuditAction::Created), action);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let parsed = AuditAction::from_str("archived");
        assert!(parsed.is_err());
    }
}
