use std::collections::BTreeMap;

use pawtrail_core::{AppError, AppResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Flat field-name to value snapshot of one entity instance.
pub type FieldMap = BTreeMap<String, Value>;

/// A persistable entity kind with a stable name, identifier, and snapshot.
///
/// The snapshot is the serialized form stored by adapters and captured by the
/// change-audit pipeline; it must round-trip through serde.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable entity-kind name used in storage keys and audit records.
    fn kind() -> &'static str;

    /// Stringified primary identifier.
    fn entity_id(&self) -> String;

    /// Tombstone flag; kinds without soft delete always report false.
    fn soft_deleted(&self) -> bool {
        false
    }

    /// Serializes the entity into a flat field map.
    fn field_snapshot(&self) -> AppResult<FieldMap> {
        let value = serde_json::to_value(self).map_err(|error| {
            AppError::Internal(format!(
                "failed to snapshot fields of {} entity: {error}",
                Self::kind()
            ))
        })?;

        match value {
            Value::Object(fields) => Ok(fields.into_iter().collect()),
            _ => Err(AppError::Internal(format!(
                "entity kind '{}' does not serialize to an object",
                Self::kind()
            ))),
        }
    }
}

/// Entity kinds that support tombstone deletion and restore.
pub trait SoftDeletable: Entity {
    /// Sets or clears the tombstone flag.
    fn set_soft_deleted(&mut self, deleted: bool);
}
