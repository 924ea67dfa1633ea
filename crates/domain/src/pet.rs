use chrono::{DateTime, Utc};
use pawtrail_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Entity, SoftDeletable};

/// A pet listed in the adoption catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pet_id: Uuid,
    name: NonEmptyString,
    breed: NonEmptyString,
    age_months: u32,
    owner_id: Option<Uuid>,
    is_deleted: bool,
    listed_at: DateTime<Utc>,
}

impl Pet {
    /// Creates a new catalog listing with a fresh identifier.
    pub fn new(
        name: impl Into<String>,
        breed: impl Into<String>,
        age_months: u32,
    ) -> AppResult<Self> {
        Ok(Self {
            pet_id: Uuid::new_v4(),
            name: NonEmptyString::new(name)?,
            breed: NonEmptyString::new(breed)?,
            age_months,
            owner_id: None,
            is_deleted: false,
            listed_at: Utc::now(),
        })
    }

    /// Returns the stable pet identifier.
    #[must_use]
    pub fn pet_id(&self) -> Uuid {
        self.pet_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the breed label.
    #[must_use]
    pub fn breed(&self) -> &str {
        self.breed.as_str()
    }

    /// Returns the age in months.
    #[must_use]
    pub fn age_months(&self) -> u32 {
        self.age_months
    }

    /// Returns the owning adopter, if the pet has been adopted.
    #[must_use]
    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    /// Returns the tombstone flag.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the instant the pet was listed.
    #[must_use]
    pub fn listed_at(&self) -> DateTime<Utc> {
        self.listed_at
    }

    /// Renames the pet.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::new(name)?;
        Ok(())
    }

    /// Links the pet to its adopter.
    pub fn assign_owner(&mut self, owner_id: Uuid) {
        self.owner_id = Some(owner_id);
    }
}

impl Entity for Pet {
    fn kind() -> &'static str {
        "pet"
    }

    fn entity_id(&self) -> String {
        self.pet_id.to_string()
    }

    fn soft_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl SoftDeletable for Pet {
    fn set_soft_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
}

#[cfg(test)]
mod tests {
    use pawtrail_core::AppResult;
    use serde_json::Value;

    use crate::entity::Entity;

    use super::Pet;

    #[test]
    fn new_pet_rejects_blank_name() {
        let pet = Pet::new("  ", "Persian", 4);
        assert!(pet.is_err());
    }

    #[test]
    fn snapshot_is_a_flat_field_map() -> AppResult<()> {
        let pet = Pet::new("Misu", "Siamese", 7)?;
        let snapshot = pet.field_snapshot()?;

        assert_eq!(
            snapshot.get("name"),
            Some(&Value::String("Misu".to_owned()))
        );
        assert_eq!(snapshot.get("is_deleted"), Some(&Value::Bool(false)));
        assert!(snapshot.contains_key("listed_at"));
        Ok(())
    }

    #[test]
    fn snapshot_round_trips_through_serde() -> AppResult<()> {
        let pet = Pet::new("Luna", "Persian", 12)?;
        let encoded = serde_json::to_value(&pet).unwrap_or(Value::Null);
        let decoded: Result<Pet, _> = serde_json::from_value(encoded);
        assert_eq!(decoded.ok().as_ref(), Some(&pet));
        Ok(())
    }
}
