use pawtrail_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;

/// An adopter registered with the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    owner_id: Uuid,
    full_name: NonEmptyString,
    email: Option<String>,
    city: Option<String>,
}

impl Owner {
    /// Creates a new adopter record with a fresh identifier.
    pub fn new(
        full_name: impl Into<String>,
        email: Option<String>,
        city: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            owner_id: Uuid::new_v4(),
            full_name: NonEmptyString::new(full_name)?,
            email,
            city,
        })
    }

    /// Returns the stable owner identifier.
    #[must_use]
    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    /// Returns the full display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Returns the contact email, if one was provided.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the city, if one was provided.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }
}

impl Entity for Owner {
    fn kind() -> &'static str {
        "owner"
    }

    fn entity_id(&self) -> String {
        self.owner_id.to_string()
    }
}
