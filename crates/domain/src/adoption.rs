use chrono::{DateTime, Utc};
use pawtrail_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;

/// Lifecycle state of an adoption request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
    /// Request received, pet still listed.
    Requested,
    /// Adoption finalized.
    Completed,
    /// Request withdrawn or rejected.
    Cancelled,
}

impl AdoptionStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// An adoption request linking a pet to an adopter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adoption {
    adoption_id: Uuid,
    pet_id: Uuid,
    owner_id: Uuid,
    fee_cents: i64,
    status: AdoptionStatus,
    requested_at: DateTime<Utc>,
}

impl Adoption {
    /// Creates a new adoption request with a fresh identifier.
    pub fn new(pet_id: Uuid, owner_id: Uuid, fee_cents: i64) -> AppResult<Self> {
        if fee_cents < 0 {
            return Err(AppError::Validation(
                "adoption fee must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            adoption_id: Uuid::new_v4(),
            pet_id,
            owner_id,
            fee_cents,
            status: AdoptionStatus::Requested,
            requested_at: Utc::now(),
        })
    }

    /// Returns the stable adoption identifier.
    #[must_use]
    pub fn adoption_id(&self) -> Uuid {
        self.adoption_id
    }

    /// Returns the adopted pet identifier.
    #[must_use]
    pub fn pet_id(&self) -> Uuid {
        self.pet_id
    }

    /// Returns the adopter identifier.
    #[must_use]
    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    /// Returns the adoption fee in cents.
    #[must_use]
    pub fn fee_cents(&self) -> i64 {
        self.fee_cents
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub fn status(&self) -> AdoptionStatus {
        self.status
    }

    /// Returns the instant the request was made.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Finalizes the adoption.
    pub fn complete(&mut self) -> AppResult<()> {
        if self.status != AdoptionStatus::Requested {
            return Err(AppError::Conflict(format!(
                "adoption '{}' is already {}",
                self.adoption_id,
                self.status.as_str()
            )));
        }

        self.status = AdoptionStatus::Completed;
        Ok(())
    }

    /// Withdraws the adoption request.
    pub fn cancel(&mut self) -> AppResult<()> {
        if self.status != AdoptionStatus::Requested {
            return Err(AppError::Conflict(format!(
                "adoption '{}' is already {}",
                self.adoption_id,
                self.status.as_str()
            )));
        }

        self.status = AdoptionStatus::Cancelled;
        Ok(())
    }
}

impl Entity for Adoption {
    fn kind() -> &'static str {
        "adoption"
    }

    fn entity_id(&self) -> String {
        self.adoption_id.to_string()
    }
}
