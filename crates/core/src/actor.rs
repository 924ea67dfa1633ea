use serde::{Deserialize, Serialize};

/// Subject recorded when no caller identity is bound to a unit of work.
pub const SYSTEM_SUBJECT: &str = "system";

/// Identity of the caller acting inside one unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    subject: String,
}

impl ActorIdentity {
    /// Creates an identity from the stable subject claim of the caller.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Returns the sentinel identity used by background jobs and migrations.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SYSTEM_SUBJECT)
    }

    /// Returns the stable subject claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns whether this is the sentinel system identity.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.subject == SYSTEM_SUBJECT
    }
}
