//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_trail;
mod memory_store;
mod postgres_audit_trail;

pub use in_memory_audit_trail::InMemoryAuditTrail;
pub use memory_store::{MemoryRepository, MemoryStore, MemoryUnitOfWork};
pub use postgres_audit_trail::PostgresAuditTrail;
