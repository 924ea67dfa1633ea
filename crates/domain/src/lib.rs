//! Domain model for the Pawtrail adoption catalog.

#![forbid(unsafe_code)]

mod adoption;
mod audit;
mod entity;
mod owner;
mod pet;

pub use adoption::{Adoption, AdoptionStatus};
pub use audit::{AuditAction, AuditRecord};
pub use entity::{Entity, FieldMap, SoftDeletable};
pub use owner::Owner;
pub use pet::Pet;
