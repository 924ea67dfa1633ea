//! Query specifications, persistence ports, and change auditing for Pawtrail.

#![forbid(unsafe_code)]

mod catalog_filters;
mod change_audit;
mod query;
mod store_ports;

pub use catalog_filters::{AdoptionFilter, OwnerFilter, PetFilter};
pub use change_audit::{ChangeAuditInterceptor, ObservedChange};
pub use query::{DEFAULT_PAGE_SIZE, OrderKey, Predicate, SortDirection, SortValue, Specification};
pub use store_ports::{
    AuditAllowList, AuditTrail, AuditTrailQuery, Repository, SoftDeleteRepository,
};
