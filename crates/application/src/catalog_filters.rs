//! Per-entity filter values and their specification constructors.
//!
//! Construction is deterministic and order-independent across filter fields,
//! never fails for well-typed input, and silently ignores unknown sort
//! tokens.

use pawtrail_domain::{Adoption, AdoptionStatus, Owner, Pet};
use uuid::Uuid;

use crate::query::{OrderKey, Predicate, SortDirection, SortValue, Specification};

fn normalized(value: Option<String>) -> Option<String> {
    let value = value?.trim().to_lowercase();
    (!value.is_empty()).then_some(value)
}

fn direction(descending: bool) -> SortDirection {
    if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

/// Filter input for pet catalog queries.
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    /// Case-insensitive substring match on the pet name.
    pub name: Option<String>,
    /// Case-insensitive equality match on the breed.
    pub breed: Option<String>,
    /// Exact match on the owning adopter.
    pub owner_id: Option<Uuid>,
    /// Include tombstoned rows in results.
    pub include_deleted: bool,
    /// One-based page number; values below one select the first page.
    pub page_number: i64,
    /// Page size; non-positive values fall back to the default.
    pub page_size: i64,
    /// Sortable field token, matched case-insensitively.
    pub sort_by: Option<String>,
    /// Sort direction for the requested field.
    pub sort_descending: bool,
}

impl PetFilter {
    /// Builds the pet specification for this filter.
    #[must_use]
    pub fn into_specification(self) -> Specification<Pet> {
        let mut spec = Specification::new().include("owner");

        if !self.include_deleted {
            spec = spec.filter(Predicate::from_fn(|pet: &Pet| !pet.is_deleted()));
        }

        if let Some(name) = normalized(self.name) {
            spec = spec.filter(Predicate::from_fn(move |pet: &Pet| {
                pet.name().to_lowercase().contains(name.as_str())
            }));
        }

        if let Some(breed) = normalized(self.breed) {
            spec = spec.filter(Predicate::from_fn(move |pet: &Pet| {
                pet.breed().to_lowercase() == breed
            }));
        }

        if let Some(owner_id) = self.owner_id {
            spec = spec.filter(Predicate::from_fn(move |pet: &Pet| {
                pet.owner_id() == Some(owner_id)
            }));
        }

        if let Some(order) = pet_order_key(self.sort_by.as_deref(), self.sort_descending) {
            spec = spec.order_by(order);
        }

        spec.paged(self.page_number, self.page_size)
    }
}

fn pet_order_key(sort_by: Option<&str>, descending: bool) -> Option<OrderKey<Pet>> {
    let token = sort_by?.trim().to_lowercase();
    let direction = direction(descending);

    match token.as_str() {
        "name" => Some(OrderKey::new(
            |pet: &Pet| SortValue::text(pet.name()),
            direction,
        )),
        "breed" => Some(OrderKey::new(
            |pet: &Pet| SortValue::text(pet.breed()),
            direction,
        )),
        "age" => Some(OrderKey::new(
            |pet: &Pet| SortValue::Integer(i64::from(pet.age_months())),
            direction,
        )),
        "listed" | "listed_at" => Some(OrderKey::new(
            |pet: &Pet| SortValue::Timestamp(pet.listed_at()),
            direction,
        )),
        _ => None,
    }
}

/// Filter input for adopter queries.
#[derive(Debug, Clone, Default)]
pub struct OwnerFilter {
    /// Case-insensitive substring match on the full name.
    pub name: Option<String>,
    /// Case-insensitive equality match on the city.
    pub city: Option<String>,
    /// One-based page number; values below one select the first page.
    pub page_number: i64,
    /// Page size; non-positive values fall back to the default.
    pub page_size: i64,
    /// Sortable field token, matched case-insensitively.
    pub sort_by: Option<String>,
    /// Sort direction for the requested field.
    pub sort_descending: bool,
}

impl OwnerFilter {
    /// Builds the owner specification for this filter.
    #[must_use]
    pub fn into_specification(self) -> Specification<Owner> {
        let mut spec = Specification::new();

        if let Some(name) = normalized(self.name) {
            spec = spec.filter(Predicate::from_fn(move |owner: &Owner| {
                owner.full_name().to_lowercase().contains(name.as_str())
            }));
        }

        if let Some(city) = normalized(self.city) {
            spec = spec.filter(Predicate::from_fn(move |owner: &Owner| {
                owner
                    .city()
                    .is_some_and(|value| value.to_lowercase() == city)
            }));
        }

        if let Some(order) = owner_order_key(self.sort_by.as_deref(), self.sort_descending) {
            spec = spec.order_by(order);
        }

        spec.paged(self.page_number, self.page_size)
    }
}

fn owner_order_key(sort_by: Option<&str>, descending: bool) -> Option<OrderKey<Owner>> {
    let token = sort_by?.trim().to_lowercase();
    let direction = direction(descending);

    match token.as_str() {
        "name" => Some(OrderKey::new(
            |owner: &Owner| SortValue::text(owner.full_name()),
            direction,
        )),
        "city" => Some(OrderKey::new(
            |owner: &Owner| SortValue::text(owner.city().unwrap_or_default()),
            direction,
        )),
        _ => None,
    }
}

/// Filter input for adoption request queries.
#[derive(Debug, Clone, Default)]
pub struct AdoptionFilter {
    /// Exact match on the adopted pet.
    pub pet_id: Option<Uuid>,
    /// Exact match on the adopter.
    pub owner_id: Option<Uuid>,
    /// Exact match on the lifecycle status.
    pub status: Option<AdoptionStatus>,
    /// One-based page number; values below one select the first page.
    pub page_number: i64,
    /// Page size; non-positive values fall back to the default.
    pub page_size: i64,
    /// Sortable field token, matched case-insensitively.
    pub sort_by: Option<String>,
    /// Sort direction for the requested field.
    pub sort_descending: bool,
}

impl AdoptionFilter {
    /// Builds the adoption specification for this filter.
    ///
    /// Adoptions declare a most-recent-first default order used whenever the
    /// sort token is absent or unknown.
    #[must_use]
    pub fn into_specification(self) -> Specification<Adoption> {
        let mut spec = Specification::new().include("pet").include("owner");

        if let Some(pet_id) = self.pet_id {
            spec = spec.filter(Predicate::from_fn(move |adoption: &Adoption| {
                adoption.pet_id() == pet_id
            }));
        }

        if let Some(owner_id) = self.owner_id {
            spec = spec.filter(Predicate::from_fn(move |adoption: &Adoption| {
                adoption.owner_id() == owner_id
            }));
        }

        if let Some(status) = self.status {
            spec = spec.filter(Predicate::from_fn(move |adoption: &Adoption| {
                adoption.status() == status
            }));
        }

        let order = adoption_order_key(self.sort_by.as_deref(), self.sort_descending)
            .unwrap_or_else(|| {
                OrderKey::descending(|adoption: &Adoption| {
                    SortValue::Timestamp(adoption.requested_at())
                })
            });

        spec.order_by(order).paged(self.page_number, self.page_size)
    }
}

fn adoption_order_key(sort_by: Option<&str>, descending: bool) -> Option<OrderKey<Adoption>> {
    let token = sort_by?.trim().to_lowercase();
    let direction = direction(descending);

    match token.as_str() {
        "requested" | "requested_at" => Some(OrderKey::new(
            |adoption: &Adoption| SortValue::Timestamp(adoption.requested_at()),
            direction,
        )),
        "fee" => Some(OrderKey::new(
            |adoption: &Adoption| SortValue::Integer(adoption.fee_cents()),
            direction,
        )),
        _ => None,
    }
}
