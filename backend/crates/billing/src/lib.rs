//! Billing Backend Module
//!
//! Ownership-scoped invoicing resources: clients, products, invoices
//! and expenses, plus their dashboard aggregates.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every query is scoped to the authenticated user; a resource owned by
//! someone else answers 404, never 403. Monetary amounts are integer
//! minor units; rates are basis points.

pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{BillingError, BillingResult};
pub use infra::postgres::PgBillingRepository;
pub use presentation::router::billing_router;

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::postgres::PgBillingRepository as BillingStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

#[cfg(test)]
mod tests;
