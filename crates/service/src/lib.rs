//! Service layer providing the account and authentication business logic.
//! - Separates business logic from data access.
//! - Reuses the entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
