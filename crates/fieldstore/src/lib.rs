//! Fieldstore is a multi-tenant custom fields service.
//!
//! Administrators define typed attributes (text, number, date, dropdown,
//! boolean) at runtime and attach values of them to arbitrary entities
//! identified by an integer id. Values are validated against their
//! definition's type and stored in canonical form. Mutating operations are
//! restricted to the `admin` role.

// Re-export shared types and adapter traits from fieldstore-types
pub use fieldstore_types::auth_adapter;
pub use fieldstore_types::error;
pub use fieldstore_types::field_adapter;
pub use fieldstore_types::types;
pub use fieldstore_types::worker;

// Feature crate re-exports
pub use fieldstore_auth as auth;
pub use fieldstore_core::gate;
pub use fieldstore_field as field;

// Local modules
pub mod app;
pub mod bootstrap;
pub mod prelude;
pub mod routes;

// vim: ts=4
