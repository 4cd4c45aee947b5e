//! Shared types, adapter traits, and core utilities for Fieldstore.
//!
//! This crate contains the foundational types that are shared between the
//! server crates and all adapter implementations. Keeping them apart lets the
//! adapter crates compile in parallel with the feature crates.

pub mod auth_adapter;
pub mod error;
pub mod field_adapter;
pub mod prelude;
pub mod types;
pub mod worker;

// vim: ts=4
