//! Core infrastructure for Fieldstore.
//!
//! Holds the shared application state, the request extractors, the
//! authorization gate and the route access layer built on it. Feature crates
//! depend on this crate instead of on the server crate so they can be built in
//! parallel.

#![forbid(unsafe_code)]

pub mod app;
pub mod extract;
pub mod gate;
pub mod middleware;
pub mod prelude;

pub use app::{App, AppBuilderOpts, AppState};
pub use extract::{Auth, BearerToken, IdParam, OptionalAuth, ValidJson, ValidQuery};
pub use middleware::Access;

// vim: ts=4
