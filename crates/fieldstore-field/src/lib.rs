//! Custom fields: the definition registry, the value store and the validation
//! engine that turns raw input into canonical stored values.

#![forbid(unsafe_code)]

pub mod definition;
pub mod validate;
pub mod value;

mod prelude;

// vim: ts=4
