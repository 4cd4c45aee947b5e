pub use fieldstore_core::prelude::*;

// vim: ts=4
