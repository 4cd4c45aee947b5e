pub use crate::app::App;
pub use crate::extract::{Auth, BearerToken, IdParam, OptionalAuth, ValidJson, ValidQuery};
pub use fieldstore_types::prelude::*;
pub use fieldstore_types::types::ApiResponse;

// vim: ts=4
