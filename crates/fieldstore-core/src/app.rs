//! App state type

use std::sync::Arc;

use fieldstore_types::auth_adapter::AuthAdapter;
use fieldstore_types::field_adapter::FieldAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,

	pub auth_adapter: Arc<dyn AuthAdapter>,
	pub field_adapter: Arc<dyn FieldAdapter>,
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	/// Admin account ensured at startup (username, password)
	pub admin_user: Option<Box<str>>,
	pub admin_password: Option<Box<str>>,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self { listen: "127.0.0.1:8080".into(), admin_user: None, admin_password: None }
	}
}

// vim: ts=4
