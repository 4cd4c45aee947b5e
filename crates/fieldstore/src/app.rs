//! App builder - constructs and runs the Fieldstore application

use std::sync::Arc;

use axum::Router;

use crate::auth_adapter::AuthAdapter;
use crate::field_adapter::FieldAdapter;
use crate::prelude::*;
use crate::{bootstrap, routes};
pub use fieldstore_core::app::{App, AppBuilderOpts, AppState, VERSION};

pub struct AppBuilder {
	opts: AppBuilderOpts,
	auth_adapter: Option<Arc<dyn AuthAdapter>>,
	field_adapter: Option<Arc<dyn FieldAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// Fails only when a subscriber is already installed (several apps in one test binary)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();

		AppBuilder {
			opts: AppBuilderOpts::default(),
			auth_adapter: None,
			field_adapter: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn admin_user(
		&mut self,
		username: impl Into<Box<str>>,
		password: impl Into<Box<str>>,
	) -> &mut Self {
		self.opts.admin_user = Some(username.into());
		self.opts.admin_password = Some(password.into());
		self
	}

	// Adapters
	pub fn auth_adapter(&mut self, auth_adapter: Arc<dyn AuthAdapter>) -> &mut Self {
		self.auth_adapter = Some(auth_adapter);
		self
	}
	pub fn field_adapter(&mut self, field_adapter: Arc<dyn FieldAdapter>) -> &mut Self {
		self.field_adapter = Some(field_adapter);
		self
	}

	/// Create the app state, run the bootstrapper and build the router
	pub async fn build(self) -> ClResult<(App, Router)> {
		let Some(auth_adapter) = self.auth_adapter else {
			error!("FATAL: No auth adapter configured");
			return Err(Error::ConfigError("No auth adapter configured".to_string()));
		};
		let Some(field_adapter) = self.field_adapter else {
			error!("FATAL: No field adapter configured");
			return Err(Error::ConfigError("No field adapter configured".to_string()));
		};

		let app: App = Arc::new(AppState { opts: self.opts, auth_adapter, field_adapter });

		bootstrap::bootstrap(&app).await.map_err(|err| {
			error!("FATAL: Bootstrap failed: {}", err);
			err
		})?;

		let router = routes::init(app.clone());
		Ok((app, router))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("Fieldstore V{}", VERSION);

		let (app, router) = self.build().await?;

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await?;
		info!("Listening on HTTP {}", app.opts.listen);
		axum::serve(listener, router).await?;

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
