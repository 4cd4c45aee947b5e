use std::{env, path, process::ExitCode, sync::Arc};

use fieldstore::app::AppBuilder;
use fieldstore::auth_adapter::ACCESS_TOKEN_EXPIRY;
use fieldstore::prelude::*;
use fieldstore::worker::WorkerPool;
use fieldstore_auth_adapter_sqlite::{AuthAdapterOpts, AuthAdapterSqlite};
use fieldstore_field_adapter_sqlite::FieldAdapterSqlite;

pub struct Config {
	pub listen: String,
	pub db_dir: path::PathBuf,
	pub jwt_secret: Option<String>,
	pub token_expiry: i64,
	pub admin_user: Option<String>,
	pub admin_password: Option<String>,
}

impl Config {
	fn from_env() -> ClResult<Self> {
		let token_expiry = match env::var("TOKEN_EXPIRY") {
			Ok(value) => match value.parse::<i64>() {
				Ok(secs) if secs > 0 => secs,
				_ => {
					return Err(Error::ConfigError(format!(
						"TOKEN_EXPIRY must be a positive number of seconds, got {:?}",
						value
					)));
				}
			},
			Err(_) => ACCESS_TOKEN_EXPIRY,
		};

		Ok(Config {
			listen: env::var("LISTEN").unwrap_or("127.0.0.1:8080".to_string()),
			db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or("./data".to_string())),
			jwt_secret: env::var("JWT_SECRET").ok(),
			token_expiry,
			admin_user: env::var("ADMIN_USER").ok(),
			admin_password: env::var("ADMIN_PASSWORD").ok(),
		})
	}
}

async fn run() -> ClResult<()> {
	// Installs the tracing subscriber, so it comes first
	let mut builder = AppBuilder::new();
	let config = Config::from_env()?;

	let worker = Arc::new(WorkerPool::new(1, 2));
	let auth_adapter = AuthAdapterSqlite::new_with_opts(
		worker,
		&config.db_dir,
		AuthAdapterOpts {
			jwt_secret: config.jwt_secret.map(Into::into),
			token_expiry: config.token_expiry,
		},
	)
	.await?;
	let field_adapter = FieldAdapterSqlite::new(&config.db_dir).await?;

	builder
		.listen(config.listen)
		.auth_adapter(Arc::new(auth_adapter))
		.field_adapter(Arc::new(field_adapter));

	match (config.admin_user, config.admin_password) {
		(Some(user), Some(password)) => {
			builder.admin_user(user, password);
		}
		(None, None) => {}
		_ => warn!("ADMIN_USER and ADMIN_PASSWORD must both be set, ignoring"),
	}

	builder.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
	match run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
