//! SQLite implementation of the Fieldstore `AuthAdapter`.
//!
//! Stores roles and users (with bcrypt password hashes) in `auth.db` and signs
//! HS256 access tokens with a secret that is either configured or generated on
//! first start and persisted in the `vars` table.

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use sqlx::sqlite::{self, SqlitePool};

use fieldstore_types::auth_adapter::{
	ACCESS_TOKEN_EXPIRY, AuthAdapter, AuthClaims, AuthLogin, Role, User,
};
use fieldstore_types::prelude::*;
use fieldstore_types::worker::WorkerPool;

mod auth;
mod crypto;
mod role;
mod schema;
mod user;
mod utils;

pub const DB_FILE: &str = "auth.db";

/// Construction options
#[derive(Debug, Clone)]
pub struct AuthAdapterOpts {
	/// Signing secret. Generated and persisted when `None`.
	pub jwt_secret: Option<Box<str>>,
	/// Access token lifetime in seconds
	pub token_expiry: i64,
}

impl Default for AuthAdapterOpts {
	fn default() -> Self {
		Self { jwt_secret: None, token_expiry: ACCESS_TOKEN_EXPIRY }
	}
}

pub struct AuthAdapterSqlite {
	db: SqlitePool,
	worker: Arc<WorkerPool>,
	jwt_secret_str: Box<str>,
	jwt_secret: DecodingKey,
	token_expiry: i64,
}

impl std::fmt::Debug for AuthAdapterSqlite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthAdapterSqlite").field("token_expiry", &self.token_expiry).finish()
	}
}

impl AuthAdapterSqlite {
	/// Open (or create) `auth.db` inside `db_dir` with default options
	pub async fn new(worker: Arc<WorkerPool>, db_dir: impl AsRef<Path>) -> ClResult<Self> {
		Self::new_with_opts(worker, db_dir, AuthAdapterOpts::default()).await
	}

	pub async fn new_with_opts(
		worker: Arc<WorkerPool>,
		db_dir: impl AsRef<Path>,
		opts: AuthAdapterOpts,
	) -> ClResult<Self> {
		tokio::fs::create_dir_all(db_dir.as_ref()).await?;

		let db_opts = sqlite::SqliteConnectOptions::new()
			.filename(db_dir.as_ref().join(DB_FILE))
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(db_opts)
			.await
			.inspect_err(utils::inspect)
			.or(Err(Error::DbError))?;

		schema::init_db(&db).await.inspect_err(utils::inspect).or(Err(Error::DbError))?;

		let jwt_secret_str: Box<str> = match opts.jwt_secret {
			Some(secret) if !secret.is_empty() => secret,
			Some(_) => return Err(Error::ConfigError("JWT secret must not be empty".into())),
			None => auth::ensure_jwt_secret(&db).await?.into(),
		};
		let jwt_secret = DecodingKey::from_secret(jwt_secret_str.as_bytes());

		Ok(Self { db, worker, jwt_secret_str, jwt_secret, token_expiry: opts.token_expiry })
	}
}

#[async_trait]
impl AuthAdapter for AuthAdapterSqlite {
	// Roles
	//*******
	async fn create_role(&self, name: &str) -> ClResult<Role> {
		role::create(&self.db, name).await
	}

	async fn read_role_by_name(&self, name: &str) -> ClResult<Role> {
		role::read_by_name(&self.db, name).await
	}

	async fn list_roles(&self) -> ClResult<Vec<Role>> {
		role::list(&self.db).await
	}

	// Users
	//*******
	async fn create_user(&self, username: &str, password: &str, role_id: RoleId) -> ClResult<User> {
		user::create(&self.db, &self.worker, username, password, role_id).await
	}

	async fn create_first_user_in_role(
		&self,
		username: &str,
		password: &str,
		role_id: RoleId,
	) -> ClResult<Option<User>> {
		user::create_first_in_role(&self.db, &self.worker, username, password, role_id).await
	}

	async fn read_user_by_username(&self, username: &str) -> ClResult<User> {
		user::read_by_username(&self.db, username).await
	}

	async fn count_users_with_role(&self, role: &str) -> ClResult<u64> {
		user::count_with_role(&self.db, role).await
	}

	async fn check_user_password(&self, username: &str, password: &str) -> ClResult<AuthLogin> {
		auth::check_user_password(
			&self.db,
			&self.worker,
			username,
			password,
			&self.jwt_secret_str,
			self.token_expiry,
		)
		.await
	}

	// Tokens
	//********
	async fn create_access_token(&self, username: &str) -> ClResult<(Box<str>, Timestamp)> {
		auth::create_access_token(&self.worker, username, &self.jwt_secret_str, self.token_expiry)
			.await
	}

	async fn validate_access_token(&self, token: &str) -> ClResult<AuthClaims> {
		auth::validate_access_token(&self.jwt_secret, token)
	}
}

// vim: ts=4
