//! Adapter that stores roles and users and issues/verifies access tokens.
//!
//! The adapter is both the credential store and the token service: it owns the
//! password hashes and the token signing secret, so neither ever leaves it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// Default access token lifetime in seconds (8 hours)
pub const ACCESS_TOKEN_EXPIRY: i64 = 8 * 3600;

/// Role every administrative operation requires
pub const ADMIN_ROLE: &str = "admin";

/// Claims of an access token. The subject is the username.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AccessToken<S> {
	pub sub: S,
	pub iat: Timestamp,
	pub exp: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	pub id: RoleId,
	pub name: Box<str>,
}

/// A stored user. The password hash never leaves the adapter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: UserId,
	pub username: Box<str>,
	pub role: Role,
}

/// Identity carried by a verified access token
#[derive(Clone, Debug)]
pub struct AuthClaims {
	pub username: Box<str>,
	pub exp: Timestamp,
}

/// Context of an authenticated caller, resolved against the credential store
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: UserId,
	pub username: Box<str>,
	pub role: Box<str>,
}

impl AuthCtx {
	pub fn has_role(&self, role: &str) -> bool {
		self.role.as_ref() == role
	}
}

impl From<User> for AuthCtx {
	fn from(user: User) -> Self {
		AuthCtx { user_id: user.id, username: user.username, role: user.role.name }
	}
}

/// Successful login
#[derive(Debug)]
pub struct AuthLogin {
	pub user: User,
	pub token: Box<str>,
	pub expires_at: Timestamp,
}

#[async_trait]
pub trait AuthAdapter: Debug + Send + Sync {
	// Roles
	//*******
	async fn create_role(&self, name: &str) -> ClResult<Role>;
	async fn read_role_by_name(&self, name: &str) -> ClResult<Role>;
	async fn list_roles(&self) -> ClResult<Vec<Role>>;

	// Users
	//*******
	/// Create a user. The password is hashed before it is stored.
	async fn create_user(&self, username: &str, password: &str, role_id: RoleId)
	-> ClResult<User>;
	/// Create a user unless the role already has one. `None` when it has.
	async fn create_first_user_in_role(
		&self,
		username: &str,
		password: &str,
		role_id: RoleId,
	) -> ClResult<Option<User>>;
	async fn read_user_by_username(&self, username: &str) -> ClResult<User>;
	async fn count_users_with_role(&self, role: &str) -> ClResult<u64>;

	/// Verify a password and issue an access token. Fails with `BadCredentials`
	/// for unknown users and wrong passwords alike.
	async fn check_user_password(&self, username: &str, password: &str) -> ClResult<AuthLogin>;

	// Tokens
	//********
	async fn create_access_token(&self, username: &str) -> ClResult<(Box<str>, Timestamp)>;
	/// Verify signature and expiry. Fails with `Unauthorized`.
	async fn validate_access_token(&self, token: &str) -> ClResult<AuthClaims>;
}

// vim: ts=4
