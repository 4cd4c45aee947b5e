//! Authentication and token management

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use sqlx::{Row, SqlitePool};

use crate::utils::*;
use crate::{crypto, user};
use fieldstore_types::auth_adapter::{AccessToken, AuthClaims, AuthLogin};
use fieldstore_types::prelude::*;
use fieldstore_types::worker::WorkerPool;

const JWT_SECRET_VAR: &str = "jwt_secret";

/// Get or generate the JWT secret for HS256 signing
pub(crate) async fn ensure_jwt_secret(db: &SqlitePool) -> ClResult<String> {
	// Try to read existing secret
	let res = sqlx::query("SELECT value FROM vars WHERE key = ?1")
		.bind(JWT_SECRET_VAR)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	if let Some(row) = res {
		return row.try_get("value").inspect_err(inspect).or(Err(Error::DbError));
	}

	// Generate new secret (32 random bytes, base64 encoded)
	use base64::Engine;
	use rand::Rng;
	let mut secret_bytes = [0u8; 32];
	let mut rng = rand::rng();
	rng.fill_bytes(&mut secret_bytes);
	let secret_str = base64::engine::general_purpose::STANDARD.encode(secret_bytes);

	// INSERT OR IGNORE: another process may have won the race, re-read below
	sqlx::query("INSERT OR IGNORE INTO vars (key, value) VALUES (?1, ?2)")
		.bind(JWT_SECRET_VAR)
		.bind(&secret_str)
		.execute(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	let stored: String = sqlx::query_scalar("SELECT value FROM vars WHERE key = ?1")
		.bind(JWT_SECRET_VAR)
		.fetch_one(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	info!("Generated new JWT secret");
	Ok(stored)
}

/// Sign an access token for a username
pub(crate) async fn create_access_token(
	worker: &WorkerPool,
	username: &str,
	jwt_secret_str: &str,
	token_expiry: i64,
) -> ClResult<(Box<str>, Timestamp)> {
	let exp = Timestamp::from_now(token_expiry);
	let access_token = AccessToken { sub: Box::from(username), iat: Timestamp::now(), exp };
	let token = crypto::generate_access_token(worker, access_token, jwt_secret_str.into()).await?;

	Ok((token, exp))
}

/// Validate an access token (JWT) and return its identity claim
pub(crate) fn validate_access_token(jwt_secret: &DecodingKey, token: &str) -> ClResult<AuthClaims> {
	let token_data =
		decode::<AccessToken<Box<str>>>(token, jwt_secret, &Validation::new(Algorithm::HS256))
			.map_err(|err| {
				debug!("Access token rejected: {}", err);
				Error::Unauthorized
			})?;

	if token_data.claims.sub.is_empty() {
		return Err(Error::Unauthorized);
	}

	Ok(AuthClaims { username: token_data.claims.sub, exp: token_data.claims.exp })
}

/// Check a user's password and issue an access token
pub(crate) async fn check_user_password(
	db: &SqlitePool,
	worker: &WorkerPool,
	username: &str,
	password: &str,
	jwt_secret_str: &str,
	token_expiry: i64,
) -> ClResult<AuthLogin> {
	let password_hash = match user::read_password_hash(db, username).await {
		Ok(hash) => hash,
		Err(Error::NotFound) => return Err(Error::BadCredentials),
		Err(err) => return Err(err),
	};

	crypto::check_password(worker, password.into(), password_hash).await?;

	let user = user::read_by_username(db, username).await?;
	let (token, expires_at) =
		create_access_token(worker, username, jwt_secret_str, token_expiry).await?;

	Ok(AuthLogin { user, token, expires_at })
}

// vim: ts=4
