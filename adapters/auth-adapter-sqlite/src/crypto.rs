const BCRYPT_COST: u32 = 10;

use fieldstore_types::{auth_adapter::AccessToken, prelude::*, worker::WorkerPool};

fn generate_password_hash_sync(password: Box<str>) -> ClResult<Box<str>> {
	let hash = bcrypt::hash(password.as_ref(), BCRYPT_COST)
		.map_err(|err| Error::Internal(format!("password hashing failed: {}", err)))?;

	Ok(hash.into())
}

pub async fn generate_password_hash(worker: &WorkerPool, password: Box<str>) -> ClResult<Box<str>> {
	worker.try_run(move || generate_password_hash_sync(password)).await
}

fn check_password_sync(password: Box<str>, password_hash: Box<str>) -> ClResult<()> {
	// A malformed stored hash is treated like a mismatch
	let res = bcrypt::verify(password.as_ref(), &password_hash).map_err(|_| Error::BadCredentials)?;
	if res { Ok(()) } else { Err(Error::BadCredentials) }
}

pub async fn check_password(
	worker: &WorkerPool,
	password: Box<str>,
	password_hash: Box<str>,
) -> ClResult<()> {
	worker.try_run(move || check_password_sync(password, password_hash)).await
}

fn generate_access_token_sync(
	access_token: &AccessToken<Box<str>>,
	jwt_secret: &str,
) -> ClResult<Box<str>> {
	let token = jsonwebtoken::encode(
		&jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
		access_token,
		&jsonwebtoken::EncodingKey::from_secret(jwt_secret.as_bytes()),
	)
	.map_err(|err| Error::Internal(format!("token signing failed: {}", err)))?
	.into();

	Ok(token)
}

pub async fn generate_access_token(
	worker: &WorkerPool,
	access_token: AccessToken<Box<str>>,
	jwt_secret: Box<str>,
) -> ClResult<Box<str>> {
	worker.try_run_immed(move || generate_access_token_sync(&access_token, &jwt_secret)).await
}

// vim: ts=4
