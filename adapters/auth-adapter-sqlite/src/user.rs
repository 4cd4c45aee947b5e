//! User management

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::crypto;
use crate::utils::*;
use fieldstore_types::auth_adapter::{Role, User};
use fieldstore_types::prelude::*;
use fieldstore_types::worker::WorkerPool;

const SELECT_USER: &str = "SELECT u.user_id, u.username, r.role_id, r.name AS role_name
	FROM users u JOIN roles r ON r.role_id = u.role_id";

fn row_to_user(row: &SqliteRow) -> Result<User, sqlx::Error> {
	Ok(User {
		id: UserId(row.try_get("user_id")?),
		username: row.try_get("username")?,
		role: Role { id: RoleId(row.try_get("role_id")?), name: row.try_get("role_name")? },
	})
}

/// Create a user with a bcrypt-hashed password
pub(crate) async fn create(
	db: &SqlitePool,
	worker: &WorkerPool,
	username: &str,
	password: &str,
	role_id: RoleId,
) -> ClResult<User> {
	let password_hash = crypto::generate_password_hash(worker, password.into()).await?;

	let user_id: i64 =
		sqlx::query_scalar("INSERT INTO users (username, password, role_id) VALUES (?, ?, ?) RETURNING user_id")
			.bind(username)
			.bind(password_hash.as_ref())
			.bind(role_id.0)
			.fetch_one(db)
			.await
			.map_err(|err| map_insert_err(err, Error::DuplicateUsername, Error::RoleNotFound))?;

	let user = read_by_id(db, user_id).await?;
	info!(user = %user.username, role = %user.role.name, "Created user");
	Ok(user)
}

/// Create a user only if nobody holds `role_id` yet.
///
/// The check and the insert are one statement, so of several concurrent
/// callers at most one gets `Some`.
pub(crate) async fn create_first_in_role(
	db: &SqlitePool,
	worker: &WorkerPool,
	username: &str,
	password: &str,
	role_id: RoleId,
) -> ClResult<Option<User>> {
	let password_hash = crypto::generate_password_hash(worker, password.into()).await?;

	let user_id: Option<i64> = sqlx::query_scalar(
		"INSERT INTO users (username, password, role_id)
		SELECT ?1, ?2, ?3 WHERE NOT EXISTS (SELECT 1 FROM users WHERE role_id = ?3)
		RETURNING user_id",
	)
	.bind(username)
	.bind(password_hash.as_ref())
	.bind(role_id.0)
	.fetch_optional(db)
	.await
	.map_err(|err| map_insert_err(err, Error::DuplicateUsername, Error::RoleNotFound))?;

	let Some(user_id) = user_id else {
		debug!(user = %username, "Role already has a user, not creating");
		return Ok(None);
	};

	let user = read_by_id(db, user_id).await?;
	info!(user = %user.username, role = %user.role.name, "Created first user of role");
	Ok(Some(user))
}

async fn read_by_id(db: &SqlitePool, user_id: i64) -> ClResult<User> {
	let res = sqlx::query(&format!("{} WHERE u.user_id = ?", SELECT_USER))
		.bind(user_id)
		.fetch_one(db)
		.await;

	map_res(res, row_to_user)
}

pub(crate) async fn read_by_username(db: &SqlitePool, username: &str) -> ClResult<User> {
	let res = sqlx::query(&format!("{} WHERE u.username = ?", SELECT_USER))
		.bind(username)
		.fetch_one(db)
		.await;

	map_res(res, row_to_user)
}

/// Read the stored password hash of a user
pub(crate) async fn read_password_hash(db: &SqlitePool, username: &str) -> ClResult<Box<str>> {
	let res = sqlx::query("SELECT password FROM users WHERE username = ?")
		.bind(username)
		.fetch_one(db)
		.await;

	map_res(res, |row| row.try_get("password"))
}

pub(crate) async fn count_with_role(db: &SqlitePool, role: &str) -> ClResult<u64> {
	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM users u JOIN roles r ON r.role_id = u.role_id WHERE r.name = ?",
	)
	.bind(role)
	.fetch_one(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(u64::try_from(count).unwrap_or_default())
}

// vim: ts=4
