//! Role management

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use fieldstore_types::auth_adapter::Role;
use fieldstore_types::prelude::*;

fn row_to_role(row: &SqliteRow) -> Result<Role, sqlx::Error> {
	Ok(Role { id: RoleId(row.try_get("role_id")?), name: row.try_get("name")? })
}

/// Create a role. Names are unique, compared exactly.
pub(crate) async fn create(db: &SqlitePool, name: &str) -> ClResult<Role> {
	let res = sqlx::query("INSERT INTO roles (name) VALUES (?) RETURNING role_id, name")
		.bind(name)
		.fetch_one(db)
		.await
		.map_err(|err| map_insert_err(err, Error::DuplicateRole, Error::DbError))?;

	let role = row_to_role(&res).inspect_err(inspect).map_err(|_| Error::DbError)?;
	info!(role = %role.name, role_id = %role.id, "Created role");
	Ok(role)
}

pub(crate) async fn read_by_name(db: &SqlitePool, name: &str) -> ClResult<Role> {
	let res = sqlx::query("SELECT role_id, name FROM roles WHERE name = ?")
		.bind(name)
		.fetch_one(db)
		.await;

	map_res(res, row_to_role)
}

pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<Role>> {
	let res = sqlx::query("SELECT role_id, name FROM roles ORDER BY role_id")
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(row_to_role))
}

// vim: ts=4
