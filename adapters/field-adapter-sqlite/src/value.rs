//! Custom field values attached to entities

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use fieldstore_types::field_adapter::{CustomFieldValue, EntityValue};
use fieldstore_types::prelude::*;

fn row_to_value(row: &SqliteRow) -> Result<CustomFieldValue, sqlx::Error> {
	Ok(CustomFieldValue {
		id: ValueId(row.try_get("value_id")?),
		custom_field_id: FieldId(row.try_get("field_id")?),
		entity_id: EntityId(row.try_get("entity_id")?),
		value: row.try_get("value")?,
	})
}

pub(crate) async fn create(
	db: &SqlitePool,
	field_id: FieldId,
	entity_id: EntityId,
	value: Option<&str>,
) -> ClResult<CustomFieldValue> {
	let res = sqlx::query(
		"INSERT INTO custom_field_values (field_id, entity_id, value) VALUES (?, ?, ?)
		RETURNING value_id, field_id, entity_id, value",
	)
	.bind(field_id.0)
	.bind(entity_id.0)
	.bind(value)
	.fetch_one(db)
	.await
	.map_err(|err| match &err {
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Error::Conflict(format!(
			"entity {} already has a value for custom field {}",
			entity_id, field_id
		)),
		_ => {
			inspect(&err);
			Error::DbError
		}
	})?;

	let value = row_to_value(&res).inspect_err(inspect).map_err(|_| Error::DbError)?;
	debug!(value_id = %value.id, field_id = %field_id, entity_id = %entity_id, "Stored custom field value");
	Ok(value)
}

pub(crate) async fn list_by_entity(db: &SqlitePool, entity_id: EntityId) -> ClResult<Vec<EntityValue>> {
	let res = sqlx::query(
		"SELECT field_id, value FROM custom_field_values WHERE entity_id = ? ORDER BY value_id",
	)
	.bind(entity_id.0)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(|row| {
		Ok(EntityValue {
			custom_field_id: FieldId(row.try_get("field_id")?),
			value: row.try_get("value")?,
		})
	}))
}

pub(crate) async fn delete(db: &SqlitePool, value_id: ValueId) -> ClResult<()> {
	let res = sqlx::query("DELETE FROM custom_field_values WHERE value_id = ?")
		.bind(value_id.0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	debug!(value_id = %value_id, "Deleted custom field value");
	Ok(())
}

// vim: ts=4
