//! Custom field definitions

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use fieldstore_types::field_adapter::{CustomField, FieldData, FieldType};
use fieldstore_types::prelude::*;

fn row_to_field(row: &SqliteRow) -> Result<CustomField, sqlx::Error> {
	let typ: &str = row.try_get("type")?;
	let typ = typ
		.parse::<FieldType>()
		.map_err(|_| sqlx::Error::Decode(format!("unknown field type: {}", typ).into()))?;

	Ok(CustomField {
		id: FieldId(row.try_get("field_id")?),
		name: row.try_get("name")?,
		typ,
		options: row.try_get("options")?,
	})
}

pub(crate) async fn create(db: &SqlitePool, data: &FieldData<'_>) -> ClResult<CustomField> {
	let res = sqlx::query(
		"INSERT INTO custom_fields (name, type, options) VALUES (?, ?, ?)
		RETURNING field_id, name, type, options",
	)
	.bind(data.name)
	.bind(data.typ.as_str())
	.bind(data.options)
	.fetch_one(db)
	.await;

	let field = map_res(res, row_to_field)?;
	info!(field_id = %field.id, name = %field.name, typ = %field.typ, "Created custom field");
	Ok(field)
}

pub(crate) async fn read(db: &SqlitePool, field_id: FieldId) -> ClResult<CustomField> {
	let res = sqlx::query("SELECT field_id, name, type, options FROM custom_fields WHERE field_id = ?")
		.bind(field_id.0)
		.fetch_one(db)
		.await;

	map_res(res, row_to_field)
}

pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<CustomField>> {
	let res = sqlx::query("SELECT field_id, name, type, options FROM custom_fields ORDER BY field_id")
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(row_to_field))
}

pub(crate) async fn update(
	db: &SqlitePool,
	field_id: FieldId,
	data: &FieldData<'_>,
) -> ClResult<CustomField> {
	let res = sqlx::query(
		"UPDATE custom_fields SET name = ?, type = ?, options = ? WHERE field_id = ?
		RETURNING field_id, name, type, options",
	)
	.bind(data.name)
	.bind(data.typ.as_str())
	.bind(data.options)
	.bind(field_id.0)
	.fetch_one(db)
	.await;

	let field = map_res(res, row_to_field)?;
	info!(field_id = %field.id, name = %field.name, typ = %field.typ, "Updated custom field");
	Ok(field)
}

pub(crate) async fn delete(db: &SqlitePool, field_id: FieldId) -> ClResult<()> {
	let res = sqlx::query("DELETE FROM custom_fields WHERE field_id = ?")
		.bind(field_id.0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	info!(field_id = %field_id, "Deleted custom field");
	Ok(())
}

// vim: ts=4
