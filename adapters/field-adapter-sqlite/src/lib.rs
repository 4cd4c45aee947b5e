//! SQLite implementation of the Fieldstore `FieldAdapter`.
//!
//! Definitions and values live in `fields.db`. Values are kept as opaque
//! canonical strings, one per (field, entity) pair.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use fieldstore_types::field_adapter::{
	CustomField, CustomFieldValue, EntityValue, FieldAdapter, FieldData,
};
use fieldstore_types::prelude::*;

mod field;
mod schema;
mod utils;
mod value;

pub const DB_FILE: &str = "fields.db";

#[derive(Debug)]
pub struct FieldAdapterSqlite {
	db: SqlitePool,
}

impl FieldAdapterSqlite {
	/// Open (or create) `fields.db` inside `db_dir`
	pub async fn new(db_dir: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(db_dir.as_ref()).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(db_dir.as_ref().join(DB_FILE))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(utils::inspect)
			.or(Err(Error::DbError))?;

		schema::init_db(&db).await.inspect_err(utils::inspect).or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl FieldAdapter for FieldAdapterSqlite {
	// Definitions
	//*************
	async fn create_field(&self, data: &FieldData<'_>) -> ClResult<CustomField> {
		field::create(&self.db, data).await
	}

	async fn read_field(&self, field_id: FieldId) -> ClResult<CustomField> {
		field::read(&self.db, field_id).await
	}

	async fn list_fields(&self) -> ClResult<Vec<CustomField>> {
		field::list(&self.db).await
	}

	async fn update_field(&self, field_id: FieldId, data: &FieldData<'_>) -> ClResult<CustomField> {
		field::update(&self.db, field_id, data).await
	}

	async fn delete_field(&self, field_id: FieldId) -> ClResult<()> {
		field::delete(&self.db, field_id).await
	}

	// Values
	//********
	async fn create_value(
		&self,
		field_id: FieldId,
		entity_id: EntityId,
		value: Option<&str>,
	) -> ClResult<CustomFieldValue> {
		value::create(&self.db, field_id, entity_id, value).await
	}

	async fn list_values_by_entity(&self, entity_id: EntityId) -> ClResult<Vec<EntityValue>> {
		value::list_by_entity(&self.db, entity_id).await
	}

	async fn delete_value(&self, value_id: ValueId) -> ClResult<()> {
		value::delete(&self.db, value_id).await
	}
}

// vim: ts=4
