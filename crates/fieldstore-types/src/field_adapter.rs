//! Adapter that stores custom field definitions and their values.
//!
//! Definitions and values are independent aggregates linked only by
//! `custom_field_id`. The adapter stores values as opaque strings and never
//! interprets a field's type; canonicalization happens before a value reaches it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::str::FromStr;

use crate::prelude::*;

/// Declared type of a custom field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
	Text,
	Number,
	Date,
	Dropdown,
	Boolean,
}

impl FieldType {
	pub const ALL: [FieldType; 5] = [
		FieldType::Text,
		FieldType::Number,
		FieldType::Date,
		FieldType::Dropdown,
		FieldType::Boolean,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			FieldType::Text => "text",
			FieldType::Number => "number",
			FieldType::Date => "date",
			FieldType::Dropdown => "dropdown",
			FieldType::Boolean => "boolean",
		}
	}
}

impl std::fmt::Display for FieldType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FieldType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		FieldType::ALL.into_iter().find(|t| t.as_str() == s).ok_or_else(|| {
			Error::validation("type", "must be one of: text, number, date, dropdown, boolean")
		})
	}
}

/// A custom field definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
	pub id: FieldId,
	pub name: Box<str>,
	#[serde(rename = "type")]
	pub typ: FieldType,
	/// Opaque type-specific configuration (JSON array of choices for dropdowns)
	pub options: Option<Box<str>>,
}

/// Validated data for creating or replacing a definition
#[derive(Debug)]
pub struct FieldData<'a> {
	pub name: &'a str,
	pub typ: FieldType,
	pub options: Option<&'a str>,
}

/// A stored value of a custom field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldValue {
	pub id: ValueId,
	pub custom_field_id: FieldId,
	pub entity_id: EntityId,
	pub value: Option<Box<str>>,
}

/// A value as listed for one entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityValue {
	pub custom_field_id: FieldId,
	pub value: Option<Box<str>>,
}

#[async_trait]
pub trait FieldAdapter: Debug + Send + Sync {
	// Definitions
	//*************
	async fn create_field(&self, data: &FieldData<'_>) -> ClResult<CustomField>;
	async fn read_field(&self, field_id: FieldId) -> ClResult<CustomField>;
	async fn list_fields(&self) -> ClResult<Vec<CustomField>>;
	/// Replace name, type and options. `NotFound` if the definition does not exist.
	async fn update_field(&self, field_id: FieldId, data: &FieldData<'_>) -> ClResult<CustomField>;
	/// Delete a definition. Its values are left in place.
	async fn delete_field(&self, field_id: FieldId) -> ClResult<()>;

	// Values
	//********
	/// Store a canonical value. Fails with `Conflict` if the entity already has a
	/// value for this field.
	async fn create_value(
		&self,
		field_id: FieldId,
		entity_id: EntityId,
		value: Option<&str>,
	) -> ClResult<CustomFieldValue>;
	/// All values attached to an entity, in insertion order
	async fn list_values_by_entity(&self, entity_id: EntityId) -> ClResult<Vec<EntityValue>>;
	async fn delete_value(&self, value_id: ValueId) -> ClResult<()>;
}


// vim: ts=4
