//! Custom field value handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::prelude::*;
use crate::validate::validate_value;
use fieldstore_types::field_adapter::{CustomFieldValue, EntityValue};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueReq {
	custom_field_id: Option<i64>,
	entity_id: Option<i64>,
	#[serde(default)]
	value: serde_json::Value,
}

/// Raw text of a JSON scalar. `null` clears the value.
fn raw_value(value: &serde_json::Value) -> ClResult<Option<String>> {
	match value {
		serde_json::Value::Null => Ok(None),
		serde_json::Value::String(s) => Ok(Some(s.clone())),
		serde_json::Value::Number(n) => Ok(Some(n.to_string())),
		serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
		_ => Err(Error::validation("value", "must be a string, number, boolean or null")),
	}
}

/// # POST /custom-field-values
pub async fn post_value(
	State(app): State<App>,
	Auth(auth): Auth,
	ValidJson(req): ValidJson<ValueReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<CustomFieldValue>>)> {
	let field_id = req
		.custom_field_id
		.map(FieldId)
		.ok_or_else(|| Error::validation("customFieldId", "required"))?;
	let entity_id =
		req.entity_id.map(EntityId).ok_or_else(|| Error::validation("entityId", "required"))?;
	let raw = raw_value(&req.value)?;

	let field = match app.field_adapter.read_field(field_id).await {
		Ok(field) => field,
		Err(Error::NotFound) => {
			return Err(Error::validation("customFieldId", "unknown custom field"));
		}
		Err(err) => return Err(err),
	};

	let canonical = match raw.as_deref() {
		Some(raw) => Some(validate_value(field.typ, field.options.as_deref(), raw)?),
		None => None,
	};

	let value = app.field_adapter.create_value(field_id, entity_id, canonical.as_deref()).await?;
	debug!(
		user = %auth.username,
		field_id = %field_id,
		entity_id = %entity_id,
		"Custom field value stored"
	);
	Ok((StatusCode::CREATED, Json(ApiResponse::new(value))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListValuesQuery {
	entity_id: Option<i64>,
}

/// # GET /custom-field-values?entityId=
pub async fn list_values(
	State(app): State<App>,
	Auth(_auth): Auth,
	ValidQuery(query): ValidQuery<ListValuesQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<EntityValue>>>)> {
	let entity_id =
		query.entity_id.map(EntityId).ok_or_else(|| Error::validation("entityId", "required"))?;

	let values = app.field_adapter.list_values_by_entity(entity_id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(values))))
}

/// # DELETE /custom-field-values/{id}
pub async fn delete_value(
	State(app): State<App>,
	Auth(auth): Auth,
	IdParam(value_id): IdParam,
) -> ClResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
	app.field_adapter.delete_value(ValueId(value_id)).await?;
	info!(user = %auth.username, value_id = %value_id, "Custom field value deleted");
	Ok((StatusCode::OK, Json(ApiResponse::new(serde_json::json!({})))))
}


// vim: ts=4
