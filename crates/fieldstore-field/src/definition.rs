//! Custom field definition handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::prelude::*;
use crate::validate::validate_definition;
use fieldstore_types::field_adapter::CustomField;

/// Body of a definition create or full replace
#[derive(Debug, Deserialize)]
pub struct FieldReq {
	name: Option<Box<str>>,
	#[serde(rename = "type")]
	typ: Option<Box<str>>,
	options: Option<Box<str>>,
}

/// # GET /custom-fields
pub async fn list_fields(
	State(app): State<App>,
	Auth(_auth): Auth,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<CustomField>>>)> {
	let fields = app.field_adapter.list_fields().await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(fields))))
}

/// # POST /custom-fields
pub async fn post_field(
	State(app): State<App>,
	Auth(auth): Auth,
	ValidJson(req): ValidJson<FieldReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<CustomField>>)> {
	let data =
		validate_definition(req.name.as_deref(), req.typ.as_deref(), req.options.as_deref())?;

	let field = app.field_adapter.create_field(&data).await?;
	info!(user = %auth.username, field_id = %field.id, "Custom field defined");
	Ok((StatusCode::CREATED, Json(ApiResponse::new(field))))
}

/// # GET /custom-fields/{id}
pub async fn get_field(
	State(app): State<App>,
	Auth(_auth): Auth,
	IdParam(field_id): IdParam,
) -> ClResult<(StatusCode, Json<ApiResponse<CustomField>>)> {
	let field = app.field_adapter.read_field(FieldId(field_id)).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(field))))
}

/// # PUT /custom-fields/{id}
///
/// Replaces name, type and options. Stored values are not re-validated.
pub async fn put_field(
	State(app): State<App>,
	Auth(auth): Auth,
	IdParam(field_id): IdParam,
	ValidJson(req): ValidJson<FieldReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<CustomField>>)> {
	let data =
		validate_definition(req.name.as_deref(), req.typ.as_deref(), req.options.as_deref())?;

	let field = app.field_adapter.update_field(FieldId(field_id), &data).await?;
	info!(user = %auth.username, field_id = %field.id, "Custom field replaced");
	Ok((StatusCode::OK, Json(ApiResponse::new(field))))
}

/// # DELETE /custom-fields/{id}
pub async fn delete_field(
	State(app): State<App>,
	Auth(auth): Auth,
	IdParam(field_id): IdParam,
) -> ClResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
	app.field_adapter.delete_field(FieldId(field_id)).await?;
	info!(user = %auth.username, field_id = %field_id, "Custom field deleted");
	Ok((StatusCode::OK, Json(ApiResponse::new(serde_json::json!({})))))
}

// vim: ts=4
