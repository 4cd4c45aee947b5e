//! Definition registry and value store over HTTP

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::*;

async fn define(server: &TestServer, token: &str, def: Value) -> i64 {
	let (status, body) = server.post("/custom-fields", Some(token), def).await;
	assert_eq!(status, StatusCode::CREATED, "{}", body);
	body["data"]["id"].as_i64().unwrap()
}

async fn attach(
	server: &TestServer,
	token: &str,
	field_id: i64,
	entity_id: i64,
	value: Value,
) -> (StatusCode, Value) {
	server
		.post(
			"/custom-field-values",
			Some(token),
			json!({ "customFieldId": field_id, "entityId": entity_id, "value": value }),
		)
		.await
}

#[tokio::test]
async fn test_definition_round_trip() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let defs = [
		json!({ "name": "Notes", "type": "text", "options": null }),
		json!({ "name": "Amount", "type": "number", "options": null }),
		json!({ "name": "Due", "type": "date", "options": null }),
		json!({ "name": "Done", "type": "boolean", "options": null }),
		json!({ "name": "Status", "type": "dropdown", "options": "[\"a\",\"b\"]" }),
	];

	for def in defs {
		let id = define(&server, &token, def.clone()).await;
		let (status, body) = server.get(&format!("/custom-fields/{}", id), Some(&token)).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["data"]["name"], def["name"]);
		assert_eq!(body["data"]["type"], def["type"]);
		assert_eq!(body["data"]["options"], def["options"]);
	}

	let (_, body) = server.get("/custom-fields", Some(&token)).await;
	assert_eq!(body["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_identical_definitions_get_distinct_ids() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let def = json!({ "name": "Notes", "type": "text" });
	let a = define(&server, &token, def.clone()).await;
	let b = define(&server, &token, def).await;
	assert_ne!(a, b);
}

#[tokio::test]
async fn test_definition_validation_errors() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let cases = [
		(json!({ "type": "text" }), "name"),
		(json!({ "name": "  ", "type": "text" }), "name"),
		(json!({ "name": "X" }), "type"),
		(json!({ "name": "X", "type": "TEXT" }), "type"),
		(json!({ "name": "X", "type": "color" }), "type"),
		(json!({ "name": "X", "type": 3 }), "body"),
	];

	for (def, field) in cases {
		let (status, body) = server.post("/custom-fields", Some(&token), def.clone()).await;
		assert_eq!(status, StatusCode::BAD_REQUEST, "{}", def);
		assert_eq!(body["error"]["details"]["field"], field, "{}", def);
	}

	let (_, body) = server.get("/custom-fields", Some(&token)).await;
	assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let req = axum::http::Request::builder()
		.method("POST")
		.uri("/custom-fields")
		.header("authorization", format!("Bearer {}", token))
		.header("content-type", "application/json")
		.body(axum::body::Body::from("{\"name\": "))
		.unwrap();
	let res = tower::ServiceExt::oneshot(server.router.clone(), req).await.unwrap();
	assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_replaces_definition() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;
	let id = server.status_field(&token).await;

	let (status, body) = server
		.put(&format!("/custom-fields/{}", id), Some(&token), json!({ "name": "Priority", "type": "number" }))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"], json!({ "id": id, "name": "Priority", "type": "number", "options": null }));

	let (_, body) = server.get(&format!("/custom-fields/{}", id), Some(&token)).await;
	assert_eq!(body["data"]["type"], "number");

	let (status, _) = server
		.put("/custom-fields/999", Some(&token), json!({ "name": "Ghost", "type": "text" }))
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, body) =
		server.put(&format!("/custom-fields/{}", id), Some(&token), json!({ "name": "" })).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(error_code(&body), "E-VALIDATION");
}

#[tokio::test]
async fn test_delete_definition_twice() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;
	let id = server.status_field(&token).await;
	let (status, _) = attach(&server, &token, id, 7, json!("open")).await;
	assert_eq!(status, StatusCode::CREATED);

	let (status, body) = server.delete(&format!("/custom-fields/{}", id), Some(&token)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"], json!({}));

	let (status, body) = server.delete(&format!("/custom-fields/{}", id), Some(&token)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(error_code(&body), "E-NOT-FOUND");

	let (status, _) = server.get(&format!("/custom-fields/{}", id), Some(&token)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	// Values are not cascaded
	let (_, body) = server.get("/custom-field-values?entityId=7", Some(&token)).await;
	assert_eq!(body["data"], json!([{ "customFieldId": id, "value": "open" }]));
}

#[tokio::test]
async fn test_reads_are_repeatable() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;
	let id = server.status_field(&token).await;
	attach(&server, &token, id, 3, json!("open")).await;

	let uri = format!("/custom-fields/{}", id);
	let (_, first) = server.get(&uri, Some(&token)).await;
	let (_, second) = server.get(&uri, Some(&token)).await;
	assert_eq!(first["data"], second["data"]);

	let (_, first) = server.get("/custom-field-values?entityId=3", Some(&token)).await;
	let (_, second) = server.get("/custom-field-values?entityId=3", Some(&token)).await;
	assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_non_integer_id_not_found() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let (status, _) = server.get("/custom-fields/abc", Some(&token)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	let (status, _) = server.delete("/custom-field-values/1.5", Some(&token)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_values_are_canonicalized() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let number = define(&server, &token, json!({ "name": "Amount", "type": "number" })).await;
	let date = define(&server, &token, json!({ "name": "Due", "type": "date" })).await;
	let flag = define(&server, &token, json!({ "name": "Done", "type": "boolean" })).await;
	let text = define(&server, &token, json!({ "name": "Notes", "type": "text" })).await;

	assert_eq!(attach(&server, &token, number, 1, json!("1.50")).await.0, StatusCode::CREATED);
	assert_eq!(attach(&server, &token, date, 1, json!("2024-02-29")).await.0, StatusCode::CREATED);
	assert_eq!(attach(&server, &token, flag, 1, json!("YES")).await.0, StatusCode::CREATED);
	assert_eq!(attach(&server, &token, text, 1, json!(" as is ")).await.0, StatusCode::CREATED);
	// JSON scalars are accepted as their text
	assert_eq!(attach(&server, &token, number, 2, json!(1e3)).await.0, StatusCode::CREATED);
	assert_eq!(attach(&server, &token, flag, 2, json!(false)).await.0, StatusCode::CREATED);

	let (_, body) = server.get("/custom-field-values?entityId=1", Some(&token)).await;
	assert_eq!(
		body["data"],
		json!([
			{ "customFieldId": number, "value": "1.5" },
			{ "customFieldId": date, "value": "2024-02-29" },
			{ "customFieldId": flag, "value": "true" },
			{ "customFieldId": text, "value": " as is " },
		])
	);

	let (_, body) = server.get("/custom-field-values?entityId=2", Some(&token)).await;
	assert_eq!(
		body["data"],
		json!([
			{ "customFieldId": number, "value": "1000" },
			{ "customFieldId": flag, "value": "false" },
		])
	);
}

#[tokio::test]
async fn test_numbers_are_stored_exactly() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;
	let number = define(&server, &token, json!({ "name": "Amount", "type": "number" })).await;

	for (entity_id, raw, stored) in [
		(1, "9223372036854775808", "9223372036854775808"),
		(2, "12345678901234567891", "12345678901234567891"),
		(3, "1234567890.1234567890", "1234567890.123456789"),
	] {
		let (status, body) = attach(&server, &token, number, entity_id, json!(raw)).await;
		assert_eq!(status, StatusCode::CREATED, "{}", body);
		assert_eq!(body["data"]["value"], stored);
	}

	// Too precise to store without rounding
	let (status, body) =
		attach(&server, &token, number, 4, json!("0.1000000000000000055511151231257827")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["details"]["field"], "value");

	let (_, body) = server.get("/custom-field-values?entityId=2", Some(&token)).await;
	assert_eq!(body["data"], json!([{ "customFieldId": number, "value": "12345678901234567891" }]));
	let (_, body) = server.get("/custom-field-values?entityId=4", Some(&token)).await;
	assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_type_mismatches_rejected() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let number = define(&server, &token, json!({ "name": "Amount", "type": "number" })).await;
	let date = define(&server, &token, json!({ "name": "Due", "type": "date" })).await;
	let flag = define(&server, &token, json!({ "name": "Done", "type": "boolean" })).await;

	for (field_id, value) in [
		(number, json!("12abc")),
		(number, json!("NaN")),
		(date, json!("2023-02-29")),
		(date, json!("29.02.2024")),
		(flag, json!("maybe")),
		(number, json!(["1"])),
	] {
		let (status, body) = attach(&server, &token, field_id, 9, value.clone()).await;
		assert_eq!(status, StatusCode::BAD_REQUEST, "{}", value);
		assert_eq!(body["error"]["details"]["field"], "value");
	}

	let (_, body) = server.get("/custom-field-values?entityId=9", Some(&token)).await;
	assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_dropdown_with_broken_options() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let id = define(&server, &token, json!({ "name": "Broken", "type": "dropdown", "options": "a,b" }))
		.await;
	let (status, body) = attach(&server, &token, id, 1, json!("a")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["details"]["reason"], "dropdown options are missing or invalid");
}

#[tokio::test]
async fn test_value_request_errors() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;

	let (status, body) = attach(&server, &token, 99, 1, json!("x")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["details"]["field"], "customFieldId");
	assert_eq!(body["error"]["details"]["reason"], "unknown custom field");

	let (status, body) =
		server.post("/custom-field-values", Some(&token), json!({ "entityId": 1, "value": "x" })).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["details"]["field"], "customFieldId");

	let (status, body) = server
		.post("/custom-field-values", Some(&token), json!({ "customFieldId": 1, "value": "x" }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["details"]["field"], "entityId");

	let (status, body) = server.get("/custom-field-values", Some(&token)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["details"]["field"], "entityId");

	let (status, body) = server.get("/custom-field-values?entityId=abc", Some(&token)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["details"]["field"], "query");
}

#[tokio::test]
async fn test_null_value_skips_validation() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;
	let id = server.status_field(&token).await;

	let (status, body) = attach(&server, &token, id, 5, Value::Null).await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["data"]["value"], Value::Null);

	let (_, body) = server.get("/custom-field-values?entityId=5", Some(&token)).await;
	assert_eq!(body["data"], json!([{ "customFieldId": id, "value": null }]));
}

#[tokio::test]
async fn test_one_value_per_field_and_entity() {
	let server = TestServer::new().await;
	let token = server.admin_token().await;
	let id = server.status_field(&token).await;

	assert_eq!(attach(&server, &token, id, 42, json!("open")).await.0, StatusCode::CREATED);
	let (status, body) = attach(&server, &token, id, 42, json!("closed")).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(error_code(&body), "E-CONFLICT");

	// Another entity is independent
	assert_eq!(attach(&server, &token, id, 43, json!("closed")).await.0, StatusCode::CREATED);
}

#[tokio::test]
async fn test_delete_value_twice() {
	let server = TestServer::new().await;
	let admin = server.admin_token().await;
	let id = server.status_field(&admin).await;
	let viewer = server.viewer_token(&admin).await;

	let (_, body) = attach(&server, &viewer, id, 42, json!("open")).await;
	let value_id = body["data"]["id"].as_i64().unwrap();
	let uri = format!("/custom-field-values/{}", value_id);

	let (status, _) = server.delete(&uri, Some(&viewer)).await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) = server.delete(&uri, Some(&admin)).await;
	assert_eq!(status, StatusCode::OK);
	let (status, _) = server.delete(&uri, Some(&admin)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (_, body) = server.get("/custom-field-values?entityId=42", Some(&viewer)).await;
	assert_eq!(body["data"], json!([]));
}

// vim: ts=4
