//! Common test utilities
//!
//! Builds the full application on temporary SQLite databases and drives the
//! router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use fieldstore::app::{App, AppBuilder};
use fieldstore::worker::WorkerPool;
use fieldstore_auth_adapter_sqlite::AuthAdapterSqlite;
use fieldstore_field_adapter_sqlite::FieldAdapterSqlite;

pub struct TestServer {
	pub app: App,
	pub router: Router,
	_tmp_dir: TempDir,
}

impl TestServer {
	pub async fn new() -> Self {
		Self::with_builder(|_| {}).await
	}

	pub async fn with_builder(configure: impl FnOnce(&mut AppBuilder)) -> Self {
		let tmp_dir = TempDir::new().unwrap();
		let worker = Arc::new(WorkerPool::new(1, 2));
		let auth_adapter = AuthAdapterSqlite::new(worker, tmp_dir.path()).await.unwrap();
		let field_adapter = FieldAdapterSqlite::new(tmp_dir.path()).await.unwrap();

		let mut builder = AppBuilder::new();
		builder
			.auth_adapter(Arc::new(auth_adapter))
			.field_adapter(Arc::new(field_adapter));
		configure(&mut builder);

		let (app, router) = builder.build().await.unwrap();
		Self { app, router, _tmp_dir: tmp_dir }
	}

	/// Send a request and return the status and the decoded JSON body
	pub async fn request(
		&self,
		method: Method,
		uri: &str,
		token: Option<&str>,
		body: Option<Value>,
	) -> (StatusCode, Value) {
		match body {
			Some(body) => {
				self.request_raw(method, uri, token, Some("application/json"), &body.to_string()).await
			}
			None => self.request_raw(method, uri, token, None, "").await,
		}
	}

	/// Send a request with a literal body, valid JSON or not
	pub async fn request_raw(
		&self,
		method: Method,
		uri: &str,
		token: Option<&str>,
		content_type: Option<&str>,
		body: &str,
	) -> (StatusCode, Value) {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(token) = token {
			builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
		}
		if let Some(content_type) = content_type {
			builder = builder.header(header::CONTENT_TYPE, content_type);
		}
		let req = builder.body(Body::from(body.to_string())).unwrap();

		let res = self.router.clone().oneshot(req).await.unwrap();
		let status = res.status();
		let bytes = res.into_body().collect().await.unwrap().to_bytes();
		let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
		(status, json)
	}

	pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
		self.request(Method::GET, uri, token, None).await
	}

	pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
		self.request(Method::POST, uri, token, Some(body)).await
	}

	pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
		self.request(Method::PUT, uri, token, Some(body)).await
	}

	pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
		self.request(Method::DELETE, uri, token, None).await
	}

	pub async fn create_role(&self, token: Option<&str>, name: &str) -> (StatusCode, Value) {
		self.post("/roles", token, json!({ "name": name })).await
	}

	pub async fn register(
		&self,
		token: Option<&str>,
		username: &str,
		password: &str,
		role: &str,
	) -> (StatusCode, Value) {
		self.post("/users", token, json!({ "username": username, "password": password, "role": role }))
			.await
	}

	pub async fn login(&self, username: &str, password: &str) -> String {
		let (status, body) =
			self.post("/sessions", None, json!({ "username": username, "password": password })).await;
		assert_eq!(status, StatusCode::OK, "login failed: {}", body);
		body["data"]["token"].as_str().unwrap().to_string()
	}

	pub async fn login_after_register(&self, username: &str, password: &str, role: &str) -> String {
		let (status, body) = self.register(None, username, password, role).await;
		assert_eq!(status, StatusCode::CREATED, "{}", body);
		self.login(username, password).await
	}

	/// Scenario 1 preamble: role "admin", user alice/pw1, logged in
	pub async fn admin_token(&self) -> String {
		let (status, _) = self.create_role(None, "admin").await;
		assert_eq!(status, StatusCode::CREATED);
		let (status, _) = self.register(None, "alice", "pw1", "admin").await;
		assert_eq!(status, StatusCode::CREATED);
		self.login("alice", "pw1").await
	}

	/// A non-admin user "bob" with role "viewer". Needs an admin to exist.
	pub async fn viewer_token(&self, admin_token: &str) -> String {
		let (status, _) = self.create_role(Some(admin_token), "viewer").await;
		assert_eq!(status, StatusCode::CREATED);
		self.login_after_register("bob", "pw2", "viewer").await
	}

	pub async fn status_field(&self, admin_token: &str) -> i64 {
		let (status, body) = self
			.post(
				"/custom-fields",
				Some(admin_token),
				json!({ "name": "Status", "type": "dropdown", "options": "[\"open\",\"closed\"]" }),
			)
			.await;
		assert_eq!(status, StatusCode::CREATED, "{}", body);
		body["data"]["id"].as_i64().unwrap()
	}
}

pub fn error_code(body: &Value) -> &str {
	body["error"]["code"].as_str().unwrap_or_default()
}

// vim: ts=4
