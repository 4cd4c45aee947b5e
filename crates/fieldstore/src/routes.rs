//! Route table
//!
//! Every endpoint is listed once with its method, path and access level. The
//! access level is enforced by a route layer in front of the handler, before
//! any of its extractors run.

use axum::{
	Json, Router,
	http::{Method, StatusCode},
	middleware,
	routing::{MethodRouter, delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use fieldstore_core::app::VERSION;
use fieldstore_core::middleware::require_access;
pub use fieldstore_core::middleware::Access;
use fieldstore_field::{definition, value};

pub struct Route {
	pub method: Method,
	pub path: &'static str,
	pub access: Access,
	pub handler: MethodRouter<App>,
}

fn route(method: Method, path: &'static str, access: Access, handler: MethodRouter<App>) -> Route {
	Route { method, path, access, handler }
}

/// # GET /health
async fn get_health() -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
	let status = serde_json::json!({ "status": "ok", "version": VERSION });
	(StatusCode::OK, Json(ApiResponse::new(status)))
}

pub fn table() -> Vec<Route> {
	use Access::*;

	vec![
		route(Method::GET, "/health", Public, get(get_health)),
		// Auth
		route(Method::POST, "/roles", AdminBootstrap, post(fieldstore_auth::handler::post_role)),
		route(Method::GET, "/roles", Admin, get(fieldstore_auth::handler::get_roles)),
		// Registering into the admin role depends on the body, the handler checks it
		route(Method::POST, "/users", Public, post(fieldstore_auth::handler::post_user)),
		route(Method::POST, "/sessions", Public, post(fieldstore_auth::handler::post_session)),
		// Definitions
		route(Method::GET, "/custom-fields", Authenticated, get(definition::list_fields)),
		route(Method::POST, "/custom-fields", Admin, post(definition::post_field)),
		route(Method::GET, "/custom-fields/{id}", Authenticated, get(definition::get_field)),
		route(Method::PUT, "/custom-fields/{id}", Admin, put(definition::put_field)),
		route(Method::DELETE, "/custom-fields/{id}", Admin, delete(definition::delete_field)),
		// Values
		route(Method::POST, "/custom-field-values", Authenticated, post(value::post_value)),
		route(Method::GET, "/custom-field-values", Authenticated, get(value::list_values)),
		route(Method::DELETE, "/custom-field-values/{id}", Admin, delete(value::delete_value)),
	]
}

/// Build the router from the route table
///
/// Routes sharing a path are merged into one method router. Each handler is
/// wrapped in the access layer of its own table entry.
pub fn init(app: App) -> Router {
	let mut router = Router::new();
	for route in table() {
		debug!(method = %route.method, path = route.path, access = ?route.access, "Route");
		let access = middleware::from_fn_with_state((app.clone(), route.access), require_access);
		router = router.route(route.path, route.handler.route_layer(access));
	}

	router.layer(TraceLayer::new_for_http()).with_state(app)
}

// vim: ts=4
