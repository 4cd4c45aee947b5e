use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use fieldstore_core::gate;
use fieldstore_types::auth_adapter::{ADMIN_ROLE, AuthLogin, Role, User};

/// Reject absent and blank string fields
fn required<'a>(field: &str, value: Option<&'a str>) -> ClResult<&'a str> {
	match value {
		Some(v) if !v.trim().is_empty() => Ok(v),
		_ => Err(Error::validation(field, "required")),
	}
}

// Roles //
//*******//
#[derive(Debug, Deserialize)]
pub struct CreateRoleReq {
	name: Option<Box<str>>,
}

/// # POST /roles
///
/// `auth` is `None` while no admin exists yet.
pub async fn post_role(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	ValidJson(req): ValidJson<CreateRoleReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<Role>>)> {
	let name = required("name", req.name.as_deref())?;

	let role = app.auth_adapter.create_role(name).await?;
	info!(
		user = auth.as_ref().map_or("-", |auth| auth.username.as_ref()),
		role = %role.name,
		"Role created"
	);
	Ok((StatusCode::CREATED, Json(ApiResponse::new(role))))
}

/// # GET /roles
pub async fn get_roles(
	State(app): State<App>,
	Auth(_auth): Auth,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<Role>>>)> {
	let roles = app.auth_adapter.list_roles().await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(roles))))
}

// Users //
//*******//
#[derive(Debug, Deserialize)]
pub struct RegisterReq {
	username: Option<Box<str>>,
	password: Option<Box<str>>,
	role: Option<Box<str>>,
}

/// # POST /users
///
/// Public, except that registering into the admin role needs an admin token
/// once an admin exists. The role is checked before the other fields.
pub async fn post_user(
	State(app): State<App>,
	token: BearerToken,
	ValidJson(req): ValidJson<RegisterReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<User>>)> {
	let bootstrap = if req.role.as_deref() == Some(ADMIN_ROLE) {
		gate::authorize_or_bootstrap(&app, &token, ADMIN_ROLE).await?.is_none()
	} else {
		false
	};

	let username = required("username", req.username.as_deref())?;
	let password = required("password", req.password.as_deref())?;
	let role_name = required("role", req.role.as_deref())?;

	let role = match app.auth_adapter.read_role_by_name(role_name).await {
		Ok(role) => role,
		Err(Error::NotFound) => return Err(Error::RoleNotFound),
		Err(err) => return Err(err),
	};

	if !bootstrap {
		let user = app.auth_adapter.create_user(username, password, role.id).await?;
		return Ok((StatusCode::CREATED, Json(ApiResponse::new(user))));
	}

	let user = match app.auth_adapter.create_first_user_in_role(username, password, role.id).await? {
		Some(user) => user,
		None => {
			// Another registration took the bootstrap slot first
			gate::authorize(&app, &token, ADMIN_ROLE).await?;
			app.auth_adapter.create_user(username, password, role.id).await?
		}
	};
	Ok((StatusCode::CREATED, Json(ApiResponse::new(user))))
}

// Sessions //
//**********//
#[derive(Debug, Deserialize)]
pub struct LoginReq {
	username: Option<Box<str>>,
	password: Option<Box<str>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
	token: Box<str>,
	expires_at: Timestamp,
	user: User,
}

impl From<AuthLogin> for Login {
	fn from(login: AuthLogin) -> Self {
		Login { token: login.token, expires_at: login.expires_at, user: login.user }
	}
}

/// # POST /sessions
pub async fn post_session(
	State(app): State<App>,
	ValidJson(req): ValidJson<LoginReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<Login>>)> {
	let username = required("username", req.username.as_deref())?;
	let password = required("password", req.password.as_deref())?;

	match app.auth_adapter.check_user_password(username, password).await {
		Ok(login) => {
			info!(user = %login.user.username, role = %login.user.role.name, "Login");
			Ok((StatusCode::OK, Json(ApiResponse::new(login.into()))))
		}
		Err(Error::BadCredentials) => {
			warn!(user = %username, "Login failed");
			tokio::time::sleep(std::time::Duration::from_secs(1)).await;
			Err(Error::BadCredentials)
		}
		Err(err) => Err(err),
	}
}


// vim: ts=4
