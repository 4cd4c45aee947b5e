//! Authorization gate
//!
//! Called by the route access layer before a handler runs, and by handlers
//! whose requirement depends on the request itself. The gate verifies the
//! bearer token, resolves the subject to a stored user and compares the user's
//! role name with the required one. It never writes anything.

use fieldstore_types::auth_adapter::{AuthAdapter, AuthCtx};
use fieldstore_types::prelude::*;

use crate::app::App;
use crate::extract::BearerToken;

async fn authenticate_with(
	auth_adapter: &dyn AuthAdapter,
	token: &BearerToken,
) -> ClResult<AuthCtx> {
	let Some(token) = token.0.as_deref() else {
		return Err(Error::Unauthorized);
	};
	let claims = auth_adapter.validate_access_token(token).await?;

	// A valid token for a user that no longer exists is not "not found"
	match auth_adapter.read_user_by_username(&claims.username).await {
		Ok(user) => Ok(user.into()),
		Err(Error::NotFound) => {
			warn!(user = %claims.username, "Token subject does not resolve to a user");
			Err(Error::PermissionDenied)
		}
		Err(err) => Err(err),
	}
}

async fn authorize_with(
	auth_adapter: &dyn AuthAdapter,
	token: &BearerToken,
	required_role: &str,
) -> ClResult<AuthCtx> {
	let auth = authenticate_with(auth_adapter, token).await?;

	if !auth.has_role(required_role) {
		warn!(user = %auth.username, role = %auth.role, required = %required_role, "Permission denied");
		return Err(Error::PermissionDenied);
	}
	Ok(auth)
}

async fn authorize_or_bootstrap_with(
	auth_adapter: &dyn AuthAdapter,
	token: &BearerToken,
	required_role: &str,
) -> ClResult<Option<AuthCtx>> {
	if auth_adapter.count_users_with_role(required_role).await? == 0 {
		info!(required = %required_role, "No user holds the required role, allowing bootstrap");
		return Ok(None);
	}
	authorize_with(auth_adapter, token, required_role).await.map(Some)
}

/// Require a valid token whose subject is a stored user
pub async fn authenticate(app: &App, token: &BearerToken) -> ClResult<AuthCtx> {
	authenticate_with(app.auth_adapter.as_ref(), token).await
}

/// Require an authenticated user holding exactly `required_role`
pub async fn authorize(app: &App, token: &BearerToken, required_role: &str) -> ClResult<AuthCtx> {
	authorize_with(app.auth_adapter.as_ref(), token, required_role).await
}

/// Like `authorize`, but open while no user holds `required_role`.
///
/// Returns `None` for a request let through that way.
pub async fn authorize_or_bootstrap(
	app: &App,
	token: &BearerToken,
	required_role: &str,
) -> ClResult<Option<AuthCtx>> {
	authorize_or_bootstrap_with(app.auth_adapter.as_ref(), token, required_role).await
}


// vim: ts=4
