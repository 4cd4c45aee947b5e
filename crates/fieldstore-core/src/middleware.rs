//! Route-level access control
//!
//! Installed as a route layer, so it runs before any of the handler's own
//! extractors. A request that fails the check is answered without its body,
//! query or path parameters ever being looked at.

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};

use fieldstore_types::auth_adapter::ADMIN_ROLE;
use fieldstore_types::prelude::*;

use crate::app::App;
use crate::extract::{Auth, BearerToken};
use crate::gate;

/// Access level of a route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
	Public,
	/// Any stored user with a valid token
	Authenticated,
	/// Users holding the `admin` role
	Admin,
	/// `Admin`, but open while no user holds the `admin` role
	AdminBootstrap,
}

/// Enforce `access` and hand the resolved caller to the handler as `Auth`
pub async fn require_access(
	State((app, access)): State<(App, Access)>,
	token: BearerToken,
	mut req: Request,
	next: Next,
) -> ClResult<Response> {
	let auth = match access {
		Access::Public => None,
		Access::Authenticated => Some(gate::authenticate(&app, &token).await?),
		Access::Admin => Some(gate::authorize(&app, &token, ADMIN_ROLE).await?),
		Access::AdminBootstrap => gate::authorize_or_bootstrap(&app, &token, ADMIN_ROLE).await?,
	};

	if let Some(auth) = auth {
		req.extensions_mut().insert(Auth(auth));
	}

	Ok(next.run(req).await)
}

// vim: ts=4
