//! Startup provisioning of the configured admin account

use crate::prelude::*;
use fieldstore_types::auth_adapter::{ADMIN_ROLE, Role};

async fn ensure_admin_role(app: &App) -> ClResult<Role> {
	match app.auth_adapter.read_role_by_name(ADMIN_ROLE).await {
		Ok(role) => Ok(role),
		Err(Error::NotFound) => match app.auth_adapter.create_role(ADMIN_ROLE).await {
			Ok(role) => Ok(role),
			// Created concurrently by another instance
			Err(Error::DuplicateRole) => app.auth_adapter.read_role_by_name(ADMIN_ROLE).await,
			Err(err) => Err(err),
		},
		Err(err) => Err(err),
	}
}

/// Ensure the `admin` role and the configured admin user exist.
///
/// Does nothing unless both an admin username and password are configured.
/// An existing user is never modified.
pub async fn bootstrap(app: &App) -> ClResult<()> {
	let (Some(username), Some(password)) = (&app.opts.admin_user, &app.opts.admin_password) else {
		debug!("No admin account configured, skipping bootstrap");
		return Ok(());
	};

	let role = ensure_admin_role(app).await?;

	match app.auth_adapter.read_user_by_username(username).await {
		Ok(user) if user.role.name.as_ref() == ADMIN_ROLE => {
			debug!(user = %username, "Admin user already exists");
		}
		Ok(user) => {
			warn!(user = %username, role = %user.role.name, "Configured admin user exists with another role");
		}
		Err(Error::NotFound) => {
			app.auth_adapter.create_user(username, password, role.id).await?;
			info!(user = %username, "Created admin user");
		}
		Err(err) => return Err(err),
	}

	Ok(())
}

// vim: ts=4
