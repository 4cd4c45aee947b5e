//! Error type shared by every Fieldstore crate.
//!
//! Each variant maps to exactly one HTTP status and a machine-readable code in
//! the response body, so handlers can simply propagate with `?`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Id-addressed lookup found nothing
	NotFound,
	/// Authenticated, but the caller's role does not permit the operation
	PermissionDenied,
	/// Missing, malformed or expired token
	Unauthorized,
	/// Login with unknown username or wrong password
	BadCredentials,
	DuplicateRole,
	DuplicateUsername,
	/// Registration references a role that does not exist
	RoleNotFound,
	ValidationError {
		field: Box<str>,
		reason: Box<str>,
	},
	Conflict(String),
	DbError,
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	pub fn validation(field: impl Into<Box<str>>, reason: impl Into<Box<str>>) -> Self {
		Error::ValidationError { field: field.into(), reason: reason.into() }
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::ValidationError { .. }
			| Error::RoleNotFound
			| Error::DuplicateRole
			| Error::DuplicateUsername => StatusCode::BAD_REQUEST,
			Error::Unauthorized | Error::BadCredentials => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::Conflict(_) => StatusCode::CONFLICT,
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOT-FOUND",
			Error::PermissionDenied => "E-FORBIDDEN",
			Error::Unauthorized => "E-UNAUTHENTICATED",
			Error::BadCredentials => "E-BAD-CREDENTIALS",
			Error::DuplicateRole => "E-DUPLICATE-ROLE",
			Error::DuplicateUsername => "E-DUPLICATE-USERNAME",
			Error::RoleNotFound => "E-ROLE-NOT-FOUND",
			Error::ValidationError { .. } => "E-VALIDATION",
			Error::Conflict(_) => "E-CONFLICT",
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				"E-INTERNAL"
			}
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "forbidden"),
			Error::Unauthorized => write!(f, "authentication required"),
			Error::BadCredentials => write!(f, "bad username or password"),
			Error::DuplicateRole => write!(f, "role already exists"),
			Error::DuplicateUsername => write!(f, "username already exists"),
			Error::RoleNotFound => write!(f, "role does not exist"),
			Error::ValidationError { field, reason } => write!(f, "{}: {}", field, reason),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		// Internal details stay in the logs
		let message = if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
			"Internal server error".to_string()
		} else {
			self.to_string()
		};

		let body = match &self {
			Error::ValidationError { field, reason } => serde_json::json!({
				"error": {
					"code": self.code(),
					"message": message,
					"details": {
						"field": field,
						"reason": reason
					}
				}
			}),
			_ => serde_json::json!({
				"error": {
					"code": self.code(),
					"message": message
				}
			}),
		};

		(status, Json(body)).into_response()
	}
}


// vim: ts=4
