//! Request extractors
//!
//! Rejections are mapped onto the workspace `Error` so every malformed request
//! answers with the same JSON error body.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::{header, request::Parts};
use serde::de::DeserializeOwned;

use fieldstore_types::auth_adapter::AuthCtx;
use fieldstore_types::prelude::*;

// Auth //
//******//
/// Caller resolved by the route's access check
#[derive(Debug, Clone)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// OptionalAuth //
//**************//
/// Caller of a route that may be reached without authentication
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthCtx>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(parts.extensions.get::<Auth>().map(|auth| auth.0.clone())))
	}
}

// BearerToken //
//*************//
/// Bearer token from the `Authorization` header, if any.
///
/// Only reads the header. Whether the token is acceptable is decided by the
/// `gate` functions.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<Box<str>>);

impl<S> FromRequestParts<S> for BearerToken
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let token = parts
			.headers
			.get(header::AUTHORIZATION)
			.and_then(|h| h.to_str().ok())
			.and_then(|h| h.strip_prefix("Bearer "))
			.map(str::trim)
			.filter(|t| !t.is_empty())
			.map(Box::from);

		Ok(BearerToken(token))
	}
}

// ValidJson //
//***********//
/// JSON body extractor answering 400 on any body rejection
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		match Json::<T>::from_request(req, state).await {
			Ok(Json(value)) => Ok(ValidJson(value)),
			Err(rejection) => {
				debug!("JSON body rejected: {}", rejection.body_text());
				Err(Error::validation("body", rejection.body_text()))
			}
		}
	}
}

// ValidQuery //
//************//
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		match Query::<T>::from_request_parts(parts, state).await {
			Ok(Query(value)) => Ok(ValidQuery(value)),
			Err(rejection) => Err(Error::validation("query", rejection.body_text())),
		}
	}
}

// IdParam //
//*********//
/// Integer `{id}` path segment. Anything else addresses nothing.
#[derive(Debug, Clone, Copy)]
pub struct IdParam(pub i64);

impl<S> FromRequestParts<S> for IdParam
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		Path::<i64>::from_request_parts(parts, state)
			.await
			.map(|Path(id)| IdParam(id))
			.map_err(|_| Error::NotFound)
	}
}


// vim: ts=4
