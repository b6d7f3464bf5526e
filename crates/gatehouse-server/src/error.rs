// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and their HTTP responses.
//!
//! Bodies are plain text: the person reading them is the user whose browser
//! followed the OAuth redirect.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use gatehouse_server_grant::GrantError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("error parsing request: {0}")]
	BadRequest(String),

	#[error(transparent)]
	Grant(#[from] GrantError),

	#[error("You are not in the {org} organisation. Please follow these directions and try again: {enrollment_url}")]
	NotEnrolled { org: String, enrollment_url: String },

	#[error("internal server error: {0}")]
	Internal(String),

	#[error("startup failed: {0}")]
	Startup(String),
}

impl ServerError {
	pub fn status(&self) -> StatusCode {
		match self {
			ServerError::NotEnrolled { .. } => StatusCode::FORBIDDEN,
			ServerError::Grant(e) if e.is_denial() => StatusCode::FORBIDDEN,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status();
		match &self {
			ServerError::BadRequest(msg) => {
				tracing::warn!(error = %msg, "bad request");
			}
			ServerError::NotEnrolled { org, .. } => {
				tracing::warn!(%org, "denied: not enrolled");
			}
			ServerError::Grant(e) if e.is_denial() => {
				tracing::warn!(error = %e, "denied");
			}
			ServerError::Grant(e) => {
				tracing::error!(error = %e, "grant failed");
			}
			ServerError::Internal(msg) | ServerError::Startup(msg) => {
				tracing::error!(error = %msg, "internal error");
			}
		}
		(status, self.to_string()).into_response()
	}
}
