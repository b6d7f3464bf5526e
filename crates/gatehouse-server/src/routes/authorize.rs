// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GET /authorize - the OAuth callback.

use axum::{
	extract::{rejection::QueryRejection, Query, State},
	response::Redirect,
};
use gatehouse_server_grant::{GrantError, GrantRequest};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{api::AppState, error::ServerError};

#[derive(Debug, Deserialize)]
pub struct AuthorizeParams {
	pub code: Option<String>,
}

/// Run the grant pipeline for the code GitHub handed back, then redirect
/// (303) to the repository.
#[instrument(skip_all)]
pub async fn authorize(
	State(state): State<AppState>,
	query: Result<Query<AuthorizeParams>, QueryRejection>,
) -> Result<Redirect, ServerError> {
	let Query(params) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;
	let code = params
		.code
		.filter(|c| !c.is_empty())
		.ok_or_else(|| ServerError::BadRequest("missing code parameter".to_string()))?;

	let request = GrantRequest {
		code,
		target: state.target.clone(),
	};

	match state.grant.authorize(&request).await {
		Ok(grant) => {
			info!(login = %grant.login, outcome = grant.outcome.as_str(), "access granted");
			Ok(Redirect::to(&state.repository_url))
		}
		Err(GrantError::NotMember { org, .. }) => Err(ServerError::NotEnrolled {
			org,
			enrollment_url: state.enrollment_url.clone(),
		}),
		Err(e) => Err(e.into()),
	}
}
