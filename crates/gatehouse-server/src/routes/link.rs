// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GET /link - start the OAuth flow.

use axum::{
	extract::State,
	http::{header::USER_AGENT, HeaderMap, StatusCode},
	response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, instrument};

use crate::api::AppState;

/// True when `user_agent` contains any of the lowercased `markers`,
/// ignoring case.
pub fn is_automated(user_agent: &str, markers: &[String]) -> bool {
	let user_agent = user_agent.to_ascii_lowercase();
	markers
		.iter()
		.any(|marker| !marker.is_empty() && user_agent.contains(marker.as_str()))
}

/// Redirect (303) to the GitHub consent screen.
///
/// Link unfurlers and crawlers get an empty 200 instead so they never walk
/// into the OAuth flow.
#[instrument(skip_all)]
pub async fn link(State(state): State<AppState>, headers: HeaderMap) -> Response {
	let user_agent = headers
		.get(USER_AGENT)
		.and_then(|v| v.to_str().ok())
		.unwrap_or_default();

	if is_automated(user_agent, &state.bot_markers) {
		debug!(user_agent, "ignoring automated client");
		return StatusCode::OK.into_response();
	}

	Redirect::to(&state.authorize_url).into_response()
}
