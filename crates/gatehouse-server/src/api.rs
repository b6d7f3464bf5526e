// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::any::Any;
use std::sync::Arc;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
	Router,
};
use gatehouse_server_auth_github::{GitHubOAuthClient, GitHubOAuthConfig};
use gatehouse_server_config::{GateConfig, ServerConfig};
use gatehouse_server_github_app::{GithubAppClient, GithubAppConfig};
use gatehouse_server_grant::{GitHubSessions, GrantService, RepoRef, TeamGate};
use tower_http::catch_panic::CatchPanicLayer;
use url::Url;

use crate::{error::ServerError, routes};

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
	pub grant: GrantService,
	/// GitHub consent-screen URL that `/link` redirects to.
	pub authorize_url: String,
	pub target: RepoRef,
	/// Where every successful `/authorize` lands.
	pub repository_url: String,
	pub enrollment_url: String,
	/// Lowercased User-Agent substrings that mark automated clients.
	pub bot_markers: Vec<String>,
}

impl AppState {
	pub fn new(
		grant: GrantService,
		authorize_url: impl Into<String>,
		gate: &GateConfig,
		web_url: &Url,
	) -> Self {
		let target = RepoRef::new(&gate.target.owner, &gate.target.name);
		Self {
			repository_url: repository_url(web_url, &target),
			grant,
			authorize_url: authorize_url.into(),
			target,
			enrollment_url: gate.enrollment_url.clone(),
			bot_markers: gate
				.bot_markers
				.iter()
				.filter(|m| !m.is_empty())
				.map(|m| m.to_ascii_lowercase())
				.collect(),
		}
	}
}

/// `{web_url}/{owner}/{name}` regardless of a trailing slash on the base.
pub fn repository_url(web_url: &Url, target: &RepoRef) -> String {
	format!(
		"{}/{}/{}",
		web_url.as_str().trim_end_matches('/'),
		target.owner,
		target.name
	)
}

/// Build the GitHub clients and grant service from configuration.
///
/// # Errors
///
/// Returns [`ServerError::Startup`] when a client cannot be constructed, for
/// example because the App private key is not a valid RSA PEM.
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let oauth_config = GitHubOAuthConfig::new(
		config.oauth.client_id.clone(),
		config.oauth.client_secret.expose().clone(),
	)
	.with_scopes(config.oauth.scopes.clone())
	.with_web_url(config.oauth.web_url.clone());
	oauth_config
		.validate()
		.map_err(|e| ServerError::Startup(format!("GitHub OAuth: {e}")))?;
	let oauth = GitHubOAuthClient::new(oauth_config)
		.map_err(|e| ServerError::Startup(format!("GitHub OAuth client: {e}")))?;
	let authorize_url = oauth.authorization_url();

	let app = &config.github_app;
	let app_client = GithubAppClient::new(
		GithubAppConfig::new(
			app.app_id,
			app.installation_id,
			app.private_key_pem.expose().clone(),
		)
		.with_base_url(app.api_url.clone()),
	)
	.map_err(|e| ServerError::Startup(format!("GitHub App client: {e}")))?;

	let http_client = gatehouse_common_http::new_client()
		.map_err(|e| ServerError::Startup(format!("HTTP client: {e}")))?;
	let sessions = GitHubSessions::new(oauth, http_client, app.api_url.clone());

	let grant = GrantService::new(
		Arc::new(sessions),
		Arc::new(app_client),
		TeamGate {
			org: config.gate.org.clone(),
			team_slug: config.gate.team.clone(),
		},
	);

	tracing::info!(
		target_repo = %config.gate.target,
		org = %config.gate.org,
		team = %config.gate.team,
		"grant service ready"
	);

	Ok(AppState::new(
		grant,
		authorize_url,
		&config.gate,
		&config.oauth.web_url,
	))
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/link", get(routes::link::link))
		.route("/authorize", get(routes::authorize::authorize))
		.route("/health", get(routes::health::health_check))
		.layer(CatchPanicLayer::custom(handle_panic))
		.with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
	let detail = if let Some(s) = panic.downcast_ref::<String>() {
		s.clone()
	} else if let Some(s) = panic.downcast_ref::<&str>() {
		s.to_string()
	} else {
		"unknown panic payload".to_string()
	};
	tracing::error!(panic = %detail, "handler panicked");
	(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}
