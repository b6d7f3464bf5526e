// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitHub OAuth for Gatehouse.
//!
//! Two halves of the authorization-code flow live here:
//!
//! 1. [`GitHubOAuthClient::authorization_url`] builds the consent-screen URL
//!    that `/link` redirects to. The scopes must let the resulting token read
//!    team visibility and accept repository invitations.
//! 2. [`GitHubOAuthClient::exchange_code`] trades the one-time `code` from the
//!    callback for a user access token. Codes are single use, so a failed
//!    exchange is never retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use gatehouse_server_auth_github::{GitHubOAuthClient, GitHubOAuthConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GitHubOAuthConfig::new("Iv1.abc", "client-secret");
//! let client = GitHubOAuthClient::new(config)?;
//!
//! let consent = client.authorization_url();
//! let token = client.exchange_code("code-from-callback").await?;
//! # let _ = (consent, token);
//! # Ok(())
//! # }
//! ```
//!
//! The client secret and the returned access token are both wrapped in
//! [`SecretString`]; neither appears in `Debug` output or in traces.

use gatehouse_common_config::SecretString;
use serde::Deserialize;
use url::Url;

/// Public GitHub web host; the OAuth endpoints hang off it.
pub const GITHUB_WEB_URL: &str = "https://github.com";

const AUTHORIZE_PATH: &str = "login/oauth/authorize";
const TOKEN_PATH: &str = "login/oauth/access_token";

/// `repo` covers reading private repositories and accepting invitations,
/// `read:org` covers team lookups.
pub const DEFAULT_SCOPES: &[&str] = &["repo", "read:org"];

// =============================================================================
// Errors
// =============================================================================

/// Configuration problems detected by [`GitHubOAuthConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Failures of the code exchange.
///
/// `HttpRequest` and `GitHubError` mean the exchange itself failed;
/// `ParseError` means GitHub answered but not with a usable token.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	#[error("failed to parse response: {0}")]
	ParseError(String),

	#[error("GitHub API error: {0}")]
	GitHubError(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Credentials and endpoints for the OAuth app.
#[derive(Debug, Clone)]
pub struct GitHubOAuthConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	pub scopes: Vec<String>,
	/// Web host serving `/login/oauth/*`. Overridden for GitHub Enterprise and
	/// in tests.
	pub web_url: Url,
}

impl GitHubOAuthConfig {
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: SecretString::new(client_secret.into()),
			scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
			web_url: Url::parse(GITHUB_WEB_URL).expect("constant URL is valid"),
		}
	}

	pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
		self.scopes = scopes;
		self
	}

	pub fn with_web_url(mut self, web_url: Url) -> Self {
		self.web_url = web_url;
		self
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"client_id cannot be empty".to_string(),
			));
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"client_secret cannot be empty".to_string(),
			));
		}
		if self.scopes.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"at least one OAuth scope is required".to_string(),
			));
		}
		Ok(())
	}

	/// Scopes as GitHub's `scope` query value: comma separated.
	pub fn scopes_string(&self) -> String {
		self.scopes.join(",")
	}

	fn endpoint(&self, path: &str) -> Url {
		let mut base = self.web_url.clone();
		if !base.path().ends_with('/') {
			let with_slash = format!("{}/", base.path());
			base.set_path(&with_slash);
		}
		base.join(path).expect("OAuth paths are relative")
	}
}

// =============================================================================
// Response types
// =============================================================================

/// Successful answer from the token endpoint.
#[derive(Debug, Clone)]
pub struct GitHubTokenResponse {
	pub access_token: SecretString,
	/// Scopes the user actually granted, comma separated.
	pub scope: String,
}

#[derive(Deserialize)]
struct RawTokenResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	scope: Option<String>,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
}

impl RawTokenResponse {
	fn into_token(self) -> Result<GitHubTokenResponse, OAuthError> {
		if let Some(error) = self.error.filter(|e| !e.is_empty()) {
			return Err(OAuthError::GitHubError(
				self.error_description.unwrap_or(error),
			));
		}

		let access_token = self
			.access_token
			.filter(|t| !t.is_empty())
			.ok_or_else(|| {
				OAuthError::ParseError("token response has no access_token".to_string())
			})?;

		Ok(GitHubTokenResponse {
			access_token: SecretString::new(access_token),
			scope: self.scope.unwrap_or_default(),
		})
	}
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct GitHubOAuthClient {
	config: GitHubOAuthConfig,
	http_client: reqwest::Client,
}

impl GitHubOAuthClient {
	#[tracing::instrument(skip_all, name = "GitHubOAuthClient::new")]
	pub fn new(config: GitHubOAuthConfig) -> Result<Self, OAuthError> {
		let http_client = gatehouse_common_http::new_client()?;
		Ok(Self {
			config,
			http_client,
		})
	}

	/// The consent-screen URL carrying `client_id` and `scope`.
	#[tracing::instrument(skip(self), fields(client_id = %self.config.client_id))]
	pub fn authorization_url(&self) -> String {
		let mut url = self.config.endpoint(AUTHORIZE_PATH);
		url
			.query_pairs_mut()
			.append_pair("client_id", &self.config.client_id)
			.append_pair("scope", &self.config.scopes_string());
		url.to_string()
	}

	/// Exchange a one-time authorization code for a user access token.
	///
	/// # Errors
	///
	/// - [`OAuthError::HttpRequest`]: GitHub could not be reached.
	/// - [`OAuthError::GitHubError`]: GitHub rejected the code.
	/// - [`OAuthError::ParseError`]: the body was not JSON or had no token.
	#[tracing::instrument(skip(self, code), name = "GitHubOAuthClient::exchange_code")]
	pub async fn exchange_code(&self, code: &str) -> Result<GitHubTokenResponse, OAuthError> {
		tracing::debug!("exchanging authorization code for access token");

		let response = self
			.http_client
			.post(self.config.endpoint(TOKEN_PATH))
			.header("Accept", "application/json")
			.form(&[
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.expose().as_str()),
				("code", code),
			])
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		let raw: RawTokenResponse = match serde_json::from_str(&body) {
			Ok(raw) => raw,
			Err(e) if status.is_success() => {
				return Err(OAuthError::ParseError(format!(
					"failed to parse token response: {e}"
				)));
			}
			Err(_) => {
				return Err(OAuthError::GitHubError(format!(
					"token endpoint returned {status}"
				)));
			}
		};

		let token = raw.into_token()?;
		tracing::debug!(scope = %token.scope, "received user access token");
		Ok(token)
	}
}
