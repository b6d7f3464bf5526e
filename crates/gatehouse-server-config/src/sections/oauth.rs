// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth app configuration section.

use gatehouse_common_config::SecretString;
use serde::Deserialize;
use url::Url;

use super::parse_github_url;
use crate::error::ConfigError;

pub const DEFAULT_SCOPES: &[&str] = &["repo", "read:org"];
pub const DEFAULT_WEB_URL: &str = "https://github.com";

/// GitHub OAuth layer (all fields optional for layering).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthConfigLayer {
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub client_secret: Option<SecretString>,
	#[serde(default)]
	pub scopes: Option<Vec<String>>,
	/// Web host serving `/login/oauth/*` and repository pages.
	#[serde(default)]
	pub web_url: Option<String>,
}

impl OAuthConfigLayer {
	pub fn merge(&mut self, other: OAuthConfigLayer) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.scopes.is_some() {
			self.scopes = other.scopes;
		}
		if other.web_url.is_some() {
			self.web_url = other.web_url;
		}
	}

	/// Build the resolved section. The client id and secret are required.
	pub fn build(self) -> Result<OAuthConfig, ConfigError> {
		let client_id = self
			.client_id
			.filter(|s| !s.is_empty())
			.ok_or_else(|| ConfigError::Missing("oauth.client_id".to_string()))?;

		let client_secret = self
			.client_secret
			.ok_or_else(|| ConfigError::Missing("oauth.client_secret".to_string()))?;
		if client_secret.is_empty() {
			return Err(ConfigError::Validation(
				"GitHub OAuth client_secret cannot be empty".to_string(),
			));
		}

		let scopes = self
			.scopes
			.unwrap_or_else(|| DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect());
		if scopes.is_empty() {
			return Err(ConfigError::Validation(
				"at least one OAuth scope is required".to_string(),
			));
		}

		let web_url = parse_github_url(
			"oauth.web_url",
			self.web_url.as_deref().unwrap_or(DEFAULT_WEB_URL),
		)?;

		Ok(OAuthConfig {
			client_id,
			client_secret,
			scopes,
			web_url,
		})
	}
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	pub scopes: Vec<String>,
	pub web_url: Url,
}
