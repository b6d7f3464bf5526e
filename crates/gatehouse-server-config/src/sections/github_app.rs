// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub App configuration section.

use std::path::PathBuf;

use gatehouse_common_config::SecretString;
use serde::Deserialize;
use url::Url;

use super::parse_github_url;
use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Configuration layer for the GitHub App (all fields optional for layering).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubAppConfigLayer {
	#[serde(default)]
	pub app_id: Option<u64>,
	#[serde(default)]
	pub installation_id: Option<u64>,
	/// PEM-encoded RSA private key for JWT signing.
	#[serde(default)]
	pub private_key_pem: Option<SecretString>,
	/// Path to the PEM file; used when `private_key_pem` is not set.
	#[serde(default)]
	pub private_key_file: Option<PathBuf>,
	#[serde(default)]
	pub api_url: Option<String>,
}

impl GitHubAppConfigLayer {
	/// Merge with another layer, preferring values from `other`.
	pub fn merge(&mut self, other: GitHubAppConfigLayer) {
		if other.app_id.is_some() {
			self.app_id = other.app_id;
		}
		if other.installation_id.is_some() {
			self.installation_id = other.installation_id;
		}
		if other.private_key_pem.is_some() {
			self.private_key_pem = other.private_key_pem;
		}
		if other.private_key_file.is_some() {
			self.private_key_file = other.private_key_file;
		}
		if other.api_url.is_some() {
			self.api_url = other.api_url;
		}
	}

	/// Build the resolved section. App id, installation id and a private key
	/// are required.
	pub fn build(self) -> Result<GitHubAppConfig, ConfigError> {
		let app_id = self
			.app_id
			.ok_or_else(|| ConfigError::Missing("github_app.app_id".to_string()))?;
		let installation_id = self
			.installation_id
			.ok_or_else(|| ConfigError::Missing("github_app.installation_id".to_string()))?;

		let private_key_pem = match (self.private_key_pem, self.private_key_file) {
			(Some(pem), _) => pem,
			(None, Some(path)) => {
				let content = std::fs::read_to_string(&path)
					.map_err(|source| ConfigError::FileRead { path, source })?;
				SecretString::new(content)
			}
			(None, None) => {
				return Err(ConfigError::Missing(
					"github_app.private_key_pem or github_app.private_key_file".to_string(),
				));
			}
		};

		if private_key_pem.is_empty() {
			return Err(ConfigError::Validation(
				"GitHub App private key cannot be empty".to_string(),
			));
		}

		let api_url = parse_github_url(
			"github_app.api_url",
			self.api_url.as_deref().unwrap_or(DEFAULT_API_URL),
		)?;

		Ok(GitHubAppConfig {
			app_id,
			installation_id,
			private_key_pem,
			api_url,
		})
	}
}

/// Validated GitHub App configuration.
#[derive(Debug, Clone)]
pub struct GitHubAppConfig {
	pub app_id: u64,
	pub installation_id: u64,
	pub private_key_pem: SecretString,
	pub api_url: Url,
}
