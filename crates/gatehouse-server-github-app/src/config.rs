// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration for the GitHub App client.

use gatehouse_common_config::{Secret, SecretString};
use url::Url;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Ensure the path ends in `/` so relative joins keep any `/api/v3` prefix.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());
		url.set_path(&path);
	}
	url
}

/// Identity of the GitHub App installation that issues invitations.
///
/// The private key is held as a [`SecretString`] and never printed.
#[derive(Clone)]
pub struct GithubAppConfig {
	app_id: u64,
	installation_id: u64,
	private_key_pem: SecretString,
	base_url: Url,
}

impl std::fmt::Debug for GithubAppConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GithubAppConfig")
			.field("app_id", &self.app_id)
			.field("installation_id", &self.installation_id)
			.field("private_key_pem", &self.private_key_pem)
			.field("base_url", &self.base_url.as_str())
			.finish()
	}
}

impl GithubAppConfig {
	/// Create a configuration against `https://api.github.com`.
	pub fn new(app_id: u64, installation_id: u64, private_key_pem: impl Into<String>) -> Self {
		Self {
			app_id,
			installation_id,
			private_key_pem: Secret::new(private_key_pem.into()),
			base_url: Url::parse(DEFAULT_API_URL).expect("default URL is valid"),
		}
	}

	/// Point the client at another REST root (GitHub Enterprise, or a mock
	/// server in tests). Validation of configured URLs happens at config load.
	pub fn with_base_url(mut self, url: Url) -> Self {
		self.base_url = with_trailing_slash(url);
		self
	}

	pub fn app_id(&self) -> u64 {
		self.app_id
	}

	pub fn installation_id(&self) -> u64 {
		self.installation_id
	}

	pub(crate) fn private_key_pem(&self) -> &str {
		self.private_key_pem.expose()
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_config_new() {
		let config = GithubAppConfig::new(12345, 678, "test-private-key");
		assert_eq!(config.app_id(), 12345);
		assert_eq!(config.installation_id(), 678);
		assert_eq!(config.private_key_pem(), "test-private-key");
		assert_eq!(config.base_url().as_str(), "https://api.github.com/");
	}

	#[test]
	fn test_with_base_url_adds_trailing_slash() {
		let config = GithubAppConfig::new(1, 2, "key")
			.with_base_url(Url::parse("https://github.example.com/api/v3").unwrap());
		assert_eq!(
			config.base_url().as_str(),
			"https://github.example.com/api/v3/"
		);
		assert_eq!(
			config.base_url().join("user").unwrap().as_str(),
			"https://github.example.com/api/v3/user"
		);
	}

	#[test]
	fn test_debug_redacts_private_key() {
		let config = GithubAppConfig::new(1, 2, "-----BEGIN super-secret-key");
		let debug_str = format!("{config:?}");

		assert!(!debug_str.contains("super-secret-key"));
		assert!(debug_str.contains("[REDACTED]"));
	}
}
