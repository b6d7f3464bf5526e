// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod gate;
mod github_app;
mod http;
mod logging;
mod oauth;

pub use gate::{GateConfig, GateConfigLayer, TargetRepo, DEFAULT_BOT_MARKERS, DEFAULT_ENROLLMENT_URL};
pub use github_app::{GitHubAppConfig, GitHubAppConfigLayer, DEFAULT_API_URL};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use oauth::{OAuthConfig, OAuthConfigLayer, DEFAULT_SCOPES, DEFAULT_WEB_URL};

use url::Url;

use crate::error::ConfigError;

/// Split a list written with commas and/or whitespace, dropping empties.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
	raw
		.split(|c: char| c == ',' || c.is_whitespace())
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}

/// Parse a GitHub endpoint: HTTPS, with a non-loopback host, trailing slash
/// on the path so relative joins keep any `/api/v3` prefix.
pub(crate) fn parse_github_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
	let mut url = Url::parse(raw).map_err(|e| ConfigError::invalid(key, format!("'{raw}': {e}")))?;

	if url.scheme() != "https" {
		return Err(ConfigError::invalid(
			key,
			format!("must use https, got '{}'", url.scheme()),
		));
	}

	match url.host_str() {
		None => return Err(ConfigError::invalid(key, "must include a host")),
		Some("localhost" | "127.0.0.1" | "[::1]") => {
			return Err(ConfigError::invalid(key, "must not be localhost"));
		}
		Some(_) => {}
	}

	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());
		url.set_path(&path);
	}

	Ok(url)
}
