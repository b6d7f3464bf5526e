// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Gatehouse server.
//!
//! Layered from built-in defaults, a TOML file and `GATEHOUSE_SERVER_*`
//! environment variables, in increasing precedence. Missing or malformed
//! required settings fail [`load_config`], so the server never starts half
//! configured.
//!
//! ```ignore
//! use gatehouse_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("granting {} to members of {}/{}", config.gate.target, config.gate.org, config.gate.team);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub oauth: OAuthConfig,
	pub github_app: GitHubAppConfig,
	pub gate: GateConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`GATEHOUSE_SERVER_*`)
/// 2. Config file (`/etc/gatehouse/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources by precedence and finalize.
pub fn load_config_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let oauth = layer.oauth.unwrap_or_default().build()?;
	let github_app = layer.github_app.unwrap_or_default().build()?;
	let gate = layer.gate.unwrap_or_default().build()?;

	validate_config(&oauth, &github_app)?;

	info!(
		host = %http.host,
		port = http.port,
		target_repo = %gate.target,
		gate_org = %gate.org,
		gate_team = %gate.team,
		app_id = github_app.app_id,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		logging,
		oauth,
		github_app,
		gate,
	})
}

/// Validate cross-section rules.
///
/// The OAuth web host and the REST host must belong to the same GitHub
/// instance: `github.com` with `api.github.com`, or one Enterprise host serving
/// both (`/api/v3`) or its `api.` subdomain.
fn validate_config(oauth: &OAuthConfig, github_app: &GitHubAppConfig) -> Result<(), ConfigError> {
	let web_host = oauth.web_url.host_str().unwrap_or_default();
	let api_host = github_app.api_url.host_str().unwrap_or_default();

	let same_instance = api_host == web_host || api_host.strip_prefix("api.") == Some(web_host);
	if !same_instance {
		return Err(ConfigError::Validation(format!(
			"GitHub web URL {} and API URL {} point at different GitHub instances",
			oauth.web_url, github_app.api_url
		)));
	}

	Ok(())
}
