// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file and the environment.

use std::path::PathBuf;

use gatehouse_common_config::{load_secret_env, SecretString};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	split_list, GateConfigLayer, GitHubAppConfigLayer, HttpConfigLayer, LogFormat,
	LoggingConfigLayer, OAuthConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/gatehouse/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `GATEHOUSE_SERVER_<FIELD>`. Secrets also accept `<NAME>_FILE`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			logging: Some(load_logging_from_env()?),
			oauth: Some(load_oauth_from_env()?),
			github_app: Some(load_github_app_from_env()?),
			gate: Some(load_gate_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::invalid(name, format!("invalid u16 value '{v}'"))),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::invalid(name, format!("invalid u64 value '{v}'"))),
		None => Ok(None),
	}
}

fn env_list(name: &str) -> Option<Vec<String>> {
	env_var(name).map(|v| split_list(&v))
}

fn env_secret(name: &str) -> Result<Option<SecretString>, ConfigError> {
	load_secret_env(name).map_err(|e| ConfigError::Secret(e.to_string()))
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("GATEHOUSE_SERVER_HOST"),
		port: env_u16("GATEHOUSE_SERVER_PORT")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("GATEHOUSE_SERVER_LOG_LEVEL"),
		format: env_var("GATEHOUSE_SERVER_LOG_FORMAT")
			.map(|v| v.parse::<LogFormat>())
			.transpose()?,
	})
}

fn load_oauth_from_env() -> Result<OAuthConfigLayer, ConfigError> {
	Ok(OAuthConfigLayer {
		client_id: env_var("GATEHOUSE_SERVER_GITHUB_CLIENT_ID"),
		client_secret: env_secret("GATEHOUSE_SERVER_GITHUB_CLIENT_SECRET")?,
		scopes: env_list("GATEHOUSE_SERVER_GITHUB_SCOPES"),
		web_url: env_var("GATEHOUSE_SERVER_GITHUB_WEB_URL"),
	})
}

fn load_github_app_from_env() -> Result<GitHubAppConfigLayer, ConfigError> {
	Ok(GitHubAppConfigLayer {
		app_id: env_u64("GATEHOUSE_SERVER_GITHUB_APP_ID")?,
		installation_id: env_u64("GATEHOUSE_SERVER_GITHUB_APP_INSTALLATION_ID")?,
		private_key_pem: env_secret("GATEHOUSE_SERVER_GITHUB_APP_PRIVATE_KEY")?,
		private_key_file: None,
		api_url: env_var("GATEHOUSE_SERVER_GITHUB_API_URL"),
	})
}

fn load_gate_from_env() -> GateConfigLayer {
	GateConfigLayer {
		target_repo: env_var("GATEHOUSE_SERVER_TARGET_REPO"),
		org: env_var("GATEHOUSE_SERVER_GATE_ORG"),
		team: env_var("GATEHOUSE_SERVER_GATE_TEAM"),
		enrollment_url: env_var("GATEHOUSE_SERVER_ENROLLMENT_URL"),
		bot_markers: env_list("GATEHOUSE_SERVER_BOT_MARKERS"),
	}
}
