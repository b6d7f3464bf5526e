// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access gate configuration: which repository is handed out, and who may
//! have it.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::split_list;
use crate::error::ConfigError;

pub const DEFAULT_ENROLLMENT_URL: &str = "https://www.unrealengine.com/en-US/ue-on-github";

/// Link-preview and crawler User-Agent tokens, lowercase.
///
/// Named crawlers rather than a bare `bot`, which also matches phone models
/// such as "Cubot".
pub const DEFAULT_BOT_MARKERS: &[&str] = &[
	"googlebot",
	"bingbot",
	"applebot",
	"duckduckbot",
	"yandexbot",
	"baiduspider",
	"slackbot",
	"discordbot",
	"twitterbot",
	"linkedinbot",
	"telegrambot",
	"facebookexternalhit",
	"skypeuripreview",
	"embedly",
];

/// The repository access is granted to, written `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRepo {
	pub owner: String,
	pub name: String,
}

fn is_login_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '-'
}

fn is_repo_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl FromStr for TargetRepo {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = |message: &str| ConfigError::invalid("gate.target_repo", format!("'{s}': {message}"));

		let (owner, name) = s
			.trim()
			.split_once('/')
			.ok_or_else(|| invalid("expected owner/name"))?;

		if owner.is_empty() || !owner.chars().all(is_login_char) {
			return Err(invalid("owner must be a GitHub login"));
		}
		if name.is_empty() || name == "." || name == ".." || !name.chars().all(is_repo_char) {
			return Err(invalid("name must be a GitHub repository name"));
		}

		Ok(TargetRepo {
			owner: owner.to_string(),
			name: name.to_string(),
		})
	}
}

impl fmt::Display for TargetRepo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GateConfigLayer {
	#[serde(default)]
	pub target_repo: Option<String>,
	/// Organization owning the gating team.
	#[serde(default)]
	pub org: Option<String>,
	/// Slug of the gating team.
	#[serde(default)]
	pub team: Option<String>,
	#[serde(default)]
	pub enrollment_url: Option<String>,
	#[serde(default)]
	pub bot_markers: Option<Vec<String>>,
}

impl GateConfigLayer {
	pub fn merge(&mut self, other: GateConfigLayer) {
		if other.target_repo.is_some() {
			self.target_repo = other.target_repo;
		}
		if other.org.is_some() {
			self.org = other.org;
		}
		if other.team.is_some() {
			self.team = other.team;
		}
		if other.enrollment_url.is_some() {
			self.enrollment_url = other.enrollment_url;
		}
		if other.bot_markers.is_some() {
			self.bot_markers = other.bot_markers;
		}
	}

	pub fn build(self) -> Result<GateConfig, ConfigError> {
		let target = self
			.target_repo
			.ok_or_else(|| ConfigError::Missing("gate.target_repo".to_string()))?
			.parse::<TargetRepo>()?;

		let org = self
			.org
			.filter(|s| !s.is_empty())
			.ok_or_else(|| ConfigError::Missing("gate.org".to_string()))?;
		if !org.chars().all(is_login_char) {
			return Err(ConfigError::invalid("gate.org", format!("'{org}' is not a GitHub login")));
		}

		let team = self
			.team
			.filter(|s| !s.is_empty())
			.ok_or_else(|| ConfigError::Missing("gate.team".to_string()))?;
		if !team.chars().all(is_repo_char) {
			return Err(ConfigError::invalid("gate.team", format!("'{team}' is not a team slug")));
		}

		let enrollment_url = self
			.enrollment_url
			.unwrap_or_else(|| DEFAULT_ENROLLMENT_URL.to_string());
		url::Url::parse(&enrollment_url)
			.map_err(|e| ConfigError::invalid("gate.enrollment_url", e.to_string()))?;

		let bot_markers = self
			.bot_markers
			.unwrap_or_else(|| DEFAULT_BOT_MARKERS.iter().map(|s| s.to_string()).collect())
			.into_iter()
			.flat_map(|m| split_list(&m))
			.map(|m| m.to_ascii_lowercase())
			.collect();

		Ok(GateConfig {
			target,
			org,
			team,
			enrollment_url,
			bot_markers,
		})
	}
}

#[derive(Debug, Clone)]
pub struct GateConfig {
	pub target: TargetRepo,
	pub org: String,
	pub team: String,
	/// Shown to users who are not in the gating team.
	pub enrollment_url: String,
	/// Lower-cased User-Agent substrings that mark automated traffic.
	pub bot_markers: Vec<String>,
}
