// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the GitHub clients.

use thiserror::Error;

/// Errors that can occur when talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GithubAppError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// Bad credentials (401).
	#[error("Unauthorized or invalid credentials")]
	Unauthorized,

	/// 403 that is not a rate limit.
	#[error("Forbidden or insufficient permissions")]
	Forbidden,

	/// 404. GitHub also answers 404 for private resources the caller cannot see.
	#[error("Not found")]
	NotFound,

	/// Rate limit exceeded (403 or 429 mentioning the rate limit).
	#[error("Rate limit exceeded")]
	RateLimited,

	/// Any other non-success status.
	#[error("GitHub API error: {status} - {message}")]
	ApiError { status: u16, message: String },

	/// Invalid or unparseable response.
	#[error("Invalid response from GitHub: {0}")]
	InvalidResponse(String),

	/// Configuration error.
	#[error("Configuration error: {0}")]
	Config(String),

	/// JWT signing/encoding error.
	#[error("JWT error: {0}")]
	Jwt(String),
}

impl GithubAppError {
	/// Create an API error from status code and message.
	pub fn api_error(status: u16, message: impl Into<String>) -> Self {
		Self::ApiError {
			status,
			message: message.into(),
		}
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, GithubAppError::NotFound)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_api_error_display() {
		let err = GithubAppError::api_error(502, "Bad Gateway");
		assert_eq!(err.to_string(), "GitHub API error: 502 - Bad Gateway");
	}

	#[test]
	fn test_not_found_helper() {
		assert!(GithubAppError::NotFound.is_not_found());
		assert!(!GithubAppError::Forbidden.is_not_found());
		assert!(!GithubAppError::api_error(404, "raw").is_not_found());
	}
}
