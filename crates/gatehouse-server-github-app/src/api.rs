// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request plumbing shared by the App and user clients.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{error, warn};
use url::Url;

use crate::error::GithubAppError;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, GithubAppError> {
	base
		.join(path)
		.map_err(|e| GithubAppError::Config(format!("Invalid URL: {e}")))
}

/// Attach the bearer token and GitHub's versioning headers.
pub(crate) fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
	builder
		.bearer_auth(token)
		.header("Accept", ACCEPT)
		.header("X-GitHub-Api-Version", API_VERSION)
}

/// Send a request, turning transport failures and non-success statuses into
/// [`GithubAppError`].
pub(crate) async fn send(builder: RequestBuilder) -> Result<Response, GithubAppError> {
	let response = builder.send().await.map_err(|e| {
		if e.is_timeout() {
			error!("GitHub request timed out");
			return GithubAppError::Timeout;
		}
		error!(error = %e, "Network error talking to GitHub");
		GithubAppError::Network(e)
	})?;

	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let body = response.text().await.unwrap_or_default();
	Err(map_github_error(status, &body))
}

pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> Result<T, GithubAppError> {
	response.json::<T>().await.map_err(|e| {
		error!(error = %e, "Failed to parse GitHub response");
		GithubAppError::InvalidResponse(format!("JSON parse error: {e}"))
	})
}

/// Classify a non-success GitHub response.
///
/// GitHub reports rate limiting as either 403 or 429 with a message naming
/// the limit; those never become `Forbidden`.
pub(crate) fn map_github_error(status: StatusCode, body: &str) -> GithubAppError {
	let status_code = status.as_u16();
	let lower = body.to_lowercase();
	let mentions_rate_limit = lower.contains("rate limit") || lower.contains("api rate");

	match status_code {
		401 => {
			warn!(status = status_code, "Unauthorized request to GitHub");
			GithubAppError::Unauthorized
		}
		403 | 429 if mentions_rate_limit => {
			warn!(status = status_code, "GitHub rate limit exceeded");
			GithubAppError::RateLimited
		}
		403 => {
			warn!(status = status_code, "Forbidden request to GitHub");
			GithubAppError::Forbidden
		}
		404 => GithubAppError::NotFound,
		_ => {
			error!(status = status_code, body = %body, "GitHub API error");
			GithubAppError::ApiError {
				status: status_code,
				message: body.to_string(),
			}
		}
	}
}
