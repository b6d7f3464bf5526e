// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! App JWT signing.
//!
//! GitHub accepts App JWTs for at most ten minutes. Tokens are issued with
//! `iat` one minute in the past to absorb clock skew and expire nine minutes
//! from now.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GithubAppError;

/// How long a freshly signed JWT is valid for.
pub const JWT_VALIDITY: Duration = Duration::from_secs(9 * 60);

const CLOCK_SKEW_SECS: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
	pub iat: u64,
	pub exp: u64,
	pub iss: String,
}

/// Sign an RS256 JWT identifying the App.
#[instrument(skip(private_key_pem))]
pub fn generate_app_jwt(app_id: u64, private_key_pem: &str) -> Result<String, GithubAppError> {
	let now = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_err(|e| GithubAppError::Jwt(format!("System time error: {e}")))?
		.as_secs();

	let claims = Claims {
		iat: now.saturating_sub(CLOCK_SKEW_SECS),
		exp: now + JWT_VALIDITY.as_secs(),
		iss: app_id.to_string(),
	};

	let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
		.map_err(|e| GithubAppError::Jwt(format!("Invalid RSA private key: {e}")))?;

	let token = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
		.map_err(|e| GithubAppError::Jwt(format!("Failed to encode JWT: {e}")))?;

	debug!(app_id, exp = claims.exp, "Generated GitHub App JWT");

	Ok(token)
}
