// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Outbound HTTP client shared by the GitHub clients.
//!
//! GitHub rejects API requests without a User-Agent, so every client in the
//! workspace is built from [`builder`].

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Upper bound on any single call to GitHub.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The User-Agent sent on every outbound request: `gatehouse/{version}`.
pub fn user_agent() -> String {
	format!("gatehouse/{}", env!("CARGO_PKG_VERSION"))
}

/// A client builder carrying the Gatehouse User-Agent and default timeout.
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.timeout(DEFAULT_TIMEOUT)
}

/// Build a client with the defaults from [`builder`].
pub fn new_client() -> Result<Client, reqwest::Error> {
	builder().build()
}
