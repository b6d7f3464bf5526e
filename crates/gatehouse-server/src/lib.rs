// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Gatehouse HTTP server.
//!
//! Serves `/link`, which sends a browser to GitHub's consent screen, and
//! `/authorize`, the OAuth callback that runs the grant pipeline and lands the
//! user on the target repository.

pub mod api;
pub mod error;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;
pub use gatehouse_server_config::ServerConfig;
