// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitHub REST clients for Gatehouse.
//!
//! Two clients with deliberately different credentials:
//!
//! - [`GithubAppClient`] authenticates as the GitHub App installation and is
//!   the only way to add a collaborator.
//! - [`GithubUserClient`] carries one user's OAuth token for the lifetime of a
//!   request: reading the user, the target repository and the gating team, and
//!   listing/accepting that user's repository invitations.
//!
//! Both map non-success responses through the same status classification, so
//! callers match on [`GithubAppError`] variants rather than status codes.

mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;
pub mod user;

pub use client::GithubAppClient;
pub use config::{GithubAppConfig, DEFAULT_API_URL};
pub use error::GithubAppError;
pub use types::{
	AddCollaboratorOutcome, GitHubUser, InvitationRepository, Permission, Repository,
	RepositoryInvitation, RepositoryOwner, Team,
};
pub use user::GithubUserClient;
