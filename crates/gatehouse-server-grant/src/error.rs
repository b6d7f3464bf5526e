// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Pipeline failures. Each variant names the step that failed and keeps the
//! upstream error as its source.

use gatehouse_server_auth_github::OAuthError;
use gatehouse_server_github_app::GithubAppError;
use thiserror::Error;

use crate::pipeline::RepoRef;

#[derive(Debug, Error)]
pub enum GrantError {
	#[error("error exchanging code for access token: {0}")]
	TokenExchange(#[source] OAuthError),

	#[error("error getting authenticated user: {0}")]
	Identity(#[source] GithubAppError),

	#[error("error checking repository access: {0}")]
	AccessCheck(#[source] GithubAppError),

	#[error("error listing repository invitations: {0}")]
	ListInvitations(#[source] GithubAppError),

	#[error("error accepting repository invitation: {0}")]
	AcceptInvitation(#[source] GithubAppError),

	#[error("error getting org status: {0}")]
	OrgCheck(#[source] GithubAppError),

	#[error("could not add you as an external collaborator: {0}")]
	Issue(#[source] GithubAppError),

	/// The gate said no. Not an upstream failure.
	#[error("{login} is not a member of the {org} organisation")]
	NotMember { login: String, org: String },

	/// An invitation was issued but the user's token cannot see it.
	#[error("could not find your invitation to {repo}, check your email")]
	InvitationNotFound { repo: RepoRef },
}

impl GrantError {
	/// True for the policy denial; every other variant is a failure.
	pub fn is_denial(&self) -> bool {
		matches!(self, GrantError::NotMember { .. })
	}
}
