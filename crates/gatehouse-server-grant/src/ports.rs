// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Capabilities the pipeline needs from GitHub.

use async_trait::async_trait;
use gatehouse_common_config::SecretString;
use gatehouse_server_auth_github::OAuthError;
use gatehouse_server_github_app::{
	AddCollaboratorOutcome, GithubAppError, Permission, RepositoryInvitation,
};

use crate::pipeline::RepoRef;

/// Calls made with the requesting user's token.
#[async_trait]
pub trait UserApi: Send + Sync {
	/// Login of the token's owner.
	async fn authenticated_login(&self) -> Result<String, GithubAppError>;

	/// Read the repository. Only success or the error matters.
	async fn get_repository(&self, repo: &RepoRef) -> Result<(), GithubAppError>;

	async fn list_repository_invitations(
		&self,
	) -> Result<Vec<RepositoryInvitation>, GithubAppError>;

	async fn accept_repository_invitation(&self, invitation_id: i64) -> Result<(), GithubAppError>;

	/// Read a team by organization and slug. Only success or the error
	/// matters.
	async fn get_team(&self, org: &str, team_slug: &str) -> Result<(), GithubAppError>;
}

/// The privileged App credential. Adding collaborators is all it can do here.
#[async_trait]
pub trait CollaboratorApi: Send + Sync {
	async fn add_collaborator(
		&self,
		repo: &RepoRef,
		login: &str,
		permission: Permission,
	) -> Result<AddCollaboratorOutcome, GithubAppError>;
}

/// Turns an authorization code into a [`UserApi`] bound to that user.
#[async_trait]
pub trait UserSessions: Send + Sync {
	async fn exchange_code(&self, code: &str) -> Result<SecretString, OAuthError>;

	fn user_api(&self, token: SecretString) -> Box<dyn UserApi>;
}
