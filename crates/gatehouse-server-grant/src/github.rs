// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Capability implementations backed by the real GitHub clients.

use async_trait::async_trait;
use gatehouse_common_config::SecretString;
use gatehouse_server_auth_github::{GitHubOAuthClient, OAuthError};
use gatehouse_server_github_app::{
	AddCollaboratorOutcome, GithubAppClient, GithubAppError, GithubUserClient, Permission,
	RepositoryInvitation,
};
use url::Url;

use crate::pipeline::RepoRef;
use crate::ports::{CollaboratorApi, UserApi, UserSessions};

#[async_trait]
impl UserApi for GithubUserClient {
	async fn authenticated_login(&self) -> Result<String, GithubAppError> {
		Ok(self.get_authenticated_user().await?.login)
	}

	async fn get_repository(&self, repo: &RepoRef) -> Result<(), GithubAppError> {
		GithubUserClient::get_repository(self, &repo.owner, &repo.name)
			.await
			.map(|_| ())
	}

	async fn list_repository_invitations(
		&self,
	) -> Result<Vec<RepositoryInvitation>, GithubAppError> {
		GithubUserClient::list_repository_invitations(self).await
	}

	async fn accept_repository_invitation(&self, invitation_id: i64) -> Result<(), GithubAppError> {
		GithubUserClient::accept_repository_invitation(self, invitation_id).await
	}

	async fn get_team(&self, org: &str, team_slug: &str) -> Result<(), GithubAppError> {
		self.get_team_by_slug(org, team_slug).await.map(|_| ())
	}
}

#[async_trait]
impl CollaboratorApi for GithubAppClient {
	async fn add_collaborator(
		&self,
		repo: &RepoRef,
		login: &str,
		permission: Permission,
	) -> Result<AddCollaboratorOutcome, GithubAppError> {
		GithubAppClient::add_collaborator(self, &repo.owner, &repo.name, login, permission).await
	}
}

/// OAuth code exchange plus construction of per-user REST clients.
///
/// The `reqwest::Client` is shared; each session only adds its token.
#[derive(Debug, Clone)]
pub struct GitHubSessions {
	oauth: GitHubOAuthClient,
	http_client: reqwest::Client,
	api_url: Url,
}

impl GitHubSessions {
	pub fn new(oauth: GitHubOAuthClient, http_client: reqwest::Client, api_url: Url) -> Self {
		Self {
			oauth,
			http_client,
			api_url,
		}
	}
}

#[async_trait]
impl UserSessions for GitHubSessions {
	async fn exchange_code(&self, code: &str) -> Result<SecretString, OAuthError> {
		Ok(self.oauth.exchange_code(code).await?.access_token)
	}

	fn user_api(&self, token: SecretString) -> Box<dyn UserApi> {
		Box::new(GithubUserClient::new(
			self.http_client.clone(),
			self.api_url.clone(),
			token,
		))
	}
}
