// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! REST calls made with one user's OAuth token.

use gatehouse_common_config::SecretString;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::api;
use crate::config::with_trailing_slash;
use crate::error::GithubAppError;
use crate::types::{GitHubUser, Repository, RepositoryInvitation, Team};

const INVITATIONS_PER_PAGE: usize = 100;
const MAX_INVITATION_PAGES: u32 = 10;

/// A client bound to a single user's access token.
///
/// Built per request once the authorization code has been exchanged; it has no
/// way to add collaborators.
#[derive(Clone)]
pub struct GithubUserClient {
	http_client: Client,
	base_url: Url,
	token: SecretString,
}

impl std::fmt::Debug for GithubUserClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GithubUserClient")
			.field("base_url", &self.base_url.as_str())
			.field("token", &self.token)
			.finish()
	}
}

impl GithubUserClient {
	/// `http_client` is normally shared across requests; only the token is
	/// per-user.
	pub fn new(http_client: Client, base_url: Url, token: SecretString) -> Self {
		Self {
			http_client,
			base_url: with_trailing_slash(base_url),
			token,
		}
	}

	async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GithubAppError> {
		let url = api::endpoint(&self.base_url, path)?;
		let request = api::authorized(self.http_client.get(url), self.token.expose());
		api::json(api::send(request).await?).await
	}

	/// `GET /user`.
	#[instrument(skip(self))]
	pub async fn get_authenticated_user(&self) -> Result<GitHubUser, GithubAppError> {
		let user: GitHubUser = self.get("user").await?;
		debug!(login = %user.login, "Resolved authenticated user");
		Ok(user)
	}

	/// `GET /repos/{owner}/{repo}`. A private repository the user cannot see
	/// answers 404.
	#[instrument(skip(self))]
	pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, GithubAppError> {
		self.get(&format!("repos/{owner}/{repo}")).await
	}

	/// `GET /user/repository_invitations`, following pages until a short one.
	#[instrument(skip(self))]
	pub async fn list_repository_invitations(
		&self,
	) -> Result<Vec<RepositoryInvitation>, GithubAppError> {
		let mut invitations = Vec::new();

		for page in 1..=MAX_INVITATION_PAGES {
			let batch: Vec<RepositoryInvitation> = self
				.get(&format!(
					"user/repository_invitations?per_page={INVITATIONS_PER_PAGE}&page={page}"
				))
				.await?;
			let short_page = batch.len() < INVITATIONS_PER_PAGE;
			invitations.extend(batch);
			if short_page {
				break;
			}
		}

		debug!(count = invitations.len(), "Listed pending repository invitations");
		Ok(invitations)
	}

	/// `PATCH /user/repository_invitations/{id}`.
	#[instrument(skip(self))]
	pub async fn accept_repository_invitation(&self, invitation_id: i64) -> Result<(), GithubAppError> {
		let url = api::endpoint(
			&self.base_url,
			&format!("user/repository_invitations/{invitation_id}"),
		)?;
		let request = api::authorized(self.http_client.patch(url), self.token.expose());
		api::send(request).await?;
		debug!(invitation_id, "Accepted repository invitation");
		Ok(())
	}

	/// `GET /orgs/{org}/teams/{team_slug}`.
	#[instrument(skip(self))]
	pub async fn get_team_by_slug(&self, org: &str, team_slug: &str) -> Result<Team, GithubAppError> {
		self.get(&format!("orgs/{org}/teams/{team_slug}")).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{header, method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_for(server: &MockServer) -> GithubUserClient {
		GithubUserClient::new(
			Client::new(),
			Url::parse(&server.uri()).unwrap(),
			SecretString::from("gho_user"),
		)
	}

	fn invitation_json(id: i64, owner: &str, name: &str) -> serde_json::Value {
		serde_json::json!({
			"id": id,
			"repository": { "name": name, "owner": { "login": owner } },
			"permissions": "read"
		})
	}

	#[test]
	fn test_debug_redacts_token() {
		let client = GithubUserClient::new(
			Client::new(),
			Url::parse("https://api.github.com").unwrap(),
			SecretString::from("gho_do_not_print"),
		);
		assert!(!format!("{client:?}").contains("gho_do_not_print"));
	}

	#[tokio::test]
	async fn test_get_authenticated_user() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/user"))
			.and(header("authorization", "Bearer gho_user"))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 1, "login": "alice" })),
			)
			.mount(&server)
			.await;

		let user = client_for(&server).get_authenticated_user().await.unwrap();
		assert_eq!(user.login, "alice");
	}

	#[tokio::test]
	async fn test_get_repository_404_is_not_found() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/repos/EpicGames/UnrealEngine"))
			.respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.get_repository("EpicGames", "UnrealEngine")
			.await
			.unwrap_err();
		assert!(err.is_not_found());
	}

	#[tokio::test]
	async fn test_list_invitations_follows_pages() {
		let server = MockServer::start().await;
		let full_page: Vec<_> = (0..100)
			.map(|i| invitation_json(i, "someone", &format!("repo-{i}")))
			.collect();
		Mock::given(method("GET"))
			.and(path("/user/repository_invitations"))
			.and(query_param("page", "1"))
			.respond_with(ResponseTemplate::new(200).set_body_json(full_page))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/user/repository_invitations"))
			.and(query_param("page", "2"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(vec![invitation_json(500, "EpicGames", "UnrealEngine")]),
			)
			.expect(1)
			.mount(&server)
			.await;

		let invitations = client_for(&server)
			.list_repository_invitations()
			.await
			.unwrap();
		assert_eq!(invitations.len(), 101);
		assert!(invitations.last().unwrap().is_for("epicgames", "unrealengine"));
	}

	#[tokio::test]
	async fn test_accept_invitation_patches() {
		let server = MockServer::start().await;
		Mock::given(method("PATCH"))
			.and(path("/user/repository_invitations/42"))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		client_for(&server)
			.accept_repository_invitation(42)
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn test_get_team_403_is_forbidden() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/orgs/EpicGames/teams/developers"))
			.respond_with(
				ResponseTemplate::new(403).set_body_string(r#"{"message":"Must be a member"}"#),
			)
			.mount(&server)
			.await;

		let err = client_for(&server)
			.get_team_by_slug("EpicGames", "developers")
			.await
			.unwrap_err();
		assert!(matches!(err, GithubAppError::Forbidden));
	}

	#[tokio::test]
	async fn test_get_team_success() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/orgs/EpicGames/teams/developers"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"id": 3, "slug": "developers", "name": "Developers"
			})))
			.mount(&server)
			.await;

		let team = client_for(&server)
			.get_team_by_slug("EpicGames", "developers")
			.await
			.unwrap();
		assert_eq!(team.slug, "developers");
	}
}
