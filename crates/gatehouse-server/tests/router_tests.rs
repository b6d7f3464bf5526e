// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router tests against an in-memory GitHub.
//!
//! Tests cover:
//! - `/link` redirect and bot filtering
//! - `/authorize` for each success path and each failure class
//! - `/health`

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header::LOCATION, header::USER_AGENT, Request, StatusCode},
	Router,
};
use gatehouse_server::{create_router, AppState};
use gatehouse_server_config::{GateConfig, TargetRepo, DEFAULT_BOT_MARKERS};
use gatehouse_server_github_app::Permission;
use gatehouse_server_grant::testing::{count, invitation, FakeGitHub, Issuance, Reply};
use gatehouse_server_grant::RepoRef;
use tower::ServiceExt;
use url::Url;

const AUTHORIZE_URL: &str =
	"https://github.com/login/oauth/authorize?client_id=Iv1.test&scope=repo%2Cread%3Aorg";
const ENROLLMENT_URL: &str = "https://www.unrealengine.com/en-US/ue-on-github";

fn gate() -> GateConfig {
	GateConfig {
		target: TargetRepo {
			owner: "EpicGames".to_string(),
			name: "UnrealEngine".to_string(),
		},
		org: "EpicGames".to_string(),
		team: "developers".to_string(),
		enrollment_url: ENROLLMENT_URL.to_string(),
		bot_markers: DEFAULT_BOT_MARKERS.iter().map(|m| m.to_string()).collect(),
	}
}

fn app(github: &Arc<FakeGitHub>) -> Router {
	let web_url = Url::parse("https://github.com/").unwrap();
	let state = AppState::new(
		github.service("EpicGames", "developers"),
		AUTHORIZE_URL,
		&gate(),
		&web_url,
	);
	create_router(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
	let response = app
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let location = response
		.headers()
		.get(LOCATION)
		.map(|v| v.to_str().unwrap().to_string());
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	(status, location, String::from_utf8(body.to_vec()).unwrap())
}

const REPO_PAGE: &str = "https://github.com/EpicGames/UnrealEngine";

// ============================================================================
// /link
// ============================================================================

#[tokio::test]
async fn link_redirects_browsers_to_consent_screen() {
	let github = FakeGitHub::new("alice").into_shared();

	let response = app(&github)
		.oneshot(
			Request::builder()
				.uri("/link")
				.header(USER_AGENT, "Mozilla/5.0 (Macintosh) Safari/605.1.15")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(
		response.headers().get(LOCATION).unwrap().to_str().unwrap(),
		AUTHORIZE_URL
	);
}

#[tokio::test]
async fn link_without_user_agent_still_redirects() {
	let github = FakeGitHub::new("alice").into_shared();

	let (status, location, _) = get(app(&github), "/link").await;

	assert_eq!(status, StatusCode::SEE_OTHER);
	assert_eq!(location.as_deref(), Some(AUTHORIZE_URL));
}

#[tokio::test]
async fn link_ignores_bots() {
	let github = FakeGitHub::new("alice").into_shared();

	for ua in [
		"Slackbot-LinkExpanding 1.0 (+https://api.slack.com/robots)",
		"Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)",
		"Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
		"facebookexternalhit/1.1",
		"GOOGLEBOT",
	] {
		let response = app(&github)
			.oneshot(
				Request::builder()
					.uri("/link")
					.header(USER_AGENT, ua)
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::OK, "user agent {ua}");
		assert!(response.headers().get(LOCATION).is_none());
		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		assert!(body.is_empty());
	}
}

#[tokio::test]
async fn link_redirects_phone_browsers_whose_model_contains_bot() {
	let github = FakeGitHub::new("alice").into_shared();

	let response = app(&github)
		.oneshot(
			Request::builder()
				.uri("/link")
				.header(
					USER_AGENT,
					"Mozilla/5.0 (Linux; Android 10; Cubot X30) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36",
				)
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

// ============================================================================
// /authorize success paths
// ============================================================================

/// alice can already see the repository: redirect, nothing issued.
#[tokio::test]
async fn authorize_user_with_access_is_redirected() {
	let github = FakeGitHub::new("alice")
		.with_repository(Reply::Ok)
		.into_shared();

	let (status, location, _) = get(app(&github), "/authorize?code=abc123").await;

	assert_eq!(status, StatusCode::SEE_OTHER);
	assert_eq!(location.as_deref(), Some(REPO_PAGE));
	assert_eq!(count(&github.calls.add_collaborator), 0);
	assert_eq!(*github.codes.lock().unwrap(), vec!["abc123".to_string()]);
}

/// bob has a pending invitation: it is accepted and the team is never read.
#[tokio::test]
async fn authorize_accepts_pending_invitation() {
	let github = FakeGitHub::new("bob")
		.with_invitation(invitation(42, "epicgames", "unrealengine"))
		.into_shared();

	let (status, location, _) = get(app(&github), "/authorize?code=xyz").await;

	assert_eq!(status, StatusCode::SEE_OTHER);
	assert_eq!(location.as_deref(), Some(REPO_PAGE));
	assert_eq!(*github.accepted.lock().unwrap(), vec![42]);
	assert_eq!(count(&github.calls.get_team), 0);
	assert_eq!(count(&github.calls.add_collaborator), 0);
}

/// dave is in the team (403 on the probe): invited with pull, then accepted.
#[tokio::test]
async fn authorize_invites_and_accepts_team_member() {
	let github = FakeGitHub::new("dave")
		.with_team(Reply::Forbidden)
		.into_shared();

	let (status, location, _) = get(app(&github), "/authorize?code=xyz").await;

	assert_eq!(status, StatusCode::SEE_OTHER);
	assert_eq!(location.as_deref(), Some(REPO_PAGE));
	assert_eq!(
		*github.issued.lock().unwrap(),
		vec![(
			RepoRef::new("EpicGames", "UnrealEngine"),
			"dave".to_string(),
			Permission::Pull
		)]
	);
	assert_eq!(github.accepted.lock().unwrap().len(), 1);
	assert_eq!(github.pending_invitations(), 0);
}

// ============================================================================
// /authorize failures
// ============================================================================

/// carol is not in the team (404 on the probe): 403 with the enrollment link.
#[tokio::test]
async fn authorize_non_member_gets_enrollment_instructions() {
	let github = FakeGitHub::new("carol").into_shared();

	let (status, location, body) = get(app(&github), "/authorize?code=xyz").await;

	assert_eq!(status, StatusCode::FORBIDDEN);
	assert!(location.is_none());
	assert_eq!(
		body,
		format!(
			"You are not in the EpicGames organisation. Please follow these directions and try again: {ENROLLMENT_URL}"
		)
	);
	assert_eq!(count(&github.calls.add_collaborator), 0);
}

#[tokio::test]
async fn authorize_without_code_fails_before_any_upstream_call() {
	let github = FakeGitHub::new("alice").into_shared();

	for uri in ["/authorize", "/authorize?code=", "/authorize?state=abc"] {
		let (status, location, body) = get(app(&github), uri).await;
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
		assert!(location.is_none());
		assert!(body.starts_with("error parsing request"), "{body}");
	}
	assert_eq!(count(&github.calls.exchange_code), 0);
}

#[tokio::test]
async fn authorize_bad_code_reports_exchange_failure() {
	let github = FakeGitHub::new("alice").failing_exchange().into_shared();

	let (status, _, body) = get(app(&github), "/authorize?code=stale").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert!(body.starts_with("error exchanging code for access token"), "{body}");
	assert_eq!(count(&github.calls.authenticated_login), 0);
}

#[tokio::test]
async fn authorize_identity_failure_is_500() {
	let github = FakeGitHub::new("alice")
		.with_identity(Reply::Status(502))
		.into_shared();

	let (status, _, body) = get(app(&github), "/authorize?code=abc").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert!(body.starts_with("error getting authenticated user"), "{body}");
}

#[tokio::test]
async fn authorize_org_check_failure_is_500() {
	let github = FakeGitHub::new("erin")
		.with_team(Reply::RateLimited)
		.into_shared();

	let (status, _, body) = get(app(&github), "/authorize?code=abc").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert!(body.starts_with("error getting org status"), "{body}");
	assert_eq!(count(&github.calls.add_collaborator), 0);
}

#[tokio::test]
async fn authorize_issuance_failure_is_500() {
	let github = FakeGitHub::new("frank")
		.with_team(Reply::Ok)
		.with_issuance(Issuance::Fails(Reply::Forbidden))
		.into_shared();

	let (status, _, body) = get(app(&github), "/authorize?code=abc").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert!(
		body.starts_with("could not add you as an external collaborator"),
		"{body}"
	);
}

#[tokio::test]
async fn authorize_hidden_invitation_asks_user_to_check_email() {
	let github = FakeGitHub::new("grace")
		.with_team(Reply::Forbidden)
		.with_issuance(Issuance::Hidden)
		.into_shared();

	let (status, location, body) = get(app(&github), "/authorize?code=abc").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert!(location.is_none());
	assert!(body.contains("check your email"), "{body}");
	assert!(body.contains("EpicGames/UnrealEngine"), "{body}");
}

// ============================================================================
// /health
// ============================================================================

#[tokio::test]
async fn health_reports_ok_and_version() {
	let github = FakeGitHub::new("alice").into_shared();

	let (status, _, body) = get(app(&github), "/health").await;

	assert_eq!(status, StatusCode::OK);
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["status"], "ok");
	assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
	assert_eq!(count(&github.calls.exchange_code), 0);
}

#[tokio::test]
async fn unknown_route_is_404() {
	let github = FakeGitHub::new("alice").into_shared();

	let (status, _, _) = get(app(&github), "/nope").await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}
