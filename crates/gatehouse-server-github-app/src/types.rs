// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Response and request types for the GitHub REST calls Gatehouse makes.
//!
//! Only the fields Gatehouse reads are declared; serde ignores the rest.

use serde::{Deserialize, Serialize};

/// `GET /user`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
	pub id: i64,
	pub login: String,
	#[serde(default)]
	pub name: Option<String>,
}

/// `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
	pub id: i64,
	pub name: String,
	pub full_name: String,
	#[serde(default)]
	pub private: bool,
	pub html_url: String,
}

/// Owner block embedded in repository payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryOwner {
	pub login: String,
}

/// Repository block of an invitation.
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationRepository {
	pub name: String,
	pub owner: RepositoryOwner,
}

/// One entry of `GET /user/repository_invitations`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInvitation {
	pub id: i64,
	pub repository: InvitationRepository,
	#[serde(default)]
	pub expired: bool,
}

impl RepositoryInvitation {
	/// True when the invitation is for `owner/name`, ignoring ASCII case on
	/// both parts.
	pub fn is_for(&self, owner: &str, name: &str) -> bool {
		self.repository.owner.login.eq_ignore_ascii_case(owner)
			&& self.repository.name.eq_ignore_ascii_case(name)
	}
}

/// `GET /orgs/{org}/teams/{team_slug}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Team {
	pub id: i64,
	pub slug: String,
	pub name: String,
}

/// Collaborator permission levels accepted by
/// `PUT /repos/{owner}/{repo}/collaborators/{username}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
	Pull,
	Triage,
	Push,
	Maintain,
	Admin,
}

impl Permission {
	pub fn as_str(&self) -> &'static str {
		match self {
			Permission::Pull => "pull",
			Permission::Triage => "triage",
			Permission::Push => "push",
			Permission::Maintain => "maintain",
			Permission::Admin => "admin",
		}
	}
}

impl std::fmt::Display for Permission {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What GitHub did with an add-collaborator request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCollaboratorOutcome {
	/// 201: an invitation was created.
	Invited { invitation_id: i64 },
	/// 204: the user already had access, or was added directly.
	AlreadyCollaborator,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddCollaboratorBody {
	pub permission: Permission,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedInvitation {
	pub id: i64,
}

/// `POST /app/installations/{id}/access_tokens`.
#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenResponse {
	pub token: String,
	/// ISO8601.
	pub expires_at: String,
}
