// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The grant pipeline.

use std::fmt;
use std::sync::Arc;

use gatehouse_server_github_app::{AddCollaboratorOutcome, Permission};
use tracing::{debug, info, instrument, warn};

use crate::error::GrantError;
use crate::ports::{CollaboratorApi, UserApi, UserSessions};
use crate::probe::{AccessProbe, ProbeVerdict, VisibilityProbe};

/// A repository as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
	pub owner: String,
	pub name: String,
}

impl RepoRef {
	pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			owner: owner.into(),
			name: name.into(),
		}
	}
}

impl fmt::Display for RepoRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

/// The team whose members may be granted access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamGate {
	pub org: String,
	pub team_slug: String,
}

/// One callback's worth of input.
#[derive(Clone)]
pub struct GrantRequest {
	pub code: String,
	pub target: RepoRef,
}

impl fmt::Debug for GrantRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GrantRequest")
			.field("code", &"[REDACTED]")
			.field("target", &self.target)
			.finish()
	}
}

/// Which success path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	AlreadyHadAccess,
	AcceptedPendingInvitation,
	InvitedAndAccepted,
}

impl Outcome {
	pub fn as_str(&self) -> &'static str {
		match self {
			Outcome::AlreadyHadAccess => "already_had_access",
			Outcome::AcceptedPendingInvitation => "accepted_pending_invitation",
			Outcome::InvitedAndAccepted => "invited_and_accepted",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
	pub login: String,
	pub outcome: Outcome,
}

/// Runs the grant pipeline against injected GitHub capabilities.
///
/// Stateless between calls; clones share the same capabilities.
#[derive(Clone)]
pub struct GrantService {
	sessions: Arc<dyn UserSessions>,
	collaborators: Arc<dyn CollaboratorApi>,
	probe: Arc<dyn AccessProbe>,
	gate: TeamGate,
}

impl fmt::Debug for GrantService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GrantService")
			.field("gate", &self.gate)
			.finish_non_exhaustive()
	}
}

impl GrantService {
	pub fn new(
		sessions: Arc<dyn UserSessions>,
		collaborators: Arc<dyn CollaboratorApi>,
		gate: TeamGate,
	) -> Self {
		Self {
			sessions,
			collaborators,
			probe: Arc::new(VisibilityProbe),
			gate,
		}
	}

	/// Replace the visibility heuristic, e.g. with an authoritative
	/// membership check.
	pub fn with_probe(mut self, probe: Arc<dyn AccessProbe>) -> Self {
		self.probe = probe;
		self
	}

	/// Exchange the code, then run the pipeline with the user's token.
	#[instrument(skip(self, request), fields(target = %request.target))]
	pub async fn authorize(&self, request: &GrantRequest) -> Result<Grant, GrantError> {
		let token = self
			.sessions
			.exchange_code(&request.code)
			.await
			.map_err(GrantError::TokenExchange)?;
		debug!("Received user access token");

		let user = self.sessions.user_api(token);
		self.grant(user.as_ref(), &request.target).await
	}

	/// The pipeline after the code exchange.
	#[instrument(skip(self, user, target), fields(target = %target))]
	pub async fn grant(&self, user: &dyn UserApi, target: &RepoRef) -> Result<Grant, GrantError> {
		let login = user
			.authenticated_login()
			.await
			.map_err(GrantError::Identity)?;

		if self.has_access(user, target).await? {
			info!(%login, "User already has access");
			return Ok(Grant {
				login,
				outcome: Outcome::AlreadyHadAccess,
			});
		}

		if self.accept_pending_invitation(user, target).await? {
			info!(%login, "Accepted pending invitation");
			return Ok(Grant {
				login,
				outcome: Outcome::AcceptedPendingInvitation,
			});
		}

		if !self.is_member(user).await? {
			warn!(%login, org = %self.gate.org, team = %self.gate.team_slug, "User is not in the gating team");
			return Err(GrantError::NotMember {
				login,
				org: self.gate.org.clone(),
			});
		}

		let issued = self
			.collaborators
			.add_collaborator(target, &login, Permission::Pull)
			.await
			.map_err(GrantError::Issue)?;

		if issued == AddCollaboratorOutcome::AlreadyCollaborator {
			info!(%login, "GitHub reports user is already a collaborator");
			return Ok(Grant {
				login,
				outcome: Outcome::AlreadyHadAccess,
			});
		}

		if self.accept_pending_invitation(user, target).await? {
			info!(%login, "Invited and accepted");
			return Ok(Grant {
				login,
				outcome: Outcome::InvitedAndAccepted,
			});
		}

		warn!(%login, "Issued invitation is not visible to the user");
		Err(GrantError::InvitationNotFound {
			repo: target.clone(),
		})
	}

	async fn has_access(&self, user: &dyn UserApi, target: &RepoRef) -> Result<bool, GrantError> {
		match user.get_repository(target).await {
			Ok(()) => Ok(true),
			Err(e) => match self.probe.classify(&e) {
				ProbeVerdict::Absent => Ok(false),
				ProbeVerdict::Present => Ok(true),
				ProbeVerdict::Other => Err(GrantError::AccessCheck(e)),
			},
		}
	}

	/// Accept the first unexpired invitation for `target`. Returns whether one
	/// was found.
	async fn accept_pending_invitation(
		&self,
		user: &dyn UserApi,
		target: &RepoRef,
	) -> Result<bool, GrantError> {
		let invitations = match user.list_repository_invitations().await {
			Ok(invitations) => invitations,
			Err(e) if e.is_not_found() => Vec::new(),
			Err(e) => return Err(GrantError::ListInvitations(e)),
		};

		let Some(invitation) = invitations
			.iter()
			.find(|inv| !inv.expired && inv.is_for(&target.owner, &target.name))
		else {
			debug!(count = invitations.len(), "No pending invitation for target");
			return Ok(false);
		};

		user
			.accept_repository_invitation(invitation.id)
			.await
			.map_err(GrantError::AcceptInvitation)?;
		Ok(true)
	}

	async fn is_member(&self, user: &dyn UserApi) -> Result<bool, GrantError> {
		match user.get_team(&self.gate.org, &self.gate.team_slug).await {
			Ok(()) => Ok(true),
			Err(e) => match self.probe.classify(&e) {
				ProbeVerdict::Absent => Ok(false),
				ProbeVerdict::Present => Ok(true),
				ProbeVerdict::Other => Err(GrantError::OrgCheck(e)),
			},
		}
	}
}
