// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory GitHub double for pipeline and router tests.
//!
//! [`FakeGitHub`] plays both the user's token and the App credential against
//! one shared invitation list, and counts every call.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gatehouse_common_config::SecretString;
use gatehouse_server_auth_github::OAuthError;
use gatehouse_server_github_app::{
	AddCollaboratorOutcome, GithubAppError, InvitationRepository, Permission, RepositoryInvitation,
	RepositoryOwner,
};

use crate::pipeline::{GrantService, RepoRef, TeamGate};
use crate::ports::{CollaboratorApi, UserApi, UserSessions};

/// Canned answer for a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
	Ok,
	NotFound,
	Forbidden,
	RateLimited,
	Status(u16),
}

impl Reply {
	fn into_result(self) -> Result<(), GithubAppError> {
		match self {
			Reply::Ok => Ok(()),
			Reply::NotFound => Err(GithubAppError::NotFound),
			Reply::Forbidden => Err(GithubAppError::Forbidden),
			Reply::RateLimited => Err(GithubAppError::RateLimited),
			Reply::Status(status) => Err(GithubAppError::api_error(status, "fake upstream failure")),
		}
	}
}

/// What the App credential does when asked to add a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issuance {
	/// Creates an invitation the user can then see and accept.
	Visible,
	/// Reports success but the user never sees an invitation.
	Hidden,
	/// Answers 204.
	AlreadyCollaborator,
	Fails(Reply),
}

#[derive(Debug, Default)]
pub struct Calls {
	pub exchange_code: AtomicUsize,
	pub authenticated_login: AtomicUsize,
	pub get_repository: AtomicUsize,
	pub list_invitations: AtomicUsize,
	pub accept_invitation: AtomicUsize,
	pub get_team: AtomicUsize,
	pub add_collaborator: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
	counter.fetch_add(1, Ordering::SeqCst);
}

pub fn count(counter: &AtomicUsize) -> usize {
	counter.load(Ordering::SeqCst)
}

pub struct FakeGitHub {
	login: String,
	exchange_fails: bool,
	identity: Reply,
	repository: Reply,
	team: Reply,
	list: Reply,
	accept: Reply,
	issuance: Issuance,
	invitations: Mutex<Vec<RepositoryInvitation>>,
	next_invitation_id: AtomicI64,
	/// Codes seen by `exchange_code`.
	pub codes: Mutex<Vec<String>>,
	/// Invitation ids accepted, in order.
	pub accepted: Mutex<Vec<i64>>,
	/// Collaborator additions requested, in order.
	pub issued: Mutex<Vec<(RepoRef, String, Permission)>>,
	pub calls: Calls,
}

pub fn invitation(id: i64, owner: &str, name: &str) -> RepositoryInvitation {
	RepositoryInvitation {
		id,
		repository: InvitationRepository {
			name: name.to_string(),
			owner: RepositoryOwner {
				login: owner.to_string(),
			},
		},
		expired: false,
	}
}

impl FakeGitHub {
	/// A user with no access, no invitations and no team visibility, whose
	/// issued invitations become visible.
	pub fn new(login: &str) -> Self {
		Self {
			login: login.to_string(),
			exchange_fails: false,
			identity: Reply::Ok,
			repository: Reply::NotFound,
			team: Reply::NotFound,
			list: Reply::Ok,
			accept: Reply::Ok,
			issuance: Issuance::Visible,
			invitations: Mutex::new(Vec::new()),
			next_invitation_id: AtomicI64::new(1000),
			codes: Mutex::new(Vec::new()),
			accepted: Mutex::new(Vec::new()),
			issued: Mutex::new(Vec::new()),
			calls: Calls::default(),
		}
	}

	pub fn failing_exchange(mut self) -> Self {
		self.exchange_fails = true;
		self
	}

	pub fn with_identity(mut self, reply: Reply) -> Self {
		self.identity = reply;
		self
	}

	pub fn with_repository(mut self, reply: Reply) -> Self {
		self.repository = reply;
		self
	}

	pub fn with_team(mut self, reply: Reply) -> Self {
		self.team = reply;
		self
	}

	pub fn with_list(mut self, reply: Reply) -> Self {
		self.list = reply;
		self
	}

	pub fn with_accept(mut self, reply: Reply) -> Self {
		self.accept = reply;
		self
	}

	pub fn with_issuance(mut self, issuance: Issuance) -> Self {
		self.issuance = issuance;
		self
	}

	pub fn with_invitation(self, invitation: RepositoryInvitation) -> Self {
		self.invitations.lock().unwrap().push(invitation);
		self
	}

	pub fn into_shared(self) -> Arc<Self> {
		Arc::new(self)
	}

	/// A service whose sessions and App credential are both this fake.
	pub fn service(self: &Arc<Self>, org: &str, team_slug: &str) -> GrantService {
		GrantService::new(
			Arc::new(FakeSessions(self.clone())),
			self.clone(),
			TeamGate {
				org: org.to_string(),
				team_slug: team_slug.to_string(),
			},
		)
	}

	pub fn pending_invitations(&self) -> usize {
		self.invitations.lock().unwrap().len()
	}
}

/// The user-token view of a [`FakeGitHub`].
pub struct FakeUser(Arc<FakeGitHub>);

impl FakeUser {
	pub fn new(github: Arc<FakeGitHub>) -> Self {
		Self(github)
	}
}

#[async_trait]
impl UserApi for FakeUser {
	async fn authenticated_login(&self) -> Result<String, GithubAppError> {
		bump(&self.0.calls.authenticated_login);
		self.0.identity.into_result()?;
		Ok(self.0.login.clone())
	}

	async fn get_repository(&self, _repo: &RepoRef) -> Result<(), GithubAppError> {
		bump(&self.0.calls.get_repository);
		self.0.repository.into_result()
	}

	async fn list_repository_invitations(
		&self,
	) -> Result<Vec<RepositoryInvitation>, GithubAppError> {
		bump(&self.0.calls.list_invitations);
		self.0.list.into_result()?;
		Ok(self.0.invitations.lock().unwrap().clone())
	}

	async fn accept_repository_invitation(&self, invitation_id: i64) -> Result<(), GithubAppError> {
		bump(&self.0.calls.accept_invitation);
		self.0.accept.into_result()?;
		self
			.0
			.invitations
			.lock()
			.unwrap()
			.retain(|inv| inv.id != invitation_id);
		self.0.accepted.lock().unwrap().push(invitation_id);
		Ok(())
	}

	async fn get_team(&self, _org: &str, _team_slug: &str) -> Result<(), GithubAppError> {
		bump(&self.0.calls.get_team);
		self.0.team.into_result()
	}
}

/// The code-exchange view of a [`FakeGitHub`].
pub struct FakeSessions(pub Arc<FakeGitHub>);

#[async_trait]
impl UserSessions for FakeSessions {
	async fn exchange_code(&self, code: &str) -> Result<SecretString, OAuthError> {
		bump(&self.0.calls.exchange_code);
		self.0.codes.lock().unwrap().push(code.to_string());
		if self.0.exchange_fails {
			return Err(OAuthError::GitHubError(
				"The code passed is incorrect or expired.".to_string(),
			));
		}
		Ok(SecretString::from(format!("gho_fake_{}", self.0.login)))
	}

	fn user_api(&self, _token: SecretString) -> Box<dyn UserApi> {
		Box::new(FakeUser(self.0.clone()))
	}
}

#[async_trait]
impl CollaboratorApi for FakeGitHub {
	async fn add_collaborator(
		&self,
		repo: &RepoRef,
		login: &str,
		permission: Permission,
	) -> Result<AddCollaboratorOutcome, GithubAppError> {
		bump(&self.calls.add_collaborator);
		self
			.issued
			.lock()
			.unwrap()
			.push((repo.clone(), login.to_string(), permission));

		match self.issuance {
			Issuance::Visible => {
				let id = self.next_invitation_id.fetch_add(1, Ordering::SeqCst);
				self
					.invitations
					.lock()
					.unwrap()
					.push(invitation(id, &repo.owner, &repo.name));
				Ok(AddCollaboratorOutcome::Invited { invitation_id: id })
			}
			Issuance::Hidden => Ok(AddCollaboratorOutcome::Invited {
				invitation_id: self.next_invitation_id.fetch_add(1, Ordering::SeqCst),
			}),
			Issuance::AlreadyCollaborator => Ok(AddCollaboratorOutcome::AlreadyCollaborator),
			Issuance::Fails(reply) => {
				reply.into_result()?;
				Err(GithubAppError::api_error(500, "fake issuance failure"))
			}
		}
	}
}
