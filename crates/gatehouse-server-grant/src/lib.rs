// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Repository access grant pipeline.
//!
//! [`GrantService::authorize`] turns a one-time OAuth code into read access to
//! the target repository:
//!
//! ```text
//! exchange code -> resolve login -> already has access?      -> done
//!                                -> pending invitation?      -> accept -> done
//!                                -> member of gating team?   no -> NotMember
//!                                -> invite (App credential) -> accept -> done
//!                                                               | none -> InvitationNotFound
//! ```
//!
//! GitHub is reached only through the capability traits in [`ports`]. The
//! user's token and the App's credential are separate objects, and only
//! [`CollaboratorApi`] can issue invitations.

pub mod error;
pub mod github;
pub mod pipeline;
pub mod ports;
pub mod probe;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::GrantError;
pub use github::GitHubSessions;
pub use pipeline::{Grant, GrantRequest, GrantService, Outcome, RepoRef, TeamGate};
pub use ports::{CollaboratorApi, UserApi, UserSessions};
pub use probe::{AccessProbe, ProbeVerdict, VisibilityProbe};
