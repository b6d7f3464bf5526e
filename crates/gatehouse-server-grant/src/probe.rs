// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Reading existence signals out of GitHub errors.
//!
//! GitHub answers 404 for private resources the caller cannot see and 403 for
//! ones it can see but may not use. Reading a resource with the user's token
//! therefore tells us whether the user has visibility, without a membership
//! API. The pipeline asks an [`AccessProbe`] what an error means and never
//! looks at status codes itself.

use gatehouse_server_github_app::GithubAppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
	/// The caller cannot see the resource.
	Absent,
	/// The caller can see the resource.
	Present,
	/// The error says nothing about visibility.
	Other,
}

pub trait AccessProbe: Send + Sync {
	fn classify(&self, error: &GithubAppError) -> ProbeVerdict;
}

/// 404 means absent, a non-rate-limit 403 means present.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityProbe;

impl AccessProbe for VisibilityProbe {
	fn classify(&self, error: &GithubAppError) -> ProbeVerdict {
		match error {
			GithubAppError::NotFound => ProbeVerdict::Absent,
			GithubAppError::Forbidden => ProbeVerdict::Present,
			_ => ProbeVerdict::Other,
		}
	}
}
