//! Optional observability helpers for doorman flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_doorman.flow` with the `flow` (stage
//!   of the login) and `stage` (call site) fields, plus warnings for swallowed sync failures.
//! - Enable `metrics` to increment the `oauth2_doorman_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Login flow kinds observed by the doorman.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// OAuth callback handling, from state decode to login hand-off.
	Callback,
	/// Login finalization: re-fetch, hooks, session cookie.
	Login,
	/// Best-effort avatar fetch/upload pipeline.
	AvatarSync,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Callback => "callback",
			FlowKind::Login => "login",
			FlowKind::AvatarSync => "avatar_sync",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a doorman flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
