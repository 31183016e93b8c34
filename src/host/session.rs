//! Session issuance, login hooks, and the per-request envelope.

// self
use crate::{_prelude::*, host::record::UserRecord};

/// Future type returned by session-sink operations.
pub type SessionFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SessionError>> + 'a + Send>>;

/// Future type returned by login hooks.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// Host auth facts the login flow depends on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostAuthPolicy {
	/// Column storing the host's password hash; set to empty on self-signup so
	/// provisioned accounts cannot log in with a password.
	pub password_hash_field: String,
	/// Session lifetime applied when no per-doorman override is configured.
	pub remember_for: Duration,
}
impl HostAuthPolicy {
	const DEFAULT_REMEMBER_DAYS: i64 = 14;

	/// Creates a policy around the host's password-hash column.
	pub fn new(password_hash_field: impl Into<String>) -> Self {
		Self {
			password_hash_field: password_hash_field.into(),
			remember_for: Duration::days(Self::DEFAULT_REMEMBER_DAYS),
		}
	}

	/// Overrides the default session lifetime.
	pub fn with_remember_for(mut self, remember_for: Duration) -> Self {
		self.remember_for = remember_for;

		self
	}
}
impl Default for HostAuthPolicy {
	fn default() -> Self {
		Self::new("password_hash")
	}
}

/// Per-request envelope forwarded from the host HTTP layer.
///
/// Hooks and the session sink receive the envelope untouched so they can read
/// headers or set cookies the same way the host's own handlers would.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
	/// Request headers.
	pub headers: BTreeMap<String, String>,
	/// Request cookies.
	pub cookies: BTreeMap<String, String>,
	/// Query parameters.
	pub query: BTreeMap<String, String>,
	/// Full request URL as received by the host.
	pub request_url: String,
	/// Parsed request body, when the host provides one.
	pub body: serde_json::Value,
}

/// Minimal identity handed to login hooks after a successful match.
#[derive(Clone, Debug)]
pub struct LoginIdentity {
	/// Primary key of the matched record.
	pub pk: serde_json::Value,
	/// Username for the session; the doorman uses the login email.
	pub username: String,
	/// Matched record, for hooks that inspect roles or flags.
	pub record: UserRecord,
}

/// Mutable verdict threaded through the login-hook chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginDecision {
	/// Whether the login proceeds to session issuance.
	pub allowed: bool,
	/// Veto or failure message shown to the end user.
	pub error: Option<String>,
	/// Post-login redirect target, when a hook sets one.
	pub redirect_to: Option<String>,
}
impl LoginDecision {
	/// Creates a verdict that lets the login proceed.
	pub fn allowed() -> Self {
		Self { allowed: true, error: None, redirect_to: None }
	}

	/// Creates a verdict that blocks the login with the given reason.
	pub fn denied(reason: impl Into<String>) -> Self {
		Self { allowed: false, error: Some(reason.into()), redirect_to: None }
	}

	/// Blocks the login with the given reason.
	pub fn deny(&mut self, reason: impl Into<String>) {
		self.allowed = false;
		self.error = Some(reason.into());
	}
}

/// Ticket captured by the host when issuing the session cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionTicket {
	/// Username recorded in the session.
	pub username: String,
	/// Primary key of the authenticated record.
	pub pk: serde_json::Value,
	/// Requested session lifetime.
	pub expire_in: Duration,
}

/// Error type produced by [`SessionSink`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SessionError {
	/// Host auth subsystem refused to issue the cookie.
	#[error("Session cookie could not be issued: {message}.")]
	Issue {
		/// Human-readable error payload.
		message: String,
	},
}

/// Host seam that issues the authenticated session cookie.
pub trait SessionSink
where
	Self: Send + Sync,
{
	/// Issues the host session cookie for the authenticated user.
	fn set_auth_cookie<'a>(
		&'a self,
		ctx: &'a RequestContext,
		ticket: &'a SessionTicket,
	) -> SessionFuture<'a, ()>;
}

/// Host seam for the login-callback chain run before the session is issued.
///
/// Hooks are infallible by contract; they express refusal by mutating the
/// decision. A hook that hits an internal error should deny the login with a
/// user-presentable message rather than panic.
pub trait LoginHooks
where
	Self: Send + Sync,
{
	/// Lets the host veto or decorate the pending login.
	fn process<'a>(
		&'a self,
		identity: &'a LoginIdentity,
		decision: &'a mut LoginDecision,
		ctx: &'a RequestContext,
	) -> HookFuture<'a>;
}

/// No-op hook chain used when the host registers none.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLoginHooks;
impl LoginHooks for NoopLoginHooks {
	fn process<'a>(
		&'a self,
		_identity: &'a LoginIdentity,
		_decision: &'a mut LoginDecision,
		_ctx: &'a RequestContext,
	) -> HookFuture<'a> {
		Box::pin(async {})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decision_constructors_and_deny_agree() {
		let mut decision = LoginDecision::allowed();

		assert!(decision.allowed);
		decision.deny("maintenance window");
		assert_eq!(decision, LoginDecision::denied("maintenance window"));
	}

	#[tokio::test]
	async fn noop_hooks_leave_the_decision_untouched() {
		let identity = LoginIdentity {
			pk: serde_json::json!(1),
			username: "dev@example.com".into(),
			record: UserRecord::new(serde_json::json!(1), Default::default()),
		};
		let mut decision = LoginDecision::allowed();

		NoopLoginHooks.process(&identity, &mut decision, &RequestContext::default()).await;

		assert_eq!(decision, LoginDecision::allowed());
	}
}
