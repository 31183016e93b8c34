//! Login finalization: record re-fetch, hook chain, session cookie.

// self
use crate::{
	_prelude::*,
	error::CallbackError,
	flow::Doorman,
	host::{FieldValues, LoginDecision, LoginIdentity, RequestContext, SessionTicket},
	http::ImageHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> Doorman<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Finalizes a login for the resolved email.
	///
	/// Re-fetches the record, flips the email-confirmed flag on the first
	/// OAuth login, runs the host hook chain, and issues the session cookie
	/// when the decision is still allowed. The cookie is issued at most once
	/// per callback; a hook veto suppresses it entirely.
	pub async fn complete_login(
		&self,
		email: &str,
		ctx: &RequestContext,
	) -> Result<LoginDecision, CallbackError> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "complete_login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.complete_login_inner(email, ctx)).await;

		match &result {
			Ok(decision) if decision.allowed =>
				obs::record_flow_outcome(KIND, FlowOutcome::Success),
			_ => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn complete_login_inner(
		&self,
		email: &str,
		ctx: &RequestContext,
	) -> Result<LoginDecision, CallbackError> {
		let user = self
			.store
			.find_by_email(&self.options.email_field, email)
			.await?
			.ok_or(CallbackError::UserNotFound)?;

		// Only a stored `false` flips; an unset flag stays untouched.
		if let Some(field) = &self.options.email_confirmed_field {
			if user.bool_field(field.as_ref()) == Some(false) {
				let mut changes = FieldValues::new();

				changes.insert(field.to_string(), serde_json::json!(true));

				self.store.update(&user.pk, changes).await?;
			}
		}

		let identity =
			LoginIdentity { pk: user.pk.clone(), username: email.to_owned(), record: user };
		let mut decision = LoginDecision::allowed();

		self.hooks.process(&identity, &mut decision, ctx).await;

		if !decision.allowed {
			return Ok(decision);
		}

		let ticket = SessionTicket {
			username: identity.username.clone(),
			pk: identity.pk.clone(),
			expire_in: self.session_duration(),
		};

		self.sessions.set_auth_cookie(ctx, &ticket).await?;

		Ok(decision)
	}
}
