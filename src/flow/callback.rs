//! OAuth callback orchestration from state decode to login hand-off.
//!
//! The doorman exposes [`Doorman::handle_callback`] for hosts that want the
//! flattened wire reply, and [`Doorman::process_callback`] for callers that
//! need each failure mode as a distinct [`CallbackError`] kind. The order of
//! checks is fixed: code presence, state decode, adapter resolution, code
//! exchange, user lookup/provisioning, best-effort profile sync, finalize.

// self
use crate::{
	_prelude::*,
	adapter::{AdapterError, IdentityProfile},
	error::CallbackError,
	flow::Doorman,
	host::{FieldValues, LoginDecision, RequestContext, UserRecord},
	http::ImageHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	state::StateToken,
};

/// Inbound callback query forwarded by the host's HTTP layer.
#[derive(Clone, Debug, Default)]
pub struct CallbackRequest {
	/// Authorization code returned by the provider.
	pub code: Option<String>,
	/// Encoded state token echoed back by the provider.
	pub state: Option<String>,
	/// Redirect URI override forwarded to the adapter's exchange.
	pub redirect_uri: Option<String>,
	/// Per-request envelope handed to hooks and the session sink.
	pub context: RequestContext,
}
impl CallbackRequest {
	/// Creates a request from the two mandatory callback parameters.
	pub fn new(code: impl Into<String>, state: impl Into<String>) -> Self {
		Self { code: Some(code.into()), state: Some(state.into()), ..Default::default() }
	}

	/// Sets the redirect URI forwarded to the adapter.
	pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(redirect_uri.into());

		self
	}

	/// Sets the per-request envelope.
	pub fn with_context(mut self, context: RequestContext) -> Self {
		self.context = context;

		self
	}
}

/// Uniform reply the host serializes back to the login frontend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackReply {
	/// Whether the login may proceed.
	pub allowed_login: bool,
	/// Frontend-facing error text, absent on success.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Optional redirect target set by login hooks.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirect_to: Option<String>,
}
impl From<Result<LoginDecision, CallbackError>> for CallbackReply {
	fn from(result: Result<LoginDecision, CallbackError>) -> Self {
		match result {
			Ok(decision) => Self {
				allowed_login: decision.allowed,
				error: decision.error,
				redirect_to: decision.redirect_to,
			},
			Err(error) =>
				Self { allowed_login: false, error: Some(error.to_string()), redirect_to: None },
		}
	}
}

impl<C> Doorman<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Handles a provider callback and flattens the outcome to the wire shape.
	///
	/// This never fails: every [`CallbackError`] becomes a denied reply whose
	/// `error` text is the frontend-facing message.
	pub async fn handle_callback(&self, request: CallbackRequest) -> CallbackReply {
		self.process_callback(request).await.into()
	}

	/// Runs the callback flow, keeping each failure mode distinguishable.
	pub async fn process_callback(
		&self,
		request: CallbackRequest,
	) -> Result<LoginDecision, CallbackError> {
		const KIND: FlowKind = FlowKind::Callback;

		let span = FlowSpan::new(KIND, "process_callback");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.process_callback_inner(request)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn process_callback_inner(
		&self,
		request: CallbackRequest,
	) -> Result<LoginDecision, CallbackError> {
		let Some(code) = request.code.as_deref().filter(|code| !code.is_empty()) else {
			return Err(CallbackError::MissingCode);
		};
		// An absent state decodes like an empty one; both are invalid.
		let state = request.state.as_deref().unwrap_or_default();
		let token =
			StateToken::decode(state).map_err(|source| CallbackError::InvalidState { source })?;
		let adapter = self
			.adapter(&token.provider)
			.ok_or_else(|| CallbackError::UnknownProvider { provider: token.provider.clone() })?;
		let profile = adapter
			.exchange_code(code, request.redirect_uri.as_deref())
			.await
			.map_err(map_exchange_error)?;
		let user = self.lookup_or_provision(&profile).await?;

		self.sync_full_name(&user, &profile).await;
		self.sync_avatar(&user, &profile).await;

		self.complete_login(&profile.email, &request.context).await
	}

	async fn lookup_or_provision(
		&self,
		profile: &IdentityProfile,
	) -> Result<UserRecord, CallbackError> {
		let found = self.store.find_by_email(&self.options.email_field, &profile.email).await?;

		if let Some(user) = found {
			return Ok(user);
		}
		if !self.options.open_signup.enabled {
			return Err(CallbackError::NotRegistered);
		}

		// Seeded defaults first; the columns the doorman owns always win.
		let mut fields = self.options.open_signup.default_field_values.clone();

		fields.insert(self.options.email_field.to_string(), serde_json::json!(profile.email));
		fields.insert(self.policy.password_hash_field.clone(), serde_json::json!(""));

		if let Some(confirmed) = &self.options.email_confirmed_field {
			fields.insert(confirmed.to_string(), serde_json::json!(true));
		}

		Ok(self.store.create(fields).await?)
	}

	/// Best-effort full-name sync; failures are logged and swallowed.
	async fn sync_full_name(&self, user: &UserRecord, profile: &IdentityProfile) {
		let Some(field) = &self.options.full_name_field else {
			return;
		};
		let Some(full_name) = profile.full_name.as_deref().filter(|name| !name.is_empty()) else {
			return;
		};

		if user.str_field(field.as_ref()) == Some(full_name) {
			return;
		}

		let mut changes = FieldValues::new();

		changes.insert(field.to_string(), serde_json::json!(full_name));

		if let Err(error) = self.store.update(&user.pk, changes).await {
			obs::warn_sync_failure("full_name_sync", &error);
		}
	}
}

fn map_exchange_error(error: AdapterError) -> CallbackError {
	match error {
		AdapterError::Exchange { reason } => CallbackError::Exchange { reason },
		other => CallbackError::Exchange { reason: other.to_string() },
	}
}
