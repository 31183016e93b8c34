//! Login orchestration built around the [`Doorman`] facade.

pub mod callback;

mod avatar;
mod finalize;

pub use callback::{CallbackReply, CallbackRequest};

// self
use crate::{
	_prelude::*,
	adapter::IdentityAdapter,
	config::LoginOptions,
	error::ConfigError,
	host::{
		HostAuthPolicy, LoginHooks, NoopLoginHooks, ResourceSchema, SessionSink, UploadSink,
		UserStore,
	},
	http::ImageHttpClient,
	ident::ProviderId,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestImageClient;

#[cfg(feature = "reqwest")]
/// Doorman specialized for the crate's default reqwest transport.
pub type ReqwestDoorman = Doorman<ReqwestImageClient>;

/// Coordinates provider logins against a single host user resource.
///
/// The doorman owns the adapter list, the validated options, and the host
/// collaborators (store, session sink, login hooks, optional upload sink) so
/// individual flow implementations can focus on callback semantics rather
/// than plumbing. Construct one through [`DoormanBuilder`]; attach-time
/// validation guarantees every configured field exists on the resource.
#[derive(Clone)]
pub struct Doorman<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Identity adapters, one per provider, resolved by stable identifier.
	pub adapters: Vec<Arc<dyn IdentityAdapter>>,
	/// Validated login options.
	pub options: LoginOptions,
	/// Snapshot of the user resource the options were validated against.
	pub schema: ResourceSchema,
	/// Host-wide authentication facts (password-hash column, session length).
	pub policy: HostAuthPolicy,
	/// User store backing lookup, provisioning, and field sync.
	pub store: Arc<dyn UserStore>,
	/// Session sink that issues the host auth cookie.
	pub sessions: Arc<dyn SessionSink>,
	/// Host login-callback chain consulted before the cookie is issued.
	pub hooks: Arc<dyn LoginHooks>,
	/// Optional upload collaborator backing avatar sync.
	pub uploads: Option<Arc<dyn UploadSink>>,
	/// HTTP client wrapper used for avatar transfers.
	pub http_client: Arc<C>,
}
impl<C> Doorman<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Resolves an adapter by its stable provider identifier.
	pub fn adapter(&self, provider: &ProviderId) -> Option<&Arc<dyn IdentityAdapter>> {
		self.adapters.iter().find(|adapter| adapter.provider_id() == provider)
	}

	/// Session length for logins through this doorman.
	///
	/// The per-doorman override wins; otherwise the host policy applies.
	pub fn session_duration(&self) -> Duration {
		self.options.session_duration.unwrap_or(self.policy.remember_for)
	}
}
impl<C> Debug for Doorman<C>
where
	C: ?Sized + ImageHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Doorman")
			.field(
				"providers",
				&self.adapters.iter().map(|adapter| adapter.provider_id().as_ref()).collect::<Vec<_>>(),
			)
			.field("resource", &self.schema.resource_id)
			.field("options", &self.options)
			.finish()
	}
}

/// Builder that collects adapters and collaborators, then validates on attach.
pub struct DoormanBuilder<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Identity adapters registered so far.
	pub adapters: Vec<Arc<dyn IdentityAdapter>>,
	/// Login options to validate on attach.
	pub options: LoginOptions,
	/// Snapshot of the user resource to validate against.
	pub schema: ResourceSchema,
	/// Host-wide authentication facts.
	pub policy: HostAuthPolicy,
	/// User store backing lookup, provisioning, and field sync.
	pub store: Arc<dyn UserStore>,
	/// Session sink that issues the host auth cookie.
	pub sessions: Arc<dyn SessionSink>,
	/// Host login-callback chain.
	pub hooks: Arc<dyn LoginHooks>,
	/// Optional upload collaborator backing avatar sync.
	pub uploads: Option<Arc<dyn UploadSink>>,
	/// HTTP client wrapper used for avatar transfers.
	pub http_client: Arc<C>,
}
impl<C> DoormanBuilder<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Creates a builder that reuses the caller-provided transport.
	pub fn with_http_client(
		options: LoginOptions,
		schema: ResourceSchema,
		store: Arc<dyn UserStore>,
		sessions: Arc<dyn SessionSink>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			adapters: Vec::new(),
			options,
			schema,
			policy: HostAuthPolicy::default(),
			store,
			sessions,
			hooks: Arc::new(NoopLoginHooks),
			uploads: None,
			http_client: http_client.into(),
		}
	}

	/// Registers a single identity adapter.
	pub fn adapter(mut self, adapter: Arc<dyn IdentityAdapter>) -> Self {
		self.adapters.push(adapter);

		self
	}

	/// Registers multiple identity adapters.
	pub fn adapters<I>(mut self, adapters: I) -> Self
	where
		I: IntoIterator<Item = Arc<dyn IdentityAdapter>>,
	{
		self.adapters.extend(adapters);

		self
	}

	/// Overrides the host authentication policy.
	pub fn policy(mut self, policy: HostAuthPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Replaces the login-callback chain.
	pub fn hooks(mut self, hooks: Arc<dyn LoginHooks>) -> Self {
		self.hooks = hooks;

		self
	}

	/// Attaches the upload collaborator that backs avatar sync.
	pub fn uploads(mut self, uploads: Arc<dyn UploadSink>) -> Self {
		self.uploads = Some(uploads);

		self
	}

	/// Consumes the builder and validates the resulting doorman.
	pub fn attach(self) -> Result<Doorman<C>, ConfigError> {
		self.options.validate(
			&self.schema,
			&self.adapters,
			&self.policy.password_hash_field,
			self.uploads.is_some(),
		)?;

		Ok(Doorman {
			adapters: self.adapters,
			options: self.options,
			schema: self.schema,
			policy: self.policy,
			store: self.store,
			sessions: self.sessions,
			hooks: self.hooks,
			uploads: self.uploads,
			http_client: self.http_client,
		})
	}
}
impl<C> Debug for DoormanBuilder<C>
where
	C: ?Sized + ImageHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DoormanBuilder")
			.field(
				"providers",
				&self.adapters.iter().map(|adapter| adapter.provider_id().as_ref()).collect::<Vec<_>>(),
			)
			.field("resource", &self.schema.resource_id)
			.field("options", &self.options)
			.field("uploads_set", &self.uploads.is_some())
			.finish()
	}
}
#[cfg(feature = "reqwest")]
impl DoormanBuilder<ReqwestImageClient> {
	/// Creates a builder with the crate-provided reqwest transport.
	///
	/// The doorman provisions its own reqwest-backed client so callers do not
	/// need to pass HTTP handles explicitly.
	pub fn new(
		options: LoginOptions,
		schema: ResourceSchema,
		store: Arc<dyn UserStore>,
		sessions: Arc<dyn SessionSink>,
	) -> Self {
		Self::with_http_client(options, schema, store, sessions, ReqwestImageClient::default())
	}
}
