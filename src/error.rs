//! Doorman-level error types shared across configuration, flows, and host seams.

// self
use crate::{
	_prelude::*,
	host::{ColumnKind, SessionError, StoreError, UploadError},
	http::TransferError,
	ident::{FieldName, ProviderId},
	state::StateTokenError,
};

/// Doorman-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical doorman error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),
	/// Setup-time configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request-time callback failure.
	#[error(transparent)]
	Callback(#[from] CallbackError),
}

/// Configuration and validation failures raised while attaching the doorman.
///
/// All of these are fatal: the host refuses to boot with a doorman whose
/// options do not line up with the resource schema and collaborators.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ConfigError {
	/// At least one adapter must be registered.
	#[error("At least one identity adapter must be configured.")]
	NoAdapters,
	/// Two adapters share the same provider identifier.
	#[error("Provider `{provider}` is registered more than once.")]
	DuplicateProvider {
		/// Identifier shared by more than one adapter.
		provider: ProviderId,
	},
	/// Configured email field is not a column of the resource.
	#[error("Email field `{field}` does not exist on resource `{resource}`.")]
	EmailFieldMissing {
		/// Configured email field.
		field: FieldName,
		/// Host resource identifier.
		resource: String,
	},
	/// Configured email-confirmed field is not a column of the resource.
	#[error("Email-confirmed field `{field}` does not exist on resource `{resource}`.")]
	ConfirmedFieldMissing {
		/// Configured email-confirmed field.
		field: FieldName,
		/// Host resource identifier.
		resource: String,
	},
	/// Configured email-confirmed field is not a boolean column.
	#[error("Email-confirmed field `{field}` must be a boolean column, not {kind}.")]
	ConfirmedFieldNotBoolean {
		/// Configured email-confirmed field.
		field: FieldName,
		/// Column type class the resource declares instead.
		kind: ColumnKind,
	},
	/// Configured full-name field is not a column of the resource.
	#[error("Full-name field `{field}` does not exist on resource `{resource}`.")]
	FullNameFieldMissing {
		/// Configured full-name field.
		field: FieldName,
		/// Host resource identifier.
		resource: String,
	},
	/// Configured avatar field is not a column of the resource.
	#[error("Avatar field `{field}` does not exist on resource `{resource}`.")]
	AvatarFieldMissing {
		/// Configured avatar field.
		field: FieldName,
		/// Host resource identifier.
		resource: String,
	},
	/// Avatar sync only works with adapters that run a code exchange.
	#[error("Avatar sync requires code-exchange adapters, but `{provider}` uses the id_token flow.")]
	AvatarRequiresCodeExchange {
		/// Adapter that cannot supply a picture URL.
		provider: ProviderId,
	},
	/// Avatar sync is configured without an upload collaborator.
	#[error("Avatar field `{field}` is configured, but no upload sink is attached.")]
	AvatarUploadSinkMissing {
		/// Configured avatar field.
		field: FieldName,
	},
	/// Self-signup needs the host's password-hash column to exist.
	#[error("Password-hash field `{field}` does not exist on resource `{resource}`.")]
	PasswordHashFieldMissing {
		/// Password-hash field named by the host auth policy.
		field: String,
		/// Host resource identifier.
		resource: String,
	},
	/// A self-signup default value targets a column that does not exist.
	#[error("Signup default references field `{field}`, which does not exist on resource `{resource}`.")]
	DefaultValueFieldMissing {
		/// Field named by the default-value map.
		field: String,
		/// Host resource identifier.
		resource: String,
	},
}

/// Request-time callback failures, one kind per distinguishable outcome.
///
/// The `Display` strings are exactly what the host forwards to the login
/// frontend, so they carry no trailing periods and no detail beyond what the
/// adapter reported.
#[derive(Debug, ThisError)]
pub enum CallbackError {
	/// Callback arrived without an authorization code.
	#[error("No authorization code provided")]
	MissingCode,
	/// State parameter is absent, not base64, or not the expected payload.
	#[error("Invalid OAuth state")]
	InvalidState {
		/// Decode failure that rejected the state parameter.
		#[source]
		source: StateTokenError,
	},
	/// State decoded to a provider that is not configured.
	#[error("Invalid OAuth provider")]
	UnknownProvider {
		/// Provider identifier carried by the state token.
		provider: ProviderId,
	},
	/// Adapter failed to exchange the authorization code.
	#[error("Authentication failed: {reason}")]
	Exchange {
		/// Adapter-supplied reason string.
		reason: String,
	},
	/// Email is unknown and self-signup is disabled.
	#[error("User with your email is not registered in system and signup is not allowed. Please contact your administrator to get access to the system")]
	NotRegistered,
	/// User store failed while looking up or provisioning the record.
	#[error("User store failure")]
	Store(
		#[from]
		#[source]
		StoreError,
	),
	/// Record disappeared between provisioning and login finalization.
	#[error("User not found")]
	UserNotFound,
	/// Host session layer failed to issue the auth cookie.
	#[error("Failed to establish login session")]
	Session(
		#[from]
		#[source]
		SessionError,
	),
}

/// Failures of the best-effort avatar pipeline.
///
/// These never fail the login; the callback flow logs them through
/// [`obs`](crate::obs) and proceeds without an avatar.
#[derive(Debug, ThisError)]
pub enum AvatarSyncError {
	/// Avatar download failed.
	#[error("Avatar download failed.")]
	Fetch {
		/// Transport failure while fetching the image.
		#[source]
		source: TransferError,
	},
	/// Origin reported a content type with no known image extension.
	#[error("Avatar content type `{content_type}` is not a supported image format.")]
	UnsupportedContentType {
		/// Content type reported by the origin.
		content_type: String,
	},
	/// Upload sink refused to prepare or retain the object.
	#[error("Upload sink rejected the avatar transfer.")]
	Sink(
		#[from]
		#[source]
		UploadError,
	),
	/// Avatar upload to storage failed.
	#[error("Avatar upload to storage failed.")]
	Upload {
		/// Transport failure while pushing the bytes.
		#[source]
		source: TransferError,
	},
	/// Avatar path could not be written to the user record.
	#[error("Avatar path could not be saved on the user record.")]
	Persist {
		/// Store failure while updating the record.
		#[source]
		source: StoreError,
	},
}
