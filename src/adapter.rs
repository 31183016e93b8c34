//! Identity adapter seam implemented by per-provider collaborators.
//!
//! Adapters own the provider protocol (endpoints, credentials, token or
//! ID-token handling) and hand back a normalized [`IdentityProfile`]. The
//! doorman never talks to a provider directly; it resolves an adapter by its
//! stable [`ProviderId`] and drives the exchange through this trait.

pub mod profile;

pub use profile::IdentityProfile;

// self
use crate::{_prelude::*, ident::ProviderId};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Future type returned by adapter code exchanges.
pub type AdapterFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AdapterError>> + 'a + Send>>;

/// Contract implemented by per-provider identity adapters.
///
/// Implementors are required to be `Send + Sync` so they can sit behind `Arc`
/// inside the doorman. Only `provider_id`, `icon`, `authorization_url`, and
/// `exchange_code` are mandatory; the remaining hooks carry defaults that fit
/// the common authorization-code family.
pub trait IdentityAdapter
where
	Self: Send + Sync,
{
	/// Stable identifier that round-trips through the state token.
	fn provider_id(&self) -> &ProviderId;

	/// Human-readable label shown on the login button.
	///
	/// Defaults to the provider identifier.
	fn display_name(&self) -> &str {
		self.provider_id().as_ref()
	}

	/// Inline icon markup or asset reference rendered on the login button.
	fn icon(&self) -> &str;

	/// Exchange family implemented by the adapter.
	///
	/// Defaults to [`AdapterKind::CodeExchange`]. OpenID-style adapters that
	/// validate a signed ID token instead of calling a user-info endpoint
	/// should override this so attach-time validation can reason about them.
	fn kind(&self) -> AdapterKind {
		AdapterKind::CodeExchange
	}

	/// Pre-assembled authorization URL for the provider, without the state parameter.
	///
	/// The UI registrar appends the encoded state token before rendering.
	fn authorization_url(&self) -> Url;

	/// Exchanges the authorization code for the provider's view of the user.
	fn exchange_code<'a>(
		&'a self,
		code: &'a str,
		redirect_uri: Option<&'a str>,
	) -> AdapterFuture<'a, IdentityProfile>;
}

/// Exchange families an adapter can implement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
	/// Authorization-code exchange against the provider's token + user-info endpoints.
	CodeExchange,
	/// OpenID-style flow that validates a signed ID token directly.
	IdToken,
}
impl AdapterKind {
	/// Returns a stable label suitable for logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			AdapterKind::CodeExchange => "code_exchange",
			AdapterKind::IdToken => "id_token",
		}
	}
}
impl Display for AdapterKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error produced by identity adapters during the code exchange.
#[derive(Debug, ThisError)]
pub enum AdapterError {
	/// Provider rejected the exchange (bad, expired, or replayed code).
	#[error("Provider rejected the code exchange: {reason}.")]
	Exchange {
		/// Provider-supplied failure reason.
		reason: String,
	},
	/// Provider account carries no email address to match users by.
	#[error("Provider returned no email address for the account.")]
	MissingEmail,
	/// Underlying HTTP client reported a network failure.
	#[error("Network failure while talking to the provider.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl AdapterError {
	/// Builds an exchange rejection carrying the provider's reason string.
	pub fn exchange(reason: impl Into<String>) -> Self {
		Self::Exchange { reason: reason.into() }
	}

	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	struct BareAdapter {
		id: ProviderId,
	}
	impl IdentityAdapter for BareAdapter {
		fn provider_id(&self) -> &ProviderId {
			&self.id
		}

		fn icon(&self) -> &str {
			"<svg/>"
		}

		fn authorization_url(&self) -> Url {
			Url::parse("https://provider.test/authorize").expect("Fixture URL should parse.")
		}

		fn exchange_code<'a>(
			&'a self,
			_code: &'a str,
			_redirect_uri: Option<&'a str>,
		) -> AdapterFuture<'a, IdentityProfile> {
			Box::pin(async { Err(AdapterError::MissingEmail) })
		}
	}

	#[test]
	fn defaults_cover_the_common_adapter_family() {
		let adapter = BareAdapter {
			id: ProviderId::new("github").expect("Provider fixture should be valid."),
		};

		assert_eq!(adapter.display_name(), "github");
		assert_eq!(adapter.kind(), AdapterKind::CodeExchange);
		assert_eq!(AdapterKind::IdToken.as_str(), "id_token");
	}

	#[test]
	fn exchange_helper_preserves_the_reason() {
		let err = AdapterError::exchange("code expired");

		assert_eq!(err.to_string(), "Provider rejected the code exchange: code expired.");
	}

	#[test]
	fn transport_helper_boxes_and_exposes_the_source() {
		let err = AdapterError::transport(std::io::Error::other("connection reset"));

		assert_eq!(err.to_string(), "Network failure while talking to the provider.");

		let source = StdError::source(&err).expect("Transport error should expose its source.");

		assert_eq!(source.to_string(), "connection reset");
	}
}
