//! Normalized identity payload returned by adapter exchanges.

// self
use crate::_prelude::*;

/// Provider-reported identity for the account that completed authorization.
///
/// The profile is transient: the doorman consumes it during a single callback
/// and never persists it as-is. `email` is the only mandatory part, because the
/// email column is the match key for every login.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityProfile {
	/// Email address used to match or provision the local user record.
	pub email: String,
	/// Display name reported by the provider.
	pub full_name: Option<String>,
	/// Avatar image location reported by the provider.
	pub picture_url: Option<Url>,
	/// Provider-specific extras kept for host hooks (ids, handles, locales).
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl IdentityProfile {
	/// Creates a profile for the given email address.
	pub fn new(email: impl Into<String>) -> Self {
		Self { email: email.into(), full_name: None, picture_url: None, extra: BTreeMap::new() }
	}

	/// Attaches the provider-reported display name.
	pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
		self.full_name = Some(full_name.into());

		self
	}

	/// Attaches the provider-reported avatar location.
	pub fn with_picture_url(mut self, picture_url: Url) -> Self {
		self.picture_url = Some(picture_url);

		self
	}

	/// Adds a provider-specific extra field.
	pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}
}
