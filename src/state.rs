//! Round-trip state token carried through the provider redirect.
//!
//! The encoded form is URL-safe base64 (no padding) of the JSON object
//! `{"provider": "<id>"}`. Encode and decode both live here so the two ends of
//! the round trip can never drift apart.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, ident::ProviderId};

/// Provider selector that must survive the authorization round trip unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StateToken {
	/// Identifier of the adapter that started the flow.
	pub provider: ProviderId,
}
impl StateToken {
	/// Creates a token for the given provider.
	pub fn new(provider: ProviderId) -> Self {
		Self { provider }
	}

	/// Encodes the token for embedding in an authorization URL.
	pub fn encode(&self) -> String {
		let payload = serde_json::json!({ "provider": self.provider.as_ref() });

		URL_SAFE_NO_PAD.encode(payload.to_string())
	}

	/// Decodes a token echoed back by the provider redirect.
	pub fn decode(value: &str) -> Result<Self, StateTokenError> {
		let bytes = URL_SAFE_NO_PAD.decode(value)?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer).map_err(StateTokenError::Decode)
	}
}

/// Error raised while decoding a state token.
#[derive(Debug, ThisError)]
pub enum StateTokenError {
	/// Value is not URL-safe base64.
	#[error("State token is not valid base64.")]
	Base64(#[from] base64::DecodeError),
	/// Decoded payload is not the expected JSON object.
	#[error("State token payload could not be decoded.")]
	Decode(#[source] serde_path_to_error::Error<serde_json::error::Error>),
}
