//! Persistence contract over the host's user resource.

// self
use crate::{
	_prelude::*,
	host::record::{FieldValues, UserRecord},
	ident::FieldName,
};

/// Future type returned by user-store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented over the host's resource API.
///
/// The doorman only ever needs three operations: equality lookup on the email
/// column, record creation for self-signup, and partial field updates. Email
/// uniqueness is the host's responsibility; `find_by_email` returns the first
/// match.
pub trait UserStore
where
	Self: Send + Sync,
{
	/// Returns the first record whose `field` equals `email`, if any.
	fn find_by_email<'a>(
		&'a self,
		field: &'a FieldName,
		email: &'a str,
	) -> StoreFuture<'a, Option<UserRecord>>;

	/// Inserts a record and returns it with the host-assigned primary key.
	fn create(&self, fields: FieldValues) -> StoreFuture<'_, UserRecord>;

	/// Applies the field changes to the record addressed by `pk`.
	fn update<'a>(
		&'a self,
		pk: &'a serde_json::Value,
		changes: FieldValues,
	) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`UserStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_doorman_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let doorman_error: Error = store_error.clone().into();

		assert!(matches!(doorman_error, Error::Storage(_)));
		assert!(doorman_error.to_string().contains("database unreachable"));

		let source = StdError::source(&doorman_error)
			.expect("Doorman error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
