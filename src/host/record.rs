//! Host-owned user records addressed by an opaque primary key.

// self
use crate::_prelude::*;

/// Field-value map used for record creation and partial updates.
pub type FieldValues = BTreeMap<String, serde_json::Value>;

/// User record as stored by the host resource.
///
/// The primary key stays an opaque [`serde_json::Value`] because hosts differ
/// on key shape (integers, UUID strings, composites serialized to JSON).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
	/// Host-assigned primary key.
	pub pk: serde_json::Value,
	/// Column values keyed by column name.
	pub fields: FieldValues,
}
impl UserRecord {
	/// Creates a record from a primary key and its field values.
	pub fn new(pk: impl Into<serde_json::Value>, fields: FieldValues) -> Self {
		Self { pk: pk.into(), fields }
	}

	/// Returns the raw value of a field, if present.
	pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
		self.fields.get(name)
	}

	/// Returns the field as a string slice, when it holds a string.
	pub fn str_field(&self, name: &str) -> Option<&str> {
		self.field(name).and_then(serde_json::Value::as_str)
	}

	/// Returns the field as a boolean, when it holds one.
	pub fn bool_field(&self, name: &str) -> Option<bool> {
		self.field(name).and_then(serde_json::Value::as_bool)
	}

	/// Returns `true` when the field holds a usable value.
	///
	/// Missing, null, and empty-string fields all count as unset.
	pub fn is_field_set(&self, name: &str) -> bool {
		match self.field(name) {
			None | Some(serde_json::Value::Null) => false,
			Some(serde_json::Value::String(value)) => !value.is_empty(),
			Some(_) => true,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn record() -> UserRecord {
		let mut fields = FieldValues::new();

		fields.insert("email".into(), serde_json::json!("dev@example.com"));
		fields.insert("confirmed".into(), serde_json::json!(false));
		fields.insert("avatar".into(), serde_json::json!(""));
		fields.insert("nickname".into(), serde_json::Value::Null);

		UserRecord::new(serde_json::json!(42), fields)
	}

	#[test]
	fn typed_accessors_narrow_values() {
		let record = record();

		assert_eq!(record.str_field("email"), Some("dev@example.com"));
		assert_eq!(record.bool_field("confirmed"), Some(false));
		assert_eq!(record.str_field("confirmed"), None);
		assert_eq!(record.field("missing"), None);
	}

	#[test]
	fn unset_detection_treats_null_and_empty_as_absent() {
		let record = record();

		assert!(record.is_field_set("email"));
		assert!(record.is_field_set("confirmed"));
		assert!(!record.is_field_set("avatar"), "Empty strings count as unset.");
		assert!(!record.is_field_set("nickname"), "Null counts as unset.");
		assert!(!record.is_field_set("missing"));
	}
}
