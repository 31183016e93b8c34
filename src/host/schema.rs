//! Column metadata snapshot of the host resource the doorman attaches to.

// self
use crate::{_prelude::*, ident::FieldName};

/// Column type classes exposed by the host's resource metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
	/// Free-form text.
	Text,
	/// Boolean flag.
	Boolean,
	/// Integer number.
	Integer,
	/// Floating-point number.
	Float,
	/// Date/time value.
	DateTime,
	/// Structured JSON payload.
	Json,
}
impl ColumnKind {
	/// Returns a stable label suitable for error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			ColumnKind::Text => "text",
			ColumnKind::Boolean => "boolean",
			ColumnKind::Integer => "integer",
			ColumnKind::Float => "float",
			ColumnKind::DateTime => "datetime",
			ColumnKind::Json => "json",
		}
	}
}
impl Display for ColumnKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Single column of the host's user resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
	/// Column name.
	pub name: FieldName,
	/// Column type class.
	pub kind: ColumnKind,
}
impl ColumnSpec {
	/// Creates a column spec.
	pub fn new(name: FieldName, kind: ColumnKind) -> Self {
		Self { name, kind }
	}
}

/// Snapshot of the host resource's identity and columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
	/// Host-side resource identifier (used in validation messages).
	pub resource_id: String,
	/// Columns declared on the resource.
	pub columns: Vec<ColumnSpec>,
}
impl ResourceSchema {
	/// Creates a schema snapshot from the host's column metadata.
	pub fn new(resource_id: impl Into<String>, columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
		Self { resource_id: resource_id.into(), columns: columns.into_iter().collect() }
	}

	/// Looks up a column by name.
	pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
		self.columns.iter().find(|column| column.name.as_ref() == name)
	}

	/// Returns `true` when the resource declares the column.
	pub fn has_column(&self, name: &str) -> bool {
		self.column(name).is_some()
	}
}
