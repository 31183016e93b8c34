//! Doorman options and attach-time validation against the host schema.

// self
use crate::{
	_prelude::*,
	adapter::{AdapterKind, IdentityAdapter},
	error::ConfigError,
	host::{ColumnKind, FieldValues, ResourceSchema},
	ident::FieldName,
};

/// Default path of the callback page registered on the host.
pub const DEFAULT_CALLBACK_PATH: &str = "/oauth/callback";

/// Per-doorman login options supplied by the host administrator.
#[derive(Clone, Debug)]
pub struct LoginOptions {
	/// Column holding the user's email address; the doorman matches users by it.
	pub email_field: FieldName,
	/// Optional boolean column flipped to `true` on the first OAuth login.
	pub email_confirmed_field: Option<FieldName>,
	/// Optional column kept in sync with the provider-reported full name.
	pub full_name_field: Option<FieldName>,
	/// Optional column holding the uploaded avatar's storage path.
	pub avatar_field: Option<FieldName>,
	/// Self-signup policy for emails without a matching record.
	pub open_signup: OpenSignup,
	/// Session length override; falls back to the host auth policy when unset.
	pub session_duration: Option<Duration>,
	/// Visual knobs forwarded to the login-button component.
	pub buttons: ButtonAppearance,
	/// Path the callback page is registered under.
	pub callback_path: String,
}
impl LoginOptions {
	/// Creates options matching users by the provided email column, everything
	/// else at its default.
	pub fn new(email_field: FieldName) -> Self {
		Self {
			email_field,
			email_confirmed_field: None,
			full_name_field: None,
			avatar_field: None,
			open_signup: OpenSignup::default(),
			session_duration: None,
			buttons: ButtonAppearance::default(),
			callback_path: DEFAULT_CALLBACK_PATH.into(),
		}
	}

	/// Sets the boolean column confirmed on the first OAuth login.
	pub fn with_email_confirmed_field(mut self, field: FieldName) -> Self {
		self.email_confirmed_field = Some(field);

		self
	}

	/// Sets the column kept in sync with the provider-reported full name.
	pub fn with_full_name_field(mut self, field: FieldName) -> Self {
		self.full_name_field = Some(field);

		self
	}

	/// Sets the column holding the uploaded avatar's storage path.
	pub fn with_avatar_field(mut self, field: FieldName) -> Self {
		self.avatar_field = Some(field);

		self
	}

	/// Overrides the self-signup policy.
	pub fn with_open_signup(mut self, open_signup: OpenSignup) -> Self {
		self.open_signup = open_signup;

		self
	}

	/// Overrides the session length for logins through this doorman.
	pub fn with_session_duration(mut self, duration: Duration) -> Self {
		self.session_duration = Some(duration);

		self
	}

	/// Overrides the login-button appearance.
	pub fn with_buttons(mut self, buttons: ButtonAppearance) -> Self {
		self.buttons = buttons;

		self
	}

	/// Overrides the callback page path.
	pub fn with_callback_path(mut self, path: impl Into<String>) -> Self {
		self.callback_path = path.into();

		self
	}

	/// Validates the options against the host schema and collaborators.
	///
	/// Runs on [`DoormanBuilder::attach`](crate::flow::DoormanBuilder::attach);
	/// the first violated rule wins. Checks are ordered so structural problems
	/// (no adapters, duplicate identifiers) surface before field-level ones.
	pub fn validate(
		&self,
		schema: &ResourceSchema,
		adapters: &[Arc<dyn IdentityAdapter>],
		password_hash_field: &str,
		has_upload_sink: bool,
	) -> Result<(), ConfigError> {
		if adapters.is_empty() {
			return Err(ConfigError::NoAdapters);
		}

		let mut seen = Vec::with_capacity(adapters.len());

		for adapter in adapters {
			let id = adapter.provider_id();

			if seen.contains(&id) {
				return Err(ConfigError::DuplicateProvider { provider: id.clone() });
			}

			seen.push(id);
		}
		if !schema.has_column(self.email_field.as_ref()) {
			return Err(ConfigError::EmailFieldMissing {
				field: self.email_field.clone(),
				resource: schema.resource_id.clone(),
			});
		}
		if let Some(field) = &self.email_confirmed_field {
			match schema.column(field.as_ref()) {
				None =>
					return Err(ConfigError::ConfirmedFieldMissing {
						field: field.clone(),
						resource: schema.resource_id.clone(),
					}),
				Some(column) =>
					if column.kind != ColumnKind::Boolean {
						return Err(ConfigError::ConfirmedFieldNotBoolean {
							field: field.clone(),
							kind: column.kind,
						});
					},
			}
		}
		if let Some(field) = &self.full_name_field {
			if !schema.has_column(field.as_ref()) {
				return Err(ConfigError::FullNameFieldMissing {
					field: field.clone(),
					resource: schema.resource_id.clone(),
				});
			}
		}
		if let Some(field) = &self.avatar_field {
			if !schema.has_column(field.as_ref()) {
				return Err(ConfigError::AvatarFieldMissing {
					field: field.clone(),
					resource: schema.resource_id.clone(),
				});
			}

			for adapter in adapters {
				if adapter.kind() != AdapterKind::CodeExchange {
					return Err(ConfigError::AvatarRequiresCodeExchange {
						provider: adapter.provider_id().clone(),
					});
				}
			}
			if !has_upload_sink {
				return Err(ConfigError::AvatarUploadSinkMissing { field: field.clone() });
			}
		}
		if self.open_signup.enabled {
			if !schema.has_column(password_hash_field) {
				return Err(ConfigError::PasswordHashFieldMissing {
					field: password_hash_field.to_owned(),
					resource: schema.resource_id.clone(),
				});
			}

			for field in self.open_signup.default_field_values.keys() {
				if !schema.has_column(field) {
					return Err(ConfigError::DefaultValueFieldMissing {
						field: field.clone(),
						resource: schema.resource_id.clone(),
					});
				}
			}
		}

		Ok(())
	}
}

/// Self-signup policy applied when a callback email has no matching record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpenSignup {
	/// Whether unknown emails may provision a fresh record.
	pub enabled: bool,
	/// Values seeded into provisioned records, keyed by column name.
	///
	/// The email, password-hash, and email-confirmed columns are always set by
	/// the doorman itself and win over entries in this map.
	pub default_field_values: FieldValues,
}
impl OpenSignup {
	/// Creates an enabled self-signup policy with no seeded values.
	pub fn enabled() -> Self {
		Self { enabled: true, default_field_values: FieldValues::new() }
	}

	/// Sets the values seeded into provisioned records.
	pub fn with_defaults(mut self, defaults: FieldValues) -> Self {
		self.default_field_values = defaults;

		self
	}
}

/// Visual knobs forwarded to the login-button component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonAppearance {
	/// Render icons without provider labels.
	pub icon_only: bool,
	/// Render buttons with fully rounded corners.
	pub pill: bool,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		adapter::{AdapterError, AdapterFuture, IdentityProfile},
		host::ColumnSpec,
		ident::ProviderId,
	};

	struct StubAdapter {
		id: ProviderId,
		kind: AdapterKind,
	}
	impl StubAdapter {
		fn new(id: &str) -> Self {
			Self {
				id: ProviderId::new(id).expect("Provider fixture should be valid."),
				kind: AdapterKind::CodeExchange,
			}
		}

		fn id_token(id: &str) -> Self {
			Self { kind: AdapterKind::IdToken, ..Self::new(id) }
		}
	}
	impl IdentityAdapter for StubAdapter {
		fn provider_id(&self) -> &ProviderId {
			&self.id
		}

		fn icon(&self) -> &str {
			"<svg/>"
		}

		fn kind(&self) -> AdapterKind {
			self.kind
		}

		fn authorization_url(&self) -> Url {
			Url::parse("https://provider.test/authorize").expect("Fixture URL should parse.")
		}

		fn exchange_code<'a>(
			&'a self,
			_code: &'a str,
			_redirect_uri: Option<&'a str>,
		) -> AdapterFuture<'a, IdentityProfile> {
			Box::pin(async { Err(AdapterError::exchange("unused")) })
		}
	}

	fn field(name: &str) -> FieldName {
		FieldName::new(name).expect("Field fixture should be valid.")
	}

	fn schema() -> ResourceSchema {
		ResourceSchema::new(
			"adminuser",
			[
				ColumnSpec::new(field("email"), ColumnKind::Text),
				ColumnSpec::new(field("email_confirmed"), ColumnKind::Boolean),
				ColumnSpec::new(field("full_name"), ColumnKind::Text),
				ColumnSpec::new(field("avatar"), ColumnKind::Text),
				ColumnSpec::new(field("password_hash"), ColumnKind::Text),
				ColumnSpec::new(field("role"), ColumnKind::Text),
			],
		)
	}

	fn adapters(list: impl IntoIterator<Item = StubAdapter>) -> Vec<Arc<dyn IdentityAdapter>> {
		list.into_iter().map(|adapter| Arc::new(adapter) as Arc<dyn IdentityAdapter>).collect()
	}

	#[test]
	fn validate_accepts_complete_options() {
		let options = LoginOptions::new(field("email"))
			.with_email_confirmed_field(field("email_confirmed"))
			.with_full_name_field(field("full_name"))
			.with_avatar_field(field("avatar"))
			.with_open_signup(OpenSignup::enabled().with_defaults(FieldValues::from([(
				"role".to_owned(),
				serde_json::json!("user"),
			)])));
		let adapters = adapters([StubAdapter::new("google"), StubAdapter::new("github")]);

		assert_eq!(options.validate(&schema(), &adapters, "password_hash", true), Ok(()));
	}

	#[test]
	fn validate_rejects_empty_and_duplicated_adapters() {
		let options = LoginOptions::new(field("email"));

		assert_eq!(options.validate(&schema(), &[], "password_hash", false), Err(ConfigError::NoAdapters));
		assert_eq!(
			options.validate(
				&schema(),
				&adapters([StubAdapter::new("google"), StubAdapter::new("google")]),
				"password_hash",
				false,
			),
			Err(ConfigError::DuplicateProvider {
				provider: ProviderId::new("google").expect("Provider fixture should be valid."),
			}),
		);
	}

	#[test]
	fn validate_rejects_unknown_email_field() {
		let options = LoginOptions::new(field("mail"));

		assert_eq!(
			options.validate(&schema(), &adapters([StubAdapter::new("google")]), "password_hash", false),
			Err(ConfigError::EmailFieldMissing {
				field: field("mail"),
				resource: "adminuser".into(),
			}),
		);
	}

	#[test]
	fn validate_requires_boolean_confirmed_field() {
		let adapters = adapters([StubAdapter::new("google")]);
		let missing = LoginOptions::new(field("email")).with_email_confirmed_field(field("verified"));
		let text = LoginOptions::new(field("email")).with_email_confirmed_field(field("role"));

		assert_eq!(
			missing.validate(&schema(), &adapters, "password_hash", false),
			Err(ConfigError::ConfirmedFieldMissing {
				field: field("verified"),
				resource: "adminuser".into(),
			}),
		);
		assert_eq!(
			text.validate(&schema(), &adapters, "password_hash", false),
			Err(ConfigError::ConfirmedFieldNotBoolean { field: field("role"), kind: ColumnKind::Text }),
		);
	}

	#[test]
	fn validate_rejects_unknown_sync_fields() {
		let adapters = adapters([StubAdapter::new("google")]);
		let full_name = LoginOptions::new(field("email")).with_full_name_field(field("display_name"));
		let avatar = LoginOptions::new(field("email")).with_avatar_field(field("photo"));

		assert_eq!(
			full_name.validate(&schema(), &adapters, "password_hash", false),
			Err(ConfigError::FullNameFieldMissing {
				field: field("display_name"),
				resource: "adminuser".into(),
			}),
		);
		assert_eq!(
			avatar.validate(&schema(), &adapters, "password_hash", true),
			Err(ConfigError::AvatarFieldMissing { field: field("photo"), resource: "adminuser".into() }),
		);
	}

	#[test]
	fn validate_guards_the_avatar_pipeline() {
		let options = LoginOptions::new(field("email")).with_avatar_field(field("avatar"));

		assert_eq!(
			options.validate(&schema(), &adapters([StubAdapter::id_token("apple")]), "password_hash", true),
			Err(ConfigError::AvatarRequiresCodeExchange {
				provider: ProviderId::new("apple").expect("Provider fixture should be valid."),
			}),
		);
		assert_eq!(
			options.validate(&schema(), &adapters([StubAdapter::new("google")]), "password_hash", false),
			Err(ConfigError::AvatarUploadSinkMissing { field: field("avatar") }),
		);
	}

	#[test]
	fn validate_checks_signup_columns() {
		let adapters = adapters([StubAdapter::new("google")]);
		let options = LoginOptions::new(field("email")).with_open_signup(
			OpenSignup::enabled()
				.with_defaults(FieldValues::from([("tier".to_owned(), serde_json::json!("free"))])),
		);

		assert_eq!(
			options.validate(&schema(), &adapters, "secret_hash", false),
			Err(ConfigError::PasswordHashFieldMissing {
				field: "secret_hash".into(),
				resource: "adminuser".into(),
			}),
		);
		assert_eq!(
			options.validate(&schema(), &adapters, "password_hash", false),
			Err(ConfigError::DefaultValueFieldMissing {
				field: "tier".into(),
				resource: "adminuser".into(),
			}),
		);
	}
}
