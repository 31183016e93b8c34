//! Thread-safe in-memory [`UserStore`] implementation for local development and tests.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	host::{
		record::{FieldValues, UserRecord},
		store::{StoreError, StoreFuture, UserStore},
	},
	ident::FieldName,
};

type RecordList = Arc<RwLock<Vec<UserRecord>>>;

/// Thread-safe store that keeps user records in-process for tests and demos.
///
/// Records keep insertion order, matching how a host resource would return the
/// first row for an equality filter. Primary keys are random alphanumeric
/// strings assigned on create.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore(RecordList);
impl MemoryUserStore {
	const PK_LEN: usize = 16;

	/// Seeds the store with existing records.
	pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
		Self(Arc::new(RwLock::new(records.into_iter().collect())))
	}

	/// Returns a snapshot of all records, in insertion order.
	pub fn records(&self) -> Vec<UserRecord> {
		self.0.read().clone()
	}

	fn find_now(list: RecordList, field: FieldName, email: String) -> Option<UserRecord> {
		list.read().iter().find(|record| record.str_field(&field) == Some(email.as_str())).cloned()
	}

	fn create_now(list: RecordList, fields: FieldValues) -> UserRecord {
		let pk = serde_json::Value::String(random_pk());
		let record = UserRecord::new(pk, fields);

		list.write().push(record.clone());

		record
	}

	fn update_now(
		list: RecordList,
		pk: serde_json::Value,
		changes: FieldValues,
	) -> Result<(), StoreError> {
		let mut guard = list.write();

		match guard.iter_mut().find(|record| record.pk == pk) {
			Some(record) => {
				record.fields.extend(changes);

				Ok(())
			},
			None => Err(StoreError::Backend { message: format!("no record with primary key {pk}") }),
		}
	}
}
impl UserStore for MemoryUserStore {
	fn find_by_email<'a>(
		&'a self,
		field: &'a FieldName,
		email: &'a str,
	) -> StoreFuture<'a, Option<UserRecord>> {
		let list = self.0.clone();
		let field = field.to_owned();
		let email = email.to_owned();

		Box::pin(async move { Ok(Self::find_now(list, field, email)) })
	}

	fn create(&self, fields: FieldValues) -> StoreFuture<'_, UserRecord> {
		let list = self.0.clone();

		Box::pin(async move { Ok(Self::create_now(list, fields)) })
	}

	fn update<'a>(
		&'a self,
		pk: &'a serde_json::Value,
		changes: FieldValues,
	) -> StoreFuture<'a, ()> {
		let list = self.0.clone();
		let pk = pk.clone();

		Box::pin(async move { Self::update_now(list, pk, changes) })
	}
}

fn random_pk() -> String {
	rand::rng().sample_iter(Alphanumeric).take(MemoryUserStore::PK_LEN).map(char::from).collect()
}
