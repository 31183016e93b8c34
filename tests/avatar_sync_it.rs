#![cfg(feature = "reqwest")]

// std
use std::{
	collections::BTreeMap,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
};
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
// self
use oauth2_doorman::{
	adapter::{AdapterFuture, IdentityAdapter, IdentityProfile},
	config::LoginOptions,
	flow::{CallbackRequest, DoormanBuilder, ReqwestDoorman},
	host::{
		ColumnKind, ColumnSpec, FieldValues, MemoryUserStore, RequestContext, ResourceSchema,
		SessionFuture, SessionSink, SessionTicket, UploadFuture, UploadRequest, UploadSink,
		UploadSlot, UserRecord,
	},
	ident::{FieldName, ProviderId},
	state::StateToken,
	url::Url,
};

fn field(name: &str) -> FieldName {
	FieldName::new(name).expect("Field name should be valid for avatar tests.")
}

fn encoded_state() -> String {
	StateToken::new(ProviderId::new("google").expect("Provider identifier should be valid."))
		.encode()
}

fn schema() -> ResourceSchema {
	ResourceSchema::new(
		"adminuser",
		[
			ColumnSpec::new(field("email"), ColumnKind::Text),
			ColumnSpec::new(field("avatar"), ColumnKind::Text),
			ColumnSpec::new(field("password_hash"), ColumnKind::Text),
		],
	)
}

fn seeded_user(fields: FieldValues) -> UserRecord {
	let mut all = FieldValues::from([
		("email".to_owned(), serde_json::json!("ada@example.com")),
		("password_hash".to_owned(), serde_json::json!("$argon2id$seeded")),
	]);

	all.extend(fields);

	UserRecord::new(serde_json::json!("user-1"), all)
}

struct PictureAdapter {
	id: ProviderId,
	picture_url: Url,
}
impl PictureAdapter {
	fn new(picture_url: Url) -> Arc<Self> {
		Arc::new(Self {
			id: ProviderId::new("google").expect("Provider identifier should be valid."),
			picture_url,
		})
	}
}
impl IdentityAdapter for PictureAdapter {
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
		let profile =
			IdentityProfile::new("ada@example.com").with_picture_url(self.picture_url.clone());

		Box::pin(async move { Ok(profile) })
	}
}

#[derive(Default)]
struct RecordingSessions {
	issued: AtomicU64,
}
impl SessionSink for RecordingSessions {
	fn set_auth_cookie<'a>(
		&'a self,
		_ctx: &'a RequestContext,
		_ticket: &'a SessionTicket,
	) -> SessionFuture<'a, ()> {
		self.issued.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Ok(()) })
	}
}

struct StaticUploads {
	upload_url: Url,
	prepared: AtomicU64,
	retained: Mutex<Vec<String>>,
}
impl StaticUploads {
	fn new(upload_url: Url) -> Arc<Self> {
		Arc::new(Self { upload_url, prepared: AtomicU64::new(0), retained: Mutex::new(Vec::new()) })
	}
}
impl UploadSink for StaticUploads {
	fn prepare<'a>(&'a self, request: &'a UploadRequest) -> UploadFuture<'a, UploadSlot> {
		self.prepared.fetch_add(1, Ordering::SeqCst);

		let slot = UploadSlot {
			upload_url: self.upload_url.clone(),
			extra_headers: BTreeMap::from([("x-amz-acl".to_owned(), "private".to_owned())]),
			file_path: format!("avatars/{}", request.file_name),
		};

		Box::pin(async move { Ok(slot) })
	}

	fn retain<'a>(&'a self, file_path: &'a str) -> UploadFuture<'a, ()> {
		self.retained.lock().push(file_path.to_owned());

		Box::pin(async { Ok(()) })
	}
}

fn doorman(
	server: &MockServer,
	store: &MemoryUserStore,
	sessions: &Arc<RecordingSessions>,
	uploads: &Arc<StaticUploads>,
) -> ReqwestDoorman {
	let picture_url =
		Url::parse(&server.url("/avatar/ada.png")).expect("Mock avatar URL should parse.");
	let options = LoginOptions::new(field("email")).with_avatar_field(field("avatar"));

	DoormanBuilder::new(options, schema(), Arc::new(store.clone()), sessions.clone())
		.adapter(PictureAdapter::new(picture_url))
		.uploads(uploads.clone())
		.attach()
		.expect("Avatar test options should validate.")
}

#[tokio::test]
async fn avatar_pipeline_uploads_retains_and_records_the_path() {
	let server = MockServer::start_async().await;
	let fetch_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/avatar/ada.png");
			then.status(200).header("content-type", "image/png").body("fake-png-bytes");
		})
		.await;
	let put_mock = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/bucket/upload")
				.header("content-type", "image/png")
				.header("x-amz-acl", "private")
				.body("fake-png-bytes");
			then.status(200);
		})
		.await;
	let store = MemoryUserStore::with_records([seeded_user(FieldValues::new())]);
	let sessions = Arc::new(RecordingSessions::default());
	let uploads = StaticUploads::new(
		Url::parse(&server.url("/bucket/upload")).expect("Mock upload URL should parse."),
	);
	let doorman = doorman(&server, &store, &sessions, &uploads);
	let reply = doorman.handle_callback(CallbackRequest::new("code-1", encoded_state())).await;

	assert!(reply.allowed_login);

	fetch_mock.assert_async().await;
	put_mock.assert_async().await;

	assert_eq!(uploads.prepared.load(Ordering::SeqCst), 1);

	let retained = uploads.retained.lock().clone();

	assert_eq!(retained.len(), 1);
	assert!(retained[0].starts_with("avatars/"));
	assert!(retained[0].ends_with(".png"));

	let stored = store.records();

	assert_eq!(stored[0].str_field("avatar"), Some(retained[0].as_str()));
}

#[tokio::test]
async fn preset_avatar_skips_the_pipeline() {
	let server = MockServer::start_async().await;
	let fetch_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/avatar/ada.png");
			then.status(200).header("content-type", "image/png").body("fake-png-bytes");
		})
		.await;
	let store = MemoryUserStore::with_records([seeded_user(FieldValues::from([(
		"avatar".to_owned(),
		serde_json::json!("avatars/existing.png"),
	)]))]);
	let sessions = Arc::new(RecordingSessions::default());
	let uploads = StaticUploads::new(
		Url::parse(&server.url("/bucket/upload")).expect("Mock upload URL should parse."),
	);
	let doorman = doorman(&server, &store, &sessions, &uploads);
	let reply = doorman.handle_callback(CallbackRequest::new("code-1", encoded_state())).await;

	assert!(reply.allowed_login);
	assert_eq!(fetch_mock.hits_async().await, 0, "A preset avatar must not be re-fetched.");
	assert_eq!(uploads.prepared.load(Ordering::SeqCst), 0);
	assert_eq!(store.records()[0].str_field("avatar"), Some("avatars/existing.png"));
}

#[tokio::test]
async fn fetch_failure_degrades_to_a_login_without_avatar() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/avatar/ada.png");
			then.status(500);
		})
		.await;

	let store = MemoryUserStore::with_records([seeded_user(FieldValues::new())]);
	let sessions = Arc::new(RecordingSessions::default());
	let uploads = StaticUploads::new(
		Url::parse(&server.url("/bucket/upload")).expect("Mock upload URL should parse."),
	);
	let doorman = doorman(&server, &store, &sessions, &uploads);
	let reply = doorman.handle_callback(CallbackRequest::new("code-1", encoded_state())).await;

	assert!(reply.allowed_login, "Avatar failures must never fail the login.");
	assert_eq!(sessions.issued.load(Ordering::SeqCst), 1);
	assert_eq!(uploads.prepared.load(Ordering::SeqCst), 0);
	assert_eq!(store.records()[0].str_field("avatar"), None);
}

#[tokio::test]
async fn unsupported_content_type_is_skipped() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/avatar/ada.png");
			then.status(200)
				.header("content-type", "text/html; charset=utf-8")
				.body("<html>not an image</html>");
		})
		.await;

	let store = MemoryUserStore::with_records([seeded_user(FieldValues::new())]);
	let sessions = Arc::new(RecordingSessions::default());
	let uploads = StaticUploads::new(
		Url::parse(&server.url("/bucket/upload")).expect("Mock upload URL should parse."),
	);
	let doorman = doorman(&server, &store, &sessions, &uploads);
	let reply = doorman.handle_callback(CallbackRequest::new("code-1", encoded_state())).await;

	assert!(reply.allowed_login);
	assert_eq!(uploads.prepared.load(Ordering::SeqCst), 0);
	assert_eq!(store.records()[0].str_field("avatar"), None);
}
