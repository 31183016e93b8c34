//! File-storage seam backing avatar sync (typically an upload plugin on the host).

// self
use crate::_prelude::*;

/// Future type returned by upload-sink operations.
pub type UploadFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + 'a + Send>>;

/// Describes the object about to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
	/// Target file name, including the extension.
	pub file_name: String,
	/// MIME type of the bytes to upload.
	pub content_type: String,
	/// Payload size in bytes.
	pub byte_len: u64,
}
impl UploadRequest {
	/// Creates an upload request.
	pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, byte_len: u64) -> Self {
		Self { file_name: file_name.into(), content_type: content_type.into(), byte_len }
	}
}

/// Pre-authorized upload slot handed back by the host's file storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadSlot {
	/// Pre-signed URL the bytes are PUT to.
	pub upload_url: Url,
	/// Extra headers required by the pre-signed request.
	pub extra_headers: BTreeMap<String, String>,
	/// Storage path recorded on the user record once the upload succeeds.
	pub file_path: String,
}

/// Error type produced by [`UploadSink`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum UploadError {
	/// Storage refused to prepare an upload slot.
	#[error("Upload slot could not be prepared: {message}.")]
	Slot {
		/// Human-readable error payload.
		message: String,
	},
	/// Uploaded object could not be marked as permanent.
	#[error("Uploaded object could not be retained: {message}.")]
	Retain {
		/// Human-readable error payload.
		message: String,
	},
}

/// Host seam for pre-authorized uploads and retention marking.
///
/// Storage backends usually expire unreferenced objects after a while, so the
/// doorman calls [`UploadSink::retain`] once the bytes are in place and only
/// then records the path on the user record.
pub trait UploadSink
where
	Self: Send + Sync,
{
	/// Asks the host storage for a pre-authorized upload slot.
	fn prepare<'a>(&'a self, request: &'a UploadRequest) -> UploadFuture<'a, UploadSlot>;

	/// Marks the uploaded object as permanent so cleanup jobs skip it.
	fn retain<'a>(&'a self, file_path: &'a str) -> UploadFuture<'a, ()>;
}
