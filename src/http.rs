//! Transport primitives for avatar fetches and uploads.
//!
//! The module exposes [`ImageHttpClient`] as the crate's only dependency on an
//! HTTP stack. The doorman downloads the provider-reported picture through
//! [`ImageHttpClient::fetch`] and pushes the bytes into a pre-authorized
//! [`UploadSlot`](crate::host::UploadSlot) through [`ImageHttpClient::upload`].
//! A reqwest-backed implementation ships behind the `reqwest` feature.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
// self
use crate::{_prelude::*, host::UploadSlot};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Future type returned by image transfers.
pub type TransferFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransferError>> + 'a + Send>>;

/// Image bytes plus the content type reported by the origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedImage {
	/// Raw image bytes.
	pub bytes: Vec<u8>,
	/// MIME type reported by the origin, without parameters.
	pub content_type: String,
}

/// Transport failures surfaced while moving avatar bytes around.
#[derive(Debug, ThisError)]
pub enum TransferError {
	/// Origin or storage endpoint answered with a non-success status.
	#[error("Endpoint answered with HTTP status {status}.")]
	Status {
		/// HTTP status code of the response.
		status: u16,
	},
	/// Origin response carried no content type to derive a file extension from.
	#[error("Image response carried no content type.")]
	MissingContentType,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during the image transfer.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransferError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransferError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Abstraction over HTTP transports that move avatar images.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared
/// behind `Arc` across doorman instances, and the futures they return must be
/// `Send` for the lifetime of the in-flight transfer.
pub trait ImageHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Downloads the image and reports the origin's content type.
	fn fetch<'a>(&'a self, url: &'a Url) -> TransferFuture<'a, FetchedImage>;

	/// Pushes the image bytes into the pre-authorized upload slot.
	///
	/// The transfer is an HTTP PUT of the raw bytes with the slot's extra
	/// headers applied, matching how pre-signed storage URLs expect writes.
	fn upload<'a>(&'a self, slot: &'a UploadSlot, image: &'a FetchedImage) -> TransferFuture<'a, ()>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestImageClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestImageClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestImageClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestImageClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ImageHttpClient for ReqwestImageClient {
	fn fetch<'a>(&'a self, url: &'a Url) -> TransferFuture<'a, FetchedImage> {
		let client = self.0.clone();
		let url = url.clone();

		Box::pin(async move {
			let response = client.get(url).send().await?;
			let status = response.status();

			if !status.is_success() {
				return Err(TransferError::Status { status: status.as_u16() });
			}

			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(|value| value.split_once(';').map_or(value, |(main, _)| main).trim().to_owned())
				.ok_or(TransferError::MissingContentType)?;
			let bytes = response.bytes().await?.to_vec();

			Ok(FetchedImage { bytes, content_type })
		})
	}

	fn upload<'a>(&'a self, slot: &'a UploadSlot, image: &'a FetchedImage) -> TransferFuture<'a, ()> {
		let client = self.0.clone();
		let slot = slot.clone();
		let image = image.clone();

		Box::pin(async move {
			let mut request =
				client.put(slot.upload_url).header(CONTENT_TYPE, image.content_type.as_str());

			for (name, value) in &slot.extra_headers {
				request = request.header(name.as_str(), value.as_str());
			}

			let response = request.body(image.bytes).send().await?;
			let status = response.status();

			if !status.is_success() {
				return Err(TransferError::Status { status: status.as_u16() });
			}

			Ok(())
		})
	}
}
