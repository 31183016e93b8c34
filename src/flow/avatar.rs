//! Best-effort avatar pipeline: fetch, upload, retain, record update.
//!
//! The pipeline only runs when the avatar field is configured, an upload sink
//! is attached, the adapter reported a picture URL, and the record does not
//! already carry an avatar. Every failure is logged and swallowed so the login
//! itself never depends on provider image endpoints or the storage backend.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	adapter::IdentityProfile,
	error::AvatarSyncError,
	flow::Doorman,
	host::{FieldValues, UploadRequest, UploadSink, UserRecord},
	http::ImageHttpClient,
	ident::FieldName,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const AVATAR_BASENAME_LEN: usize = 16;

impl<C> Doorman<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Best-effort avatar sync; failures are logged and swallowed.
	///
	/// Skips (unconfigured field, preset avatar, no picture URL) are not
	/// counted as attempts.
	pub(crate) async fn sync_avatar(&self, user: &UserRecord, profile: &IdentityProfile) {
		let Some(field) = &self.options.avatar_field else {
			return;
		};
		let Some(uploads) = &self.uploads else {
			return;
		};
		let Some(picture_url) = &profile.picture_url else {
			return;
		};

		if user.is_field_set(field.as_ref()) {
			return;
		}

		const KIND: FlowKind = FlowKind::AvatarSync;

		let span = FlowSpan::new(KIND, "sync_avatar");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(self.transfer_avatar(uploads.as_ref(), picture_url, &user.pk, field))
			.await;

		match result {
			Ok(()) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(error) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				obs::warn_sync_failure("avatar_sync", &error);
			},
		}
	}

	async fn transfer_avatar(
		&self,
		uploads: &dyn UploadSink,
		picture_url: &Url,
		pk: &serde_json::Value,
		field: &FieldName,
	) -> Result<(), AvatarSyncError> {
		let image = self
			.http_client
			.fetch(picture_url)
			.await
			.map_err(|source| AvatarSyncError::Fetch { source })?;
		let extension = image_extension(&image.content_type).ok_or_else(|| {
			AvatarSyncError::UnsupportedContentType { content_type: image.content_type.clone() }
		})?;
		let file_name = format!("{}.{extension}", random_basename());
		let request =
			UploadRequest::new(file_name, image.content_type.clone(), image.bytes.len() as u64);
		let slot = uploads.prepare(&request).await?;

		self.http_client
			.upload(&slot, &image)
			.await
			.map_err(|source| AvatarSyncError::Upload { source })?;
		uploads.retain(&slot.file_path).await?;

		let mut changes = FieldValues::new();

		changes.insert(field.to_string(), serde_json::json!(slot.file_path));
		self.store.update(pk, changes).await.map_err(|source| AvatarSyncError::Persist { source })?;

		Ok(())
	}
}

/// Maps an image content type to the extension used in the upload name.
fn image_extension(content_type: &str) -> Option<&'static str> {
	match content_type {
		"image/jpeg" | "image/jpg" => Some("jpg"),
		"image/png" => Some("png"),
		"image/gif" => Some("gif"),
		"image/webp" => Some("webp"),
		"image/svg+xml" => Some("svg"),
		"image/avif" => Some("avif"),
		_ => None,
	}
}

fn random_basename() -> String {
	rand::rng().sample_iter(Alphanumeric).take(AVATAR_BASENAME_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn extension_mapping_covers_browser_image_types() {
		assert_eq!(image_extension("image/jpeg"), Some("jpg"));
		assert_eq!(image_extension("image/jpg"), Some("jpg"));
		assert_eq!(image_extension("image/svg+xml"), Some("svg"));
		assert_eq!(image_extension("text/html"), None);
	}

	#[test]
	fn basenames_are_random_and_url_safe() {
		let basename = random_basename();

		assert_eq!(basename.len(), AVATAR_BASENAME_LEN);
		assert!(basename.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(basename, random_basename());
	}
}
