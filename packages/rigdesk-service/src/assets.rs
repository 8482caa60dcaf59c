//! Static and media storage classes over one object store.
//!
//! Each class owns a key prefix. Static files are public and replaced on re-upload. Media files
//! keep every upload under a distinct name and are served through signed URLs.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, ObjectStore, Result};
use rigdesk_config::ObjectLocation;
use rigdesk_storage::crypto::UrlSigner;

const MAX_NAME_ATTEMPTS: usize = 100;
const SUFFIX_LEN: usize = 7;

pub struct AssetStorage {
	objects: Arc<dyn ObjectStore>,
	location: String,
	file_overwrite: bool,
	querystring_auth: bool,
	expire_secs: i64,
	base_url: String,
	signer: UrlSigner,
}
impl AssetStorage {
	pub fn new(
		cfg: &ObjectLocation,
		public_url: &str,
		objects: Arc<dyn ObjectStore>,
		signer: UrlSigner,
	) -> Self {
		let location = cfg.location.trim_matches('/').to_string();
		let base_url = format!("{}/{location}", public_url.trim_end_matches('/'));

		Self {
			objects,
			location,
			file_overwrite: cfg.file_overwrite,
			querystring_auth: cfg.querystring_auth,
			expire_secs: i64::try_from(cfg.querystring_expire_secs).unwrap_or(i64::MAX),
			base_url,
			signer,
		}
	}

	pub fn location(&self) -> &str {
		&self.location
	}

	pub fn object_key(&self, name: &str) -> String {
		format!("{}/{name}", self.location)
	}

	/// Stores `bytes` and returns the name actually used.
	///
	/// Without overwrite, a taken name gets a random suffix before its extension.
	pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<String> {
		if self.file_overwrite {
			self.objects.put(&self.object_key(name), bytes, true).await?;

			return Ok(name.to_string());
		}

		let mut candidate = name.to_string();

		for _ in 0..MAX_NAME_ATTEMPTS {
			if self.objects.put(&self.object_key(&candidate), bytes, false).await? {
				if candidate != name {
					tracing::debug!(
						location = %self.location,
						requested = name,
						stored = %candidate,
						"Object name was taken. Stored under an alternative name."
					);
				}

				return Ok(candidate);
			}

			candidate = alternative_name(name);
		}

		Err(Error::Conflict { message: format!("No free object name for {name:?}.") })
	}

	pub async fn open(&self, name: &str) -> Result<Option<Vec<u8>>> {
		self.objects.get(&self.object_key(name)).await
	}

	pub async fn delete(&self, name: &str) -> Result<bool> {
		self.objects.delete(&self.object_key(name)).await
	}

	/// Public URL for `name`, signed when the class requires query string auth.
	pub fn url(&self, name: &str, now: OffsetDateTime) -> String {
		let url = format!("{}/{name}", self.base_url);

		if !self.querystring_auth {
			return url;
		}

		let expires = now.unix_timestamp().saturating_add(self.expire_secs);
		let signature = self.signer.sign(&self.object_key(name), expires);

		format!("{url}?expires={expires}&signature={signature}")
	}

	/// Reads an object addressed by a URL previously produced by [`AssetStorage::url`].
	pub async fn open_signed(
		&self,
		name: &str,
		expires: Option<i64>,
		signature: Option<&str>,
		now: OffsetDateTime,
	) -> Result<Vec<u8>> {
		if self.querystring_auth {
			let (Some(expires), Some(signature)) = (expires, signature) else {
				return Err(Error::PermissionDenied);
			};

			if !self.signer.verify(&self.object_key(name), expires, signature, now.unix_timestamp())
			{
				return Err(Error::PermissionDenied);
			}
		}

		self.open(name).await?.ok_or_else(Error::not_found)
	}
}

/// Reduces an uploaded file name to ASCII letters, digits, `-`, `_` and `.`.
///
/// Spaces become underscores. Names that reduce to nothing or to a dot path are rejected.
pub fn valid_file_name(raw: &str) -> Option<String> {
	let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
	let name = base
		.chars()
		.map(|c| if c == ' ' { '_' } else { c })
		.filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
		.collect::<String>();

	if name.is_empty() || name.chars().all(|c| c == '.') {
		return None;
	}

	Some(name)
}

fn alternative_name(name: &str) -> String {
	let (dir, file) = match name.rsplit_once('/') {
		Some((dir, file)) => (format!("{dir}/"), file),
		None => (String::new(), name),
	};
	let (stem, ext) = match file.rfind('.') {
		Some(idx) if idx > 0 => file.split_at(idx),
		_ => (file, ""),
	};
	let suffix = Uuid::new_v4().simple().to_string();

	format!("{dir}{stem}_{}{ext}", &suffix[..SUFFIX_LEN])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn alternative_name_keeps_directory_and_extension() {
		let name = alternative_name("users/profile_images/avatar.png");

		assert!(name.starts_with("users/profile_images/avatar_"));
		assert!(name.ends_with(".png"));
		assert_eq!(name.len(), "users/profile_images/avatar_.png".len() + SUFFIX_LEN);
	}

	#[test]
	fn alternative_name_without_extension() {
		let name = alternative_name(".profile");

		assert!(name.starts_with(".profile_"));
		assert_eq!(name.len(), ".profile_".len() + SUFFIX_LEN);
	}

	#[test]
	fn file_names_are_reduced_to_safe_characters() {
		assert_eq!(valid_file_name("my photo (1).png"), Some("my_photo_1.png".to_string()));
		assert_eq!(valid_file_name("../../etc/passwd"), Some("passwd".to_string()));
		assert_eq!(valid_file_name("C:\\Users\\me\\face.jpg"), Some("face.jpg".to_string()));
		assert_eq!(valid_file_name(".."), None);
		assert_eq!(valid_file_name("()"), None);
	}
}
