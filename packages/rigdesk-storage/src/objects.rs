//! Filesystem-backed object store addressed by slash-separated keys.

use std::{
	io::ErrorKind,
	path::{Component, Path, PathBuf},
};

use tokio::fs;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct FsObjectStore {
	root: PathBuf,
}
impl FsObjectStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Writes `bytes` under `key`. Without `overwrite`, an existing object is left untouched and
	/// `false` is returned.
	pub async fn put(&self, key: &str, bytes: &[u8], overwrite: bool) -> Result<bool> {
		let path = self.resolve(key)?;

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await?;
		}

		if !overwrite {
			// Claim the key atomically. An existing object is never replaced.
			match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
				Ok(_) => {},
				Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
				Err(err) => return Err(err.into()),
			}
		}

		fs::write(&path, bytes).await?;

		Ok(true)
	}

	pub async fn exists(&self, key: &str) -> Result<bool> {
		Ok(fs::try_exists(self.resolve(key)?).await?)
	}

	pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
		match fs::read(self.resolve(key)?).await {
			Ok(bytes) => Ok(Some(bytes)),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err.into()),
		}
	}

	/// Returns whether an object was removed.
	pub async fn delete(&self, key: &str) -> Result<bool> {
		match fs::remove_file(self.resolve(key)?).await {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
			Err(err) => Err(err.into()),
		}
	}

	fn resolve(&self, key: &str) -> Result<PathBuf> {
		Ok(self.root.join(validate_key(key)?))
	}
}

/// Rejects keys that would escape the store root.
pub fn validate_key(key: &str) -> Result<&Path> {
	let path = Path::new(key);

	if key.is_empty() || key.ends_with('/') {
		return Err(Error::InvalidArgument(format!("Invalid object key {key:?}.")));
	}
	if !path.components().all(|component| matches!(component, Component::Normal(_))) {
		return Err(Error::InvalidArgument(format!("Invalid object key {key:?}.")));
	}

	Ok(path)
}
