mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, ObjectLocation, Objects, Postgres, Qdrant, Redis, Search, Security, Service, Storage,
	default_media, default_static_files,
};

use std::{fs, path::Path};

const ACLS: [&str; 2] = ["public-read", "private"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("service.public_url", &cfg.service.public_url),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("storage.qdrant.url", &cfg.storage.qdrant.url),
		("storage.qdrant.collection", &cfg.storage.qdrant.collection),
		("storage.redis.cache_location", &cfg.storage.redis.cache_location),
		("security.field_encryption_key", &cfg.security.field_encryption_key),
		("security.url_signing_key", &cfg.security.url_signing_key),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !cfg.storage.redis.cache_location.starts_with("redis://")
		&& !cfg.storage.redis.cache_location.starts_with("rediss://")
	{
		return Err(Error::Validation {
			message: "storage.redis.cache_location must be a redis:// or rediss:// URL."
				.to_string(),
		});
	}
	if !cfg.service.public_url.starts_with("http://")
		&& !cfg.service.public_url.starts_with("https://")
	{
		return Err(Error::Validation {
			message: "service.public_url must be an http:// or https:// origin.".to_string(),
		});
	}

	for (label, location) in [
		("storage.objects.static_files", &cfg.storage.objects.static_files),
		("storage.objects.media", &cfg.storage.objects.media),
	] {
		let prefix = location.location.trim_matches('/');

		if prefix.is_empty() {
			return Err(Error::Validation {
				message: format!("{label}.location must be non-empty."),
			});
		}
		if prefix.split('/').any(|segment| segment == "..") {
			return Err(Error::Validation {
				message: format!("{label}.location must not contain '..' segments."),
			});
		}
		if !ACLS.contains(&location.default_acl.as_str()) {
			return Err(Error::Validation {
				message: format!("{label}.default_acl must be one of public-read or private."),
			});
		}
		if location.default_acl == "private" && !location.querystring_auth {
			return Err(Error::Validation {
				message: format!("{label}.querystring_auth must be true for private objects."),
			});
		}
		if location.querystring_auth && location.querystring_expire_secs == 0 {
			return Err(Error::Validation {
				message: format!("{label}.querystring_expire_secs must be greater than zero."),
			});
		}
	}

	if cfg.storage.objects.static_files.location.trim_matches('/')
		== cfg.storage.objects.media.location.trim_matches('/')
	{
		return Err(Error::Validation {
			message: "storage.objects static and media locations must differ.".to_string(),
		});
	}
	if cfg.search.default_page_size == 0 {
		return Err(Error::Validation {
			message: "search.default_page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_page_size > cfg.search.max_page_size {
		return Err(Error::Validation {
			message: "search.default_page_size must not exceed search.max_page_size.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}
	if cfg.search.throttle_rate.as_deref().map(|rate| rate.trim().is_empty()).unwrap_or(false) {
		cfg.search.throttle_rate = None;
	}

	cfg.service.public_url = cfg.service.public_url.trim_end_matches('/').to_string();
}
