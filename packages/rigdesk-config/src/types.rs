use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
	/// Absolute origin used when rendering asset URLs, e.g. "https://app.example.com".
	pub public_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
	pub redis: Redis,
	pub objects: Objects,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
}

#[derive(Debug, Deserialize)]
pub struct Redis {
	pub cache_location: String,
}

#[derive(Debug, Deserialize)]
pub struct Objects {
	/// Filesystem root backing both storage classes.
	pub root: PathBuf,
	#[serde(default = "default_static_files")]
	pub static_files: ObjectLocation,
	#[serde(default = "default_media")]
	pub media: ObjectLocation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectLocation {
	pub location: String,
	pub file_overwrite: bool,
	pub default_acl: String,
	pub querystring_auth: bool,
	#[serde(default = "default_querystring_expire_secs")]
	pub querystring_expire_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_page_size")]
	pub default_page_size: u32,
	#[serde(default = "default_max_page_size")]
	pub max_page_size: u32,
	/// Optional per-user rate such as "30/m". Unset disables throttling.
	pub throttle_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub api_auth_token: Option<String>,
	/// Base64-encoded 32-byte key for encrypted columns.
	pub field_encryption_key: String,
	/// Secret used to sign private media URLs.
	pub url_signing_key: String,
}

pub fn default_static_files() -> ObjectLocation {
	ObjectLocation {
		location: "static".to_string(),
		file_overwrite: true,
		default_acl: "public-read".to_string(),
		querystring_auth: false,
		querystring_expire_secs: default_querystring_expire_secs(),
	}
}

pub fn default_media() -> ObjectLocation {
	ObjectLocation {
		location: "media".to_string(),
		file_overwrite: false,
		default_acl: "private".to_string(),
		querystring_auth: true,
		querystring_expire_secs: default_querystring_expire_secs(),
	}
}

fn default_querystring_expire_secs() -> u64 {
	3_600
}

fn default_page_size() -> u32 {
	10
}

fn default_max_page_size() -> u32 {
	100
}
