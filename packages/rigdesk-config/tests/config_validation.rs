use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use rigdesk_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn table_mut<'a>(value: &'a mut Value, path: &[&str]) -> &'a mut toml::Table {
	let mut current = value.as_table_mut().expect("Template config must be a table.");

	for key in path {
		current = current
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	current
}

fn write_temp_config(value: &Value) -> PathBuf {
	let nanos =
		SystemTime::now().duration_since(UNIX_EPOCH).expect("Clock before epoch.").as_nanos();
	let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
	let path = env::temp_dir().join(format!("rigdesk_config_{nanos}_{seq}.toml"));

	fs::write(&path, toml::to_string(value).expect("Failed to render config."))
		.expect("Failed to write config.");

	path
}

fn load_value(value: &Value) -> rigdesk_config::Result<Config> {
	let path = write_temp_config(value);
	let result = rigdesk_config::load(&path);

	let _ = fs::remove_file(&path);

	result
}

fn validation_message(result: rigdesk_config::Result<Config>) -> String {
	match result {
		Err(Error::Validation { message }) => message,
		Err(err) => panic!("Expected validation error, got {err:?}."),
		Ok(_) => panic!("Expected validation error, got a config."),
	}
}

#[test]
fn sample_config_loads_with_storage_defaults() {
	let cfg = load_value(&sample_value()).expect("Sample config must load.");

	assert_eq!(cfg.service.public_url, "http://127.0.0.1:8080");
	assert_eq!(cfg.storage.objects.static_files.location, "static");
	assert!(cfg.storage.objects.static_files.file_overwrite);
	assert_eq!(cfg.storage.objects.static_files.default_acl, "public-read");
	assert_eq!(cfg.storage.objects.media.location, "media");
	assert!(!cfg.storage.objects.media.file_overwrite);
	assert_eq!(cfg.storage.objects.media.default_acl, "private");
	assert!(cfg.storage.objects.media.querystring_auth);
	assert_eq!(cfg.search.throttle_rate.as_deref(), Some("30/m"));
}

#[test]
fn blank_api_auth_token_is_normalized_to_none() {
	let cfg = load_value(&sample_value()).expect("Sample config must load.");

	assert!(cfg.security.api_auth_token.is_none());
}

#[test]
fn blank_throttle_rate_disables_throttling() {
	let mut value = sample_value();

	table_mut(&mut value, &["search"])
		.insert("throttle_rate".to_string(), Value::String("  ".to_string()));

	let cfg = load_value(&value).expect("Config must load.");

	assert!(cfg.search.throttle_rate.is_none());
}

#[test]
fn redis_location_must_be_a_redis_url() {
	let mut value = sample_value();

	table_mut(&mut value, &["storage", "redis"])
		.insert("cache_location".to_string(), Value::String("127.0.0.1:6379".to_string()));

	let message = validation_message(load_value(&value));

	assert!(message.contains("storage.redis.cache_location"), "{message}");
}

#[test]
fn private_media_requires_signed_urls() {
	let mut value = sample_value();
	let mut media = toml::Table::new();

	media.insert("location".to_string(), Value::String("media".to_string()));
	media.insert("file_overwrite".to_string(), Value::Boolean(false));
	media.insert("default_acl".to_string(), Value::String("private".to_string()));
	media.insert("querystring_auth".to_string(), Value::Boolean(false));
	table_mut(&mut value, &["storage", "objects"]).insert("media".to_string(), Value::Table(media));

	let message = validation_message(load_value(&value));

	assert!(message.contains("querystring_auth"), "{message}");
}

#[test]
fn static_and_media_locations_must_differ() {
	let mut value = sample_value();
	let mut media = toml::Table::new();

	media.insert("location".to_string(), Value::String("/static/".to_string()));
	media.insert("file_overwrite".to_string(), Value::Boolean(false));
	media.insert("default_acl".to_string(), Value::String("private".to_string()));
	media.insert("querystring_auth".to_string(), Value::Boolean(true));
	table_mut(&mut value, &["storage", "objects"]).insert("media".to_string(), Value::Table(media));

	let message = validation_message(load_value(&value));

	assert!(message.contains("must differ"), "{message}");
}

#[test]
fn default_page_size_cannot_exceed_max() {
	let mut value = sample_value();
	let search = table_mut(&mut value, &["search"]);

	search.insert("default_page_size".to_string(), Value::Integer(50));
	search.insert("max_page_size".to_string(), Value::Integer(20));

	let message = validation_message(load_value(&value));

	assert!(message.contains("search.default_page_size"), "{message}");
}

#[test]
fn empty_signing_key_is_rejected() {
	let mut value = sample_value();

	table_mut(&mut value, &["security"])
		.insert("url_signing_key".to_string(), Value::String(String::new()));

	let message = validation_message(load_value(&value));

	assert_eq!(message, "security.url_signing_key must be non-empty.");
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("rigdesk_config_missing_file.toml");
	let result = rigdesk_config::load(&path);

	assert!(matches!(result, Err(Error::ReadConfig { .. })));
}
