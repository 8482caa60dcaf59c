//! Throwaway Postgres databases and Qdrant collections for integration tests.

mod error;

pub use error::{Error, Result};

use std::{env, future::Future, str::FromStr, thread, time::Duration};

use qdrant_client::Qdrant;
use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::{runtime::Builder, time};
use uuid::Uuid;

pub const PG_DSN_ENV: &str = "RIGDESK_PG_DSN";
pub const QDRANT_URL_ENV: &str = "RIGDESK_QDRANT_URL";
pub const REDIS_URL_ENV: &str = "RIGDESK_REDIS_URL";

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

const QDRANT_TIMEOUT: Duration = Duration::from_secs(10);

/// A throwaway Postgres database, dropped on cleanup or when the guard goes out of scope.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	cleaned: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse {PG_DSN_ENV}: {err}.")))?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = format!("rigdesk_test_{}", Uuid::new_v4().simple());
		let create_sql = format!(r#"CREATE DATABASE "{name}""#);

		admin_conn
			.execute(create_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;

		let dsn = base_options.clone().database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, cleaned: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin_options).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();

		cleanup_detached("database", move || async move {
			drop_database(&name, &admin_options).await
		});
	}
}

/// A uniquely named Qdrant collection, deleted on cleanup or when the guard goes out of scope.
pub struct TestCollection {
	url: String,
	name: String,
	cleaned: bool,
}
impl TestCollection {
	pub fn new(url: &str, prefix: &str) -> Self {
		Self {
			url: url.to_string(),
			name: format!("{prefix}_{}", Uuid::new_v4().simple()),
			cleaned: false,
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn cleanup(mut self) -> Result<()> {
		delete_collection(&self.url, &self.name).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let name = self.name.clone();

		cleanup_detached("Qdrant collection", move || async move {
			delete_collection(&url, &name).await
		});
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(PG_DSN_ENV).ok()
}

pub fn env_qdrant_url() -> Option<String> {
	env::var(QDRANT_URL_ENV).ok()
}

pub fn env_redis_url() -> Option<String> {
	env::var(REDIS_URL_ENV).ok()
}

/// A key prefix unique to one test run, so parallel tests never share Redis state.
pub fn redis_namespace(prefix: &str) -> String {
	format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Runs `cleanup` on a fresh runtime in its own thread, so drop works inside async tests.
fn cleanup_detached<F, Fut>(label: &'static str, cleanup: F)
where
	F: FnOnce() -> Fut + Send + 'static,
	Fut: Future<Output = Result<()>>,
{
	let cleanup_thread = thread::spawn(move || {
		let runtime = match Builder::new_current_thread().enable_all().build() {
			Ok(runtime) => runtime,
			Err(err) => {
				eprintln!("Test {label} cleanup failed: {err}.");

				return;
			},
		};

		if let Err(err) = runtime.block_on(cleanup()) {
			eprintln!("Test {label} cleanup failed: {err}.");
		}
	});
	let _ = cleanup_thread.join();
}

async fn connect_admin(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => {
				last_err = Some(err);
			},
		}
	}

	Err(Error::Message(format!("Failed to connect to an admin database: {last_err:?}.")))
}

async fn drop_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin_options).await.map_err(|err| {
		Error::Message(format!("Failed to connect to admin database for cleanup: {err}."))
	})?;
	let drop_sql = format!(r#"DROP DATABASE IF EXISTS "{name}""#);
	let _ = sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.fetch_all(&mut conn)
	.await;

	sqlx::query(drop_sql.as_str())
		.execute(&mut conn)
		.await
		.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;

	Ok(())
}

async fn delete_collection(url: &str, name: &str) -> Result<()> {
	let client = Qdrant::from_url(url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
	let existing = time::timeout(QDRANT_TIMEOUT, client.list_collections())
		.await
		.map_err(|_| Error::Message("Qdrant list_collections timed out.".to_string()))?
		.map_err(|err| Error::Message(format!("Failed to list Qdrant collections: {err}.")))?;

	if !existing.collections.iter().any(|collection| collection.name == name) {
		return Ok(());
	}

	time::timeout(QDRANT_TIMEOUT, client.delete_collection(name))
		.await
		.map_err(|_| Error::Message(format!("Timed out deleting Qdrant collection {name:?}.")))?
		.map_err(|err| {
			Error::Message(format!("Failed to delete Qdrant collection {name:?}: {err}."))
		})?;

	Ok(())
}
