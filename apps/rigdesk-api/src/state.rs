use std::sync::Arc;

use rigdesk_service::{Backends, RigdeskService};
use rigdesk_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RigdeskService>,
}
impl AppState {
	pub async fn new(config: rigdesk_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let backends = Backends::connect(&config).await?;
		let service = RigdeskService::new(config, db, backends)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: RigdeskService) -> Self {
		Self { service: Arc::new(service) }
	}
}
