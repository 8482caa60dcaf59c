pub mod access;
pub mod assets;
pub mod emps;
pub mod notifications;
pub mod search;
pub mod support;
pub mod time_serde;
pub mod users;
pub mod wells;

mod error;

pub use access::TenantAccess;
pub use assets::AssetStorage;
pub use emps::ConceptEmpElementItem;
pub use error::{Error, Result};
pub use notifications::{NotificationItem, UnreadCount};
pub use search::{ReindexReport, SearchHits, SearchRequest};
pub use support::{FaqElementItem, FaqItem};
pub use users::{Company, ProfileUpdateRequest, UserProfile};
pub use wells::{VesselUseDuration, WellPlannerDuration, WellPlannerItem};

use std::{future::Future, pin::Pin, sync::Arc};

use serde::Deserialize;
use time::OffsetDateTime;

use rigdesk_config::Config;
use rigdesk_domain::{
	pagination::PageRequest,
	search::{SearchDocument, SearchFilter, SearchResult},
	throttle,
};
use rigdesk_storage::{
	crypto::{FieldCipher, UrlSigner},
	db::Db,
	objects::FsObjectStore,
	redis::{RedisFactory, RedisThrottle},
	search_index::QdrantSearchIndex,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const SEARCH_THROTTLE_NAME: &str = "search";

pub trait SearchIndex
where
	Self: Send + Sync,
{
	fn count<'a>(&'a self, filter: &'a SearchFilter) -> BoxFuture<'a, Result<u64>>;

	fn fetch<'a>(
		&'a self,
		filter: &'a SearchFilter,
		offset: u64,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<SearchResult>>>;

	fn upsert<'a>(&'a self, document: &'a SearchDocument) -> BoxFuture<'a, Result<()>>;

	fn remove<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, Result<()>>;
}

pub trait ObjectStore
where
	Self: Send + Sync,
{
	/// Returns `false` when `overwrite` is unset and the key is already taken.
	fn put<'a>(
		&'a self,
		key: &'a str,
		bytes: &'a [u8],
		overwrite: bool,
	) -> BoxFuture<'a, Result<bool>>;

	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>>>;

	fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<bool>>;
}

pub trait Throttle
where
	Self: Send + Sync,
{
	/// Seconds the caller must wait before the request may proceed.
	fn wait_secs<'a>(&'a self, key: &'a str, now: OffsetDateTime) -> BoxFuture<'a, Result<f64>>;
}

/// `page` and `page_size` query values, validated against the configured page sizes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
	pub page: Option<String>,
	pub page_size: Option<String>,
}

#[derive(Clone)]
pub struct Backends {
	pub search_index: Arc<dyn SearchIndex>,
	pub objects: Arc<dyn ObjectStore>,
	pub search_throttle: Option<Arc<dyn Throttle>>,
}
impl Backends {
	pub fn new(
		search_index: Arc<dyn SearchIndex>,
		objects: Arc<dyn ObjectStore>,
		search_throttle: Option<Arc<dyn Throttle>>,
	) -> Self {
		Self { search_index, objects, search_throttle }
	}

	/// Connects the Qdrant collection, the object store root and the optional search throttle.
	pub async fn connect(cfg: &Config) -> Result<Self> {
		let search_index = QdrantSearchIndex::new(&cfg.storage.qdrant)?;

		search_index.ensure_collection().await?;

		let objects = FsObjectStore::new(cfg.storage.objects.root.clone());
		let search_throttle = match cfg.search.throttle_rate.as_deref() {
			Some(rate) => {
				let rate = throttle::parse_rate(rate)
					.map_err(|err| Error::InvalidRequest { message: err.to_string() })?;
				let factory = RedisFactory::new(&cfg.storage.redis);

				Some(Arc::new(RedisThrottle::new(factory, SEARCH_THROTTLE_NAME, rate))
					as Arc<dyn Throttle>)
			},
			None => None,
		};

		Ok(Self::new(Arc::new(search_index), Arc::new(objects), search_throttle))
	}
}

pub struct RigdeskService {
	pub cfg: Config,
	pub db: Db,
	pub backends: Backends,
	pub static_files: AssetStorage,
	pub media: AssetStorage,
	pub cipher: FieldCipher,
}
impl RigdeskService {
	pub fn new(cfg: Config, db: Db, backends: Backends) -> Result<Self> {
		let cipher = FieldCipher::from_base64_key(&cfg.security.field_encryption_key)?;
		let signer = UrlSigner::new(&cfg.security.url_signing_key);
		let static_files = AssetStorage::new(
			&cfg.storage.objects.static_files,
			&cfg.service.public_url,
			backends.objects.clone(),
			signer.clone(),
		);
		let media = AssetStorage::new(
			&cfg.storage.objects.media,
			&cfg.service.public_url,
			backends.objects.clone(),
			signer,
		);

		Ok(Self { cfg, db, backends, static_files, media, cipher })
	}

	pub(crate) fn page_request(&self, query: &PageQuery) -> Result<PageRequest> {
		PageRequest::parse(
			query.page.as_deref(),
			query.page_size.as_deref(),
			self.cfg.search.default_page_size,
			self.cfg.search.max_page_size,
		)
		.map_err(|err| Error::NotFound { message: err.to_string() })
	}
}

impl SearchIndex for QdrantSearchIndex {
	fn count<'a>(&'a self, filter: &'a SearchFilter) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(QdrantSearchIndex::count(self, filter).await?) })
	}

	fn fetch<'a>(
		&'a self,
		filter: &'a SearchFilter,
		offset: u64,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<SearchResult>>> {
		Box::pin(async move { Ok(QdrantSearchIndex::fetch(self, filter, offset, limit).await?) })
	}

	fn upsert<'a>(&'a self, document: &'a SearchDocument) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(QdrantSearchIndex::upsert(self, document).await?) })
	}

	fn remove<'a>(&'a self, document_id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(QdrantSearchIndex::remove(self, document_id).await?) })
	}
}

impl ObjectStore for FsObjectStore {
	fn put<'a>(
		&'a self,
		key: &'a str,
		bytes: &'a [u8],
		overwrite: bool,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(FsObjectStore::put(self, key, bytes, overwrite).await?) })
	}

	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>>> {
		Box::pin(async move { Ok(FsObjectStore::get(self, key).await?) })
	}

	fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(FsObjectStore::delete(self, key).await?) })
	}
}

impl Throttle for RedisThrottle {
	fn wait_secs<'a>(&'a self, key: &'a str, now: OffsetDateTime) -> BoxFuture<'a, Result<f64>> {
		Box::pin(async move { Ok(RedisThrottle::wait_secs(self, Some(key), now).await?) })
	}
}
