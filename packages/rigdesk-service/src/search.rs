use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, PageQuery, Result, RigdeskService, SearchIndex, TenantAccess};
use rigdesk_domain::{
	pagination::{Page, PageRequest},
	search::{self, SearchDocument, SearchFilter, SearchQuery, SearchResult},
	soft_delete::LiveExt,
};
use rigdesk_storage::{models::WellPlanner, queries};

const WELL_PLAN_TYPE: &str = "Well plan";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
	pub query: Option<String>,
	#[serde(flatten)]
	pub page: PageQuery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReindexReport {
	pub indexed: u64,
	pub removed: u64,
}

/// Tenant-scoped matches of one query. The index is only queried when a method is awaited.
pub struct SearchHits<'a> {
	index: &'a dyn SearchIndex,
	filter: SearchFilter,
}
impl SearchHits<'_> {
	pub fn filter(&self) -> &SearchFilter {
		&self.filter
	}

	pub async fn count(&self) -> Result<u64> {
		self.index.count(&self.filter).await
	}

	pub async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<SearchResult>> {
		self.index.fetch(&self.filter, offset, limit).await
	}

	pub async fn page(&self, request: PageRequest, base_url: &str) -> Result<Page<SearchResult>> {
		let count = self.count().await?;

		request.check(count).map_err(|err| Error::NotFound { message: err.to_string() })?;

		let results = self.fetch(request.offset(), request.limit()).await?;

		Ok(Page::new(request, count, results, base_url))
	}
}

impl RigdeskService {
	/// Validates `query` and returns the lazily evaluated hits for the caller's tenant.
	pub async fn search(
		&self,
		access: &TenantAccess,
		query: Option<&str>,
		now: OffsetDateTime,
	) -> Result<SearchHits<'_>> {
		self.check_search_throttle(access, now).await?;

		let query = SearchQuery::parse(query).map_err(|err| Error::validation("query", err))?;

		tracing::info!(
			user_id = access.user_id,
			tenant_id = access.tenant_id,
			query = query.as_str(),
			"User is searching."
		);

		Ok(SearchHits {
			index: self.backends.search_index.as_ref(),
			filter: SearchFilter::new(access.tenant_id, &query),
		})
	}

	pub async fn search_page(
		&self,
		access: &TenantAccess,
		req: &SearchRequest,
		base_url: &str,
		now: OffsetDateTime,
	) -> Result<Page<SearchResult>> {
		let hits = self.search(access, req.query.as_deref(), now).await?;
		let request = self.page_request(&req.page)?;

		hits.page(request, base_url).await
	}

	pub async fn upsert_document(&self, document: &SearchDocument) -> Result<()> {
		for (field, value) in [
			("id", &document.id),
			("name", &document.name),
			("type", &document.document_type),
			("url", &document.url),
		] {
			if value.trim().is_empty() {
				return Err(Error::validation(field, "This field may not be blank."));
			}
		}

		self.backends.search_index.upsert(document).await?;

		tracing::debug!(
			document_id = %document.id,
			tenant_id = document.tenant_id,
			"Indexed document."
		);

		Ok(())
	}

	pub async fn remove_document(&self, document_id: &str) -> Result<()> {
		if document_id.trim().is_empty() {
			return Err(Error::validation("id", "This field may not be blank."));
		}

		self.backends.search_index.remove(document_id).await
	}

	/// Indexes every live well plan of a tenant and drops the documents of deleted ones.
	pub async fn reindex_well_planners(&self, tenant_id: i64) -> Result<ReindexReport> {
		let planners = queries::list_well_planners(&self.db.pool, tenant_id).await?;
		let mut report = ReindexReport::default();

		for planner in planners.iter().live() {
			self.backends.search_index.upsert(&well_planner_document(planner)).await?;

			report.indexed += 1;
		}
		for planner in planners.iter().filter(|planner| planner.deleted) {
			self.backends.search_index.remove(&well_planner_document_id(planner.id)).await?;

			report.removed += 1;
		}

		tracing::info!(
			tenant_id,
			indexed = report.indexed,
			removed = report.removed,
			"Reindexed well plans."
		);

		Ok(report)
	}

	async fn check_search_throttle(
		&self,
		access: &TenantAccess,
		now: OffsetDateTime,
	) -> Result<()> {
		let Some(throttle) = self.backends.search_throttle.as_ref() else {
			return Ok(());
		};
		let wait = throttle.wait_secs(&access.user_id.to_string(), now).await?;

		if wait > 0.0 {
			tracing::info!(user_id = access.user_id, wait_secs = wait, "Search request throttled.");

			return Err(Error::Throttled { wait_secs: wait.ceil() as u64 });
		}

		Ok(())
	}
}

pub(crate) fn well_planner_document_id(well_planner_id: i64) -> String {
	search::document_id("wells", "wellplanner", well_planner_id)
}

fn well_planner_document(planner: &WellPlanner) -> SearchDocument {
	SearchDocument {
		id: well_planner_document_id(planner.id),
		tenant_id: planner.tenant_id,
		name: planner.name.clone(),
		document_type: WELL_PLAN_TYPE.to_string(),
		url: format!("/well-plans/{}", planner.id),
	}
}
