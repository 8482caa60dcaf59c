//! Qdrant collection backing tenant-scoped autocomplete search.
//!
//! Points carry no vectors; matching happens on a prefix-tokenized payload text index.

use std::collections::HashMap;

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{
		Condition, CountPointsBuilder, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder,
		DeletePointsBuilder, FieldType, Filter, PointStruct, PointsIdsList, RetrievedPoint,
		ScrollPointsBuilder, TextIndexParamsBuilder, TokenizerType, UpsertPointsBuilder, Value,
		Vector, value::Kind,
	},
};
use uuid::Uuid;

use crate::{Error, Result};
use rigdesk_domain::search::{AUTOCOMPLETE_FIELD, SearchDocument, SearchFilter, SearchResult};

pub const TENANT_FIELD: &str = "tenant_id";

const MIN_TOKEN_LEN: u64 = 2;
const MAX_TOKEN_LEN: u64 = 15;

pub struct QdrantSearchIndex {
	pub client: Qdrant,
	pub collection: String,
}
impl QdrantSearchIndex {
	pub fn new(cfg: &rigdesk_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone() })
	}

	/// Creates the collection and its payload indexes when missing.
	pub async fn ensure_collection(&self) -> Result<()> {
		let existing = self.client.list_collections().await?;

		if existing.collections.iter().any(|collection| collection.name == self.collection) {
			return Ok(());
		}

		self.client.create_collection(CreateCollectionBuilder::new(self.collection.clone())).await?;
		self.client
			.create_field_index(
				CreateFieldIndexCollectionBuilder::new(
					self.collection.clone(),
					TENANT_FIELD,
					FieldType::Integer,
				)
				.wait(true),
			)
			.await?;
		self.client
			.create_field_index(
				CreateFieldIndexCollectionBuilder::new(
					self.collection.clone(),
					AUTOCOMPLETE_FIELD,
					FieldType::Text,
				)
				.field_index_params(
					TextIndexParamsBuilder::new(TokenizerType::Prefix)
						.lowercase(true)
						.min_token_len(MIN_TOKEN_LEN)
						.max_token_len(MAX_TOKEN_LEN),
				)
				.wait(true),
			)
			.await?;

		tracing::info!(collection = %self.collection, "Search collection created.");

		Ok(())
	}

	pub async fn count(&self, filter: &SearchFilter) -> Result<u64> {
		let response = self
			.client
			.count(
				CountPointsBuilder::new(self.collection.clone())
					.filter(to_qdrant_filter(filter))
					.exact(true),
			)
			.await?;

		Ok(response.result.map(|result| result.count).unwrap_or(0))
	}

	/// Returns at most `limit` results after skipping `offset` matches.
	pub async fn fetch(
		&self,
		filter: &SearchFilter,
		offset: u64,
		limit: u64,
	) -> Result<Vec<SearchResult>> {
		if limit == 0 {
			return Ok(Vec::new());
		}

		let window = u32::try_from(offset.saturating_add(limit))
			.map_err(|_| Error::InvalidArgument("Search window is too large.".to_string()))?;
		let response = self
			.client
			.scroll(
				ScrollPointsBuilder::new(self.collection.clone())
					.filter(to_qdrant_filter(filter))
					.limit(window)
					.with_payload(true)
					.with_vectors(false),
			)
			.await?;

		response
			.result
			.iter()
			.skip(offset as usize)
			.map(point_to_result)
			.collect::<Result<Vec<_>>>()
	}

	pub async fn upsert(&self, document: &SearchDocument) -> Result<()> {
		let mut payload = Payload::new();

		payload.insert("id", document.id.clone());
		payload.insert(TENANT_FIELD, Value::from(document.tenant_id));
		payload.insert("name", document.name.clone());
		payload.insert(AUTOCOMPLETE_FIELD, document.name.clone());
		payload.insert("type", document.document_type.clone());
		payload.insert("url", document.url.clone());

		let vectors = HashMap::<String, Vector>::new();
		let point = PointStruct::new(point_id(&document.id), vectors, payload);
		let request = UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true);

		self.client.upsert_points(request).await?;

		Ok(())
	}

	pub async fn remove(&self, document_id: &str) -> Result<()> {
		self.client
			.delete_points(
				DeletePointsBuilder::new(self.collection.clone())
					.points(PointsIdsList { ids: vec![point_id(document_id).into()] })
					.wait(true),
			)
			.await?;

		Ok(())
	}
}

/// Stable Qdrant point id for a document id such as `wells.wellplanner.3`.
pub fn point_id(document_id: &str) -> String {
	Uuid::new_v5(&Uuid::NAMESPACE_OID, document_id.as_bytes()).to_string()
}

pub fn to_qdrant_filter(filter: &SearchFilter) -> Filter {
	Filter::must([
		Condition::matches(TENANT_FIELD, filter.tenant_id),
		Condition::matches_text(AUTOCOMPLETE_FIELD, filter.name_auto.clone()),
	])
}

fn point_to_result(point: &RetrievedPoint) -> Result<SearchResult> {
	let field = |key: &str| {
		payload_str(&point.payload, key).ok_or_else(|| {
			Error::InvalidArgument(format!("Indexed document is missing payload field {key:?}."))
		})
	};

	Ok(SearchResult {
		id: field("id")?,
		url: field("url")?,
		result_type: field("type")?,
		name: field("name")?,
	})
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::StringValue(value) => Some(value.clone()),
		_ => None,
	}
}
