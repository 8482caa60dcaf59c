use rigdesk_config::Qdrant;
use rigdesk_domain::search::{SearchDocument, SearchFilter, SearchQuery};
use rigdesk_storage::search_index::{self, QdrantSearchIndex};
use rigdesk_testkit::TestCollection;
use uuid::Uuid;

fn document(id: &str, tenant_id: i64, name: &str) -> SearchDocument {
	SearchDocument {
		id: id.to_string(),
		tenant_id,
		name: name.to_string(),
		document_type: "Well plan".to_string(),
		url: format!("/wells/{id}"),
	}
}

#[test]
fn point_ids_are_stable_per_document() {
	let first = search_index::point_id("wells.wellplanner.1");

	assert_eq!(first, search_index::point_id("wells.wellplanner.1"));
	assert_ne!(first, search_index::point_id("wells.wellplanner.2"));
	assert!(Uuid::parse_str(&first).is_ok());
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set RIGDESK_QDRANT_URL to run."]
async fn autocomplete_is_scoped_to_tenant() {
	let Some(url) = rigdesk_testkit::env_qdrant_url() else {
		eprintln!(
			"Skipping autocomplete_is_scoped_to_tenant; set RIGDESK_QDRANT_URL to run this test."
		);

		return;
	};
	let collection = TestCollection::new(&url, "rigdesk_search");
	let index = QdrantSearchIndex::new(&Qdrant {
		url: collection.url().to_string(),
		collection: collection.name().to_string(),
	})
	.expect("Failed to build Qdrant client.");

	index.ensure_collection().await.expect("Failed to create collection.");

	for doc in [
		document("wells.wellplanner.1", 1, "North Sea Alpha"),
		document("wells.wellplanner.2", 1, "Barents Bravo"),
		document("wells.wellplanner.3", 2, "North Cape"),
	] {
		index.upsert(&doc).await.expect("Failed to upsert document.");
	}

	let query = SearchQuery::parse(Some("nor")).expect("Expected a valid query.");
	let filter = SearchFilter::new(1, &query);

	assert_eq!(index.count(&filter).await.expect("Failed to count."), 1);

	let results = index.fetch(&filter, 0, 10).await.expect("Failed to fetch.");

	assert_eq!(results.len(), 1);
	assert_eq!(results[0].name, "North Sea Alpha");

	index.remove("wells.wellplanner.1").await.expect("Failed to remove document.");

	assert_eq!(index.count(&filter).await.expect("Failed to count."), 0);

	collection.cleanup().await.expect("Failed to delete collection.");
}
