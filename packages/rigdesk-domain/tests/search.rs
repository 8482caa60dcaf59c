use rigdesk_domain::search::{self, QueryRejection, SearchDocument, SearchFilter, SearchQuery};

#[test]
fn queries_are_trimmed_before_length_check() {
	let query = SearchQuery::parse(Some("  well  ")).expect("Expected a valid query.");

	assert_eq!(query.as_str(), "well");
	assert_eq!(
		SearchQuery::parse(Some("  ab  ")),
		Err(QueryRejection::TooShort { min: search::MIN_QUERY_CHARS })
	);
}

#[test]
fn query_rejections_use_field_messages() {
	assert_eq!(SearchQuery::parse(None).unwrap_err().to_string(), "This field is required.");
	assert_eq!(
		SearchQuery::parse(Some("   ")).unwrap_err().to_string(),
		"This field may not be blank."
	);
	assert_eq!(
		SearchQuery::parse(Some("ab")).unwrap_err().to_string(),
		"Ensure this field has at least 3 characters."
	);
}

#[test]
fn three_characters_is_enough() {
	assert!(SearchQuery::parse(Some("rig")).is_ok());
	assert!(SearchQuery::parse(Some("örn")).is_ok());
}

#[test]
fn filter_carries_tenant_and_query_unchanged() {
	let query = SearchQuery::parse(Some(" North Sea ")).expect("Expected a valid query.");
	let filter = SearchFilter::new(7, &query);

	assert_eq!(filter.tenant_id, 7);
	assert_eq!(filter.name_auto, "North Sea");
}

#[test]
fn search_result_serializes_type_field() {
	let document = SearchDocument {
		id: search::document_id("wells", "wellplanner", 3),
		tenant_id: 1,
		name: "Alpha 1".to_string(),
		document_type: "Well plan".to_string(),
		url: "/wells/3".to_string(),
	};
	let raw = serde_json::to_value(document.to_result()).expect("Failed to serialize result.");

	assert_eq!(raw["id"], "wells.wellplanner.3");
	assert_eq!(raw["type"], "Well plan");
	assert_eq!(raw["name"], "Alpha 1");
	assert_eq!(raw["url"], "/wells/3");
}

#[test]
fn autocomplete_matches_word_prefixes() {
	assert!(search::autocomplete_matches("North Sea Rig", "nor"));
	assert!(search::autocomplete_matches("North Sea Rig", "sea ri"));
	assert!(!search::autocomplete_matches("North Sea Rig", "orth"));
}
