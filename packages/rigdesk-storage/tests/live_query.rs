use rigdesk_storage::live::LiveQuery;

#[test]
fn live_query_always_excludes_deleted_rows() {
	let query = LiveQuery::select("id, name", "well_planners");

	assert_eq!(query.sql(), "SELECT id, name FROM well_planners WHERE deleted = FALSE");
}

#[test]
fn filters_and_ordering_compose_onto_the_live_condition() {
	let query = LiveQuery::select("id", "well_planners")
		.filter_eq("tenant_id", 7_i64)
		.filter_in("id", vec![1, 2])
		.order_by("created_at")
		.order_by("id");

	assert_eq!(
		query.sql(),
		"SELECT id FROM well_planners WHERE deleted = FALSE AND tenant_id = $1 AND id = ANY($2) \
		 ORDER BY created_at, id"
	);
}
