use time::macros::{date, datetime};

use rigdesk_config::Postgres;
use rigdesk_storage::{db::Db, queries};
use rigdesk_testkit::TestDatabase;

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RIGDESK_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = rigdesk_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set RIGDESK_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	db.ensure_schema().await.expect("Failed to ensure schema twice.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'well_planners'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RIGDESK_PG_DSN to run."]
async fn live_well_planners_exclude_soft_deleted_rows() {
	let Some(base_dsn) = rigdesk_testkit::env_dsn() else {
		eprintln!(
			"Skipping live_well_planners_exclude_soft_deleted_rows; set RIGDESK_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let tenant = queries::insert_tenant(&db.pool, "Acme").await.expect("Failed to insert tenant.");
	let start = date!(2024 - 05 - 01);
	let mut ids = Vec::new();

	for name in ["Alpha", "Bravo", "Charlie"] {
		let planner = queries::insert_well_planner(&db.pool, tenant.id, name, "A", start)
			.await
			.expect("Failed to insert well planner.");

		ids.push(planner.id);
	}

	assert!(
		queries::soft_delete_well_planner(&db.pool, tenant.id, ids[1])
			.await
			.expect("Failed to soft delete.")
	);
	assert!(
		!queries::soft_delete_well_planner(&db.pool, tenant.id, ids[1])
			.await
			.expect("Failed to soft delete.")
	);

	let live = queries::list_live_well_planners(&db.pool, tenant.id)
		.await
		.expect("Failed to list well planners.");

	assert_eq!(live.iter().map(|planner| planner.id).collect::<Vec<_>>(), vec![ids[0], ids[2]]);
	assert!(
		queries::get_live_well_planner(&db.pool, tenant.id, ids[1])
			.await
			.expect("Failed to get well planner.")
			.is_none()
	);

	let deleted: bool = sqlx::query_scalar("SELECT deleted FROM well_planners WHERE id = $1")
		.bind(ids[1])
		.fetch_one(&db.pool)
		.await
		.expect("Failed to read deleted flag.");

	assert!(deleted);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RIGDESK_PG_DSN to run."]
async fn notifications_track_read_state_per_tenant_user() {
	let Some(base_dsn) = rigdesk_testkit::env_dsn() else {
		eprintln!(
			"Skipping notifications_track_read_state_per_tenant_user; set RIGDESK_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let tenant = queries::insert_tenant(&db.pool, "Acme").await.expect("Failed to insert tenant.");
	let user = queries::insert_user(&db.pool, "ada@example.com", "Ada", "Lovelace")
		.await
		.expect("Failed to insert user.");
	let other = queries::insert_user(&db.pool, "bob@example.com", "Bob", "Builder")
		.await
		.expect("Failed to insert user.");
	let relation = queries::insert_tenant_user(&db.pool, tenant.id, user.id)
		.await
		.expect("Failed to insert tenant user.");
	let other_relation = queries::insert_tenant_user(&db.pool, tenant.id, other.id)
		.await
		.expect("Failed to insert tenant user.");
	let older = queries::insert_notification(
		&db.pool,
		relation.id,
		"Older",
		"/a",
		datetime!(2024-01-01 00:00 UTC),
	)
	.await
	.expect("Failed to insert notification.");
	let newer = queries::insert_notification(
		&db.pool,
		relation.id,
		"Newer",
		"/b",
		datetime!(2024-02-01 00:00 UTC),
	)
	.await
	.expect("Failed to insert notification.");
	let foreign = queries::insert_notification(
		&db.pool,
		other_relation.id,
		"Foreign",
		"/c",
		datetime!(2024-03-01 00:00 UTC),
	)
	.await
	.expect("Failed to insert notification.");
	let listed = queries::list_notifications(&db.pool, relation.id, 10, 0)
		.await
		.expect("Failed to list notifications.");

	assert_eq!(listed.iter().map(|n| n.id).collect::<Vec<_>>(), vec![newer.id, older.id]);
	assert_eq!(
		queries::mark_notification_read(&db.pool, relation.id, older.id)
			.await
			.expect("Failed to mark read."),
		Some(false)
	);
	assert_eq!(
		queries::mark_notification_read(&db.pool, relation.id, older.id)
			.await
			.expect("Failed to mark read."),
		Some(true)
	);
	assert_eq!(
		queries::mark_notification_read(&db.pool, relation.id, foreign.id)
			.await
			.expect("Failed to mark read."),
		None
	);
	assert_eq!(
		queries::count_notifications(&db.pool, relation.id, true)
			.await
			.expect("Failed to count unread."),
		1
	);
	assert_eq!(
		queries::mark_all_notifications_read(&db.pool, relation.id)
			.await
			.expect("Failed to mark all read."),
		1
	);
	assert_eq!(
		queries::count_notifications(&db.pool, other_relation.id, true)
			.await
			.expect("Failed to count unread."),
		1
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
