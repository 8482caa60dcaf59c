use sqlx::PgExecutor;
use time::{Date, OffsetDateTime};

use crate::{
	Result,
	live::LiveQuery,
	models::{
		ConceptEmpElement, Faq, FaqElement, Notification, PlannedStepRow, PlannedVesselUseRow,
		Tenant, TenantUser, User, WellPlanner,
	},
};
use rigdesk_domain::duration::{PlannedVesselUse, WellPlannerPlannedStep};

const USER_COLUMNS: &str = "\
id, email, first_name, last_name, role, company_name, phone_number, profile_image, created_at, \
updated_at";
const WELL_PLANNER_COLUMNS: &str =
	"id, tenant_id, name, sidetrack, planned_start_date, deleted, created_at";

pub async fn insert_tenant<'e, E>(executor: E, name: &str) -> Result<Tenant>
where
	E: PgExecutor<'e>,
{
	let tenant = sqlx::query_as::<_, Tenant>(
		"INSERT INTO tenants (name) VALUES ($1) RETURNING id, name, created_at",
	)
	.bind(name)
	.fetch_one(executor)
	.await?;

	Ok(tenant)
}

pub async fn get_tenant<'e, E>(executor: E, tenant_id: i64) -> Result<Option<Tenant>>
where
	E: PgExecutor<'e>,
{
	let tenant =
		sqlx::query_as::<_, Tenant>("SELECT id, name, created_at FROM tenants WHERE id = $1")
			.bind(tenant_id)
			.fetch_optional(executor)
			.await?;

	Ok(tenant)
}

pub async fn insert_user<'e, E>(
	executor: E,
	email: &str,
	first_name: &str,
	last_name: &str,
) -> Result<User>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
INSERT INTO users (email, first_name, last_name)
VALUES ($1, $2, $3)
RETURNING {USER_COLUMNS}"
	);
	let user = sqlx::query_as::<_, User>(&sql)
		.bind(email)
		.bind(first_name)
		.bind(last_name)
		.fetch_one(executor)
		.await?;

	Ok(user)
}

pub async fn insert_tenant_user<'e, E>(
	executor: E,
	tenant_id: i64,
	user_id: i64,
) -> Result<TenantUser>
where
	E: PgExecutor<'e>,
{
	let relation = sqlx::query_as::<_, TenantUser>(
		"\
INSERT INTO tenant_users (tenant_id, user_id)
VALUES ($1, $2)
RETURNING id, tenant_id, user_id, created_at",
	)
	.bind(tenant_id)
	.bind(user_id)
	.fetch_one(executor)
	.await?;

	Ok(relation)
}

/// The membership row linking `user_id` to `tenant_id`, if any.
pub async fn find_tenant_user<'e, E>(
	executor: E,
	tenant_id: i64,
	user_id: i64,
) -> Result<Option<TenantUser>>
where
	E: PgExecutor<'e>,
{
	let relation = sqlx::query_as::<_, TenantUser>(
		"\
SELECT id, tenant_id, user_id, created_at
FROM tenant_users
WHERE tenant_id = $1 AND user_id = $2",
	)
	.bind(tenant_id)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(relation)
}

pub async fn get_user<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
where
	E: PgExecutor<'e>,
{
	let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
	let user = sqlx::query_as::<_, User>(&sql).bind(user_id).fetch_optional(executor).await?;

	Ok(user)
}

pub struct ProfileUpdate<'a> {
	pub first_name: &'a str,
	pub last_name: &'a str,
	pub company_name: &'a str,
	/// Already encrypted. `None` clears the stored number.
	pub phone_number: Option<&'a str>,
}

pub async fn update_user_profile<'e, E>(
	executor: E,
	user_id: i64,
	update: ProfileUpdate<'_>,
) -> Result<Option<User>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
UPDATE users
SET
	first_name = $2,
	last_name = $3,
	company_name = $4,
	phone_number = $5,
	updated_at = now()
WHERE id = $1
RETURNING {USER_COLUMNS}"
	);
	let user = sqlx::query_as::<_, User>(&sql)
		.bind(user_id)
		.bind(update.first_name)
		.bind(update.last_name)
		.bind(update.company_name)
		.bind(update.phone_number)
		.fetch_optional(executor)
		.await?;

	Ok(user)
}

pub async fn set_profile_image<'e, E>(
	executor: E,
	user_id: i64,
	profile_image: Option<&str>,
) -> Result<Option<User>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
UPDATE users
SET profile_image = $2, updated_at = now()
WHERE id = $1
RETURNING {USER_COLUMNS}"
	);
	let user = sqlx::query_as::<_, User>(&sql)
		.bind(user_id)
		.bind(profile_image)
		.fetch_optional(executor)
		.await?;

	Ok(user)
}

pub async fn insert_notification<'e, E>(
	executor: E,
	tenant_user_id: i64,
	title: &str,
	url: &str,
	created_at: OffsetDateTime,
) -> Result<Notification>
where
	E: PgExecutor<'e>,
{
	let notification = sqlx::query_as::<_, Notification>(
		"\
INSERT INTO notifications (tenant_user_id, title, url, created_at, updated_at)
VALUES ($1, $2, $3, $4, $4)
RETURNING id, tenant_user_id, title, url, read, created_at",
	)
	.bind(tenant_user_id)
	.bind(title)
	.bind(url)
	.bind(created_at)
	.fetch_one(executor)
	.await?;

	Ok(notification)
}

/// Newest first.
pub async fn list_notifications<'e, E>(
	executor: E,
	tenant_user_id: i64,
	limit: i64,
	offset: i64,
) -> Result<Vec<Notification>>
where
	E: PgExecutor<'e>,
{
	let notifications = sqlx::query_as::<_, Notification>(
		"\
SELECT id, tenant_user_id, title, url, read, created_at
FROM notifications
WHERE tenant_user_id = $1
ORDER BY created_at DESC, id DESC
LIMIT $2 OFFSET $3",
	)
	.bind(tenant_user_id)
	.bind(limit)
	.bind(offset)
	.fetch_all(executor)
	.await?;

	Ok(notifications)
}

pub async fn count_notifications<'e, E>(
	executor: E,
	tenant_user_id: i64,
	unread_only: bool,
) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let count: i64 = sqlx::query_scalar(
		"\
SELECT count(*)
FROM notifications
WHERE tenant_user_id = $1 AND ($2 = FALSE OR read = FALSE)",
	)
	.bind(tenant_user_id)
	.bind(unread_only)
	.fetch_one(executor)
	.await?;

	Ok(count)
}

pub async fn mark_all_notifications_read<'e, E>(executor: E, tenant_user_id: i64) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE notifications
SET read = TRUE, updated_at = now()
WHERE tenant_user_id = $1 AND read = FALSE",
	)
	.bind(tenant_user_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

/// Marks one notification read. Returns the previous `read` flag, or `None` when the
/// notification does not belong to `tenant_user_id`.
pub async fn mark_notification_read<'e, E>(
	executor: E,
	tenant_user_id: i64,
	notification_id: i64,
) -> Result<Option<bool>>
where
	E: PgExecutor<'e>,
{
	let previous: Option<bool> = sqlx::query_scalar(
		"\
UPDATE notifications AS n
SET read = TRUE, updated_at = CASE WHEN old.read THEN n.updated_at ELSE now() END
FROM notifications AS old
WHERE n.id = $1 AND n.tenant_user_id = $2 AND old.id = n.id
RETURNING old.read",
	)
	.bind(notification_id)
	.bind(tenant_user_id)
	.fetch_optional(executor)
	.await?;

	Ok(previous)
}

pub async fn insert_faq<'e, E>(executor: E, title: &str, draft: bool, order: i32) -> Result<Faq>
where
	E: PgExecutor<'e>,
{
	let faq = sqlx::query_as::<_, Faq>(
		"\
INSERT INTO faqs (title, draft, \"order\")
VALUES ($1, $2, $3)
RETURNING id, title, draft, \"order\"",
	)
	.bind(title)
	.bind(draft)
	.bind(order)
	.fetch_one(executor)
	.await?;

	Ok(faq)
}

pub struct NewFaqElement<'a> {
	pub faq_id: i64,
	pub question: &'a str,
	pub answer: &'a str,
	pub draft: bool,
	pub order: i32,
}

pub async fn insert_faq_element<'e, E>(
	executor: E,
	element: NewFaqElement<'_>,
) -> Result<FaqElement>
where
	E: PgExecutor<'e>,
{
	let element = sqlx::query_as::<_, FaqElement>(
		"\
INSERT INTO faq_elements (faq_id, question, answer, draft, \"order\")
VALUES ($1, $2, $3, $4, $5)
RETURNING id, faq_id, question, answer, draft, \"order\"",
	)
	.bind(element.faq_id)
	.bind(element.question)
	.bind(element.answer)
	.bind(element.draft)
	.bind(element.order)
	.fetch_one(executor)
	.await?;

	Ok(element)
}

/// Published FAQs that have at least one published element, in display order.
pub async fn list_published_faqs<'e, E>(executor: E) -> Result<Vec<Faq>>
where
	E: PgExecutor<'e>,
{
	let faqs = sqlx::query_as::<_, Faq>(
		"\
SELECT f.id, f.title, f.draft, f.\"order\"
FROM faqs AS f
WHERE f.draft = FALSE
	AND EXISTS (
		SELECT 1 FROM faq_elements AS e WHERE e.faq_id = f.id AND e.draft = FALSE
	)
ORDER BY f.\"order\", f.id",
	)
	.fetch_all(executor)
	.await?;

	Ok(faqs)
}

pub async fn list_published_faq_elements<'e, E>(
	executor: E,
	faq_ids: &[i64],
) -> Result<Vec<FaqElement>>
where
	E: PgExecutor<'e>,
{
	let elements = sqlx::query_as::<_, FaqElement>(
		"\
SELECT id, faq_id, question, answer, draft, \"order\"
FROM faq_elements
WHERE faq_id = ANY($1) AND draft = FALSE
ORDER BY faq_id, \"order\", id",
	)
	.bind(faq_ids)
	.fetch_all(executor)
	.await?;

	Ok(elements)
}

pub struct NewConceptEmpElement<'a> {
	pub name: &'a str,
	pub subarea: &'a str,
	pub baseline_average_power: f64,
	pub target_average_power: f64,
	pub percentage_improvement: f64,
}

pub async fn insert_concept_emp_element<'e, E>(
	executor: E,
	element: NewConceptEmpElement<'_>,
) -> Result<ConceptEmpElement>
where
	E: PgExecutor<'e>,
{
	let element = sqlx::query_as::<_, ConceptEmpElement>(
		"\
INSERT INTO concept_emp_elements (
	name,
	subarea,
	baseline_average_power,
	target_average_power,
	percentage_improvement
)
VALUES ($1, $2, $3, $4, $5)
RETURNING
	id,
	name,
	subarea,
	subarea_sensors,
	subarea_external_id,
	consumers,
	consumer_sensors,
	baseline_average_power,
	target_average_power,
	percentage_improvement",
	)
	.bind(element.name)
	.bind(element.subarea)
	.bind(element.baseline_average_power)
	.bind(element.target_average_power)
	.bind(element.percentage_improvement)
	.fetch_one(executor)
	.await?;

	Ok(element)
}

pub async fn list_concept_emp_elements<'e, E>(executor: E) -> Result<Vec<ConceptEmpElement>>
where
	E: PgExecutor<'e>,
{
	let elements = sqlx::query_as::<_, ConceptEmpElement>(
		"\
SELECT
	id,
	name,
	subarea,
	subarea_sensors,
	subarea_external_id,
	consumers,
	consumer_sensors,
	baseline_average_power,
	target_average_power,
	percentage_improvement
FROM concept_emp_elements
ORDER BY id",
	)
	.fetch_all(executor)
	.await?;

	Ok(elements)
}

pub async fn insert_well_planner<'e, E>(
	executor: E,
	tenant_id: i64,
	name: &str,
	sidetrack: &str,
	planned_start_date: Date,
) -> Result<WellPlanner>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
INSERT INTO well_planners (tenant_id, name, sidetrack, planned_start_date)
VALUES ($1, $2, $3, $4)
RETURNING {WELL_PLANNER_COLUMNS}"
	);
	let planner = sqlx::query_as::<_, WellPlanner>(&sql)
		.bind(tenant_id)
		.bind(name)
		.bind(sidetrack)
		.bind(planned_start_date)
		.fetch_one(executor)
		.await?;

	Ok(planner)
}

/// Every well plan of a tenant, deleted ones included, oldest first.
pub async fn list_well_planners<'e, E>(executor: E, tenant_id: i64) -> Result<Vec<WellPlanner>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
SELECT {WELL_PLANNER_COLUMNS}
FROM well_planners
WHERE tenant_id = $1
ORDER BY created_at, id"
	);
	let planners =
		sqlx::query_as::<_, WellPlanner>(&sql).bind(tenant_id).fetch_all(executor).await?;

	Ok(planners)
}

/// Live well plans of a tenant, oldest first.
pub async fn list_live_well_planners<'e, E>(executor: E, tenant_id: i64) -> Result<Vec<WellPlanner>>
where
	E: PgExecutor<'e>,
{
	LiveQuery::select(WELL_PLANNER_COLUMNS, "well_planners")
		.filter_eq("tenant_id", tenant_id)
		.order_by("created_at")
		.order_by("id")
		.fetch_all(executor)
		.await
}

pub async fn get_live_well_planner<'e, E>(
	executor: E,
	tenant_id: i64,
	well_planner_id: i64,
) -> Result<Option<WellPlanner>>
where
	E: PgExecutor<'e>,
{
	LiveQuery::select(WELL_PLANNER_COLUMNS, "well_planners")
		.filter_eq("tenant_id", tenant_id)
		.filter_eq("id", well_planner_id)
		.fetch_optional(executor)
		.await
}

/// Flags a live well plan deleted. Returns `false` if no live plan matched.
pub async fn soft_delete_well_planner<'e, E>(
	executor: E,
	tenant_id: i64,
	well_planner_id: i64,
) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE well_planners
SET deleted = TRUE, updated_at = now()
WHERE id = $1 AND tenant_id = $2 AND deleted = FALSE",
	)
	.bind(well_planner_id)
	.bind(tenant_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() == 1)
}

pub struct NewPlannedStep {
	pub well_planner_id: i64,
	pub step: WellPlannerPlannedStep,
	pub order: i32,
}

/// Rejects non-finite, non-positive durations and negative contingencies before writing.
pub async fn insert_planned_step<'e, E>(executor: E, new: NewPlannedStep) -> Result<PlannedStepRow>
where
	E: PgExecutor<'e>,
{
	let NewPlannedStep { well_planner_id, step, order } = new;

	step.validate()?;

	let row = sqlx::query_as::<_, PlannedStepRow>(
		"\
INSERT INTO well_planner_planned_steps (
	well_planner_id,
	duration,
	improved_duration,
	waiting_on_weather,
	season,
	\"order\"
)
VALUES ($1, $2, $3, $4, $5, $6)
RETURNING
	id,
	well_planner_id,
	duration,
	improved_duration,
	waiting_on_weather,
	season,
	\"order\"",
	)
	.bind(well_planner_id)
	.bind(step.duration)
	.bind(step.improved_duration)
	.bind(step.waiting_on_weather)
	.bind(step.season.as_str())
	.bind(order)
	.fetch_one(executor)
	.await?;

	Ok(row)
}

/// Planned steps of the given plans, grouped by plan and in step order.
pub async fn list_planned_steps<'e, E>(
	executor: E,
	well_planner_ids: &[i64],
) -> Result<Vec<PlannedStepRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, PlannedStepRow>(
		"\
SELECT
	id,
	well_planner_id,
	duration,
	improved_duration,
	waiting_on_weather,
	season,
	\"order\"
FROM well_planner_planned_steps
WHERE well_planner_id = ANY($1)
ORDER BY well_planner_id, \"order\", id",
	)
	.bind(well_planner_ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Rejects non-finite, non-positive durations and negative contingencies before writing.
pub async fn insert_planned_vessel_use<'e, E>(
	executor: E,
	well_planner_id: i64,
	vessel_name: &str,
	vessel_use: &PlannedVesselUse,
) -> Result<PlannedVesselUseRow>
where
	E: PgExecutor<'e>,
{
	vessel_use.validate()?;

	let row = sqlx::query_as::<_, PlannedVesselUseRow>(
		"\
INSERT INTO planned_vessel_uses (well_planner_id, vessel_name, duration, waiting_on_weather, season)
VALUES ($1, $2, $3, $4, $5)
RETURNING id, well_planner_id, vessel_name, duration, waiting_on_weather, season",
	)
	.bind(well_planner_id)
	.bind(vessel_name)
	.bind(vessel_use.duration)
	.bind(vessel_use.waiting_on_weather)
	.bind(vessel_use.season.as_str())
	.fetch_one(executor)
	.await?;

	Ok(row)
}

pub async fn list_planned_vessel_uses<'e, E>(
	executor: E,
	well_planner_id: i64,
) -> Result<Vec<PlannedVesselUseRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, PlannedVesselUseRow>(
		"\
SELECT id, well_planner_id, vessel_name, duration, waiting_on_weather, season
FROM planned_vessel_uses
WHERE well_planner_id = $1
ORDER BY id",
	)
	.bind(well_planner_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
