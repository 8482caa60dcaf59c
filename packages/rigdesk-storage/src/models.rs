use time::{Date, OffsetDateTime};

use crate::{Error, Result};
use rigdesk_domain::{
	duration::{PlannedVesselUse, Season, WellPlannerPlannedStep},
	soft_delete::Deletable,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tenant {
	pub id: i64,
	pub name: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub role: String,
	pub company_name: String,
	/// Ciphertext produced by [`crate::crypto::FieldCipher`].
	pub phone_number: Option<String>,
	/// Object key inside media storage.
	pub profile_image: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TenantUser {
	pub id: i64,
	pub tenant_id: i64,
	pub user_id: i64,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
	pub id: i64,
	pub tenant_user_id: i64,
	pub title: String,
	pub url: String,
	pub read: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Faq {
	pub id: i64,
	pub title: String,
	pub draft: bool,
	pub order: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FaqElement {
	pub id: i64,
	pub faq_id: i64,
	pub question: String,
	pub answer: String,
	pub draft: bool,
	pub order: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConceptEmpElement {
	pub id: i64,
	pub name: String,
	pub subarea: String,
	pub subarea_sensors: String,
	pub subarea_external_id: String,
	pub consumers: String,
	pub consumer_sensors: String,
	pub baseline_average_power: f64,
	pub target_average_power: f64,
	pub percentage_improvement: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WellPlanner {
	pub id: i64,
	pub tenant_id: i64,
	pub name: String,
	pub sidetrack: String,
	pub planned_start_date: Date,
	pub deleted: bool,
	pub created_at: OffsetDateTime,
}
impl Deletable for WellPlanner {
	fn is_deleted(&self) -> bool {
		self.deleted
	}
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlannedStepRow {
	pub id: i64,
	pub well_planner_id: i64,
	pub duration: f64,
	pub improved_duration: f64,
	pub waiting_on_weather: f64,
	pub season: String,
	pub order: i32,
}
impl PlannedStepRow {
	pub fn to_domain(&self) -> Result<WellPlannerPlannedStep> {
		Ok(WellPlannerPlannedStep {
			duration: self.duration,
			improved_duration: self.improved_duration,
			waiting_on_weather: self.waiting_on_weather,
			season: parse_season(&self.season)?,
		})
	}
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlannedVesselUseRow {
	pub id: i64,
	pub well_planner_id: i64,
	pub vessel_name: String,
	pub duration: f64,
	pub waiting_on_weather: f64,
	pub season: String,
}
impl PlannedVesselUseRow {
	pub fn to_domain(&self) -> Result<PlannedVesselUse> {
		Ok(PlannedVesselUse {
			duration: self.duration,
			waiting_on_weather: self.waiting_on_weather,
			season: parse_season(&self.season)?,
		})
	}
}

fn parse_season(raw: &str) -> Result<Season> {
	Season::parse(raw).ok_or_else(|| Error::InvalidArgument(format!("Unknown season {raw:?}.")))
}
