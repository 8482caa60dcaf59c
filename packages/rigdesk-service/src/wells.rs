use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{Error, Result, RigdeskService, TenantAccess, search};
use rigdesk_domain::duration::{
	self, PlannedDuration, Season, SeasonsDuration, WellPlannerPlannedStep,
};
use rigdesk_storage::queries;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellPlannerItem {
	pub id: i64,
	pub name: String,
	pub sidetrack: String,
	#[serde(with = "crate::time_serde::date")]
	pub planned_start_date: Date,
	pub planned_duration: PlannedDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselUseDuration {
	pub id: i64,
	pub vessel_name: String,
	pub season: Season,
	pub total_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellPlannerDuration {
	pub id: i64,
	pub planned_duration: PlannedDuration,
	pub seasons_duration: SeasonsDuration,
	#[serde(with = "crate::time_serde::date")]
	pub planned_end_date: Date,
	pub vessel_uses: Vec<VesselUseDuration>,
}

impl RigdeskService {
	/// Live well plans of the tenant with their planned durations.
	pub async fn list_well_planners(&self, access: &TenantAccess) -> Result<Vec<WellPlannerItem>> {
		let planners = queries::list_live_well_planners(&self.db.pool, access.tenant_id).await?;
		let ids = planners.iter().map(|planner| planner.id).collect::<Vec<_>>();
		let mut steps = HashMap::<i64, Vec<WellPlannerPlannedStep>>::new();

		for row in queries::list_planned_steps(&self.db.pool, &ids).await? {
			steps.entry(row.well_planner_id).or_default().push(row.to_domain()?);
		}

		Ok(planners
			.into_iter()
			.map(|planner| {
				let planned = steps
					.get(&planner.id)
					.map(|steps| duration::planned_duration(steps))
					.unwrap_or_default();

				WellPlannerItem {
					id: planner.id,
					name: planner.name,
					sidetrack: planner.sidetrack,
					planned_start_date: planner.planned_start_date,
					planned_duration: planned,
				}
			})
			.collect())
	}

	/// Planned, per-season and end-date figures for one live well plan.
	pub async fn well_planner_duration(
		&self,
		access: &TenantAccess,
		well_planner_id: i64,
	) -> Result<WellPlannerDuration> {
		let planner =
			queries::get_live_well_planner(&self.db.pool, access.tenant_id, well_planner_id)
				.await?
				.ok_or_else(Error::not_found)?;
		let steps = queries::list_planned_steps(&self.db.pool, &[planner.id])
			.await?
			.iter()
			.map(|row| row.to_domain())
			.collect::<rigdesk_storage::Result<Vec<_>>>()?;
		let vessel_uses = queries::list_planned_vessel_uses(&self.db.pool, planner.id)
			.await?
			.iter()
			.map(|row| {
				let vessel_use = row.to_domain()?;

				Ok(VesselUseDuration {
					id: row.id,
					vessel_name: row.vessel_name.clone(),
					season: vessel_use.season,
					total_days: vessel_use.total_days(),
				})
			})
			.collect::<rigdesk_storage::Result<Vec<_>>>()?;
		let planned = duration::planned_duration(&steps);
		let step_durations = steps.iter().map(|step| (step.total_duration(), step.season));
		let seasons = duration::seasons_duration(step_durations);

		Ok(WellPlannerDuration {
			id: planner.id,
			planned_duration: planned,
			seasons_duration: seasons,
			planned_end_date: duration::plan_end_date(
				planner.planned_start_date,
				planned.total_duration,
			),
			vessel_uses,
		})
	}

	/// Flags a live well plan deleted and drops it from search.
	pub async fn delete_well_planner(
		&self,
		access: &TenantAccess,
		well_planner_id: i64,
	) -> Result<()> {
		if !queries::soft_delete_well_planner(&self.db.pool, access.tenant_id, well_planner_id)
			.await?
		{
			return Err(Error::not_found());
		}

		tracing::info!(
			tenant_id = access.tenant_id,
			user_id = access.user_id,
			well_planner_id,
			"Well plan deleted."
		);

		self.backends
			.search_index
			.remove(&search::well_planner_document_id(well_planner_id))
			.await
	}
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	#[test]
	fn plan_dates_serialize_as_calendar_days() {
		let summary = WellPlannerDuration {
			id: 1,
			planned_duration: PlannedDuration { total_duration: 2.5, total_improved_duration: 2.0 },
			seasons_duration: SeasonsDuration { summer: 2.5, winter: 0.0 },
			planned_end_date: duration::plan_end_date(date!(2024 - 03 - 01), 2.5),
			vessel_uses: Vec::new(),
		};
		let json = serde_json::to_value(&summary).expect("Failed to serialize summary.");

		assert_eq!(json["planned_end_date"], "2024-03-03");
	}
}
