use time::macros::date;

use rigdesk_domain::duration::{
	self, DurationRejection, PlannedVesselUse, Season, WellPlannerPlannedStep,
};

fn approx_eq(left: f64, right: f64) -> bool {
	(left - right).abs() < 1e-9
}

fn step(
	duration: f64,
	improved_duration: f64,
	waiting_on_weather: f64,
	season: Season,
) -> WellPlannerPlannedStep {
	WellPlannerPlannedStep { duration, improved_duration, waiting_on_weather, season }
}

#[test]
fn vessel_use_total_days_applies_weather_percentage() {
	let vessel_use =
		PlannedVesselUse { duration: 5.0, waiting_on_weather: 15.0, season: Season::Summer };

	assert!(approx_eq(vessel_use.total_days(), 5.75));
}

#[test]
fn planned_step_total_duration_applies_weather_percentage() {
	let planned = step(10.0, 8.0, 10.0, Season::Winter);

	assert!(approx_eq(planned.total_duration(), 11.0));
}

#[test]
fn zero_weather_contingency_keeps_duration() {
	let vessel_use =
		PlannedVesselUse { duration: 3.5, waiting_on_weather: 0.0, season: Season::Winter };

	assert!(approx_eq(vessel_use.total_days(), 3.5));
}

#[test]
fn totals_follow_field_changes() {
	let mut planned = step(10.0, 8.0, 10.0, Season::Summer);

	planned.waiting_on_weather = 50.0;

	assert!(approx_eq(planned.total_duration(), 15.0));
}

#[test]
fn planned_duration_sums_totals_and_improved() {
	let steps = [step(10.0, 8.0, 10.0, Season::Summer), step(4.0, 3.0, 25.0, Season::Winter)];
	let summary = duration::planned_duration(&steps);

	assert!(approx_eq(summary.total_duration, 16.0));
	assert!(approx_eq(summary.total_improved_duration, 11.0));
}

#[test]
fn planned_duration_of_empty_plan_is_zero() {
	let summary = duration::planned_duration(&Vec::<WellPlannerPlannedStep>::new());

	assert_eq!(summary.total_duration, 0.0);
	assert_eq!(summary.total_improved_duration, 0.0);
}

#[test]
fn seasons_duration_reports_both_seasons() {
	let summary = duration::seasons_duration([(2.0, Season::Winter), (1.5, Season::Winter)]);

	assert!(approx_eq(summary.winter, 3.5));
	assert_eq!(summary.get(Season::Summer), 0.0);
}

#[test]
fn whole_day_plans_end_on_the_last_inclusive_day() {
	let start = date!(2024 - 03 - 01);

	assert_eq!(duration::plan_end_date(start, 3.0), date!(2024 - 03 - 03));
	assert_eq!(duration::plan_end_date(start, 1.0), start);
	assert_eq!(duration::plan_end_date(start, 0.0), start);
}

#[test]
fn fractional_plans_round_up_to_whole_days() {
	let start = date!(2024 - 03 - 01);
	let end_25 = duration::plan_end_date(start, 2.5);
	let end_30 = duration::plan_end_date(start, 3.0);

	assert_eq!(end_25, date!(2024 - 03 - 03));
	assert!(end_25 <= end_30);
	assert_eq!(duration::plan_end_date(start, 0.5), start);
	assert_eq!(duration::plan_end_date(start, 3.01), date!(2024 - 03 - 04));
}

#[test]
fn plan_end_date_crosses_month_and_leap_day() {
	assert_eq!(duration::plan_end_date(date!(2024 - 02 - 28), 3.0), date!(2024 - 03 - 01));
}

#[test]
fn validation_rejects_non_positive_and_negative_fields() {
	assert_eq!(
		step(0.0, 1.0, 0.0, Season::Summer).validate(),
		Err(DurationRejection::NonPositiveDuration)
	);
	assert_eq!(
		step(1.0, 0.0, 0.0, Season::Summer).validate(),
		Err(DurationRejection::NonPositiveImprovedDuration)
	);

	let vessel_use =
		PlannedVesselUse { duration: 1.0, waiting_on_weather: -1.0, season: Season::Summer };
	let err = vessel_use.validate().expect_err("Expected negative contingency to be rejected.");

	assert_eq!(err.field(), "waiting_on_weather");
}

#[test]
fn validation_reports_the_non_finite_field() {
	let err = step(1.0, f64::NAN, 0.0, Season::Summer)
		.validate()
		.expect_err("Expected NaN to be rejected.");

	assert_eq!(err.field(), "improved_duration");
	assert_eq!(err.to_string(), "A valid number is required.");
}

#[test]
fn seasons_serialize_in_upper_case() {
	let raw = serde_json::to_string(&Season::Summer).expect("Failed to serialize season.");

	assert_eq!(raw, "\"SUMMER\"");
	assert_eq!(Season::parse("WINTER"), Some(Season::Winter));
	assert_eq!(Season::parse("winter"), None);
}
