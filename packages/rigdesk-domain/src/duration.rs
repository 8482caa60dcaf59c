//! Planned durations for vessel use and well planner steps.
//!
//! `waiting_on_weather` is stored as a percentage contingency, so both derived totals scale the
//! duration by `1 + waiting_on_weather / 100`. Totals are recomputed on every access.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
	Summer,
	Winter,
}
impl Season {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Summer => "SUMMER",
			Self::Winter => "WINTER",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"SUMMER" => Some(Self::Summer),
			"WINTER" => Some(Self::Winter),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DurationRejection {
	#[error("Ensure this value is greater than 0.")]
	NonPositiveDuration,
	#[error("Ensure this value is greater than 0.")]
	NonPositiveImprovedDuration,
	#[error("Ensure this value is greater than or equal to 0.")]
	NegativeWaitingOnWeather,
	#[error("A valid number is required.")]
	NotFinite { field: &'static str },
}
impl DurationRejection {
	pub fn field(self) -> &'static str {
		match self {
			Self::NonPositiveDuration => "duration",
			Self::NotFinite { field } => field,
			Self::NonPositiveImprovedDuration => "improved_duration",
			Self::NegativeWaitingOnWeather => "waiting_on_weather",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedVesselUse {
	pub duration: f64,
	pub waiting_on_weather: f64,
	pub season: Season,
}
impl PlannedVesselUse {
	pub fn total_days(&self) -> f64 {
		with_weather_contingency(self.duration, self.waiting_on_weather)
	}

	pub fn validate(&self) -> Result<(), DurationRejection> {
		validate_contingency(self.duration, self.waiting_on_weather)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellPlannerPlannedStep {
	pub duration: f64,
	pub improved_duration: f64,
	pub waiting_on_weather: f64,
	pub season: Season,
}
impl WellPlannerPlannedStep {
	pub fn total_duration(&self) -> f64 {
		with_weather_contingency(self.duration, self.waiting_on_weather)
	}

	pub fn validate(&self) -> Result<(), DurationRejection> {
		validate_contingency(self.duration, self.waiting_on_weather)?;

		if !self.improved_duration.is_finite() {
			return Err(DurationRejection::NotFinite { field: "improved_duration" });
		}
		if self.improved_duration <= 0.0 {
			return Err(DurationRejection::NonPositiveImprovedDuration);
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedDuration {
	pub total_duration: f64,
	pub total_improved_duration: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonsDuration {
	pub summer: f64,
	pub winter: f64,
}
impl SeasonsDuration {
	pub fn get(&self, season: Season) -> f64 {
		match season {
			Season::Summer => self.summer,
			Season::Winter => self.winter,
		}
	}
}

pub fn with_weather_contingency(duration: f64, waiting_on_weather: f64) -> f64 {
	duration + duration * (waiting_on_weather / 100.0)
}

/// Sums the weather-adjusted and the improved durations of a plan's steps.
pub fn planned_duration<'a, I>(steps: I) -> PlannedDuration
where
	I: IntoIterator<Item = &'a WellPlannerPlannedStep>,
{
	steps.into_iter().fold(PlannedDuration::default(), |mut acc, step| {
		acc.total_duration += step.total_duration();
		acc.total_improved_duration += step.improved_duration;

		acc
	})
}

pub fn seasons_duration<I>(steps: I) -> SeasonsDuration
where
	I: IntoIterator<Item = (f64, Season)>,
{
	steps.into_iter().fold(SeasonsDuration::default(), |mut acc, (duration, season)| {
		match season {
			Season::Summer => acc.summer += duration,
			Season::Winter => acc.winter += duration,
		}

		acc
	})
}

/// Last planned day of a plan that starts on `start`.
///
/// The start day is the first planned day and a started day counts as a whole one, so a plan
/// of `total_duration` days ends `ceil(total_duration) - 1` days after it starts.
pub fn plan_end_date(start: Date, total_duration: f64) -> Date {
	if !total_duration.is_finite() || total_duration <= 0.0 {
		return start;
	}

	let days = total_duration.ceil() as i64 - 1;

	start.checked_add(Duration::days(days)).unwrap_or(Date::MAX)
}

fn validate_contingency(duration: f64, waiting_on_weather: f64) -> Result<(), DurationRejection> {
	if !duration.is_finite() {
		return Err(DurationRejection::NotFinite { field: "duration" });
	}
	if !waiting_on_weather.is_finite() {
		return Err(DurationRejection::NotFinite { field: "waiting_on_weather" });
	}
	if duration <= 0.0 {
		return Err(DurationRejection::NonPositiveDuration);
	}
	if waiting_on_weather < 0.0 {
		return Err(DurationRejection::NegativeWaitingOnWeather);
	}

	Ok(())
}
