//! Rate strings and slot arithmetic for the fixed-window throttle.

use time::{Duration, OffsetDateTime};

const KEY_PREFIX: &str = "throttle";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid throttle rate {rate:?}. Expected <count>/<n?><s|m|h|d>.")]
pub struct InvalidRate {
	pub rate: String,
}

/// `count` requests allowed per `period_secs` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
	pub count: u64,
	pub period_secs: u64,
}
impl Rate {
	/// Spacing between scheduled slots once a window is full.
	pub fn slot_secs(&self) -> f64 {
		self.period_secs as f64 / self.count as f64
	}
}

/// Parses strings such as `1/s`, `10/2m` or `20/4h`.
pub fn parse_rate(rate: &str) -> Result<Rate, InvalidRate> {
	let invalid = || InvalidRate { rate: rate.to_string() };
	let (count, period) = rate.trim().split_once('/').ok_or_else(invalid)?;
	let count = count.trim().parse::<u64>().map_err(|_| invalid())?;

	if count == 0 {
		return Err(invalid());
	}

	let period = period.trim();
	let unit = period.chars().last().ok_or_else(invalid)?;
	let multiplier = match &period[..period.len() - unit.len_utf8()] {
		"" => 1,
		raw => raw.parse::<u64>().map_err(|_| invalid())?,
	};
	let base = match unit {
		's' => 1,
		'm' => 60,
		'h' => 3_600,
		'd' => 86_400,
		_ => return Err(invalid()),
	};

	if multiplier == 0 {
		return Err(invalid());
	}

	Ok(Rate { count, period_secs: base * multiplier })
}

/// Redis keys holding one throttle's window counter and its next-slot schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleKeys {
	pub counter: String,
	pub schedule: String,
}
impl ThrottleKeys {
	pub fn new(name: &str, key: Option<&str>) -> Self {
		let sub_key = match key {
			Some(key) => format!("{name}:{key}"),
			None => name.to_string(),
		};

		Self {
			counter: format!("{KEY_PREFIX}:{sub_key}"),
			schedule: format!("{KEY_PREFIX}:schedule:{sub_key}"),
		}
	}
}

/// Next free slot after a schedule that is still in the future.
pub fn next_slot(scheduled: OffsetDateTime, rate: Rate) -> OffsetDateTime {
	scheduled + Duration::seconds_f64(rate.slot_secs())
}
