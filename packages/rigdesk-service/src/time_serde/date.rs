use serde::Serializer;
use time::{Date, macros::format_description};

/// Calendar dates serialize as `YYYY-MM-DD`.
pub fn serialize<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = value
		.format(format_description!("[year]-[month]-[day]"))
		.map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}
