//! International phone numbers in E.164 form.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// `+`, a non-zero leading digit, 8 to 15 digits in total.
static E164: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").ok());

// ITU-T E.164 assigned country calling codes. The set is prefix-free.
const COUNTRY_CODES: &[u16] = &[
	1, 7, 20, 27, 30, 31, 32, 33, 34, 36, 39, 40, 41, 43, 44, 45, 46, 47, 48, 49, 51, 52, 53, 54,
	55, 56, 57, 58, 60, 61, 62, 63, 64, 65, 66, 81, 82, 84, 86, 90, 91, 92, 93, 94, 95, 98, 211,
	212, 213, 216, 218, 220, 221, 222, 223, 224, 225, 226, 227, 228, 229, 230, 231, 232, 233, 234,
	235, 236, 237, 238, 239, 240, 241, 242, 243, 244, 245, 246, 247, 248, 249, 250, 251, 252, 253,
	254, 255, 256, 257, 258, 260, 261, 262, 263, 264, 265, 266, 267, 268, 269, 290, 291, 297, 298,
	299, 350, 351, 352, 353, 354, 355, 356, 357, 358, 359, 370, 371, 372, 373, 374, 375, 376, 377,
	378, 380, 381, 382, 383, 385, 386, 387, 389, 420, 421, 423, 500, 501, 502, 503, 504, 505, 506,
	507, 508, 509, 590, 591, 592, 593, 594, 595, 596, 597, 598, 599, 670, 672, 673, 674, 675, 676,
	677, 678, 679, 680, 681, 682, 683, 685, 686, 687, 688, 689, 690, 691, 692, 850, 852, 853, 855,
	856, 880, 886, 960, 961, 962, 963, 964, 965, 966, 967, 968, 970, 971, 972, 973, 974, 975, 976,
	977, 992, 993, 994, 995, 996, 998,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Enter a valid phone number.")]
pub struct InvalidPhoneNumber;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
	country_code: u16,
	national_number: String,
}
impl PhoneNumber {
	/// Parses an international number. Spaces, dots, dashes and parentheses are ignored.
	pub fn parse(raw: &str) -> Result<Self, InvalidPhoneNumber> {
		let compact = raw
			.chars()
			.filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
			.collect::<String>();
		let pattern = E164.as_ref().ok_or(InvalidPhoneNumber)?;

		if !pattern.is_match(&compact) {
			return Err(InvalidPhoneNumber);
		}

		let digits = &compact[1..];

		for len in 1..=3 {
			let Ok(code) = digits[..len].parse::<u16>() else {
				continue;
			};

			if COUNTRY_CODES.contains(&code) {
				return Ok(Self { country_code: code, national_number: digits[len..].to_string() });
			}
		}

		Err(InvalidPhoneNumber)
	}

	pub fn country_code(&self) -> u16 {
		self.country_code
	}

	pub fn national_number(&self) -> &str {
		&self.national_number
	}

	pub fn to_e164(&self) -> String {
		format!("+{}{}", self.country_code, self.national_number)
	}
}

impl fmt::Display for PhoneNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "+{}{}", self.country_code, self.national_number)
	}
}

impl FromStr for PhoneNumber {
	type Err = InvalidPhoneNumber;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for PhoneNumber {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_e164())
	}
}

impl<'de> Deserialize<'de> for PhoneNumber {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Self::parse(&raw).map_err(de::Error::custom)
	}
}

/// API representation of a stored phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneNumberView {
	pub number: String,
	pub country_code: u16,
}
impl From<&PhoneNumber> for PhoneNumberView {
	fn from(phone: &PhoneNumber) -> Self {
		Self { number: phone.national_number.clone(), country_code: phone.country_code }
	}
}
