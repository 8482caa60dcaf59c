use rigdesk_domain::phone::{InvalidPhoneNumber, PhoneNumber, PhoneNumberView};

#[test]
fn parses_international_numbers_with_separators() {
	let phone = PhoneNumber::parse("+47 (22) 12-34.56").expect("Expected a valid number.");

	assert_eq!(phone.country_code(), 47);
	assert_eq!(phone.national_number(), "22123456");
	assert_eq!(phone.to_e164(), "+4722123456");
	assert_eq!(phone.to_string(), "+4722123456");
}

#[test]
fn resolves_three_digit_country_codes() {
	let phone = PhoneNumber::parse("+353861234567").expect("Expected a valid number.");

	assert_eq!(phone.country_code(), 353);
	assert_eq!(phone.national_number(), "861234567");
}

#[test]
fn rejects_malformed_numbers() {
	for raw in ["4722123456", "+47", "+0722123456", "+47abc12345", "+1234567890123456", ""] {
		assert_eq!(PhoneNumber::parse(raw), Err(InvalidPhoneNumber), "{raw}");
	}
	assert_eq!(InvalidPhoneNumber.to_string(), "Enter a valid phone number.");
}

#[test]
fn rejects_unassigned_country_codes() {
	assert_eq!(PhoneNumber::parse("+8001234567"), Err(InvalidPhoneNumber));
}

#[test]
fn serde_uses_e164_strings() {
	let phone: PhoneNumber =
		serde_json::from_str("\"+44 20 7946 0958\"").expect("Failed to deserialize phone.");
	let raw = serde_json::to_string(&phone).expect("Failed to serialize phone.");

	assert_eq!(raw, "\"+442079460958\"");
	assert!(serde_json::from_str::<PhoneNumber>("\"12\"").is_err());
}

#[test]
fn view_splits_number_and_country_code() {
	let phone = PhoneNumber::parse("+4722123456").expect("Expected a valid number.");
	let view =
		serde_json::to_value(PhoneNumberView::from(&phone)).expect("Failed to serialize view.");

	assert_eq!(view, serde_json::json!({ "number": "22123456", "country_code": 47 }));
}
