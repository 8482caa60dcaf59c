use serde::{Deserialize, Serialize};

pub const MIN_QUERY_CHARS: usize = 3;
/// Payload field holding the autocomplete form of a document name.
pub const AUTOCOMPLETE_FIELD: &str = "name_auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryRejection {
	#[error("This field is required.")]
	Missing,
	#[error("This field may not be blank.")]
	Blank,
	#[error("Ensure this field has at least {min} characters.")]
	TooShort { min: usize },
}

/// A validated free-text search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);
impl SearchQuery {
	/// Trims surrounding whitespace and enforces [`MIN_QUERY_CHARS`].
	pub fn parse(raw: Option<&str>) -> Result<Self, QueryRejection> {
		let Some(raw) = raw else {
			return Err(QueryRejection::Missing);
		};
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return Err(QueryRejection::Blank);
		}
		if trimmed.chars().count() < MIN_QUERY_CHARS {
			return Err(QueryRejection::TooShort { min: MIN_QUERY_CHARS });
		}

		Ok(Self(trimmed.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Tenant-scoped autocomplete filter sent to the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
	pub tenant_id: i64,
	pub name_auto: String,
}
impl SearchFilter {
	pub fn new(tenant_id: i64, query: &SearchQuery) -> Self {
		Self { tenant_id, name_auto: query.as_str().to_string() }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
	pub id: String,
	pub url: String,
	#[serde(rename = "type")]
	pub result_type: String,
	pub name: String,
}

/// An indexed record. `name` feeds both the stored name and the autocomplete field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
	pub id: String,
	pub tenant_id: i64,
	pub name: String,
	#[serde(rename = "type")]
	pub document_type: String,
	pub url: String,
}
impl SearchDocument {
	pub fn to_result(&self) -> SearchResult {
		SearchResult {
			id: self.id.clone(),
			url: self.url.clone(),
			result_type: self.document_type.clone(),
			name: self.name.clone(),
		}
	}
}

/// Builds the `<app>.<model>.<pk>` identifier used for indexed records.
pub fn document_id(app: &str, model: &str, pk: i64) -> String {
	format!("{app}.{model}.{pk}")
}

/// Mirrors the autocomplete field's matching rule: every query word must be a prefix of some
/// word in `name`, case-insensitively.
pub fn autocomplete_matches(name: &str, query: &str) -> bool {
	let words = name.split(|c: char| !c.is_alphanumeric()).filter(|word| !word.is_empty());
	let words = words.map(str::to_lowercase).collect::<Vec<_>>();

	query
		.split(|c: char| !c.is_alphanumeric())
		.filter(|term| !term.is_empty())
		.map(str::to_lowercase)
		.all(|term| words.iter().any(|word| word.starts_with(&term)))
}
