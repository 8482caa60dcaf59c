pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Authentication credentials were not provided.")]
	Unauthenticated,
	#[error("You do not have permission to perform this action.")]
	PermissionDenied,
	#[error("{field}: {message}")]
	Validation { field: String, message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("{message}")]
	NotFound { message: String },
	#[error("Request was throttled. Expected available in {wait_secs} seconds.")]
	Throttled { wait_secs: u64 },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Search index error: {message}")]
	Qdrant { message: String },
	#[error("Redis error: {message}")]
	Redis { message: String },
	#[error("Crypto error: {message}")]
	Crypto { message: String },
}
impl Error {
	pub(crate) fn validation(field: &str, message: impl ToString) -> Self {
		Self::Validation { field: field.to_string(), message: message.to_string() }
	}

	pub(crate) fn not_found() -> Self {
		Self::NotFound { message: "Not found.".to_string() }
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<rigdesk_storage::Error> for Error {
	fn from(err: rigdesk_storage::Error) -> Self {
		match err {
			rigdesk_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			rigdesk_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			rigdesk_storage::Error::InvalidDuration(rejection) =>
				Self::validation(rejection.field(), rejection),
			rigdesk_storage::Error::NotFound(message) => Self::NotFound { message },
			rigdesk_storage::Error::Conflict(message) => Self::Conflict { message },
			rigdesk_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
			rigdesk_storage::Error::Redis(inner) => Self::Redis { message: inner.to_string() },
			rigdesk_storage::Error::Io(inner) => Self::Storage { message: inner.to_string() },
			rigdesk_storage::Error::Crypto(message) => Self::Crypto { message },
		}
	}
}

#[cfg(test)]
mod tests {
	use rigdesk_domain::duration::DurationRejection;

	use super::*;

	#[test]
	fn duration_rejections_become_field_errors() {
		let err = Error::from(rigdesk_storage::Error::InvalidDuration(
			DurationRejection::NotFinite { field: "waiting_on_weather" },
		));

		assert!(matches!(
			err,
			Error::Validation { ref field, ref message }
				if field == "waiting_on_weather" && message == "A valid number is required."
		));
	}
}
