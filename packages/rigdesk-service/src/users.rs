use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, Result, RigdeskService, TenantAccess, assets};
use rigdesk_domain::phone::{PhoneNumber, PhoneNumberView};
use rigdesk_storage::{
	models::User,
	queries::{self, ProfileUpdate},
};

const AVATAR_DIR: &str = "users/profile_images";
const MAX_NAME_CHARS: usize = 150;
const INVALID_IMAGE: &str = "Upload a valid image. The file you uploaded was either not an image \
or a corrupted image.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
	pub id: i64,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
	pub id: i64,
	pub first_name: String,
	pub last_name: String,
	pub role: String,
	pub company: Option<Company>,
	pub company_name: String,
	pub phone_number: Option<PhoneNumberView>,
	pub email: String,
	pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdateRequest {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub company_name: Option<String>,
	pub phone_number: Option<String>,
}

impl RigdeskService {
	pub async fn me(&self, access: &TenantAccess) -> Result<UserProfile> {
		let user = queries::get_user(&self.db.pool, access.user_id)
			.await?
			.ok_or_else(Error::not_found)?;

		self.user_profile(access, user).await
	}

	pub async fn update_me(
		&self,
		access: &TenantAccess,
		req: &ProfileUpdateRequest,
	) -> Result<UserProfile> {
		let first_name = required_name("first_name", req.first_name.as_deref())?;
		let last_name = required_name("last_name", req.last_name.as_deref())?;
		let company_name = required_name("company_name", req.company_name.as_deref())?;
		let phone_number = match req.phone_number.as_deref().map(str::trim) {
			None | Some("") => None,
			Some(raw) => {
				let phone =
					PhoneNumber::parse(raw).map_err(|err| Error::validation("phone_number", err))?;

				Some(self.cipher.encrypt(&phone.to_e164())?)
			},
		};

		tracing::info!(user_id = access.user_id, "Updating user profile.");

		let user = queries::update_user_profile(
			&self.db.pool,
			access.user_id,
			ProfileUpdate {
				first_name,
				last_name,
				company_name,
				phone_number: phone_number.as_deref(),
			},
		)
		.await?
		.ok_or_else(Error::not_found)?;

		tracing::info!(user_id = access.user_id, "Updated user profile.");

		self.user_profile(access, user).await
	}

	/// Stores an avatar in media storage and points the profile at it.
	pub async fn upload_avatar(
		&self,
		access: &TenantAccess,
		file_name: &str,
		bytes: &[u8],
	) -> Result<UserProfile> {
		if bytes.is_empty() {
			return Err(Error::validation("profile_image", "The submitted file is empty."));
		}
		if !is_image(bytes) {
			return Err(Error::validation("profile_image", INVALID_IMAGE));
		}

		let file_name = assets::valid_file_name(file_name)
			.ok_or_else(|| {
				Error::validation("profile_image", "The submitted file name is invalid.")
			})?;

		tracing::info!(user_id = access.user_id, "Updating user profile image.");

		let stored = self.media.save(&format!("{AVATAR_DIR}/{file_name}"), bytes).await?;
		let user = queries::set_profile_image(&self.db.pool, access.user_id, Some(&stored))
			.await?
			.ok_or_else(Error::not_found)?;

		tracing::info!(
			user_id = access.user_id,
			profile_image = %stored,
			"Updated user profile image."
		);

		self.user_profile(access, user).await
	}

	/// Clears the profile image reference and removes the stored object.
	pub async fn delete_avatar(&self, access: &TenantAccess) -> Result<()> {
		let previous = queries::get_user(&self.db.pool, access.user_id)
			.await?
			.ok_or_else(Error::not_found)?
			.profile_image;

		queries::set_profile_image(&self.db.pool, access.user_id, None).await?;

		if let Some(previous) = previous {
			self.media.delete(&previous).await?;
		}

		tracing::info!(user_id = access.user_id, "Removed user profile image.");

		Ok(())
	}

	async fn user_profile(&self, access: &TenantAccess, user: User) -> Result<UserProfile> {
		let company = queries::get_tenant(&self.db.pool, access.tenant_id)
			.await?
			.map(|tenant| Company { id: tenant.id, name: tenant.name });
		let phone_number = match user.phone_number.as_deref() {
			Some(stored) => {
				let phone = PhoneNumber::parse(&self.cipher.decrypt(stored)?).map_err(|err| {
					Error::Crypto { message: format!("Stored phone number is invalid: {err}") }
				})?;

				Some(PhoneNumberView::from(&phone))
			},
			None => None,
		};
		let now = OffsetDateTime::now_utc();

		Ok(UserProfile {
			id: user.id,
			first_name: user.first_name,
			last_name: user.last_name,
			role: user.role,
			company,
			company_name: user.company_name,
			phone_number,
			email: user.email,
			profile_image: user.profile_image.map(|name| self.media.url(&name, now)),
		})
	}
}

fn required_name<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
	let value = value.ok_or_else(|| Error::validation(field, "This field is required."))?.trim();

	if value.is_empty() {
		return Err(Error::validation(field, "This field may not be blank."));
	}
	if value.chars().count() > MAX_NAME_CHARS {
		return Err(Error::validation(
			field,
			format!("Ensure this field has no more than {MAX_NAME_CHARS} characters."),
		));
	}

	Ok(value)
}

/// PNG, JPEG, GIF and WebP signatures.
fn is_image(bytes: &[u8]) -> bool {
	bytes.starts_with(b"\x89PNG\r\n\x1a\n")
		|| bytes.starts_with(&[0xFF, 0xD8, 0xFF])
		|| bytes.starts_with(b"GIF87a")
		|| bytes.starts_with(b"GIF89a")
		|| (bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP")
}
