use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, PageQuery, Result, RigdeskService, TenantAccess};
use rigdesk_domain::pagination::Page;
use rigdesk_storage::{models::Notification, queries};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationItem {
	pub id: i64,
	pub title: String,
	pub url: String,
	pub read: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<Notification> for NotificationItem {
	fn from(row: Notification) -> Self {
		Self {
			id: row.id,
			title: row.title,
			url: row.url,
			read: row.read,
			created_at: row.created_at,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnreadCount {
	pub count: i64,
}

impl RigdeskService {
	/// The caller's notifications, newest first.
	pub async fn list_notifications(
		&self,
		access: &TenantAccess,
		query: &PageQuery,
		base_url: &str,
	) -> Result<Page<NotificationItem>> {
		let request = self.page_request(query)?;
		let count =
			queries::count_notifications(&self.db.pool, access.tenant_user_id, false).await?;
		let count = u64::try_from(count).unwrap_or(0);

		request.check(count).map_err(|err| Error::NotFound { message: err.to_string() })?;

		let limit = i64::try_from(request.limit()).unwrap_or(i64::MAX);
		let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
		let rows =
			queries::list_notifications(&self.db.pool, access.tenant_user_id, limit, offset)
				.await?;
		let results = rows.into_iter().map(NotificationItem::from).collect();

		Ok(Page::new(request, count, results, base_url))
	}

	pub async fn unread_notifications(&self, access: &TenantAccess) -> Result<UnreadCount> {
		let count = queries::count_notifications(&self.db.pool, access.tenant_user_id, true).await?;

		Ok(UnreadCount { count })
	}

	/// Marks every unread notification read and returns how many changed.
	pub async fn read_all_notifications(&self, access: &TenantAccess) -> Result<u64> {
		let updated =
			queries::mark_all_notifications_read(&self.db.pool, access.tenant_user_id).await?;

		tracing::info!(
			tenant_user_id = access.tenant_user_id,
			updated,
			"Marked notifications read."
		);

		Ok(updated)
	}

	/// Returns whether the notification was unread before this call.
	pub async fn read_notification(
		&self,
		access: &TenantAccess,
		notification_id: i64,
	) -> Result<bool> {
		let previous =
			queries::mark_notification_read(&self.db.pool, access.tenant_user_id, notification_id)
				.await?
				.ok_or_else(Error::not_found)?;

		Ok(!previous)
	}
}
