use crate::{Error, Result, RigdeskService};
use rigdesk_storage::queries;

/// A user acting inside a tenant they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantAccess {
	pub tenant_id: i64,
	pub user_id: i64,
	pub tenant_user_id: i64,
}

impl RigdeskService {
	/// Resolves the tenant membership of the acting user.
	///
	/// Anonymous callers are rejected before the database is consulted.
	pub async fn authorize(&self, tenant_id: i64, user_id: Option<i64>) -> Result<TenantAccess> {
		let Some(user_id) = user_id else {
			return Err(Error::Unauthenticated);
		};
		let Some(relation) = queries::find_tenant_user(&self.db.pool, tenant_id, user_id).await?
		else {
			tracing::debug!(tenant_id, user_id, "User is not a member of the tenant.");

			return Err(Error::PermissionDenied);
		};

		Ok(TenantAccess { tenant_id, user_id, tenant_user_id: relation.id })
	}
}
