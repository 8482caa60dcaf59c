use serde::Serialize;

use crate::{Result, RigdeskService, TenantAccess};
use rigdesk_storage::{models::ConceptEmpElement, queries};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptEmpElementItem {
	pub id: i64,
	pub name: String,
	pub subarea: String,
	pub percentage_improvement: f64,
}
impl From<ConceptEmpElement> for ConceptEmpElementItem {
	fn from(row: ConceptEmpElement) -> Self {
		Self {
			id: row.id,
			name: row.name,
			subarea: row.subarea,
			percentage_improvement: row.percentage_improvement,
		}
	}
}

impl RigdeskService {
	pub async fn list_concept_emp_elements(
		&self,
		_access: &TenantAccess,
	) -> Result<Vec<ConceptEmpElementItem>> {
		let rows = queries::list_concept_emp_elements(&self.db.pool).await?;

		Ok(rows.into_iter().map(ConceptEmpElementItem::from).collect())
	}
}
