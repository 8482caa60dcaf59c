use std::collections::HashMap;

use serde::Serialize;

use crate::{Result, RigdeskService, TenantAccess};
use rigdesk_storage::queries;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqElementItem {
	pub id: i64,
	pub question: String,
	pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqItem {
	pub id: i64,
	pub title: String,
	pub elements: Vec<FaqElementItem>,
}

impl RigdeskService {
	/// Published FAQ sections with their published elements, both in display order.
	pub async fn list_faqs(&self, _access: &TenantAccess) -> Result<Vec<FaqItem>> {
		let faqs = queries::list_published_faqs(&self.db.pool).await?;
		let ids = faqs.iter().map(|faq| faq.id).collect::<Vec<_>>();
		let mut elements = HashMap::<i64, Vec<FaqElementItem>>::new();

		for element in queries::list_published_faq_elements(&self.db.pool, &ids).await? {
			elements.entry(element.faq_id).or_default().push(FaqElementItem {
				id: element.id,
				question: element.question,
				answer: element.answer,
			});
		}

		Ok(faqs
			.into_iter()
			.map(|faq| FaqItem {
				elements: elements.remove(&faq.id).unwrap_or_default(),
				id: faq.id,
				title: faq.title,
			})
			.collect())
	}
}
