use std::cell::Cell;

use rigdesk_domain::soft_delete::{Deletable, LiveExt};

#[derive(Debug, Clone, PartialEq)]
struct Record {
	id: u32,
	deleted: bool,
}
impl Deletable for Record {
	fn is_deleted(&self) -> bool {
		self.deleted
	}
}

fn records(flags: &[(u32, bool)]) -> Vec<Record> {
	flags.iter().map(|(id, deleted)| Record { id: *id, deleted: *deleted }).collect()
}

#[test]
fn live_keeps_only_non_deleted_records_in_order() {
	let all = records(&[(1, false), (2, true), (3, false), (4, true), (5, false)]);
	let ids = all.iter().live().map(|record| record.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![1, 3, 5]);
}

#[test]
fn live_of_empty_or_fully_deleted_collection_is_empty() {
	assert_eq!(Vec::<Record>::new().into_iter().live().count(), 0);
	assert_eq!(records(&[(1, true), (2, true)]).into_iter().live().count(), 0);
}

#[test]
fn live_composes_with_other_filters() {
	let all = records(&[(1, false), (2, false), (3, true), (4, false)]);
	let ids = all
		.iter()
		.filter(|record| record.id % 2 == 0)
		.live()
		.map(|record| record.id)
		.collect::<Vec<_>>();

	assert_eq!(ids, vec![2, 4]);

	let ids = all
		.iter()
		.live()
		.filter(|record| record.id > 1)
		.map(|record| record.id)
		.collect::<Vec<_>>();

	assert_eq!(ids, vec![2, 4]);
}

#[test]
fn live_is_lazy_until_consumed() {
	let inspected = Cell::new(0);
	let all = records(&[(1, false), (2, true), (3, false)]);
	let mut view = all.iter().inspect(|_| inspected.set(inspected.get() + 1)).live();

	assert_eq!(inspected.get(), 0);
	assert_eq!(view.next().map(|record| record.id), Some(1));
	assert_eq!(inspected.get(), 1);
}

#[test]
fn live_supports_reverse_iteration() {
	let all = records(&[(1, false), (2, true), (3, false)]);
	let ids = all.iter().live().rev().map(|record| record.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![3, 1]);
}
