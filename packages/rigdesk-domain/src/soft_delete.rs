//! Live views over records that are deleted by flag instead of removal.

pub trait Deletable {
	fn is_deleted(&self) -> bool;
}
impl<T> Deletable for &T
where
	T: Deletable + ?Sized,
{
	fn is_deleted(&self) -> bool {
		(**self).is_deleted()
	}
}

/// Iterator adapter yielding only records whose `deleted` flag is unset.
///
/// Nothing is inspected until the adapter is polled, and relative order is kept.
#[derive(Debug, Clone)]
pub struct Live<I> {
	inner: I,
}
impl<I> Iterator for Live<I>
where
	I: Iterator,
	I::Item: Deletable,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.by_ref().find(|record| !record.is_deleted())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, self.inner.size_hint().1)
	}
}

impl<I> DoubleEndedIterator for Live<I>
where
	I: DoubleEndedIterator,
	I::Item: Deletable,
{
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.by_ref().rev().find(|record| !record.is_deleted())
	}
}

pub trait LiveExt
where
	Self: Iterator + Sized,
	Self::Item: Deletable,
{
	fn live(self) -> Live<Self> {
		Live { inner: self }
	}
}
impl<I> LiveExt for I
where
	I: Iterator,
	I::Item: Deletable,
{
}
