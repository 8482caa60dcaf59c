//! SQL rendition of the live view: every query built here excludes rows flagged `deleted`.
//!
//! Nothing is sent to Postgres until one of the fetch methods runs, and further filters compose
//! onto the live condition in any order.

use sqlx::{Encode, PgExecutor, Postgres, QueryBuilder, Type, postgres::PgRow};

use crate::Result;

pub struct LiveQuery<'args> {
	builder: QueryBuilder<'args, Postgres>,
	ordered: bool,
}
impl<'args> LiveQuery<'args> {
	/// `SELECT <columns> FROM <table>` restricted to live rows. Both arguments are trusted
	/// identifiers, never user input.
	pub fn select(columns: &str, table: &str) -> Self {
		let builder =
			QueryBuilder::new(format!("SELECT {columns} FROM {table} WHERE deleted = FALSE"));

		Self { builder, ordered: false }
	}

	pub fn filter_eq<T>(mut self, column: &str, value: T) -> Self
	where
		T: 'args + Encode<'args, Postgres> + Type<Postgres>,
	{
		self.builder.push(" AND ").push(column).push(" = ").push_bind(value);

		self
	}

	pub fn filter_in(mut self, column: &str, values: Vec<i64>) -> Self {
		self.builder.push(" AND ").push(column).push(" = ANY(").push_bind(values).push(")");

		self
	}

	/// Appends an ordering term. Repeated calls extend the same `ORDER BY` clause.
	pub fn order_by(mut self, term: &str) -> Self {
		self.builder.push(if self.ordered { ", " } else { " ORDER BY " }).push(term);
		self.ordered = true;

		self
	}

	pub fn sql(&self) -> &str {
		self.builder.sql()
	}

	pub async fn fetch_all<'e, T, E>(mut self, executor: E) -> Result<Vec<T>>
	where
		T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
		E: PgExecutor<'e>,
	{
		Ok(self.builder.build_query_as::<T>().fetch_all(executor).await?)
	}

	pub async fn fetch_optional<'e, T, E>(mut self, executor: E) -> Result<Option<T>>
	where
		T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
		E: PgExecutor<'e>,
	{
		Ok(self.builder.build_query_as::<T>().fetch_optional(executor).await?)
	}
}
