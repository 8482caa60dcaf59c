use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid page.")]
pub struct InvalidPage;

/// A validated page window. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	pub page: u32,
	pub page_size: u32,
}
impl PageRequest {
	/// Parses the raw `page` and `page_size` query values.
	///
	/// A missing or unparsable `page_size` falls back to `default_size`; larger values are clamped
	/// to `max_size`. The literal page `last` is not supported.
	pub fn parse(
		page: Option<&str>,
		page_size: Option<&str>,
		default_size: u32,
		max_size: u32,
	) -> Result<Self, InvalidPage> {
		let page = match page.map(str::trim) {
			None | Some("") => 1,
			Some(raw) => raw.parse::<u32>().map_err(|_| InvalidPage)?,
		};

		if page == 0 {
			return Err(InvalidPage);
		}

		let page_size = page_size
			.and_then(|raw| raw.trim().parse::<u32>().ok())
			.filter(|size| *size > 0)
			.map(|size| size.min(max_size))
			.unwrap_or(default_size);

		Ok(Self { page, page_size })
	}

	pub fn offset(&self) -> u64 {
		u64::from(self.page - 1) * u64::from(self.page_size)
	}

	pub fn limit(&self) -> u64 {
		u64::from(self.page_size)
	}

	pub fn page_count(&self, count: u64) -> u64 {
		count.div_ceil(u64::from(self.page_size)).max(1)
	}

	/// The first page is always valid, even for an empty result set.
	pub fn check(&self, count: u64) -> Result<(), InvalidPage> {
		if u64::from(self.page) > self.page_count(count) {
			return Err(InvalidPage);
		}

		Ok(())
	}

	pub fn has_next(&self, count: u64) -> bool {
		u64::from(self.page) < self.page_count(count)
	}

	pub fn has_previous(&self) -> bool {
		self.page > 1
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
	pub count: u64,
	pub next: Option<String>,
	pub previous: Option<String>,
	pub results: Vec<T>,
}
impl<T> Page<T> {
	/// Builds the envelope with `next`/`previous` links derived from `base_url`, which must not
	/// already carry `page` or `page_size` parameters.
	pub fn new(request: PageRequest, count: u64, results: Vec<T>, base_url: &str) -> Self {
		let link = |page: u32| {
			let separator = if base_url.contains('?') { '&' } else { '?' };

			format!("{base_url}{separator}page={page}&page_size={}", request.page_size)
		};
		let next = request.has_next(count).then(|| link(request.page + 1));
		let previous = request.has_previous().then(|| link(request.page - 1));

		Self { count, next, previous, results }
	}
}
