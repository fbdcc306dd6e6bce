//! The paged collection a table loads its rows from.

use crate::{
	column::{Columns, Row},
	error::FetchError,
	page::PageWindow,
	sort::{sort_rows, SortState},
};
use async_trait::async_trait;
use std::rc::Rc;
use tracing::{instrument, trace};
use url::Url;

const PAGE_PARAMETERS: [&str; 4] = ["_sort", "_order", "_start", "_end"];

/// A paged, sortable collection of rows.
///
/// Implementations run on a single thread, so the returned futures needn't be [`Send`].
#[async_trait(?Send)]
pub trait DataSource {
	/// Loads the rows in `window`, ordered by `sort_state`.
	///
	/// Returns fewer rows than the window's length (possibly none) iff the collection ends inside it.
	///
	/// # Errors
	///
	/// Iff the page can't be retrieved or decoded.
	async fn fetch_page(&self, sort_state: &SortState, window: PageWindow) -> Result<Vec<Row>, FetchError>;
}

#[async_trait(?Send)]
impl<T: ?Sized + DataSource> DataSource for Rc<T> {
	async fn fetch_page(&self, sort_state: &SortState, window: PageWindow) -> Result<Vec<Row>, FetchError> {
		(**self).fetch_page(sort_state, window).await
	}
}

/// Builds the request URL for one page:
/// `endpoint?_sort=<column>&_order=<asc|desc>&_start=<start>&_end=<end>`.
///
/// Unrelated query parameters of `endpoint` are kept; stale page parameters are replaced.
/// `_sort` and `_order` are omitted while no column is sorted.
#[must_use]
pub fn page_url(endpoint: &Url, sort_state: &SortState, window: PageWindow) -> Url {
	let retained: Vec<(String, String)> = endpoint
		.query_pairs()
		.filter(|(name, _)| !PAGE_PARAMETERS.contains(&name.as_ref()))
		.map(|(name, value)| (name.into_owned(), value.into_owned()))
		.collect();

	let mut url = endpoint.clone();
	{
		let mut query = url.query_pairs_mut();
		query.clear().extend_pairs(&retained);
		if let Some(column_id) = &sort_state.column_id {
			query.append_pair("_sort", column_id).append_pair("_order", sort_state.direction.as_str());
		}
		query.append_pair("_start", &window.start.to_string()).append_pair("_end", &window.end.to_string());
	}
	url
}

/// Decodes a response body, which must be a JSON array of row objects.
///
/// # Errors
///
/// Iff `body` is not a JSON array of objects.
pub fn parse_rows(body: &str) -> Result<Vec<Row>, FetchError> {
	let rows: Vec<Row> = serde_json::from_str(body)?;
	trace!("Parsed {} row(s).", rows.len());
	Ok(rows)
}

/// An in-memory collection that sorts and pages like the remote endpoint does.
#[derive(Debug, Clone)]
pub struct MemorySource {
	columns: Columns,
	rows: Vec<Row>,
}
impl MemorySource {
	#[must_use]
	pub fn new(columns: Columns, rows: Vec<Row>) -> Self {
		Self { columns, rows }
	}
}
#[async_trait(?Send)]
impl DataSource for MemorySource {
	#[instrument(skip(self))]
	async fn fetch_page(&self, sort_state: &SortState, window: PageWindow) -> Result<Vec<Row>, FetchError> {
		let sorted = match sort_state.column_id.as_deref().and_then(|id| self.columns.get(id)) {
			Some(column) => sort_rows(&self.rows, column, sort_state.direction),
			None => self.rows.clone(),
		};
		let start = window.start.min(sorted.len());
		let end = window.end.clamp(start, sorted.len());
		Ok(sorted[start..end].to_vec())
	}
}
