//! Construction parameters.

use crate::{
	column::{ColumnDescriptor, ColumnSpec, Columns, Row},
	error::ConfigError,
	sort::{SortDirection, SortState},
};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_ROW_HREF_PREFIX: &str = "/products/";
pub const DEFAULT_EMPTY_PLACEHOLDER: &str = "No data";

/// Everything a [`SortableTable`](`crate::SortableTable`) is constructed from.
///
/// ```
/// use sortable_table_dom::{ColumnDescriptor, SortDirection, SortState, SortType, TableConfig};
///
/// let config = TableConfig::new(
/// 	vec![
/// 		ColumnDescriptor::new("title", "Name").sortable(SortType::String),
/// 		ColumnDescriptor::new("price", "Price").sortable(SortType::Number),
/// 	],
/// 	"api/rest/products",
/// )
/// .base_url("https://example.com/")
/// .initial_sort(SortState::new("price", SortDirection::Desc))
/// .page_size(30);
///
/// assert_eq!(config.endpoint_url(None).unwrap().as_str(), "https://example.com/api/rest/products");
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
	pub columns: Vec<ColumnDescriptor>,
	/// The paged collection endpoint, absolute or relative to [`base_url`](`TableConfig::base_url`).
	pub endpoint: String,
	pub base_url: Option<String>,
	/// Sort loaded rows in memory instead of re-querying. Disables scroll loading.
	pub is_sorted_locally: bool,
	/// Defaults to the first sortable column, ascending.
	pub initial_sort: Option<SortState>,
	pub page_size: usize,
	pub row_href_prefix: String,
	pub empty_placeholder: String,
	/// Static rows to show instead of loading the first page.
	pub initial_rows: Option<Vec<Row>>,
}
impl TableConfig {
	#[must_use]
	pub fn new(columns: Vec<ColumnDescriptor>, endpoint: impl Into<String>) -> Self {
		Self {
			columns,
			endpoint: endpoint.into(),
			base_url: None,
			is_sorted_locally: false,
			initial_sort: None,
			page_size: DEFAULT_PAGE_SIZE,
			row_href_prefix: DEFAULT_ROW_HREF_PREFIX.to_owned(),
			empty_placeholder: DEFAULT_EMPTY_PLACEHOLDER.to_owned(),
			initial_rows: None,
		}
	}

	#[must_use]
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	#[must_use]
	pub fn sorted_locally(mut self, is_sorted_locally: bool) -> Self {
		self.is_sorted_locally = is_sorted_locally;
		self
	}

	#[must_use]
	pub fn initial_sort(mut self, initial_sort: SortState) -> Self {
		self.initial_sort = Some(initial_sort);
		self
	}

	#[must_use]
	pub fn page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	#[must_use]
	pub fn row_href_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.row_href_prefix = prefix.into();
		self
	}

	#[must_use]
	pub fn empty_placeholder(mut self, text: impl Into<String>) -> Self {
		self.empty_placeholder = text.into();
		self
	}

	#[must_use]
	pub fn initial_rows(mut self, rows: Vec<Row>) -> Self {
		self.initial_rows = Some(rows);
		self
	}

	/// Loads a declarative configuration, as passed in by a JavaScript host.
	///
	/// Custom comparators and cell renderers can't be expressed in JSON;
	/// attach them to [`columns`](`TableConfig::columns`) afterwards if needed.
	///
	/// # Errors
	///
	/// Iff `json` is malformed.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let file: ConfigFile = serde_json::from_str(json)?;
		Ok(Self {
			columns: file.columns.into_iter().map(ColumnDescriptor::from).collect(),
			endpoint: file.endpoint,
			base_url: file.base_url,
			is_sorted_locally: file.is_sorted_locally,
			initial_sort: file.initial_sort,
			page_size: file.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
			row_href_prefix: file.row_href_prefix.unwrap_or_else(|| DEFAULT_ROW_HREF_PREFIX.to_owned()),
			empty_placeholder: file.empty_placeholder.unwrap_or_else(|| DEFAULT_EMPTY_PLACEHOLDER.to_owned()),
			initial_rows: file.initial_rows,
		})
	}

	/// Resolves [`endpoint`](`TableConfig::endpoint`) against [`base_url`](`TableConfig::base_url`),
	/// or against `document_base` if no base URL is configured.
	///
	/// # Errors
	///
	/// Iff the base URL or the endpoint can't be parsed.
	pub fn endpoint_url(&self, document_base: Option<&Url>) -> Result<Url, ConfigError> {
		let invalid = |source| ConfigError::InvalidEndpoint {
			endpoint: self.endpoint.clone(),
			source,
		};

		let base = match &self.base_url {
			Some(base_url) => Some(Url::parse(base_url).map_err(invalid)?),
			None => document_base.cloned(),
		};
		match base {
			Some(base) => base.join(&self.endpoint).map_err(invalid),
			None => Url::parse(&self.endpoint).map_err(invalid),
		}
	}

	/// Checks the column list and resolves the initial sort.
	///
	/// # Errors
	///
	/// Iff a column is misconfigured, the page size is zero or the initial sort names an unsortable column.
	pub fn validate(&self) -> Result<(Columns, SortState), ConfigError> {
		if self.page_size == 0 {
			return Err(ConfigError::ZeroPageSize);
		}

		let columns = Columns::new(self.columns.clone())?;
		let sort_state = match &self.initial_sort {
			Some(initial_sort) => {
				if let Some(column_id) = &initial_sort.column_id {
					columns.sortable(column_id)?;
				}
				initial_sort.clone()
			}
			None => columns
				.first_sortable()
				.map(|column| SortState::new(column.id.clone(), SortDirection::Asc))
				.unwrap_or_default(),
		};
		Ok((columns, sort_state))
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
	columns: Vec<ColumnSpec>,
	#[serde(alias = "url")]
	endpoint: String,
	#[serde(default)]
	base_url: Option<String>,
	#[serde(default, alias = "isSortLocally")]
	is_sorted_locally: bool,
	#[serde(default, alias = "sorted")]
	initial_sort: Option<SortState>,
	#[serde(default)]
	page_size: Option<usize>,
	#[serde(default)]
	row_href_prefix: Option<String>,
	#[serde(default)]
	empty_placeholder: Option<String>,
	#[serde(default, alias = "data")]
	initial_rows: Option<Vec<Row>>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::SortType;

	#[test]
	fn json() {
		let config = TableConfig::from_json(
			r#"{
				"columns": [
					{ "id": "images", "title": "Image" },
					{ "id": "title", "title": "Name", "sortable": true, "sortType": "string" },
					{ "id": "quantity", "title": "Quantity", "sortable": true, "sortType": "number" }
				],
				"url": "api/rest/products",
				"baseUrl": "https://course-js.javascript.ru/",
				"sorted": { "id": "quantity", "order": "desc" },
				"pageSize": 30
			}"#,
		)
		.unwrap();

		assert_eq!(config.columns.len(), 3);
		assert_eq!(config.columns[2].sort_type, SortType::Number);
		assert!(!config.is_sorted_locally);
		assert_eq!(config.page_size, 30);
		assert_eq!(config.row_href_prefix, DEFAULT_ROW_HREF_PREFIX);
		assert_eq!(config.endpoint_url(None).unwrap().as_str(), "https://course-js.javascript.ru/api/rest/products");

		let (_, sort_state) = config.validate().unwrap();
		assert_eq!(sort_state, SortState::new("quantity", SortDirection::Desc));
	}

	#[test]
	fn default_sort_is_first_sortable_column() {
		let config = TableConfig::new(
			vec![ColumnDescriptor::new("images", "Image"), ColumnDescriptor::new("title", "Name").sortable(SortType::String)],
			"https://example.com/products",
		);
		let (_, sort_state) = config.validate().unwrap();
		assert_eq!(sort_state, SortState::new("title", SortDirection::Asc));
	}

	#[test]
	fn rejects_unsortable_initial_sort() {
		let config = TableConfig::new(vec![ColumnDescriptor::new("images", "Image")], "https://example.com/products").initial_sort(SortState::new("images", SortDirection::Asc));
		assert!(matches!(config.validate(), Err(ConfigError::InvalidSort(_))));
	}

	#[test]
	fn rejects_custom_column_without_comparator() {
		let config = TableConfig::new(vec![ColumnDescriptor::new("status", "Status").sortable(SortType::Custom)], "https://example.com/products");
		assert!(matches!(config.validate(), Err(ConfigError::MissingComparator(id)) if id == "status"));
	}

	#[test]
	fn relative_endpoint_uses_document_base() {
		let config = TableConfig::new(vec![ColumnDescriptor::new("title", "Name")], "api/products?category=books");
		let base = Url::parse("https://shop.example/admin/").unwrap();
		assert_eq!(config.endpoint_url(Some(&base)).unwrap().as_str(), "https://shop.example/admin/api/products?category=books");
		assert!(matches!(config.endpoint_url(None), Err(ConfigError::InvalidEndpoint { .. })));
	}
}
