//! Error types.

use thiserror::Error;

/// A page could not be loaded from the data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The request did not complete (connection failure, CORS rejection, …).
	#[error("network error: {0}")]
	Network(String),

	/// The endpoint answered with a non-success status.
	#[error("HTTP {status} from {url}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// The requested URL, including the page query.
		url: String,
	},

	/// The response body was not a JSON array of row objects.
	#[error("malformed response: {0}")]
	Parse(String),
}

impl From<serde_json::Error> for FetchError {
	fn from(error: serde_json::Error) -> Self {
		Self::Parse(error.to_string())
	}
}

/// A sort was requested on a column that can't be sorted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidColumnError {
	#[error("unknown column {0:?}")]
	Unknown(String),
	#[error("column {0:?} is not sortable")]
	NotSortable(String),
}

/// A [`TableConfig`](`crate::TableConfig`) was rejected during construction.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("a table needs at least one column")]
	NoColumns,

	#[error("duplicate column id {0:?}")]
	DuplicateColumn(String),

	#[error("column {0:?} sorts with `custom` but has no comparator")]
	MissingComparator(String),

	#[error("invalid initial sort: {0}")]
	InvalidSort(#[from] InvalidColumnError),

	#[error("invalid endpoint {endpoint:?}: {source}")]
	InvalidEndpoint {
		endpoint: String,
		#[source]
		source: url::ParseError,
	},

	#[error("page size must be at least 1")]
	ZeroPageSize,

	#[error("malformed configuration: {0}")]
	Json(#[from] serde_json::Error),
}

/// Errors returned by [`SortableTable`](`crate::SortableTable`) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
	#[error(transparent)]
	InvalidColumn(#[from] InvalidColumnError),

	#[error(transparent)]
	Fetch(#[from] FetchError),

	#[error("the table was destroyed")]
	Destroyed,
}
