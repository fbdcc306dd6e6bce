//! Sort state and the comparator families used for local sorting.

use crate::column::{display_text, ColumnDescriptor, Row, SortType};
use chrono::{DateTime, NaiveDate};
use core::{cmp::Ordering, fmt, str::FromStr};
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	#[default]
	Asc,
	Desc,
}
impl SortDirection {
	#[must_use]
	pub fn toggled(self) -> Self {
		match self {
			Self::Asc => Self::Desc,
			Self::Desc => Self::Asc,
		}
	}

	/// The value of the `_order` query parameter and the header cell's `data-order` attribute.
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}

	/// Orients an ascending comparison result.
	#[must_use]
	pub fn apply(self, ascending: Ordering) -> Ordering {
		match self {
			Self::Asc => ascending,
			Self::Desc => ascending.reverse(),
		}
	}
}
impl fmt::Display for SortDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected \"asc\" or \"desc\" but found {0:?}")]
pub struct ParseDirectionError(String);

impl FromStr for SortDirection {
	type Err = ParseDirectionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"asc" => Ok(Self::Asc),
			"desc" => Ok(Self::Desc),
			other => Err(ParseDirectionError(other.to_owned())),
		}
	}
}

/// The active sort column (if any) and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SortState {
	#[serde(rename = "id")]
	pub column_id: Option<String>,
	#[serde(rename = "order", default)]
	pub direction: SortDirection,
}
impl SortState {
	#[must_use]
	pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
		Self {
			column_id: Some(column_id.into()),
			direction,
		}
	}

	#[must_use]
	pub fn is_sorted_by(&self, column_id: &str) -> bool {
		self.column_id.as_deref() == Some(column_id)
	}

	/// The state after a click on `column_id`'s header:
	/// The active column flips its direction, any other column starts ascending.
	#[must_use]
	pub fn clicked(&self, column_id: &str) -> Self {
		let direction = if self.is_sorted_by(column_id) { self.direction.toggled() } else { SortDirection::Asc };
		Self::new(column_id, direction)
	}
}

thread_local! {
	/// Russian collation, which orders Latin script after Cyrillic and otherwise like the root collation.
	static COLLATOR: Option<Collator> = {
		let mut options = CollatorOptions::new();
		options.strength = Some(Strength::Tertiary);
		Collator::try_new(&locale!("ru").into(), options)
			.map_err(|error| warn!("Falling back to code point collation: {}", error))
			.ok()
	};
}

/// Compares text in Russian/English dictionary order: letters first (so `ё` sorts with `е` and `é` with `e`),
/// then casing (lowercase before uppercase), then by code point.
///
/// This is a total order, so equal keys only arise for identical strings.
#[must_use]
pub fn compare_strings(a: &str, b: &str) -> Ordering {
	COLLATOR
		.with(|collator| match collator {
			Some(collator) => collator.compare(a, b),
			None => compare_folded(a, b),
		})
		.then_with(|| a.cmp(b))
}

fn compare_folded(a: &str, b: &str) -> Ordering {
	fn folded(text: &str) -> impl '_ + Iterator<Item = char> {
		text.chars().flat_map(char::to_lowercase)
	}
	fn casing(text: &str) -> impl '_ + Iterator<Item = bool> {
		text.chars().map(char::is_uppercase)
	}

	folded(a).cmp(folded(b)).then_with(|| casing(a).cmp(casing(b)))
}

/// Compares numeric keys. Missing or non-numeric keys sort after all numbers.
#[must_use]
pub fn compare_numeric_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => a.total_cmp(&b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn number_key(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
		_ => None,
	}
}

/// Dates are epoch milliseconds, RFC 3339 timestamps or `YYYY-MM-DD` calendar dates (taken as UTC midnight).
#[allow(clippy::cast_precision_loss)]
fn date_key(value: &Value) -> Option<f64> {
	match value {
		Value::Number(millis) => millis.as_f64(),
		Value::String(text) => {
			let text = text.trim();
			if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
				Some(date_time.timestamp_millis() as f64)
			} else if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
				date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc().timestamp_millis() as f64)
			} else {
				None
			}
		}
		_ => None,
	}
}

/// Compares two rows by `column` in ascending order.
#[must_use]
pub fn compare_rows(column: &ColumnDescriptor, a: &Row, b: &Row) -> Ordering {
	let id = column.id.as_str();
	match column.sort_type {
		SortType::Number => compare_numeric_keys(a.get(id).and_then(number_key), b.get(id).and_then(number_key)),
		SortType::Date => compare_numeric_keys(a.get(id).and_then(date_key), b.get(id).and_then(date_key)),
		SortType::String => {
			let text = |row: &Row| row.get(id).map(|value| display_text(value).into_owned()).unwrap_or_default();
			compare_strings(&text(a), &text(b))
		}
		SortType::Custom => match &column.custom_comparator {
			Some(comparator) => comparator(a, b),
			None => Ordering::Equal,
		},
	}
}

/// Returns `rows` ordered by `column` in `direction`.
///
/// The sort is stable in both directions: rows with equal keys keep their relative order.
#[must_use]
pub fn sort_rows(rows: &[Row], column: &ColumnDescriptor, direction: SortDirection) -> Vec<Row> {
	let mut sorted = rows.to_vec();
	sorted.sort_by(|a, b| direction.apply(compare_rows(column, a, b)));
	sorted
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strings_fold_case_first() {
		assert_eq!(compare_strings("apple", "Banana"), Ordering::Less);
		assert_eq!(compare_strings("apple", "Apple"), Ordering::Less);
		assert_eq!(compare_strings("Apple", "apple"), Ordering::Greater);
		assert_eq!(compare_strings("apple", "apple"), Ordering::Equal);
		assert_eq!(compare_strings("абрикос", "Абрикос"), Ordering::Less);
	}

	#[test]
	fn strings_follow_dictionary_order() {
		assert_eq!(compare_strings("éclair", "zebra"), Ordering::Less);
		assert_eq!(compare_strings("eclair", "éclair"), Ordering::Less);
		assert_eq!(compare_strings("ёж", "жук"), Ordering::Less);
		assert_eq!(compare_strings("еж", "ёж"), Ordering::Less);
		assert_eq!(compare_strings("яблоко", "apple"), Ordering::Less);
	}

	#[test]
	fn folded_fallback_orders_case_after_letters() {
		assert_eq!(compare_folded("apple", "Apple"), Ordering::Less);
		assert_eq!(compare_folded("Apple", "banana"), Ordering::Less);
	}

	#[test]
	fn missing_numbers_sort_last() {
		assert_eq!(compare_numeric_keys(Some(1e9), None), Ordering::Less);
		assert_eq!(compare_numeric_keys(None, None), Ordering::Equal);
	}

	#[test]
	fn date_formats() {
		assert_eq!(date_key(&Value::from("1970-01-02")), Some(86_400_000.0));
		assert_eq!(date_key(&Value::from("1970-01-01T00:00:01Z")), Some(1000.0));
		assert_eq!(date_key(&Value::from(5)), Some(5.0));
		assert_eq!(date_key(&Value::from("yesterday")), None);
	}

	#[test]
	fn clicking() {
		let state = SortState::new("title", SortDirection::Asc);
		assert_eq!(state.clicked("title"), SortState::new("title", SortDirection::Desc));
		assert_eq!(state.clicked("price"), SortState::new("price", SortDirection::Asc));
		assert_eq!(SortState::default().clicked("price"), SortState::new("price", SortDirection::Asc));
	}
}
