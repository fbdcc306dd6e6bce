//! Column descriptors and rows.

use crate::error::{ConfigError, InvalidColumnError};
use core::{cmp::Ordering, fmt};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{borrow::Cow, rc::Rc};

/// An immutable table row: a mapping from column id to value.
///
/// Clones share the same underlying map.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Row(Rc<Map<String, Value>>);
impl Row {
	#[must_use]
	pub fn new(fields: Map<String, Value>) -> Self {
		Self(Rc::new(fields))
	}

	/// The value stored under `column_id`, if any.
	#[must_use]
	pub fn get(&self, column_id: &str) -> Option<&Value> {
		self.0.get(column_id)
	}

	/// The row's `id` field, used to build its navigation link.
	#[must_use]
	pub fn id(&self) -> Option<String> {
		match self.get("id")? {
			Value::String(id) => Some(id.clone()),
			Value::Number(id) => Some(id.to_string()),
			_ => None,
		}
	}

	#[must_use]
	pub fn fields(&self) -> &Map<String, Value> {
		&self.0
	}
}
impl From<Map<String, Value>> for Row {
	fn from(fields: Map<String, Value>) -> Self {
		Self::new(fields)
	}
}
impl fmt::Debug for Row {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			f.debug_tuple("Row").field(&self.0).finish()
		} else {
			f.debug_struct("Row").field("fields", &self.0.len()).finish_non_exhaustive()
		}
	}
}

/// Which comparator family a column sorts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
	Number,
	#[default]
	String,
	Custom,
	Date,
}

pub type Comparator = Rc<dyn Fn(&Row, &Row) -> Ordering>;
pub type CellRenderer = Rc<dyn Fn(&Value) -> String>;

/// Describes one table column. Immutable once handed to a table.
#[derive(Clone)]
pub struct ColumnDescriptor {
	pub id: String,
	pub title: String,
	pub sortable: bool,
	pub sort_type: SortType,
	/// Used by [`SortType::Custom`] columns, in ascending order.
	pub custom_comparator: Option<Comparator>,
	/// Replaces the default cell markup. The output is inserted verbatim, so escaping is up to the renderer.
	pub cell_renderer: Option<CellRenderer>,
}
impl ColumnDescriptor {
	/// A non-sortable column titled `title`.
	#[must_use]
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			sortable: false,
			sort_type: SortType::default(),
			custom_comparator: None,
			cell_renderer: None,
		}
	}

	#[must_use]
	pub fn sortable(mut self, sort_type: SortType) -> Self {
		self.sortable = true;
		self.sort_type = sort_type;
		self
	}

	#[must_use]
	pub fn custom_comparator(mut self, comparator: impl 'static + Fn(&Row, &Row) -> Ordering) -> Self {
		self.sortable = true;
		self.sort_type = SortType::Custom;
		self.custom_comparator = Some(Rc::new(comparator));
		self
	}

	#[must_use]
	pub fn cell_renderer(mut self, renderer: impl 'static + Fn(&Value) -> String) -> Self {
		self.cell_renderer = Some(Rc::new(renderer));
		self
	}
}
impl fmt::Debug for ColumnDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnDescriptor")
			.field("id", &self.id)
			.field("title", &self.title)
			.field("sortable", &self.sortable)
			.field("sort_type", &self.sort_type)
			.field("custom_comparator", &self.custom_comparator.is_some())
			.field("cell_renderer", &self.cell_renderer.is_some())
			.finish()
	}
}

/// The declarative part of a [`ColumnDescriptor`], as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub sortable: bool,
	#[serde(default)]
	pub sort_type: SortType,
}
impl From<ColumnSpec> for ColumnDescriptor {
	fn from(spec: ColumnSpec) -> Self {
		let ColumnSpec { id, title, sortable, sort_type } = spec;
		Self {
			id,
			title,
			sortable,
			sort_type,
			custom_comparator: None,
			cell_renderer: None,
		}
	}
}

/// The plain text a cell shows for `value`, before escaping.
///
/// Strings are shown as-is, `null` as nothing and arrays or objects as JSON.
#[must_use]
pub fn display_text(value: &Value) -> Cow<'_, str> {
	match value {
		Value::Null => Cow::Borrowed(""),
		Value::String(text) => Cow::Borrowed(text),
		Value::Bool(true) => Cow::Borrowed("true"),
		Value::Bool(false) => Cow::Borrowed("false"),
		Value::Number(number) => Cow::Owned(number.to_string()),
		Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
	}
}

/// A validated column list with lookup by id.
#[derive(Debug, Clone)]
pub struct Columns {
	list: Vec<ColumnDescriptor>,
	index: HashMap<String, usize>,
}
impl Columns {
	/// # Errors
	///
	/// Iff `list` is empty, contains duplicate ids or a sortable custom column without comparator.
	pub fn new(list: Vec<ColumnDescriptor>) -> Result<Self, ConfigError> {
		if list.is_empty() {
			return Err(ConfigError::NoColumns);
		}

		let mut index = HashMap::with_capacity(list.len());
		for (i, column) in list.iter().enumerate() {
			if index.insert(column.id.clone(), i).is_some() {
				return Err(ConfigError::DuplicateColumn(column.id.clone()));
			}
			if column.sortable && column.sort_type == SortType::Custom && column.custom_comparator.is_none() {
				return Err(ConfigError::MissingComparator(column.id.clone()));
			}
		}
		Ok(Self { list, index })
	}

	#[must_use]
	pub fn get(&self, id: &str) -> Option<&ColumnDescriptor> {
		self.index.get(id).map(|&i| &self.list[i])
	}

	/// # Errors
	///
	/// Iff `id` names no column or a column that isn't sortable.
	pub fn sortable(&self, id: &str) -> Result<&ColumnDescriptor, InvalidColumnError> {
		match self.get(id) {
			Some(column) if column.sortable => Ok(column),
			Some(_) => Err(InvalidColumnError::NotSortable(id.to_owned())),
			None => Err(InvalidColumnError::Unknown(id.to_owned())),
		}
	}

	#[must_use]
	pub fn first_sortable(&self) -> Option<&ColumnDescriptor> {
		self.list.iter().find(|column| column.sortable)
	}

	pub fn iter(&self) -> core::slice::Iter<'_, ColumnDescriptor> {
		self.list.iter()
	}

	#[must_use]
	pub fn as_slice(&self) -> &[ColumnDescriptor] {
		&self.list
	}
}
impl<'a> IntoIterator for &'a Columns {
	type Item = &'a ColumnDescriptor;
	type IntoIter = core::slice::Iter<'a, ColumnDescriptor>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
