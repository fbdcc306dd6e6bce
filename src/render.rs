//! Pure markup rendering.
//!
//! Nothing in here touches the DOM: Each function maps table state to an HTML string,
//! which a [`View`](`crate::View`) then inserts.
//! Sub-elements are tagged with `data-element` so that views can find them again.

use crate::{
	column::{display_text, ColumnDescriptor, Row},
	escape::escape,
	sort::SortState,
};

/// Toggled on the table's root element while a page is loading.
pub const LOADING_CLASS: &str = "sortable-table_loading";
/// Toggled on the table's root element while there are no rows to show.
pub const EMPTY_CLASS: &str = "sortable-table_empty";

const ARROW: &str = r#"<span data-element="arrow" class="sortable-table__sort-arrow"><span class="sort-arrow"></span></span>"#;

/// Renders the complete table: header, body, loading line and empty placeholder.
#[must_use]
pub fn render_table(columns: &[ColumnDescriptor], sort_state: &SortState, rows: &[Row], row_href_prefix: &str, empty_placeholder: &str) -> String {
	let mut markup = String::from(r#"<div class="sortable-table">"#);
	markup.push_str(r#"<div data-element="header" class="sortable-table__header sortable-table__row">"#);
	markup.push_str(&render_header(columns, sort_state));
	markup.push_str("</div>");
	markup.push_str(r#"<div data-element="body" class="sortable-table__body">"#);
	markup.push_str(&render_rows(rows, columns, row_href_prefix));
	markup.push_str("</div>");
	markup.push_str(r#"<div data-element="loading" class="loading-line sortable-table__loading-line"></div>"#);
	markup.push_str(r#"<div data-element="emptyPlaceholder" class="sortable-table__empty-placeholder"><div><p>"#);
	markup.push_str(&escape(empty_placeholder));
	markup.push_str("</p></div></div>");
	markup.push_str("</div>");
	markup
}

/// Renders the header cells (without their container).
///
/// Only the column named by `sort_state` carries `data-order` and the arrow indicator.
#[must_use]
pub fn render_header(columns: &[ColumnDescriptor], sort_state: &SortState) -> String {
	let mut markup = String::new();
	for column in columns {
		markup.push_str(r#"<div class="sortable-table__cell" data-id=""#);
		markup.push_str(&escape(&column.id));
		markup.push_str(r#"" data-sortable=""#);
		markup.push_str(if column.sortable { "true" } else { "false" });
		markup.push('"');

		let is_sorted = column.sortable && sort_state.is_sorted_by(&column.id);
		if is_sorted {
			markup.push_str(r#" data-order=""#);
			markup.push_str(sort_state.direction.as_str());
			markup.push('"');
		}

		markup.push_str("><span>");
		markup.push_str(&escape(&column.title));
		markup.push_str("</span>");
		if is_sorted {
			markup.push_str(ARROW);
		}
		markup.push_str("</div>");
	}
	markup
}

/// Renders body rows (without their container).
///
/// Rows with an `id` become links to `row_href_prefix` + `id`.
#[must_use]
pub fn render_rows(rows: &[Row], columns: &[ColumnDescriptor], row_href_prefix: &str) -> String {
	let mut markup = String::new();
	for row in rows {
		render_row(&mut markup, row, columns, row_href_prefix);
	}
	markup
}

fn render_row(markup: &mut String, row: &Row, columns: &[ColumnDescriptor], row_href_prefix: &str) {
	let link = row.id().map(|id| format!("{}{}", row_href_prefix, id));
	match &link {
		Some(href) => {
			markup.push_str(r#"<a href=""#);
			markup.push_str(&escape(href));
			markup.push_str(r#"" class="sortable-table__row">"#);
		}
		None => markup.push_str(r#"<div class="sortable-table__row">"#),
	}

	for column in columns {
		render_cell(markup, row, column);
	}

	markup.push_str(if link.is_some() { "</a>" } else { "</div>" });
}

fn render_cell(markup: &mut String, row: &Row, column: &ColumnDescriptor) {
	let value = row.get(&column.id).unwrap_or(&serde_json::Value::Null);
	if let Some(cell_renderer) = &column.cell_renderer {
		markup.push_str(&cell_renderer(value));
	} else {
		markup.push_str(r#"<div class="sortable-table__cell">"#);
		markup.push_str(&escape(&display_text(value)));
		markup.push_str("</div>");
	}
}
