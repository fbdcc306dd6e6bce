//! The rendering target seam.

use crate::page::ScrollMetrics;

/// Where a table's markup ends up, and where its scroll position comes from.
///
/// All markup passed in was produced by [`render`](`crate::render`).
/// Implementations are called synchronously and never across a suspension point.
pub trait View {
	/// Replaces the view's content with a complete table, as rendered by [`render_table`](`crate::render::render_table`).
	fn mount(&self, table_markup: &str);

	/// Replaces the header cells.
	fn replace_header(&self, header_markup: &str);

	/// Replaces all body rows.
	fn replace_body(&self, rows_markup: &str);

	/// Appends rows after the existing ones, which must stay untouched.
	fn append_body(&self, rows_markup: &str);

	fn set_loading(&self, is_loading: bool);

	fn set_empty(&self, is_empty: bool);

	fn scroll_metrics(&self) -> ScrollMetrics;

	/// Removes all rendered content. Called exactly once, on teardown.
	fn remove(&self);
}
