//! Page windows over the remote collection and the scroll position that triggers loading them.

/// A half-open range `start..end` of the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
	pub start: usize,
	pub end: usize,
}
impl PageWindow {
	/// The first page, `0..page_size`.
	#[must_use]
	pub fn first(page_size: usize) -> Self {
		Self { start: 0, end: page_size }
	}

	/// The page directly after this one, of the same size.
	#[must_use]
	pub fn next(self) -> Self {
		Self {
			start: self.end,
			end: self.end + self.len(),
		}
	}

	#[must_use]
	pub fn len(self) -> usize {
		self.end - self.start
	}

	#[must_use]
	pub fn is_empty(self) -> bool {
		self.start == self.end
	}
}

/// Where the table's bottom edge currently is, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
	/// Distance from the top of the viewport to the table's bottom edge, in CSS pixels.
	pub table_bottom: f64,
	/// Height of the viewport, in CSS pixels.
	pub viewport_height: f64,
}
impl ScrollMetrics {
	/// Whether the end of the rendered rows has scrolled into view.
	#[must_use]
	pub fn is_bottom_visible(self) -> bool {
		self.table_bottom < self.viewport_height
	}
}
