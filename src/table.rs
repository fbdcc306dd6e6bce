//! The incrementally loading, sortable table.

use crate::{
	column::{Columns, Row},
	config::TableConfig,
	error::{ConfigError, TableError},
	event::{Listeners, TableEvent},
	page::{PageWindow, ScrollMetrics},
	render::{render_header, render_rows, render_table},
	sort::{sort_rows, SortDirection, SortState},
	source::DataSource,
	view::View,
};
use core::cell::RefCell;
use tracing::{debug, error, instrument, trace, warn};

/// What a pending request was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
	Initial,
	Sort,
	Scroll,
}

/// Lifecycle of a [`SortableTable`].
///
/// `Uninitialized → Loading(Initial) → Ready → Loading(Sort | Scroll) → Ready → …`,
/// and [`Destroyed`](`Phase::Destroyed`) from anywhere, for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	Uninitialized,
	Loading(LoadKind),
	Ready,
	Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOutcome {
	/// The rows are now in the requested order.
	Sorted,
	/// A newer sort request superseded this one while it was loading. Its response was discarded.
	Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOutcome {
	/// Nothing was requested: The bottom isn't in view, a request is pending, the table sorts locally or the collection is exhausted.
	Skipped,
	/// This many rows were appended.
	Appended(usize),
	/// A sort request superseded this one while it was loading. Its response was discarded.
	Stale,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
	token: u64,
	kind: LoadKind,
}

#[derive(Debug)]
struct TableState {
	rows: Vec<Row>,
	sort_state: SortState,
	/// The sort that `rows` and `window` were loaded with. Differs from `sort_state` only while a remote sort is pending.
	rows_sort: SortState,
	/// The last page that was committed to `rows`, if any.
	window: Option<PageWindow>,
	in_flight: Option<InFlight>,
	next_token: u64,
	initialized: bool,
	destroyed: bool,
	/// A page came back short, so there is nothing more to load for this sort.
	exhausted: bool,
}

/// A sortable table that loads its rows page by page from a [`DataSource`] and renders into a [`View`].
///
/// All operations take `&self` and may interleave at their suspension points (page requests):
///
/// - At most one scroll-triggered request is pending at a time. Further scroll triggers are dropped.
/// - A remote sort request supersedes whatever is pending. Superseded responses are discarded on arrival.
/// - The loading flag is always released by the request that set it, however that request ends.
pub struct SortableTable<S: DataSource, V: View> {
	columns: Columns,
	sorted_locally: bool,
	page_size: usize,
	row_href_prefix: String,
	empty_placeholder: String,
	initial_rows: Option<Vec<Row>>,
	source: S,
	view: V,
	state: RefCell<TableState>,
	listeners: Listeners,
}

impl<S: DataSource, V: View> SortableTable<S, V> {
	/// Validates `config`. Nothing is fetched or rendered until [`initialize`](`SortableTable::initialize`).
	///
	/// Tables with [`initial_rows`](`TableConfig::initial_rows`) always sort locally.
	///
	/// # Errors
	///
	/// Iff `config` is invalid, see [`TableConfig::validate`].
	#[instrument(skip(config, source, view))]
	pub fn new(config: TableConfig, source: S, view: V) -> Result<Self, ConfigError> {
		let (columns, sort_state) = config.validate()?;
		let TableConfig {
			is_sorted_locally,
			page_size,
			row_href_prefix,
			empty_placeholder,
			initial_rows,
			..
		} = config;

		debug!(columns = columns.as_slice().len(), ?sort_state, "Created table.");
		Ok(Self {
			columns,
			sorted_locally: is_sorted_locally || initial_rows.is_some(),
			page_size,
			row_href_prefix,
			empty_placeholder,
			initial_rows,
			source,
			view,
			state: RefCell::new(TableState {
				rows: Vec::new(),
				rows_sort: sort_state.clone(),
				sort_state,
				window: None,
				in_flight: None,
				next_token: 0,
				initialized: false,
				destroyed: false,
				exhausted: false,
			}),
			listeners: Listeners::default(),
		})
	}

	/// Renders the table and loads its first page (or shows the configured initial rows).
	///
	/// If the first page can't be loaded, the table is left empty with its placeholder visible.
	///
	/// # Errors
	///
	/// Iff the table was destroyed or the first page couldn't be loaded.
	#[instrument(skip(self))]
	pub async fn initialize(&self) -> Result<(), TableError> {
		let sort_state = {
			let mut state = self.state.borrow_mut();
			if state.destroyed {
				return Err(TableError::Destroyed);
			}
			if state.initialized {
				warn!("Table is already initialized.");
				return Ok(());
			}
			state.initialized = true;
			state.sort_state.clone()
		};

		self.view.mount(&render_table(self.columns.as_slice(), &sort_state, &[], &self.row_href_prefix, &self.empty_placeholder));

		if let Some(rows) = self.initial_rows.clone() {
			let rows = self.sorted(rows, &sort_state);
			let event = self.show_rows(rows, &sort_state, None);
			self.listeners.emit(&event);
			return Ok(());
		}

		let guard = self.begin(LoadKind::Initial);
		let window = PageWindow::first(self.page_size);
		let result = self.source.fetch_page(&sort_state, window).await;
		if self.is_destroyed() {
			return Err(TableError::Destroyed);
		}
		if !guard.is_current() {
			debug!("Initial page was superseded by a sort request.");
			return Ok(());
		}

		match result {
			Ok(rows) => {
				// A local sort may have been requested in the meantime.
				let current_sort = self.sort_state();
				let rows = self.sorted(rows, &current_sort);
				let event = self.show_rows(rows, &current_sort, Some(window));
				drop(guard);
				self.listeners.emit(&event);
				Ok(())
			}
			Err(fetch_error) => {
				error!("Failed to load the first page: {}", fetch_error);
				self.view.set_empty(true);
				drop(guard);
				self.listeners.emit(&TableEvent::LoadFailed(fetch_error.clone()));
				Err(fetch_error.into())
			}
		}
	}

	/// Sorts by `column_id` in `direction`.
	///
	/// Local tables reorder their loaded rows. Remote tables reload from the first page,
	/// replacing all rows once the response arrives, or restoring the previous sort if it fails.
	///
	/// Before [`initialize`](`SortableTable::initialize`), this only changes the sort used for the first page.
	///
	/// # Errors
	///
	/// [`TableError::InvalidColumn`] iff `column_id` is unknown or not sortable, before anything else happens.
	/// Otherwise iff the table was destroyed or the reload failed.
	#[instrument(skip(self))]
	pub async fn sort_by(&self, column_id: &str, direction: SortDirection) -> Result<SortOutcome, TableError> {
		let column = self.columns.sortable(column_id)?;
		let sort_state = SortState::new(column_id, direction);

		let initialized = {
			let mut state = self.state.borrow_mut();
			if state.destroyed {
				return Err(TableError::Destroyed);
			}
			state.sort_state = sort_state.clone();
			if !state.initialized {
				state.rows_sort = sort_state.clone();
			}
			state.initialized
		};
		if !initialized {
			self.listeners.emit(&TableEvent::SortChanged(sort_state));
			return Ok(SortOutcome::Sorted);
		}

		self.view.replace_header(&render_header(self.columns.as_slice(), &sort_state));
		self.listeners.emit(&TableEvent::SortChanged(sort_state.clone()));

		if self.sorted_locally {
			let rows = sort_rows(&self.state.borrow().rows, column, direction);
			let event = self.show_rows(rows, &sort_state, None);
			self.listeners.emit(&event);
			return Ok(SortOutcome::Sorted);
		}

		let guard = self.begin(LoadKind::Sort);
		let window = PageWindow::first(self.page_size);
		let result = self.source.fetch_page(&sort_state, window).await;
		if self.is_destroyed() {
			return Err(TableError::Destroyed);
		}
		if !guard.is_current() {
			debug!("Discarding superseded sort response.");
			return Ok(SortOutcome::Stale);
		}

		match result {
			Ok(rows) => {
				let event = self.show_rows(rows, &sort_state, Some(window));
				drop(guard);
				self.listeners.emit(&event);
				Ok(SortOutcome::Sorted)
			}
			Err(fetch_error) => {
				// Superseded sorts never reached the rows.
				let previous = {
					let mut state = self.state.borrow_mut();
					let previous = state.rows_sort.clone();
					state.sort_state = previous.clone();
					previous
				};
				warn!("Failed to sort by {:?}, restoring {:?}: {}", column_id, previous, fetch_error);
				self.view.replace_header(&render_header(self.columns.as_slice(), &previous));
				drop(guard);
				self.listeners.emit(&TableEvent::SortChanged(previous));
				self.listeners.emit(&TableEvent::LoadFailed(fetch_error.clone()));
				Err(fetch_error.into())
			}
		}
	}

	/// Handles a click on `column_id`'s header cell:
	/// The active column flips its direction, any other column starts ascending.
	///
	/// # Errors
	///
	/// As [`sort_by`](`SortableTable::sort_by`).
	pub async fn click_header(&self, column_id: &str) -> Result<SortOutcome, TableError> {
		let SortState { direction, .. } = self.state.borrow().sort_state.clicked(column_id);
		self.sort_by(column_id, direction).await
	}

	/// Loads and appends the next page iff the table's bottom edge is in view,
	/// nothing is loading, the table sorts remotely and the collection isn't exhausted.
	///
	/// Rendered rows are never touched. If the request fails, rows and page window stay as they were,
	/// so that the next call retries the same page.
	///
	/// # Errors
	///
	/// Iff the table was destroyed while loading or the page couldn't be loaded.
	#[instrument(skip(self))]
	pub async fn maybe_load_more(&self, metrics: ScrollMetrics) -> Result<LoadOutcome, TableError> {
		let (sort_state, window) = {
			let state = self.state.borrow();
			if state.destroyed || !state.initialized || self.sorted_locally || state.exhausted || !metrics.is_bottom_visible() {
				return Ok(LoadOutcome::Skipped);
			}
			if let Some(in_flight) = state.in_flight {
				trace!(?in_flight, "Request pending, skipping.");
				return Ok(LoadOutcome::Skipped);
			}
			let window = state.window.map_or_else(|| PageWindow::first(self.page_size), PageWindow::next);
			(state.sort_state.clone(), window)
		};

		let guard = self.begin(LoadKind::Scroll);
		let result = self.source.fetch_page(&sort_state, window).await;
		if self.is_destroyed() {
			return Err(TableError::Destroyed);
		}
		if !guard.is_current() {
			debug!("Discarding superseded page {:?}.", window);
			return Ok(LoadOutcome::Stale);
		}

		match result {
			Ok(rows) => {
				let count = rows.len();
				let markup = render_rows(&rows, self.columns.as_slice(), &self.row_href_prefix);
				let previous = {
					let mut state = self.state.borrow_mut();
					let previous = state.rows.len();
					state.rows.extend(rows);
					state.window = Some(window);
					state.exhausted = count < window.len();
					previous
				};
				if count > 0 {
					self.view.append_body(&markup);
					self.view.set_empty(false);
				}
				trace!(previous, count, "Appended page.");
				drop(guard);
				self.listeners.emit(&TableEvent::RowsAppended { previous, count });
				Ok(LoadOutcome::Appended(count))
			}
			Err(fetch_error) => {
				warn!("Failed to load page {:?}: {}", window, fetch_error);
				drop(guard);
				self.listeners.emit(&TableEvent::LoadFailed(fetch_error.clone()));
				Err(fetch_error.into())
			}
		}
	}

	/// [`maybe_load_more`](`SortableTable::maybe_load_more`) with the view's current scroll metrics.
	///
	/// # Errors
	///
	/// As [`maybe_load_more`](`SortableTable::maybe_load_more`).
	pub async fn on_scroll(&self) -> Result<LoadOutcome, TableError> {
		if self.is_destroyed() {
			return Ok(LoadOutcome::Skipped);
		}
		let metrics = self.view.scroll_metrics();
		self.maybe_load_more(metrics).await
	}

	/// Removes the rendered table. Pending responses are discarded on arrival and further operations fail or do nothing.
	#[instrument(skip(self))]
	pub fn destroy(&self) {
		{
			let mut state = self.state.borrow_mut();
			if state.destroyed {
				return;
			}
			state.destroyed = true;
			state.in_flight = None;
			state.rows.clear();
		}
		self.view.remove();
		debug!("Destroyed table.");
	}

	/// Registers a listener for [`TableEvent`]s.
	///
	/// Listeners are called synchronously and must not subscribe further listeners.
	pub fn subscribe(&self, listener: impl 'static + Fn(&TableEvent)) {
		self.listeners.subscribe(Box::new(listener));
	}

	/// The currently loaded rows, in display order.
	#[must_use]
	pub fn rows(&self) -> Vec<Row> {
		self.state.borrow().rows.clone()
	}

	#[must_use]
	pub fn sort_state(&self) -> SortState {
		self.state.borrow().sort_state.clone()
	}

	/// The last page window appended to the rows, if any page was loaded for the current sort.
	#[must_use]
	pub fn page_window(&self) -> Option<PageWindow> {
		self.state.borrow().window
	}

	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.state.borrow().in_flight.is_some()
	}

	#[must_use]
	pub fn is_sorted_locally(&self) -> bool {
		self.sorted_locally
	}

	#[must_use]
	pub fn phase(&self) -> Phase {
		let state = self.state.borrow();
		match (state.destroyed, state.initialized, state.in_flight) {
			(true, _, _) => Phase::Destroyed,
			(false, false, _) => Phase::Uninitialized,
			(false, true, Some(InFlight { kind, .. })) => Phase::Loading(kind),
			(false, true, None) => Phase::Ready,
		}
	}

	#[must_use]
	pub fn columns(&self) -> &Columns {
		&self.columns
	}

	#[must_use]
	pub fn view(&self) -> &V {
		&self.view
	}

	fn is_destroyed(&self) -> bool {
		self.state.borrow().destroyed
	}

	/// Takes over the loading flag with a fresh request token, superseding any pending request.
	fn begin(&self, kind: LoadKind) -> LoadingGuard<'_, V> {
		let token = {
			let mut state = self.state.borrow_mut();
			let token = state.next_token;
			state.next_token += 1;
			if let Some(superseded) = state.in_flight.replace(InFlight { token, kind }) {
				debug!(?superseded, ?kind, "Superseding pending request.");
			}
			token
		};
		self.view.set_loading(true);
		LoadingGuard {
			state: &self.state,
			view: &self.view,
			token,
		}
	}

	fn sorted(&self, rows: Vec<Row>, sort_state: &SortState) -> Vec<Row> {
		if !self.sorted_locally {
			return rows;
		}
		match sort_state.column_id.as_deref().and_then(|id| self.columns.get(id)) {
			Some(column) => sort_rows(&rows, column, sort_state.direction),
			None => rows,
		}
	}

	/// Replaces all rows, ordered by `sort_state`, and re-renders the body.
	/// `window` is the page the rows were loaded as, if they come from the data source.
	fn show_rows(&self, rows: Vec<Row>, sort_state: &SortState, window: Option<PageWindow>) -> TableEvent {
		let count = rows.len();
		let markup = render_rows(&rows, self.columns.as_slice(), &self.row_href_prefix);
		{
			let mut state = self.state.borrow_mut();
			state.rows = rows;
			state.rows_sort = sort_state.clone();
			if let Some(window) = window {
				state.window = Some(window);
				state.exhausted = count < window.len();
			}
		}
		self.view.replace_body(&markup);
		self.view.set_empty(count == 0);
		TableEvent::RowsReplaced { count }
	}
}

/// Releases the loading flag on drop, unless a newer request has taken it over in the meantime.
#[must_use]
struct LoadingGuard<'a, V: View> {
	state: &'a RefCell<TableState>,
	view: &'a V,
	token: u64,
}
impl<'a, V: View> LoadingGuard<'a, V> {
	fn is_current(&self) -> bool {
		matches!(self.state.borrow().in_flight, Some(InFlight { token, .. }) if token == self.token)
	}
}
impl<'a, V: View> Drop for LoadingGuard<'a, V> {
	fn drop(&mut self) {
		let released = {
			let mut state = self.state.borrow_mut();
			let is_current = matches!(state.in_flight, Some(InFlight { token, .. }) if token == self.token);
			if is_current {
				state.in_flight = None;
			}
			is_current
		};
		if released {
			trace!(token = self.token, "Released loading flag.");
			self.view.set_loading(false);
		}
	}
}
