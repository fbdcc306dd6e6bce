#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};
use sortable_table_dom::{ColumnDescriptor, Columns, DataSource, FetchError, MemorySource, PageWindow, Row, ScrollMetrics, SortState, SortType, TableEvent, View};
use std::{
	cell::{Cell, RefCell},
	collections::VecDeque,
	rc::Rc,
};

pub const VISIBLE: ScrollMetrics = ScrollMetrics { table_bottom: 700.0, viewport_height: 800.0 };
pub const HIDDEN: ScrollMetrics = ScrollMetrics { table_bottom: 2400.0, viewport_height: 800.0 };

pub fn row(value: Value) -> Row {
	serde_json::from_value(value).unwrap()
}

pub fn product_columns() -> Vec<ColumnDescriptor> {
	vec![
		ColumnDescriptor::new("images", "Image").cell_renderer(|_| r#"<div class="sortable-table__cell"><img src="x.png"></div>"#.to_owned()),
		ColumnDescriptor::new("title", "Name").sortable(SortType::String),
		ColumnDescriptor::new("price", "Price").sortable(SortType::Number),
	]
}

/// `count` products, titled in reverse order of their prices.
pub fn products(count: usize) -> Vec<Row> {
	(0..count)
		.map(|i| {
			row(json!({
				"id": format!("product-{}", i),
				"title": format!("Product {:03}", count - i),
				"price": i,
			}))
		})
		.collect()
}

pub fn ids(rows: &[Row]) -> Vec<String> {
	rows.iter().map(|row| row.id().unwrap()).collect()
}

/// A [`MemorySource`] that records requests and can delay or fail them.
pub struct FakeSource {
	inner: MemorySource,
	requests: RefCell<Vec<(SortState, PageWindow)>>,
	failures: RefCell<VecDeque<FetchError>>,
	gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}
impl FakeSource {
	pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Rc<Self> {
		Rc::new(Self {
			inner: MemorySource::new(Columns::new(columns).unwrap(), rows),
			requests: RefCell::default(),
			failures: RefCell::default(),
			gates: RefCell::default(),
		})
	}

	pub fn requests(&self) -> Vec<(SortState, PageWindow)> {
		self.requests.borrow().clone()
	}

	/// The next request to complete fails with `error`.
	pub fn fail_next(&self, error: FetchError) {
		self.failures.borrow_mut().push_back(error);
	}

	/// The next request to start waits until the returned sender fires.
	pub fn hold_next(&self) -> oneshot::Sender<()> {
		let (sender, receiver) = oneshot::channel();
		self.gates.borrow_mut().push_back(receiver);
		sender
	}
}
#[async_trait(?Send)]
impl DataSource for FakeSource {
	async fn fetch_page(&self, sort_state: &SortState, window: PageWindow) -> Result<Vec<Row>, FetchError> {
		self.requests.borrow_mut().push((sort_state.clone(), window));
		let gate = self.gates.borrow_mut().pop_front();
		if let Some(gate) = gate {
			gate.await.unwrap();
		}
		let failure = self.failures.borrow_mut().pop_front();
		match failure {
			Some(error) => Err(error),
			None => self.inner.fetch_page(sort_state, window).await,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
	Mount(String),
	ReplaceHeader(String),
	ReplaceBody(String),
	AppendBody(String),
	Loading(bool),
	Empty(bool),
	Remove,
}

/// Records every call, and reports the table's bottom edge as visible.
pub struct RecordingView {
	calls: RefCell<Vec<ViewCall>>,
	metrics: Cell<ScrollMetrics>,
}
impl RecordingView {
	pub fn new() -> Self {
		Self {
			calls: RefCell::default(),
			metrics: Cell::new(VISIBLE),
		}
	}

	pub fn calls(&self) -> Vec<ViewCall> {
		self.calls.borrow().clone()
	}

	pub fn set_metrics(&self, metrics: ScrollMetrics) {
		self.metrics.set(metrics);
	}

	pub fn last_header(&self) -> Option<String> {
		self.calls.borrow().iter().rev().find_map(|call| match call {
			ViewCall::ReplaceHeader(markup) => Some(markup.clone()),
			_ => None,
		})
	}

	fn record(&self, call: ViewCall) {
		self.calls.borrow_mut().push(call);
	}
}
impl View for RecordingView {
	fn mount(&self, table_markup: &str) {
		self.record(ViewCall::Mount(table_markup.to_owned()));
	}

	fn replace_header(&self, header_markup: &str) {
		self.record(ViewCall::ReplaceHeader(header_markup.to_owned()));
	}

	fn replace_body(&self, rows_markup: &str) {
		self.record(ViewCall::ReplaceBody(rows_markup.to_owned()));
	}

	fn append_body(&self, rows_markup: &str) {
		self.record(ViewCall::AppendBody(rows_markup.to_owned()));
	}

	fn set_loading(&self, is_loading: bool) {
		self.record(ViewCall::Loading(is_loading));
	}

	fn set_empty(&self, is_empty: bool) {
		self.record(ViewCall::Empty(is_empty));
	}

	fn scroll_metrics(&self) -> ScrollMetrics {
		self.metrics.get()
	}

	fn remove(&self) {
		self.record(ViewCall::Remove);
	}
}

pub fn event_log<S: DataSource, V: View>(table: &sortable_table_dom::SortableTable<S, V>) -> Rc<RefCell<Vec<TableEvent>>> {
	let log = Rc::new(RefCell::new(Vec::new()));
	table.subscribe({
		let log = Rc::clone(&log);
		move |event| log.borrow_mut().push(event.clone())
	});
	log
}
