//! Browser bindings: a [`View`] over a DOM container, a [`DataSource`] over `fetch`,
//! and a JavaScript-facing handle that wires both to a [`SortableTable`].

use crate::{
	column::Row,
	config::TableConfig,
	error::{ConfigError, FetchError},
	listener_set::ListenerSet,
	page::{PageWindow, ScrollMetrics},
	render::{EMPTY_CLASS, LOADING_CLASS},
	sort::{SortDirection, SortState},
	source::{page_url, parse_rows, DataSource},
	table::{Phase, SortableTable},
	view::View,
};
use async_trait::async_trait;
use core::{cell::RefCell, fmt::Display};
use std::rc::Rc;
use tracing::{error, instrument, warn};
use url::Url;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{Element, Event, Response};

/// Renders a table into a container element.
///
/// The container's previous content is replaced on mount.
#[derive(Debug)]
pub struct DomView {
	container: Element,
	root: RefCell<Option<Element>>,
}
impl DomView {
	#[must_use]
	pub fn new(container: Element) -> Self {
		Self { container, root: RefCell::new(None) }
	}

	#[must_use]
	pub fn container(&self) -> &Element {
		&self.container
	}

	/// The table's root element, once mounted.
	#[must_use]
	pub fn root(&self) -> Option<Element> {
		self.root.borrow().clone()
	}

	fn sub_element(&self, name: &str) -> Option<Element> {
		let root = self.root()?;
		match root.query_selector(&format!(r#"[data-element="{}"]"#, name)) {
			Ok(Some(element)) => Some(element),
			Ok(None) => {
				warn!("Sub-element {:?} not found.", name);
				None
			}
			Err(error) => {
				error!("Failed to query sub-element {:?}: {:?}", name, error);
				None
			}
		}
	}

	fn toggle_root_class(&self, class: &str, force: bool) {
		if let Some(root) = self.root() {
			if let Err(error) = root.class_list().toggle_with_force(class, force) {
				error!("Failed to toggle class {:?}: {:?}", class, error);
			}
		}
	}
}
impl View for DomView {
	fn mount(&self, table_markup: &str) {
		self.container.set_inner_html(table_markup);
		*self.root.borrow_mut() = self.container.first_element_child();
	}

	fn replace_header(&self, header_markup: &str) {
		if let Some(header) = self.sub_element("header") {
			header.set_inner_html(header_markup);
		}
	}

	fn replace_body(&self, rows_markup: &str) {
		if let Some(body) = self.sub_element("body") {
			body.set_inner_html(rows_markup);
		}
	}

	fn append_body(&self, rows_markup: &str) {
		if let Some(body) = self.sub_element("body") {
			if let Err(error) = body.insert_adjacent_html("beforeend", rows_markup) {
				error!("Failed to append rows: {:?}", error);
			}
		}
	}

	fn set_loading(&self, is_loading: bool) {
		self.toggle_root_class(LOADING_CLASS, is_loading);
	}

	fn set_empty(&self, is_empty: bool) {
		self.toggle_root_class(EMPTY_CLASS, is_empty);
	}

	fn scroll_metrics(&self) -> ScrollMetrics {
		let table_bottom = self.root().map_or(0.0, |root| root.get_bounding_client_rect().bottom());
		let viewport_height = self
			.container
			.owner_document()
			.and_then(|document| document.document_element())
			.map_or(0.0, |element| f64::from(element.client_height()));
		ScrollMetrics { table_bottom, viewport_height }
	}

	fn remove(&self) {
		if let Some(root) = self.root.borrow_mut().take() {
			root.remove();
		}
	}
}

/// Loads pages with `window.fetch`.
#[derive(Debug, Clone)]
pub struct FetchSource {
	endpoint: Url,
}
impl FetchSource {
	#[must_use]
	pub fn new(endpoint: Url) -> Self {
		Self { endpoint }
	}
}
#[async_trait(?Send)]
impl DataSource for FetchSource {
	#[instrument(skip(self))]
	async fn fetch_page(&self, sort_state: &SortState, window: PageWindow) -> Result<Vec<Row>, FetchError> {
		let url = page_url(&self.endpoint, sort_state, window);
		let browser_window = web_sys::window().ok_or_else(|| FetchError::Network("no global `window`".to_owned()))?;

		let response = JsFuture::from(browser_window.fetch_with_str(url.as_str())).await.map_err(|error| FetchError::Network(describe(&error)))?;
		let response: Response = response.dyn_into().map_err(|value| FetchError::Network(format!("expected `Response` but found {:?}", value)))?;
		if !response.ok() {
			return Err(FetchError::Status {
				status: response.status(),
				url: url.into(),
			});
		}

		let text = response.text().map_err(|error| FetchError::Network(describe(&error)))?;
		let body = JsFuture::from(text).await.map_err(|error| FetchError::Network(describe(&error)))?;
		let body = body.as_string().ok_or_else(|| FetchError::Parse("response body is not text".to_owned()))?;
		parse_rows(&body)
	}
}

fn describe(value: &JsValue) -> String {
	match value.dyn_ref::<js_sys::Error>() {
		Some(error) => error.message().into(),
		None => format!("{:?}", value),
	}
}

fn to_js(error: impl Display) -> JsValue {
	js_sys::Error::new(&error.to_string()).into()
}

pub type DomTable = SortableTable<FetchSource, DomView>;

/// A table mounted into a container element, exported to JavaScript as `SortableTable`.
///
/// Header clicks are delegated from the container, so listeners survive header re-renders.
#[wasm_bindgen(js_name = SortableTable)]
pub struct SortableTableHandle {
	table: Rc<DomTable>,
	listeners: ListenerSet,
}

#[wasm_bindgen(js_class = SortableTable)]
impl SortableTableHandle {
	/// Creates a table from a JSON configuration, see [`TableConfig::from_json`].
	///
	/// A relative endpoint is resolved against the document's location.
	///
	/// # Errors
	///
	/// Iff the configuration is invalid.
	#[wasm_bindgen(constructor)]
	pub fn new(container: Element, config_json: &str) -> Result<SortableTableHandle, JsValue> {
		let config = TableConfig::from_json(config_json).map_err(to_js)?;
		Self::with_config(container, config).map_err(to_js)
	}

	/// Renders the table, attaches its listeners and loads the first page.
	///
	/// The returned `Promise` settles once the first page is shown, and rejects after [`destroy`](`SortableTableHandle::destroy`).
	pub fn initialize(&mut self) -> js_sys::Promise {
		if self.table.phase() == Phase::Destroyed {
			warn!("Not attaching listeners to a destroyed table.");
		} else {
			self.attach_listeners();
		}
		let table = Rc::clone(&self.table);
		future_to_promise(async move { table.initialize().await.map(|()| JsValue::UNDEFINED).map_err(to_js) })
	}

	/// Sorts by `column_id` in `order` (`"asc"` or `"desc"`).
	///
	/// # Errors
	///
	/// Throws synchronously iff `order` is malformed or the column is unknown or not sortable.
	#[wasm_bindgen(js_name = sortBy)]
	pub fn sort_by(&self, column_id: String, order: &str) -> Result<js_sys::Promise, JsValue> {
		let direction: SortDirection = order.parse().map_err(to_js)?;
		self.table.columns().sortable(&column_id).map_err(to_js)?;
		let table = Rc::clone(&self.table);
		Ok(future_to_promise(async move { table.sort_by(&column_id, direction).await.map(|_| JsValue::UNDEFINED).map_err(to_js) }))
	}

	/// Detaches all listeners and removes the rendered table.
	pub fn destroy(&mut self) {
		self.listeners.clear();
		self.table.destroy();
	}

	#[wasm_bindgen(getter = isLoading)]
	pub fn is_loading(&self) -> bool {
		self.table.is_loading()
	}

	#[wasm_bindgen(getter = rowCount)]
	pub fn row_count(&self) -> usize {
		self.table.rows().len()
	}

	#[wasm_bindgen(getter = listenerCount)]
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}
}

impl SortableTableHandle {
	/// Creates a table from a Rust-side configuration, which may carry custom comparators and cell renderers.
	///
	/// # Errors
	///
	/// Iff `config` is invalid or its endpoint can't be resolved.
	pub fn with_config(container: Element, config: TableConfig) -> Result<Self, ConfigError> {
		let document_base = web_sys::window()
			.and_then(|window| window.location().href().ok())
			.and_then(|href| Url::parse(&href).ok());
		let source = FetchSource::new(config.endpoint_url(document_base.as_ref())?);
		Self::with_source(container, config, source)
	}

	/// # Errors
	///
	/// Iff `config` is invalid.
	pub fn with_source(container: Element, config: TableConfig, source: FetchSource) -> Result<Self, ConfigError> {
		Ok(Self {
			table: Rc::new(SortableTable::new(config, source, DomView::new(container))?),
			listeners: ListenerSet::default(),
		})
	}

	#[must_use]
	pub fn table(&self) -> &Rc<DomTable> {
		&self.table
	}

	fn attach_listeners(&mut self) {
		let container = self.table.view().container().clone();

		let table = Rc::clone(&self.table);
		self.listeners.listen(container.as_ref(), "pointerdown", false, move |event: Event| {
			let column_id = event
				.target()
				.and_then(|target| target.dyn_into::<Element>().ok())
				.and_then(|target| target.closest(r#"[data-sortable="true"]"#).ok().flatten())
				.and_then(|cell| cell.get_attribute("data-id"));
			if let Some(column_id) = column_id {
				let table = Rc::clone(&table);
				spawn_local(async move {
					if let Err(error) = table.click_header(&column_id).await {
						warn!("Sorting by {:?} failed: {}", column_id, error);
					}
				});
			}
		});

		let document = match container.owner_document() {
			Some(document) => document,
			None => return error!("Container has no owner document; scroll loading is disabled."),
		};
		let table = Rc::clone(&self.table);
		self.listeners.listen(document.as_ref(), "scroll", true, move |_| {
			let table = Rc::clone(&table);
			spawn_local(async move {
				if let Err(error) = table.on_scroll().await {
					warn!("Loading more rows failed: {}", error);
				}
			});
		});
	}
}
