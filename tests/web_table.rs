#![cfg(target_arch = "wasm32")]

use serde_json::json;
use sortable_table_dom::{
	render::{render_rows, render_table, EMPTY_CLASS, LOADING_CLASS},
	web::{DomView, SortableTableHandle},
	ColumnDescriptor, Row, SortDirection, SortState, SortType, View,
};
use std::sync::Once;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element, Event, EventInit, HtmlBodyElement};

wasm_bindgen_test_configure!(run_in_browser);

static LOG: Once = Once::new();

fn container() -> Element {
	LOG.call_once(tracing_wasm::set_as_global_default);

	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let container = document.create_element("div").unwrap();
	body.append_child(&container).unwrap();
	container
}

fn columns() -> Vec<ColumnDescriptor> {
	vec![
		ColumnDescriptor::new("title", "Name").sortable(SortType::String),
		ColumnDescriptor::new("price", "Price").sortable(SortType::Number),
	]
}

fn rows() -> Vec<Row> {
	vec![
		serde_json::from_value(json!({ "id": "b", "title": "banana", "price": 3 })).unwrap(),
		serde_json::from_value(json!({ "id": "a", "title": "apple", "price": 5 })).unwrap(),
	]
}

fn row_links(container: &Element) -> Vec<String> {
	let links = container.query_selector_all(r#"[data-element="body"] a"#).unwrap();
	(0..links.length())
		.map(|i| links.item(i).unwrap().dyn_into::<Element>().unwrap().get_attribute("href").unwrap())
		.collect()
}

async fn settle() {
	for _ in 0..3 {
		JsFuture::from(js_sys::Promise::resolve(&JsValue::UNDEFINED)).await.unwrap();
	}
}

#[wasm_bindgen_test]
fn dom_view_updates_sub_elements_and_classes() {
	let container = container();
	let view = DomView::new(container.clone());
	view.mount(&render_table(&columns(), &SortState::default(), &[], "/products/", "No data"));

	let root = view.root().unwrap();
	assert!(root.class_list().contains("sortable-table"));

	view.set_loading(true);
	view.set_empty(true);
	assert!(root.class_list().contains(LOADING_CLASS));
	assert!(root.class_list().contains(EMPTY_CLASS));
	view.set_loading(false);
	assert!(!root.class_list().contains(LOADING_CLASS));

	let rows = rows();
	view.replace_body(&render_rows(&rows[..1], &columns(), "/products/"));
	view.append_body(&render_rows(&rows[1..], &columns(), "/products/"));
	assert_eq!(row_links(&container), ["/products/b", "/products/a"]);

	view.replace_body("");
	assert!(row_links(&container).is_empty());

	view.remove();
	assert!(view.root().is_none());
	assert_eq!(container.child_element_count(), 0);
	container.remove();
}

#[wasm_bindgen_test]
async fn header_pointerdown_sorts_and_destroy_detaches() {
	let container = container();
	let config = json!({
		"url": "api/rest/products",
		"columns": [
			{ "id": "title", "title": "Name", "sortable": true, "sortType": "string" },
			{ "id": "price", "title": "Price", "sortable": true, "sortType": "number" },
		],
		"sorted": { "id": "title", "order": "asc" },
		"data": [
			{ "id": "b", "title": "banana", "price": 3 },
			{ "id": "a", "title": "apple", "price": 5 },
		],
	});

	let mut handle = SortableTableHandle::new(container.clone(), &config.to_string()).unwrap();
	JsFuture::from(handle.initialize()).await.unwrap();
	assert_eq!(handle.row_count(), 2);
	assert_eq!(handle.listener_count(), 2);
	assert_eq!(row_links(&container), ["/products/a", "/products/b"]);

	let price_title = container.query_selector(r#"[data-id="price"] span"#).unwrap().unwrap();
	let init = EventInit::new();
	init.set_bubbles(true);
	price_title.dispatch_event(&Event::new_with_event_init_dict("pointerdown", &init).unwrap()).unwrap();
	settle().await;

	assert_eq!(handle.table().sort_state(), SortState::new("price", SortDirection::Asc));
	assert_eq!(row_links(&container), ["/products/b", "/products/a"]);
	let price_header = container.query_selector(r#"[data-id="price"]"#).unwrap().unwrap();
	assert_eq!(price_header.get_attribute("data-order").as_deref(), Some("asc"));

	handle.destroy();
	assert_eq!(handle.listener_count(), 0);
	assert_eq!(container.child_element_count(), 0);
	container.remove();
}

#[wasm_bindgen_test]
async fn initialize_after_destroy_attaches_nothing() {
	let container = container();
	let config = json!({
		"url": "api/rest/products",
		"columns": [{ "id": "title", "title": "Name", "sortable": true }],
		"data": [],
	});

	let mut handle = SortableTableHandle::new(container.clone(), &config.to_string()).unwrap();
	handle.destroy();
	assert!(JsFuture::from(handle.initialize()).await.is_err());
	assert_eq!(handle.listener_count(), 0);
	assert_eq!(container.child_element_count(), 0);
	container.remove();
}
