#![doc(html_root_url = "https://docs.rs/sortable-table-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A sortable table that loads its rows page by page from a JSON collection endpoint
//! and appends further pages as the user scrolls.
//!
//! Rendering, sorting and paging are plain Rust and don't need a browser:
//! [`SortableTable`] drives any [`DataSource`] and [`View`].
//! On `wasm32`, the `web` module provides DOM- and `fetch`-backed implementations of both.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod column;
pub mod config;
pub mod error;
pub mod escape;
pub mod event;
pub mod page;
pub mod render;
pub mod sort;
pub mod source;
pub mod table;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod listener_set;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use column::{ColumnDescriptor, ColumnSpec, Columns, Row, SortType};
pub use config::TableConfig;
pub use error::{ConfigError, FetchError, InvalidColumnError, TableError};
pub use escape::escape;
pub use event::TableEvent;
pub use page::{PageWindow, ScrollMetrics};
pub use sort::{SortDirection, SortState};
pub use source::{DataSource, MemorySource};
pub use table::{LoadKind, LoadOutcome, Phase, SortOutcome, SortableTable};
pub use view::View;
