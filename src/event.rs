//! Table notifications for the host.

use crate::{error::FetchError, sort::SortState};
use std::cell::RefCell;

/// Notifications for the table's host.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
	/// The active sort changed. Emitted before any resulting rows arrive.
	SortChanged(SortState),
	/// The body was re-rendered from scratch with `count` rows.
	RowsReplaced { count: usize },
	/// `count` rows were appended after `previous` already-rendered ones.
	RowsAppended { previous: usize, count: usize },
	/// A fetch failed. Rendered rows were left as they were.
	LoadFailed(FetchError),
}

type Listener = Box<dyn Fn(&TableEvent)>;

#[derive(Default)]
pub(crate) struct Listeners(RefCell<Vec<Listener>>);
impl Listeners {
	pub fn subscribe(&self, listener: Listener) {
		self.0.borrow_mut().push(listener);
	}

	/// Listeners must not subscribe further listeners while being notified.
	pub fn emit(&self, event: &TableEvent) {
		for listener in self.0.borrow().iter() {
			listener(event);
		}
	}
}
