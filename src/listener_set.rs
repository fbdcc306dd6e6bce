use hashbrown::HashMap;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// DOM event listeners owned by one table, keyed by event name.
///
/// Listeners are removed from their targets by [`clear`](`ListenerSet::clear`) or on drop,
/// after which their [`Closure`]s are freed.
#[derive(Default)]
pub(crate) struct ListenerSet {
	listeners: HashMap<&'static str, (EventTarget, Closure<dyn FnMut(Event)>)>,
}
impl ListenerSet {
	/// Adds `handler` as `name` listener to `target`, replacing a previous listener for the same event.
	pub fn listen(&mut self, target: &EventTarget, name: &'static str, passive: bool, handler: impl 'static + FnMut(Event)) {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);

		let options = AddEventListenerOptions::new();
		options.set_passive(passive);
		if let Err(error) = target.add_event_listener_with_callback_and_add_event_listener_options(name, closure.as_ref().unchecked_ref(), &options) {
			return error!("Failed to add event listener {:?}: {:?}", name, error);
		}
		trace!("Added {:?} listener.", name);

		if let Some(previous) = self.listeners.insert(name, (target.clone(), closure)) {
			Self::remove(name, previous);
		}
	}

	pub fn clear(&mut self) {
		for (name, listener) in self.listeners.drain() {
			Self::remove(name, listener);
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	fn remove(name: &str, (target, closure): (EventTarget, Closure<dyn FnMut(Event)>)) {
		if let Err(error) = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
			error!("Failed to remove event listener {:?}: {:?}", name, error);
		}
		trace!("Removed {:?} listener.", name);
	}
}
impl Drop for ListenerSet {
	fn drop(&mut self) {
		self.clear();
	}
}
