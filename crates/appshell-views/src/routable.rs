//! Routing support for view-models.
//!
//! [`RoutingSupport`] is embedded in a [`Routable`](crate::Routable)
//! view-model. It owns the routing-enabled flag and announces state changes
//! on the bus so the route host can write them to the URL.

use std::cell::Cell;
use std::fmt;

use appshell_core::logging::targets;
use appshell_core::{NotificationBus, Topic};

/// Payload of `Topic::ROUTING_STATE_CHANGED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingStateChanged {
	/// Key of the unit whose state changed.
	pub routing_key: &'static str,
}

/// Routing flag plus bus glue for one routable view-model.
pub struct RoutingSupport {
	bus: NotificationBus,
	routing_key: &'static str,
	enabled: Cell<bool>,
	applying: Cell<bool>,
}

impl fmt::Debug for RoutingSupport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RoutingSupport")
			.field("routing_key", &self.routing_key)
			.field("enabled", &self.enabled.get())
			.finish()
	}
}

impl RoutingSupport {
	/// Creates support for `routing_key`.
	///
	/// Routing starts disabled; a view-model opts in with
	/// [`set_enabled`](Self::set_enabled).
	pub fn new(bus: NotificationBus, routing_key: &'static str) -> Self {
		Self {
			bus,
			routing_key,
			enabled: Cell::new(false),
			applying: Cell::new(false),
		}
	}

	/// The unit's routing key.
	pub fn routing_key(&self) -> &'static str {
		self.routing_key
	}

	/// Returns `true` if the unit takes part in routing.
	pub fn is_enabled(&self) -> bool {
		self.enabled.get()
	}

	/// Turns routing on or off.
	pub fn set_enabled(&self, enabled: bool) {
		self.enabled.set(enabled);
	}

	/// Announces that the routing state changed.
	///
	/// Nothing is published while routing is disabled or while state read
	/// from the URL is being applied. Returns `true` if published.
	pub fn routing_state_changed(&self) -> bool {
		if !self.enabled.get() || self.applying.get() {
			return false;
		}
		tracing::trace!(
			target: targets::VIEW_MODEL,
			routing_key = self.routing_key,
			"routing state changed"
		);
		self.bus.publish(
			&Topic::ROUTING_STATE_CHANGED,
			&RoutingStateChanged {
				routing_key: self.routing_key,
			},
		);
		true
	}

	/// Runs `create` only while routing is enabled.
	pub fn create_routing_state<S>(&self, create: impl FnOnce() -> S) -> Option<S> {
		self.enabled.get().then(create)
	}

	/// Applies `state` through `handle` only while routing is enabled.
	///
	/// Returns `true` if the state was applied.
	pub fn handle_routing_state<S>(&self, state: S, handle: impl FnOnce(S)) -> bool {
		if !self.enabled.get() {
			return false;
		}
		let previous = self.applying.replace(true);
		handle(state);
		self.applying.set(previous);
		true
	}
}
