//! View-model lifecycle contract
//!
//! Lifecycle hooks are split into capability traits with no-op defaults:
//!
//! | Trait | Hooks |
//! |-------|-------|
//! | [`Initializable`] | `initialize` |
//! | [`Cleanable`] | `cleanup` |
//! | [`ViewModel`] | `loaded`, `updated`, `state_changed`, `alert_for_error` |
//! | [`Routable`] | routing key, typed routing state |
//!
//! The binding runtime calls the hooks in this order:
//!
//! ```text
//! initialize → (first render) → loaded → (re-render → updated)* → cleanup
//! ```
//!
//! [`RoutableUnit`] is the object-safe face of [`Routable`] used by the route
//! table and the route host; every `Routable` type implements it.

use appshell_core::logging::targets;
use appshell_core::{Observable, ShellError};
use appshell_router::Route;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::routable::RoutingSupport;

/// Runs once before the first render.
pub trait Initializable {
	/// Sets up subscriptions and initial state.
	fn initialize(&self) {}
}

/// Runs once when the unit is torn down or superseded.
pub trait Cleanable {
	/// Releases what `initialize` acquired.
	fn cleanup(&self) {}
}

/// State behind a view.
pub trait ViewModel: Initializable + Cleanable {
	/// Name shown in alert headers and logs.
	fn display_name(&self) -> &str;

	/// Called after the first render.
	fn loaded(&self) {}

	/// Called after every re-render.
	fn updated(&self) {}

	/// Pulses whenever the view should re-render; errors become alerts.
	fn state_changed(&self) -> Observable<()>;

	/// Presents `error` to the user.
	fn alert_for_error(&self, error: &ShellError);
}

/// A view-model that keeps part of its state in the URL.
pub trait Routable: ViewModel {
	/// The route-scoped state.
	type State: Serialize + DeserializeOwned;

	/// Identifies the unit on `Topic::ROUTING_STATE_CHANGED`.
	const ROUTING_KEY: &'static str;

	/// The unit's routing flag and bus access.
	fn routing(&self) -> &RoutingSupport;

	/// Snapshot of the state to put in the URL.
	fn create_routing_state(&self) -> Self::State;

	/// Applies state read from the URL.
	fn handle_routing_state(&self, state: Self::State);

	/// Called with every route that resolves to this unit.
	fn route_activated(&self, _route: &Route) {}
}

/// Object-safe view of a [`Routable`] unit.
pub trait RoutableUnit: ViewModel {
	/// See [`Routable::ROUTING_KEY`].
	fn routing_key(&self) -> &'static str;

	/// Whether the unit currently takes part in routing.
	fn routing_enabled(&self) -> bool;

	/// The routing state as JSON, `None` when routing is disabled.
	fn routing_state(&self) -> Option<Value>;

	/// Hands `route` to the unit, applying its state if it fits.
	fn accept_route(&self, route: &Route);
}

impl<T: Routable> RoutableUnit for T {
	fn routing_key(&self) -> &'static str {
		T::ROUTING_KEY
	}

	fn routing_enabled(&self) -> bool {
		self.routing().is_enabled()
	}

	fn routing_state(&self) -> Option<Value> {
		let state = self.routing().create_routing_state(|| self.create_routing_state())?;
		serde_json::to_value(state)
			.inspect_err(|err| {
				tracing::debug!(
					target: targets::VIEW_MODEL,
					routing_key = T::ROUTING_KEY,
					error = %err,
					"cannot serialize routing state"
				);
			})
			.ok()
	}

	fn accept_route(&self, route: &Route) {
		self.route_activated(route);

		let Some(state) = &route.state else {
			return;
		};
		match serde_json::from_value::<T::State>(state.clone()) {
			Ok(state) => {
				self.routing()
					.handle_routing_state(state, |state| self.handle_routing_state(state));
			}
			Err(err) => {
				tracing::trace!(
					target: targets::VIEW_MODEL,
					routing_key = T::ROUTING_KEY,
					error = %err,
					"route state does not fit the unit, ignoring it"
				);
			}
		}
	}
}
