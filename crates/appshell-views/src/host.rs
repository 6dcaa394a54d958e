//! Route host
//!
//! The routing container: it turns the route manager's current route into an
//! active [`RoutableUnit`].
//!
//! For every published route the host:
//!
//! 1. resolves the path through its [`RouteTable`], following redirect
//!    entries (at most [`MAX_REDIRECT_DEPTH`] hops; a redirected path is
//!    written back to the URL and resolved when it comes back),
//! 2. reuses the active unit when the route resolves to the same table
//!    entry, otherwise calls the entry's activator,
//! 3. hands the route (and its state) to the unit,
//! 4. on a miss, runs the fallback once per missed route. The default
//!    fallback navigates to `RouterSettings::default_route`.
//!
//! Units announce routing state changes on `Topic::ROUTING_STATE_CHANGED`;
//! the host writes the active unit's state into the URL.
//!
//! Superseded units get their `cleanup` hook from the host, unless a view
//! binding is [attached](RouteHost::attach), in which case the binding owns
//! the unit lifecycle.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use appshell_core::logging::targets;
use appshell_core::{
	BusSubscription, NotificationBus, Observable, Property, RouterSettings, Subscription, Topic,
};
use appshell_router::{Activator, Route, RouteManager, RouteTable, RouteTarget, path};

use crate::binding::{View, ViewBinding};
use crate::lifecycle::RoutableUnit;
use crate::routable::RoutingStateChanged;

/// Maximum number of redirect entries followed for one route.
pub const MAX_REDIRECT_DEPTH: usize = 5;

/// Shared handle to an activated unit.
pub type UnitRef = Rc<dyn RoutableUnit>;

/// Wraps `unit` for use as an activator result.
pub fn unit<T: RoutableUnit + 'static>(unit: T) -> UnitRef {
	Rc::new(unit)
}

type Fallback = Rc<dyn Fn(&Route)>;
type Presenter = Rc<dyn Fn(UnitRef)>;

struct HostInner {
	manager: RouteManager,
	table: RouteTable<UnitRef>,
	uri_encode: bool,
	default_route: Option<String>,
	active: Property<Option<UnitRef>>,
	active_key: RefCell<Option<String>>,
	handled_miss: RefCell<Option<String>>,
	fallback: RefCell<Option<Fallback>>,
	presenter: RefCell<Option<Presenter>>,
	route_subscription: RefCell<Option<Subscription>>,
	bus_subscription: RefCell<Option<BusSubscription>>,
}

impl HostInner {
	fn handle_route(&self, route: Route) {
		let mut target = route.path.clone();
		let mut hops = 0;

		let (key, activator, captures) = loop {
			let Some(resolution) = self.table.resolve(&target) else {
				return self.handle_miss(&route);
			};
			match resolution.target {
				RouteTarget::Redirect(to) => {
					hops += 1;
					if hops > MAX_REDIRECT_DEPTH {
						tracing::warn!(
							target: targets::ROUTING,
							path = %route.path,
							hops,
							"too many redirects, giving up"
						);
						return;
					}
					target = path::resolve(&target, to);
				}
				RouteTarget::Activate(activator) => {
					break (resolution.key.to_string(), activator.clone(), resolution.captures);
				}
			}
		};

		if target != route.path {
			tracing::debug!(
				target: targets::ROUTING,
				from = %route.path,
				to = %target,
				"redirecting"
			);
			self.manager.navigate_to(&target, route.state.clone(), self.uri_encode);
			return;
		}

		self.handled_miss.replace(None);
		let mut route = route;
		if let Some(captures) = captures {
			route.matches = Some(captures);
		}
		self.present(key, route, activator);
	}

	fn present(&self, key: String, route: Route, activator: Activator<UnitRef>) {
		let reusable = self.active_key.borrow().as_deref() == Some(key.as_str());
		if reusable && let Some(unit) = self.active.get() {
			tracing::trace!(target: targets::ROUTING, key = %key, "reusing active unit");
			unit.accept_route(&route);
			return;
		}

		let unit = activator(&route);
		tracing::debug!(
			target: targets::ROUTING,
			key = %key,
			display_name = unit.display_name(),
			"activated unit"
		);
		unit.accept_route(&route);

		self.active_key.replace(Some(key));
		let previous = self.active.get();
		self.active.set(Some(unit.clone()));

		let presenter = self.presenter.borrow().clone();
		match presenter {
			Some(present) => present(unit),
			None => {
				if let Some(previous) = previous {
					previous.cleanup();
				}
			}
		}
	}

	fn handle_miss(&self, route: &Route) {
		let hash = route.canonical_hash();
		if self.handled_miss.borrow().as_deref() == Some(hash.as_str()) {
			tracing::trace!(target: targets::ROUTING, path = %route.path, "miss already handled");
			return;
		}
		self.handled_miss.replace(Some(hash));

		tracing::debug!(target: targets::ROUTING, path = %route.path, "no route matches");
		let fallback = self.fallback.borrow().clone();
		match (fallback, &self.default_route) {
			(Some(fallback), _) => fallback(route),
			(None, Some(default_route)) => {
				self.manager.navigate_to(default_route, None, self.uri_encode);
			}
			(None, None) => {
				tracing::debug!(target: targets::ROUTING, "no default route configured");
			}
		}
	}

	fn write_routing_state(&self, changed: &RoutingStateChanged) {
		let Some(unit) = self.active.get() else {
			return;
		};
		if unit.routing_key() != changed.routing_key || !unit.routing_enabled() {
			return;
		}
		let Some(route) = self.manager.route() else {
			return;
		};
		let state = unit.routing_state();
		self.manager.navigate_to(&route.path, state, self.uri_encode);
	}
}

/// Routing container driving the active unit from the current route.
///
/// Cloning yields another handle to the same host.
#[derive(Clone)]
pub struct RouteHost {
	inner: Rc<HostInner>,
}

impl fmt::Debug for RouteHost {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteHost")
			.field("table", &self.inner.table)
			.field("active_key", &*self.inner.active_key.borrow())
			.finish()
	}
}

impl RouteHost {
	/// Starts hosting routes from `manager`.
	///
	/// A route already published by the manager is handled immediately.
	pub fn new(
		manager: RouteManager,
		bus: &NotificationBus,
		table: RouteTable<UnitRef>,
		settings: &RouterSettings,
	) -> Self {
		let inner = Rc::new(HostInner {
			manager,
			table,
			uri_encode: settings.uri_encode,
			default_route: settings.default_route.clone(),
			active: Property::new(None),
			active_key: RefCell::new(None),
			handled_miss: RefCell::new(None),
			fallback: RefCell::new(None),
			presenter: RefCell::new(None),
			route_subscription: RefCell::new(None),
			bus_subscription: RefCell::new(None),
		});

		let weak: Weak<HostInner> = Rc::downgrade(&inner);
		let routes = inner.manager.route_changes().subscribe_next(move |route: &Option<Route>| {
			if let Some(inner) = weak.upgrade()
				&& let Some(route) = route
			{
				inner.handle_route(route.clone());
			}
		});
		inner.route_subscription.replace(Some(routes));

		let weak: Weak<HostInner> = Rc::downgrade(&inner);
		let states = bus.subscribe(Topic::ROUTING_STATE_CHANGED, move |changed: &RoutingStateChanged| {
			if let Some(inner) = weak.upgrade() {
				inner.write_routing_state(changed);
			}
		});
		inner.bus_subscription.replace(Some(states));

		if let Some(route) = inner.manager.route() {
			inner.handle_route(route);
		}

		Self { inner }
	}

	/// Replaces the miss policy. `fallback` runs once per missed route.
	pub fn set_fallback<F>(&self, fallback: F)
	where
		F: Fn(&Route) + 'static,
	{
		self.inner.fallback.replace(Some(Rc::new(fallback)));
	}

	/// Hands every newly activated unit to `binding`.
	///
	/// The binding then owns the unit lifecycle: rebinding cleans up the
	/// superseded unit. The current unit, if any, is bound immediately.
	pub fn attach<V>(&self, binding: ViewBinding<V>)
	where
		V: View<Model = dyn RoutableUnit>,
	{
		let presenter = binding.clone();
		self.inner
			.presenter
			.replace(Some(Rc::new(move |unit: UnitRef| presenter.bind(unit))));
		if let Some(unit) = self.inner.active.get() {
			binding.bind(unit);
		}
	}

	/// The active unit.
	pub fn active_unit(&self) -> Option<UnitRef> {
		self.inner.active.get()
	}

	/// Stream of active unit changes.
	pub fn active_units(&self) -> Observable<Option<UnitRef>> {
		self.inner.active.changed()
	}

	/// Table key the active unit was activated for.
	pub fn active_key(&self) -> Option<String> {
		self.inner.active_key.borrow().clone()
	}

	/// The route manager this host follows.
	pub fn manager(&self) -> &RouteManager {
		&self.inner.manager
	}

	/// The route table.
	pub fn table(&self) -> &RouteTable<UnitRef> {
		&self.inner.table
	}

	/// Stops following routes and routing state.
	///
	/// Without an attached binding, the active unit is cleaned up.
	pub fn dispose(&self) {
		let routes = self.inner.route_subscription.borrow_mut().take();
		drop(routes);
		let states = self.inner.bus_subscription.borrow_mut().take();
		drop(states);

		if self.inner.presenter.borrow().is_none()
			&& let Some(unit) = self.inner.active.get()
		{
			unit.cleanup();
		}
	}
}
