//! Route manager
//!
//! Owns the current [`Route`] and keeps it in sync with a [`HashLocation`].
//!
//! ## Flow
//!
//! 1. The location's change events (and its hash at construction time) are
//!    debounced; only the latest hash of a quiet period is decoded.
//! 2. A decoded route whose canonical hash differs from the raw hash is not
//!    published. The manager writes the canonical hash instead, which causes
//!    a new change event.
//! 3. Canonical routes are stored in [`RouteManager::current_route`].
//!
//! [`RouteManager::navigate_to`] goes the other way: it resolves and encodes a
//! path plus optional state and writes the result to the location.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use appshell_core::logging::targets;
use appshell_core::{Debouncer, Observable, Property, RouterSettings, Scheduler, Subscription};
use serde::Serialize;
use serde_json::Value;

use crate::codec::HashCodec;
use crate::location::HashLocation;
use crate::path;
use crate::route::Route;

/// Key inside a navigation state payload that may carry the target path.
pub const ROUTE_STATE_KEY: &str = "route";

struct ManagerInner {
	location: Rc<dyn HashLocation>,
	codec: HashCodec,
	uri_encode: bool,
	current_route: Property<Option<Route>>,
	debouncer: RefCell<Option<Debouncer<String>>>,
	subscription: RefCell<Option<Subscription>>,
	corrections: Cell<usize>,
}

impl ManagerInner {
	fn handle_hash(&self, raw: String) {
		let route = self.codec.decode(&raw);
		let canonical = self.codec.canonical_hash(&route);

		if canonical != raw {
			self.corrections.set(self.corrections.get() + 1);
			tracing::debug!(
				target: targets::ROUTER,
				hash = %raw,
				canonical = %canonical,
				"correcting non-canonical hash"
			);
			self.navigate_to(&route.path, route.state, self.uri_encode);
			return;
		}

		tracing::debug!(target: targets::ROUTER, path = %route.path, "route changed");
		self.current_route.set(Some(route));
	}

	fn navigate_to(&self, path: &str, state: Option<Value>, uri_encode: bool) -> Option<String> {
		let (requested, state) = take_route_path(path, state);
		let path = requested.strip_prefix('#').unwrap_or(&requested);
		if path.is_empty() {
			tracing::debug!(target: targets::ROUTER, "ignoring navigation to an empty path");
			return None;
		}

		let target = if path::is_absolute(path) {
			path::normalize(path)
		} else {
			let current = self.codec.decode(&self.location.hash());
			path::resolve(&current.path, path)
		};

		let hash = self.codec.encode(&target, state.as_ref(), uri_encode);
		tracing::debug!(target: targets::ROUTER, hash = %hash, "navigating");
		self.location.set_hash(&hash);
		Some(hash)
	}
}

/// Splits a `route.path` override out of `state`.
///
/// Returns the effective path and the state without its `route` entry.
fn take_route_path(path: &str, state: Option<Value>) -> (String, Option<Value>) {
	let Some(Value::Object(mut map)) = state else {
		return (path.to_string(), state);
	};

	let route_path = map
		.get(ROUTE_STATE_KEY)
		.and_then(|route| route.get("path"))
		.and_then(Value::as_str)
		.filter(|route_path| !route_path.is_empty())
		.map(str::to_string);

	match route_path {
		Some(route_path) => {
			map.remove(ROUTE_STATE_KEY);
			(route_path, Some(Value::Object(map)))
		}
		None => (path.to_string(), Some(Value::Object(map))),
	}
}

/// Current route plus navigation, backed by a [`HashLocation`].
///
/// Cloning yields another handle to the same manager.
#[derive(Clone)]
pub struct RouteManager {
	inner: Rc<ManagerInner>,
}

impl fmt::Debug for RouteManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteManager")
			.field("current_route", &self.route())
			.field("corrections", &self.corrections())
			.field("disposed", &self.is_disposed())
			.finish()
	}
}

impl RouteManager {
	/// Starts managing `location`.
	///
	/// The location's current hash is queued as the first value, so a route
	/// is published after the first debounce interval even without events.
	pub fn new(location: Rc<dyn HashLocation>, scheduler: Scheduler, settings: &RouterSettings) -> Self {
		Self::with_codec(location, scheduler, HashCodec::new(), settings)
	}

	/// Like [`new`](Self::new) with an explicit codec.
	pub fn with_codec(
		location: Rc<dyn HashLocation>,
		scheduler: Scheduler,
		codec: HashCodec,
		settings: &RouterSettings,
	) -> Self {
		let inner = Rc::new(ManagerInner {
			location,
			codec,
			uri_encode: settings.uri_encode,
			current_route: Property::new(None),
			debouncer: RefCell::new(None),
			subscription: RefCell::new(None),
			corrections: Cell::new(0),
		});

		let weak: Weak<ManagerInner> = Rc::downgrade(&inner);
		let debouncer = Debouncer::new(scheduler, settings.debounce(), move |raw: String| {
			if let Some(inner) = weak.upgrade() {
				inner.handle_hash(raw);
			}
		});
		debouncer.push(inner.location.hash());
		*inner.debouncer.borrow_mut() = Some(debouncer);

		let weak: Weak<ManagerInner> = Rc::downgrade(&inner);
		let subscription = inner.location.changes().subscribe_next(move |raw: &String| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			if let Some(debouncer) = inner.debouncer.borrow().as_ref() {
				debouncer.push(raw.clone());
			}
		});
		*inner.subscription.borrow_mut() = Some(subscription);

		Self { inner }
	}

	/// The current route as a reactive value; `None` until the first route.
	pub fn current_route(&self) -> Property<Option<Route>> {
		self.inner.current_route.clone()
	}

	/// Snapshot of the current route.
	pub fn route(&self) -> Option<Route> {
		self.inner.current_route.get()
	}

	/// Stream of every route published after subscription.
	pub fn route_changes(&self) -> Observable<Option<Route>> {
		self.inner.current_route.changed()
	}

	/// Navigates to `path` with an optional state payload.
	///
	/// - `state.route.path`, when a non-empty string, replaces `path` and the
	///   `route` entry is removed from the payload.
	/// - A leading `#` is ignored; an empty path does nothing.
	/// - Relative paths resolve against the directory of the current path.
	///
	/// Returns the written hash (without `#`), or `None` for a no-op.
	pub fn navigate_to(&self, path: &str, state: Option<Value>, uri_encode: bool) -> Option<String> {
		self.inner.navigate_to(path, state, uri_encode)
	}

	/// Navigates to `path` without state, using the configured encoding.
	pub fn navigate(&self, path: &str) -> Option<String> {
		self.inner.navigate_to(path, None, self.inner.uri_encode)
	}

	/// Navigates to `path` with any serializable state.
	///
	/// State that cannot be serialized is dropped; navigation still happens.
	pub fn navigate_with_state<S: Serialize>(&self, path: &str, state: &S) -> Option<String> {
		let state = serde_json::to_value(state)
			.inspect_err(|err| {
				tracing::debug!(
					target: targets::ROUTER,
					error = %err,
					"dropping unserializable navigation state"
				);
			})
			.ok();
		self.inner.navigate_to(path, state, self.inner.uri_encode)
	}

	/// Number of corrective writes issued for non-canonical hashes.
	pub fn corrections(&self) -> usize {
		self.inner.corrections.get()
	}

	/// The managed location.
	pub fn location(&self) -> Rc<dyn HashLocation> {
		self.inner.location.clone()
	}

	/// Stops listening to the location and drops any pending hash.
	///
	/// The last route stays readable. Calling this twice is harmless.
	pub fn dispose(&self) {
		let subscription = self.inner.subscription.borrow_mut().take();
		drop(subscription);
		let debouncer = self.inner.debouncer.borrow_mut().take();
		drop(debouncer);
	}

	/// Returns `true` after [`dispose`](Self::dispose).
	pub fn is_disposed(&self) -> bool {
		self.inner.subscription.borrow().is_none()
	}
}
