//! `window.location.hash` backed location and a wall-clock scheduler driver.

use std::fmt;

use appshell_core::logging::targets;
use appshell_core::{Observable, Scheduler, Subject};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::HashLocation;

const HASH_CHANGE_EVENT: &str = "hashchange";

/// The browser's location hash.
///
/// Removes its `hashchange` listener when dropped.
pub struct BrowserLocation {
	window: web_sys::Window,
	changes: Subject<String>,
	listener: Closure<dyn FnMut(web_sys::Event)>,
}

impl fmt::Debug for BrowserLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BrowserLocation")
			.field("hash", &self.hash())
			.finish()
	}
}

impl BrowserLocation {
	/// Attaches to the global window.
	///
	/// Returns `None` outside a browser window context.
	pub fn new() -> Option<Self> {
		let window = web_sys::window()?;
		let changes = Subject::new();

		let source = window.clone();
		let sink = changes.clone();
		let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
			sink.next(source.location().hash().unwrap_or_default());
		});

		if let Err(err) = window
			.add_event_listener_with_callback(HASH_CHANGE_EVENT, listener.as_ref().unchecked_ref())
		{
			tracing::warn!(target: targets::ROUTER, error = ?err, "cannot listen to hashchange");
			return None;
		}

		Some(Self {
			window,
			changes,
			listener,
		})
	}
}

impl HashLocation for BrowserLocation {
	fn hash(&self) -> String {
		self.window.location().hash().unwrap_or_default()
	}

	fn set_hash(&self, hash: &str) {
		if let Err(err) = self.window.location().set_hash(hash) {
			tracing::warn!(target: targets::ROUTER, hash, error = ?err, "cannot write hash");
		}
	}

	fn changes(&self) -> Observable<String> {
		self.changes.as_observable()
	}
}

impl Drop for BrowserLocation {
	fn drop(&mut self) {
		let _ = self.window.remove_event_listener_with_callback(
			HASH_CHANGE_EVENT,
			self.listener.as_ref().unchecked_ref(),
		);
	}
}

/// Drives a [`Scheduler`] from the browser clock on a fixed interval.
///
/// Stops when dropped.
pub struct BrowserClock {
	window: web_sys::Window,
	interval_id: i32,
	_tick: Closure<dyn FnMut()>,
}

impl fmt::Debug for BrowserClock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BrowserClock")
			.field("interval_id", &self.interval_id)
			.finish()
	}
}

impl BrowserClock {
	/// Advances `scheduler` by the elapsed wall time every `period_ms`.
	pub fn start(scheduler: Scheduler, period_ms: i32) -> Option<Self> {
		let window = web_sys::window()?;
		let origin = js_sys::Date::now();

		let tick = Closure::<dyn FnMut()>::new(move || {
			let elapsed_ms = (js_sys::Date::now() - origin).max(0.0);
			scheduler.advance_to(std::time::Duration::from_secs_f64(elapsed_ms / 1000.0));
		});

		let interval_id = window
			.set_interval_with_callback_and_timeout_and_arguments_0(
				tick.as_ref().unchecked_ref(),
				period_ms,
			)
			.inspect_err(|err| {
				tracing::warn!(target: targets::SCHEDULER, error = ?err, "cannot start clock");
			})
			.ok()?;

		Some(Self {
			window,
			interval_id,
			_tick: tick,
		})
	}
}

impl Drop for BrowserClock {
	fn drop(&mut self) {
		self.window.clear_interval_with_handle(self.interval_id);
	}
}
