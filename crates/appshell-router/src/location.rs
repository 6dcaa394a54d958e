//! Hash locations
//!
//! A [`HashLocation`] is where the route manager reads and writes the URL
//! hash, and where navigation change events come from.
//!
//! - [`MemoryLocation`]: in-memory hash for tests and headless hosts. Like a
//!   browser, it only announces a change when the hash actually changes, and
//!   announces it asynchronously on the [`Scheduler`].
//! - `BrowserLocation` (wasm32 only): `window.location.hash` and the
//!   `hashchange` event.

#[cfg(target_arch = "wasm32")]
mod browser;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use appshell_core::logging::targets;
use appshell_core::{Observable, Scheduler, Subject};

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserClock, BrowserLocation};

/// Number of recent writes a [`MemoryLocation`] remembers.
pub const WRITE_HISTORY_LIMIT: usize = 64;

/// Source and sink of the URL hash.
pub trait HashLocation {
	/// The current hash, including its leading `#` (empty when there is none).
	fn hash(&self) -> String;

	/// Replaces the hash. `hash` may omit the leading `#`.
	fn set_hash(&self, hash: &str);

	/// Stream of the hash after every change.
	fn changes(&self) -> Observable<String>;
}

struct MemoryLocationInner {
	scheduler: Scheduler,
	hash: RefCell<String>,
	changes: Subject<String>,
	writes: RefCell<VecDeque<String>>,
	write_count: Cell<usize>,
}

/// In-memory [`HashLocation`].
///
/// Cloning yields another handle to the same location.
#[derive(Clone)]
pub struct MemoryLocation {
	inner: Rc<MemoryLocationInner>,
}

impl fmt::Debug for MemoryLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryLocation")
			.field("hash", &*self.inner.hash.borrow())
			.field("writes", &self.inner.write_count.get())
			.finish()
	}
}

impl MemoryLocation {
	/// Creates a location showing `initial`.
	pub fn new(scheduler: Scheduler, initial: &str) -> Self {
		Self {
			inner: Rc::new(MemoryLocationInner {
				scheduler,
				hash: RefCell::new(with_marker(initial)),
				changes: Subject::new(),
				writes: RefCell::new(VecDeque::with_capacity(WRITE_HISTORY_LIMIT)),
				write_count: Cell::new(0),
			}),
		}
	}

	/// The last [`WRITE_HISTORY_LIMIT`] hashes passed to
	/// [`HashLocation::set_hash`], oldest first.
	pub fn writes(&self) -> Vec<String> {
		self.inner.writes.borrow().iter().cloned().collect()
	}

	/// Number of [`HashLocation::set_hash`] calls since creation or the last
	/// [`clear_writes`](Self::clear_writes).
	pub fn write_count(&self) -> usize {
		self.inner.write_count.get()
	}

	/// Forgets the recorded writes and resets the count.
	pub fn clear_writes(&self) {
		self.inner.writes.borrow_mut().clear();
		self.inner.write_count.set(0);
	}

	fn record_write(&self, hash: &str) {
		let mut writes = self.inner.writes.borrow_mut();
		if writes.len() == WRITE_HISTORY_LIMIT {
			writes.pop_front();
		}
		writes.push_back(hash.to_string());
		self.inner.write_count.set(self.inner.write_count.get() + 1);
	}
}

impl HashLocation for MemoryLocation {
	fn hash(&self) -> String {
		self.inner.hash.borrow().clone()
	}

	fn set_hash(&self, hash: &str) {
		let hash = with_marker(hash);
		self.record_write(&hash);

		let previous = self.inner.hash.replace(hash.clone());
		if previous == hash {
			tracing::trace!(target: targets::ROUTER, hash = %hash, "hash unchanged");
			return;
		}

		let inner = Rc::downgrade(&self.inner);
		self.inner.scheduler.defer(move || {
			if let Some(inner) = inner.upgrade() {
				let current = inner.hash.borrow().clone();
				inner.changes.next(current);
			}
		});
	}

	fn changes(&self) -> Observable<String> {
		self.inner.changes.as_observable()
	}
}

/// Prefixes a non-empty hash with `#`.
fn with_marker(hash: &str) -> String {
	if hash.is_empty() || hash.starts_with('#') {
		hash.to_string()
	} else {
		format!("#{hash}")
	}
}
