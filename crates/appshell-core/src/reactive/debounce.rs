//! Trailing-edge debounce on the cooperative scheduler.
//!
//! Every [`Debouncer::push`] restarts the quiet-period timer; when the timer
//! fires only the latest value is delivered. Intermediate values are dropped,
//! never queued.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::scheduler::{Scheduler, TimerHandle};

struct DebouncerInner<T> {
	scheduler: Scheduler,
	interval: Duration,
	latest: RefCell<Option<T>>,
	timer: Cell<Option<TimerHandle>>,
	sink: Box<dyn Fn(T)>,
}

impl<T: 'static> DebouncerInner<T> {
	fn fire(&self) {
		self.timer.set(None);
		let value = self.latest.borrow_mut().take();
		if let Some(value) = value {
			// No borrow is held here: the sink may push again.
			(self.sink)(value);
		}
	}
}

/// Delivers the latest pushed value once no push happened for `interval`.
///
/// Dropping the debouncer cancels any pending delivery.
pub struct Debouncer<T: 'static> {
	inner: Rc<DebouncerInner<T>>,
}

impl<T: 'static> fmt::Debug for Debouncer<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Debouncer")
			.field("interval", &self.inner.interval)
			.field("pending", &self.is_pending())
			.finish()
	}
}

impl<T: 'static> Debouncer<T> {
	/// Creates a debouncer that hands settled values to `sink`.
	pub fn new<F>(scheduler: Scheduler, interval: Duration, sink: F) -> Self
	where
		F: Fn(T) + 'static,
	{
		Self {
			inner: Rc::new(DebouncerInner {
				scheduler,
				interval,
				latest: RefCell::new(None),
				timer: Cell::new(None),
				sink: Box::new(sink),
			}),
		}
	}

	/// Quiet period before delivery.
	pub fn interval(&self) -> Duration {
		self.inner.interval
	}

	/// Replaces the pending value and restarts the timer.
	pub fn push(&self, value: T) {
		*self.inner.latest.borrow_mut() = Some(value);
		if let Some(handle) = self.inner.timer.take() {
			self.inner.scheduler.cancel(handle);
		}

		let weak: Weak<DebouncerInner<T>> = Rc::downgrade(&self.inner);
		let handle = self.inner.scheduler.schedule(self.inner.interval, move || {
			if let Some(inner) = weak.upgrade() {
				inner.fire();
			}
		});
		self.inner.timer.set(Some(handle));
	}

	/// Returns `true` while a delivery is scheduled.
	pub fn is_pending(&self) -> bool {
		self.inner.timer.get().is_some()
	}

	/// Drops the pending value and its timer.
	pub fn cancel(&self) {
		if let Some(handle) = self.inner.timer.take() {
			self.inner.scheduler.cancel(handle);
		}
		let dropped = self.inner.latest.borrow_mut().take();
		drop(dropped);
	}
}

impl<T: 'static> Drop for Debouncer<T> {
	fn drop(&mut self) {
		self.cancel();
	}
}
