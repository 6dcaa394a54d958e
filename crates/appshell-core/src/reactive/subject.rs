//! Subject and Observable
//!
//! `Subject<T>` is a multicast stream: every emission is delivered to every
//! observer registered at the time of the emission. Errors travel through the
//! same channel as values ([`Emission`]) and never terminate the stream.
//!
//! ## Example
//!
//! ```
//! use appshell_core::reactive::Subject;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let subject = Subject::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = seen.clone();
//! let subscription = subject.subscribe_next(move |value: &i32| sink.borrow_mut().push(*value));
//!
//! subject.next(1);
//! drop(subscription);
//! subject.next(2);
//!
//! assert_eq!(*seen.borrow(), vec![1]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::subscription::Subscription;
use crate::error::ShellError;

/// A single item flowing through a stream.
pub type Emission<T> = Result<T, ShellError>;

type ObserverFn<T> = Rc<dyn Fn(&Emission<T>)>;

struct ObserverSlot<T> {
	id: u64,
	active: Rc<Cell<bool>>,
	callback: ObserverFn<T>,
}

struct SubjectInner<T> {
	observers: RefCell<Vec<ObserverSlot<T>>>,
	next_id: Cell<u64>,
}

/// Multicast stream that values and errors can be pushed into.
///
/// Cloning a `Subject` yields another handle to the same observer list.
pub struct Subject<T: 'static> {
	inner: Rc<SubjectInner<T>>,
}

impl<T: 'static> Clone for Subject<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T: 'static> Default for Subject<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: 'static> fmt::Debug for Subject<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subject")
			.field("observers", &self.observer_count())
			.finish()
	}
}

impl<T: 'static> Subject<T> {
	/// Creates a subject with no observers.
	pub fn new() -> Self {
		Self {
			inner: Rc::new(SubjectInner {
				observers: RefCell::new(Vec::new()),
				next_id: Cell::new(0),
			}),
		}
	}

	/// Emits a value.
	pub fn next(&self, value: T) {
		self.emit(Ok(value));
	}

	/// Emits an error. Observers stay subscribed.
	pub fn error(&self, error: ShellError) {
		self.emit(Err(error));
	}

	/// Delivers `emission` to every currently active observer.
	///
	/// Observers added during delivery do not see this emission; observers
	/// disposed during delivery are skipped.
	pub fn emit(&self, emission: Emission<T>) {
		let snapshot: Vec<(Rc<Cell<bool>>, ObserverFn<T>)> = self
			.inner
			.observers
			.borrow()
			.iter()
			.map(|slot| (slot.active.clone(), slot.callback.clone()))
			.collect();

		for (active, callback) in snapshot {
			if active.get() {
				callback(&emission);
			}
		}
	}

	/// Registers an observer for values and errors.
	pub fn subscribe<F>(&self, observer: F) -> Subscription
	where
		F: Fn(&Emission<T>) + 'static,
	{
		let id = self.inner.next_id.get();
		self.inner.next_id.set(id + 1);
		let active = Rc::new(Cell::new(true));

		self.inner.observers.borrow_mut().push(ObserverSlot {
			id,
			active: active.clone(),
			callback: Rc::new(observer),
		});

		let weak: Weak<SubjectInner<T>> = Rc::downgrade(&self.inner);
		Subscription::new(move || {
			active.set(false);
			if let Some(inner) = weak.upgrade() {
				// Released outside the borrow: the callback's captures may
				// own subscriptions to this same subject.
				let removed = {
					let mut observers = inner.observers.borrow_mut();
					observers
						.iter()
						.position(|slot| slot.id == id)
						.map(|index| observers.remove(index))
				};
				drop(removed);
			}
		})
	}

	/// Registers an observer for values only; errors are ignored.
	pub fn subscribe_next<F>(&self, observer: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		self.subscribe(move |emission| {
			if let Ok(value) = emission {
				observer(value);
			}
		})
	}

	/// Number of registered observers.
	pub fn observer_count(&self) -> usize {
		self.inner.observers.borrow().len()
	}

	/// Returns the subscribe-only face of this subject.
	pub fn as_observable(&self) -> Observable<T> {
		Observable {
			subject: self.clone(),
		}
	}
}

/// Subscribe-only handle to a [`Subject`].
pub struct Observable<T: 'static> {
	subject: Subject<T>,
}

impl<T: 'static> Clone for Observable<T> {
	fn clone(&self) -> Self {
		Self {
			subject: self.subject.clone(),
		}
	}
}

impl<T: 'static> fmt::Debug for Observable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observable")
			.field("observers", &self.subject.observer_count())
			.finish()
	}
}

impl<T: 'static> From<&Subject<T>> for Observable<T> {
	fn from(subject: &Subject<T>) -> Self {
		subject.as_observable()
	}
}

impl<T: 'static> Observable<T> {
	/// See [`Subject::subscribe`].
	pub fn subscribe<F>(&self, observer: F) -> Subscription
	where
		F: Fn(&Emission<T>) + 'static,
	{
		self.subject.subscribe(observer)
	}

	/// See [`Subject::subscribe_next`].
	pub fn subscribe_next<F>(&self, observer: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		self.subject.subscribe_next(observer)
	}

	/// Number of observers registered on the underlying subject.
	pub fn observer_count(&self) -> usize {
		self.subject.observer_count()
	}
}
