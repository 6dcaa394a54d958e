//! Disposal handles for stream subscriptions.

use std::cell::RefCell;
use std::fmt;

/// Handle that tears down a subscription when disposed or dropped.
#[must_use = "dropping a Subscription disposes it immediately"]
pub struct Subscription {
	teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Creates a subscription that runs `teardown` exactly once on disposal.
	pub fn new<F>(teardown: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			teardown: Some(Box::new(teardown)),
		}
	}

	/// A subscription with nothing to tear down.
	pub fn empty() -> Self {
		Self { teardown: None }
	}

	/// Runs the teardown. Further calls are no-ops.
	pub fn dispose(&mut self) {
		if let Some(teardown) = self.teardown.take() {
			teardown();
		}
	}

	/// Returns `true` once the teardown has run (or there never was one).
	pub fn is_disposed(&self) -> bool {
		self.teardown.is_none()
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("disposed", &self.is_disposed())
			.finish()
	}
}

/// A bag of subscriptions disposed together.
///
/// Uses interior mutability so owners holding `&self` (view-models) can add
/// subscriptions.
#[derive(Default)]
pub struct CompositeSubscription {
	subscriptions: RefCell<Vec<Subscription>>,
}

impl CompositeSubscription {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Takes ownership of `subscription` until the bag is disposed.
	pub fn add(&self, subscription: Subscription) {
		self.subscriptions.borrow_mut().push(subscription);
	}

	/// Number of live subscriptions held.
	pub fn len(&self) -> usize {
		self.subscriptions.borrow().len()
	}

	/// Returns `true` if the bag holds nothing.
	pub fn is_empty(&self) -> bool {
		self.subscriptions.borrow().is_empty()
	}

	/// Disposes every held subscription, in insertion order.
	pub fn dispose(&self) {
		let drained: Vec<Subscription> = self.subscriptions.borrow_mut().drain(..).collect();
		for mut subscription in drained {
			subscription.dispose();
		}
	}
}

impl fmt::Debug for CompositeSubscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CompositeSubscription")
			.field("len", &self.len())
			.finish()
	}
}
