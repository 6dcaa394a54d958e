//! Shared view-model plumbing.
//!
//! [`ViewModelBase`] is meant to be embedded in concrete view-models. It
//! provides the state-changed stream, a bag for subscriptions the view-model
//! owns, and the default alert behavior (log + publish on
//! `Topic::ALERT_CREATED`).
//!
//! ```
//! use appshell_core::{NotificationBus, Observable, ShellError};
//! use appshell_views::{Cleanable, Initializable, ViewModel, ViewModelBase};
//!
//! struct Counter {
//! 	base: ViewModelBase,
//! }
//!
//! impl Initializable for Counter {}
//!
//! impl Cleanable for Counter {
//! 	fn cleanup(&self) {
//! 		self.base.cleanup();
//! 	}
//! }
//!
//! impl ViewModel for Counter {
//! 	fn display_name(&self) -> &str {
//! 		self.base.display_name()
//! 	}
//!
//! 	fn state_changed(&self) -> Observable<()> {
//! 		self.base.state_changed()
//! 	}
//!
//! 	fn alert_for_error(&self, error: &ShellError) {
//! 		self.base.alert_for_error(error);
//! 	}
//! }
//!
//! let counter = Counter { base: ViewModelBase::new("Counter", NotificationBus::new()) };
//! assert_eq!(counter.display_name(), "Counter");
//! ```

use std::cell::Cell;
use std::fmt;

use appshell_core::logging::targets;
use appshell_core::{
	CompositeSubscription, NotificationBus, Observable, ShellError, Subject, Subscription, Topic,
};

use crate::alert::Alert;

/// Display name, state stream, owned subscriptions and alerting.
pub struct ViewModelBase {
	display_name: &'static str,
	bus: NotificationBus,
	state_changed: Subject<()>,
	subscriptions: CompositeSubscription,
	cleaned: Cell<bool>,
}

impl fmt::Debug for ViewModelBase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewModelBase")
			.field("display_name", &self.display_name)
			.field("subscriptions", &self.subscriptions.len())
			.field("cleaned", &self.cleaned.get())
			.finish()
	}
}

impl ViewModelBase {
	/// Creates the base for a view-model named `display_name`.
	pub fn new(display_name: &'static str, bus: NotificationBus) -> Self {
		Self {
			display_name,
			bus,
			state_changed: Subject::new(),
			subscriptions: CompositeSubscription::new(),
			cleaned: Cell::new(false),
		}
	}

	/// The view-model's display name.
	pub fn display_name(&self) -> &'static str {
		self.display_name
	}

	/// The bus alerts are published on.
	pub fn bus(&self) -> &NotificationBus {
		&self.bus
	}

	/// Stream the binding runtime re-renders on.
	pub fn state_changed(&self) -> Observable<()> {
		self.state_changed.as_observable()
	}

	/// Requests a re-render.
	pub fn notify_state_changed(&self) {
		self.state_changed.next(());
	}

	/// Reports `error` through the state stream; the binding turns it into
	/// an alert.
	pub fn raise(&self, error: ShellError) {
		self.state_changed.error(error);
	}

	/// Keeps `subscription` alive until [`cleanup`](Self::cleanup).
	pub fn own(&self, subscription: Subscription) {
		self.subscriptions.add(subscription);
	}

	/// Number of subscriptions currently owned.
	pub fn owned_subscriptions(&self) -> usize {
		self.subscriptions.len()
	}

	/// Disposes owned subscriptions. Later calls do nothing.
	pub fn cleanup(&self) {
		if self.cleaned.replace(true) {
			tracing::trace!(
				target: targets::VIEW_MODEL,
				display_name = self.display_name,
				"already cleaned up"
			);
			return;
		}
		self.subscriptions.dispose();
	}

	/// Returns `true` after [`cleanup`](Self::cleanup).
	pub fn is_cleaned(&self) -> bool {
		self.cleaned.get()
	}

	/// Logs `error` and publishes it as a danger [`Alert`].
	pub fn alert_for_error(&self, error: &ShellError) -> Alert {
		tracing::warn!(
			target: targets::VIEW_MODEL,
			display_name = self.display_name,
			error = %error,
			"view-model error"
		);
		let alert = Alert::from_error(self.display_name, error);
		self.bus.publish(&Topic::ALERT_CREATED, &alert);
		alert
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::alert::AlertKind;
	use rstest::rstest;
	use std::cell::RefCell;
	use std::rc::Rc;

	#[rstest]
	fn test_alert_is_published_on_bus() {
		// Arrange
		let bus = NotificationBus::new();
		let alerts = Rc::new(RefCell::new(Vec::new()));
		let sink = alerts.clone();
		let _handle = bus.subscribe(Topic::ALERT_CREATED, move |alert: &Alert| {
			sink.borrow_mut().push(alert.clone())
		});
		let base = ViewModelBase::new("Orders", bus);

		// Act
		base.alert_for_error(&ShellError::msg("offline"));

		// Assert
		let alerts = alerts.borrow();
		assert_eq!(alerts.len(), 1);
		assert_eq!(alerts[0].header, "Orders");
		assert_eq!(alerts[0].text, "offline");
		assert_eq!(alerts[0].kind, AlertKind::Danger);
	}

	#[rstest]
	fn test_cleanup_disposes_owned_subscriptions_once() {
		let base = ViewModelBase::new("Orders", NotificationBus::new());
		let source = Subject::<u8>::new();
		base.own(source.subscribe_next(|_| {}));

		base.cleanup();
		base.cleanup();

		assert!(base.is_cleaned());
		assert_eq!(source.observer_count(), 0);
		assert_eq!(base.owned_subscriptions(), 0);
	}
}
