//! Notification bus
//!
//! Topic-based publish/subscribe channel that decouples the router from the
//! view-models it notifies. Handlers are keyed by `(payload type, topic name)`,
//! so the same topic name can carry different payload types without clashing.
//!
//! The bus is an explicitly constructed value owned by the shell context;
//! cloning a [`NotificationBus`] yields another handle to the same registry.
//!
//! ## Example
//!
//! ```
//! use appshell_core::bus::{NotificationBus, Topic};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let bus = NotificationBus::new();
//! let received = Rc::new(Cell::new(0));
//!
//! let sink = received.clone();
//! let _handle = bus.subscribe(Topic::custom("counter"), move |n: &u32| sink.set(*n));
//!
//! assert_eq!(bus.publish(&Topic::custom("counter"), &7u32), 1);
//! assert_eq!(received.get(), 7);
//! ```

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::logging::targets;

/// Internal storage for topic names, supporting both static and owned strings.
#[derive(Debug, Clone)]
enum TopicInner {
	Static(&'static str),
	Owned(Arc<str>),
}

/// Name of a bus channel.
#[derive(Debug, Clone)]
pub struct Topic(TopicInner);

impl Topic {
	/// Published by routable view-models whose route-scoped state changed.
	pub const ROUTING_STATE_CHANGED: Self = Self(TopicInner::Static("routing_state_changed"));
	/// Published whenever a view-model raises a user-visible alert.
	pub const ALERT_CREATED: Self = Self(TopicInner::Static("alert_created"));

	/// Creates a topic from a compile-time name.
	pub const fn custom(name: &'static str) -> Self {
		Self(TopicInner::Static(name))
	}

	/// Creates a topic from a runtime name.
	pub fn from_string(name: impl Into<Arc<str>>) -> Self {
		Self(TopicInner::Owned(name.into()))
	}

	/// The topic name.
	pub fn as_str(&self) -> &str {
		match &self.0 {
			TopicInner::Static(s) => s,
			TopicInner::Owned(s) => s,
		}
	}
}

impl PartialEq for Topic {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}

impl Eq for Topic {}

impl fmt::Display for Topic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

type HandlerKey = (TypeId, String);

struct HandlerSlot {
	id: u64,
	active: Rc<Cell<bool>>,
	// Holds an `Rc<dyn Fn(&T)>` for the key's payload type.
	handler: Rc<dyn Any>,
}

#[derive(Default)]
struct BusInner {
	handlers: RefCell<HashMap<HandlerKey, Vec<HandlerSlot>>>,
	next_id: Cell<u64>,
}

/// Topic publish/subscribe channel.
#[derive(Clone, Default)]
pub struct NotificationBus {
	inner: Rc<BusInner>,
}

impl fmt::Debug for NotificationBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let handlers = self.inner.handlers.borrow();
		f.debug_struct("NotificationBus")
			.field("topics", &handlers.len())
			.field(
				"subscribers",
				&handlers.values().map(Vec::len).sum::<usize>(),
			)
			.finish()
	}
}

impl NotificationBus {
	/// Creates an empty bus.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for payloads of type `T` published on `topic`.
	///
	/// The handler stays registered until the returned handle is dropped or
	/// [`BusSubscription::unsubscribe`] is called.
	pub fn subscribe<T, F>(&self, topic: Topic, handler: F) -> BusSubscription
	where
		T: 'static,
		F: Fn(&T) + 'static,
	{
		let key: HandlerKey = (TypeId::of::<T>(), topic.as_str().to_string());
		let id = self.inner.next_id.get();
		self.inner.next_id.set(id + 1);
		let active = Rc::new(Cell::new(true));

		let typed: Rc<dyn Fn(&T)> = Rc::new(handler);
		self.inner
			.handlers
			.borrow_mut()
			.entry(key.clone())
			.or_default()
			.push(HandlerSlot {
				id,
				active: active.clone(),
				handler: Rc::new(typed),
			});

		tracing::trace!(target: targets::BUS, topic = %topic, id, "subscribed");

		BusSubscription {
			bus: Rc::downgrade(&self.inner),
			key: Some(key),
			id,
			active,
		}
	}

	/// Delivers `payload` to every handler registered for `(T, topic)`.
	///
	/// Returns the number of handlers invoked.
	pub fn publish<T: 'static>(&self, topic: &Topic, payload: &T) -> usize {
		let key: HandlerKey = (TypeId::of::<T>(), topic.as_str().to_string());
		let snapshot: Vec<(Rc<Cell<bool>>, Rc<dyn Any>)> = self
			.inner
			.handlers
			.borrow()
			.get(&key)
			.map(|slots| {
				slots
					.iter()
					.map(|slot| (slot.active.clone(), slot.handler.clone()))
					.collect()
			})
			.unwrap_or_default();

		let mut delivered = 0;
		for (active, handler) in snapshot {
			if !active.get() {
				continue;
			}
			if let Some(handler) = handler.downcast_ref::<Rc<dyn Fn(&T)>>() {
				handler(payload);
				delivered += 1;
			}
		}

		tracing::trace!(target: targets::BUS, topic = %topic, delivered, "published");
		delivered
	}

	/// Number of handlers registered for `(T, topic)`.
	pub fn subscriber_count<T: 'static>(&self, topic: &Topic) -> usize {
		let key: HandlerKey = (TypeId::of::<T>(), topic.as_str().to_string());
		self.inner
			.handlers
			.borrow()
			.get(&key)
			.map_or(0, Vec::len)
	}
}

/// Registration handle returned by [`NotificationBus::subscribe`].
#[must_use = "dropping a BusSubscription unsubscribes immediately"]
pub struct BusSubscription {
	bus: Weak<BusInner>,
	key: Option<HandlerKey>,
	id: u64,
	active: Rc<Cell<bool>>,
}

impl BusSubscription {
	/// Removes the handler from the bus.
	pub fn unsubscribe(mut self) {
		self.release();
	}

	/// Returns `true` while the handler is registered.
	pub fn is_active(&self) -> bool {
		self.active.get()
	}

	fn release(&mut self) {
		self.active.set(false);
		let Some(key) = self.key.take() else {
			return;
		};
		let Some(bus) = self.bus.upgrade() else {
			return;
		};
		let removed = {
			let mut handlers = bus.handlers.borrow_mut();
			let removed = handlers.get_mut(&key).and_then(|slots| {
				slots
					.iter()
					.position(|slot| slot.id == self.id)
					.map(|index| slots.remove(index))
			});
			if handlers.get(&key).is_some_and(Vec::is_empty) {
				handlers.remove(&key);
			}
			removed
		};
		drop(removed);
	}
}

impl Drop for BusSubscription {
	fn drop(&mut self) {
		self.release();
	}
}

impl fmt::Debug for BusSubscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BusSubscription")
			.field("id", &self.id)
			.field("active", &self.is_active())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_topic_equality_ignores_storage() {
		assert_eq!(
			Topic::ROUTING_STATE_CHANGED,
			Topic::from_string("routing_state_changed".to_string())
		);
		assert_eq!(Topic::ALERT_CREATED.to_string(), "alert_created");
	}

	#[rstest]
	fn test_payload_type_separates_handlers() {
		// Arrange
		let bus = NotificationBus::new();
		let strings = Rc::new(Cell::new(0));
		let numbers = Rc::new(Cell::new(0));
		let s = strings.clone();
		let n = numbers.clone();
		let _h1 = bus.subscribe(Topic::custom("mixed"), move |_: &String| s.set(s.get() + 1));
		let _h2 = bus.subscribe(Topic::custom("mixed"), move |_: &u8| n.set(n.get() + 1));

		// Act
		bus.publish(&Topic::custom("mixed"), &"hello".to_string());

		// Assert
		assert_eq!(strings.get(), 1);
		assert_eq!(numbers.get(), 0);
	}

	#[rstest]
	fn test_unsubscribe_removes_handler() {
		let bus = NotificationBus::new();
		let handle = bus.subscribe(Topic::custom("t"), |_: &()| {});
		assert_eq!(bus.subscriber_count::<()>(&Topic::custom("t")), 1);

		handle.unsubscribe();

		assert_eq!(bus.subscriber_count::<()>(&Topic::custom("t")), 0);
		assert_eq!(bus.publish(&Topic::custom("t"), &()), 0);
	}

	#[rstest]
	fn test_publish_from_handler_is_delivered() {
		// Arrange: a handler on "ping" republishes on "pong".
		let bus = NotificationBus::new();
		let pongs = Rc::new(Cell::new(0));
		let relay = bus.clone();
		let _ping = bus.subscribe(Topic::custom("ping"), move |n: &u32| {
			relay.publish(&Topic::custom("pong"), n);
		});
		let sink = pongs.clone();
		let _pong = bus.subscribe(Topic::custom("pong"), move |n: &u32| sink.set(*n));

		// Act
		bus.publish(&Topic::custom("ping"), &5u32);

		// Assert
		assert_eq!(pongs.get(), 5);
	}
}
