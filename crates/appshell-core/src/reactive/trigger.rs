//! Type-erased update triggers.
//!
//! Views declare "re-render when any of these fire" as a list of streams with
//! unrelated item types. A [`Trigger`] forgets the item type and keeps only
//! the fact that something (or some error) happened.

use std::fmt;
use std::rc::Rc;

use super::subject::{Emission, Observable};
use super::subscription::{CompositeSubscription, Subscription};

type SinkFn = Rc<dyn Fn(&Emission<()>)>;
type SubscribeFn = Rc<dyn Fn(SinkFn) -> Subscription>;

/// A stream of "something changed" pulses.
#[derive(Clone)]
pub struct Trigger {
	subscribe: SubscribeFn,
}

impl fmt::Debug for Trigger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Trigger").finish_non_exhaustive()
	}
}

impl Trigger {
	/// Registers `observer` for pulses and errors.
	pub fn subscribe<F>(&self, observer: F) -> Subscription
	where
		F: Fn(&Emission<()>) + 'static,
	{
		(self.subscribe)(Rc::new(observer))
	}

	/// Subscribes `observer` to the union of `triggers`.
	///
	/// The returned bag owns one subscription per trigger.
	pub fn merge<F>(triggers: &[Trigger], observer: F) -> CompositeSubscription
	where
		F: Fn(&Emission<()>) + 'static,
	{
		let observer: SinkFn = Rc::new(observer);
		let merged = CompositeSubscription::new();
		for trigger in triggers {
			merged.add((trigger.subscribe)(observer.clone()));
		}
		merged
	}
}

impl<T: 'static> Observable<T> {
	/// Erases the item type of this stream.
	pub fn as_trigger(&self) -> Trigger {
		let source = self.clone();
		Trigger {
			subscribe: Rc::new(move |sink: SinkFn| {
				source.subscribe(move |emission| match emission {
					Ok(_) => sink(&Ok(())),
					Err(err) => sink(&Err(err.clone())),
				})
			}),
		}
	}
}

impl<T: 'static> From<&Observable<T>> for Trigger {
	fn from(observable: &Observable<T>) -> Self {
		observable.as_trigger()
	}
}
