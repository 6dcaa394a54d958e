//! Reactive primitives
//!
//! Observer-list based streams used by the router and the binding runtime.
//!
//! - [`Subject`]: a multicast stream that can be pushed into
//! - [`Observable`]: the subscribe-only face of a [`Subject`]
//! - [`Property`]: a value cell that announces every change
//! - [`Trigger`]: a type-erased `Observable<()>` for merging heterogeneous streams
//! - [`Debouncer`]: trailing-edge debounce on the [`Scheduler`](crate::scheduler::Scheduler)
//! - [`Subscription`] / [`CompositeSubscription`]: disposal handles
//!
//! Every primitive is single-threaded (`Rc` + `RefCell`) and never holds a
//! borrow while calling back into user code, so observers may subscribe,
//! unsubscribe or emit from inside a callback.

pub mod debounce;
pub mod property;
pub mod subject;
pub mod subscription;
pub mod trigger;

pub use debounce::Debouncer;
pub use property::Property;
pub use subject::{Emission, Observable, Subject};
pub use subscription::{CompositeSubscription, Subscription};
pub use trigger::Trigger;
