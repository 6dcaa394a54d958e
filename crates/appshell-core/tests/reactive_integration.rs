//! Reactive primitives integration tests
//!
//! Exercises subjects, properties, triggers, debouncers and commands together
//! on one scheduler, the way the binding runtime combines them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use appshell_core::{
	Command, CompositeSubscription, Debouncer, NotificationBus, Property, Scheduler, ShellError,
	Subject, Topic, Trigger,
};
use rstest::*;

#[fixture]
fn scheduler() -> Scheduler {
	Scheduler::new()
}

fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

#[rstest]
fn test_merged_triggers_feed_one_debouncer(scheduler: Scheduler) {
	// Arrange: two unrelated sources collapse into a single delivery.
	let counter = Property::new(0u32);
	let refresh = Subject::<()>::new();
	let deliveries = Rc::new(Cell::new(0));

	let sink = deliveries.clone();
	let debouncer = Rc::new(Debouncer::new(scheduler.clone(), ms(100), move |_: ()| {
		sink.set(sink.get() + 1)
	}));
	let pusher = debouncer.clone();
	let _merged = Trigger::merge(
		&[counter.changed().as_trigger(), refresh.as_observable().as_trigger()],
		move |emission| {
			if emission.is_ok() {
				pusher.push(());
			}
		},
	);

	// Act
	counter.set(1);
	scheduler.advance(ms(50));
	refresh.next(());
	scheduler.advance(ms(50));
	counter.set(2);
	scheduler.run_until_idle();

	// Assert
	assert_eq!(deliveries.get(), 1);
	assert_eq!(scheduler.now(), ms(200));
}

#[rstest]
fn test_errors_bypass_debounce(scheduler: Scheduler) {
	// Arrange
	let source = Subject::<u8>::new();
	let values = Rc::new(RefCell::new(Vec::new()));
	let errors = Rc::new(RefCell::new(Vec::new()));

	let value_sink = values.clone();
	let debouncer = Rc::new(Debouncer::new(scheduler.clone(), ms(100), move |v: u8| {
		value_sink.borrow_mut().push(v)
	}));
	let error_sink = errors.clone();
	let pusher = debouncer.clone();
	let _s = source.subscribe(move |emission| match emission {
		Ok(v) => pusher.push(*v),
		Err(err) => error_sink.borrow_mut().push(err.to_string()),
	});

	// Act
	source.next(1);
	source.error(ShellError::msg("boom"));
	source.next(2);

	// Assert: the error is seen before the quiet period ends.
	assert_eq!(*errors.borrow(), vec!["boom".to_string()]);
	assert!(values.borrow().is_empty());
	scheduler.run_until_idle();
	assert_eq!(*values.borrow(), vec![2]);
}

#[rstest]
fn test_command_results_published_on_bus() {
	// Arrange
	let bus = NotificationBus::new();
	let received = Rc::new(RefCell::new(Vec::new()));
	let sink = received.clone();
	let _handle = bus.subscribe(Topic::custom("saved"), move |id: &u64| sink.borrow_mut().push(*id));

	let save = Command::with_guard("save", |id: &u64| *id != 0, |id: u64| Ok(id));
	let relay = bus.clone();
	let _results = save
		.results()
		.subscribe_next(move |id| {
			relay.publish(&Topic::custom("saved"), id);
		});
	let requests = Subject::<u64>::new();
	let _invoke = requests.as_observable().invoke_command(&save);

	// Act
	requests.next(0);
	requests.next(7);

	// Assert
	assert_eq!(*received.borrow(), vec![7]);
}

#[rstest]
fn test_composite_disposal_detaches_everything() {
	// Arrange
	let a = Subject::<()>::new();
	let b = Subject::<()>::new();
	let subscriptions = CompositeSubscription::new();
	subscriptions.add(a.subscribe_next(|_| {}));
	subscriptions.add(b.subscribe_next(|_| {}));

	// Act
	subscriptions.dispose();

	// Assert
	assert!(subscriptions.is_empty());
	assert_eq!(a.observer_count(), 0);
	assert_eq!(b.observer_count(), 0);
}
