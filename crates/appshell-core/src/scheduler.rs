//! Cooperative Scheduler
//!
//! The shell is single-threaded: every deferred piece of work (debounce
//! timers, deferred renders, simulated navigation events) is queued on a
//! [`Scheduler`] and runs when the host advances its clock.
//!
//! ## Architecture
//!
//! 1. **Virtual Clock**: the scheduler keeps its own notion of "now". Hosts
//!    drive it with [`Scheduler::advance`] (browser interval, test harness, ...).
//! 2. **Timer Queue**: tasks are ordered by deadline, then by insertion order.
//! 3. **Re-entrancy**: tasks may schedule or cancel other tasks. A task
//!    scheduled with a zero delay while the clock is advancing runs in the
//!    same advance call.
//!
//! ## Example
//!
//! ```
//! use appshell_core::scheduler::Scheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new();
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! scheduler.schedule(Duration::from_millis(100), move || flag.set(true));
//!
//! scheduler.advance(Duration::from_millis(99));
//! assert!(!fired.get());
//!
//! scheduler.advance(Duration::from_millis(1));
//! assert!(fired.get());
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::logging::targets;

/// Upper bound on tasks executed by a single [`Scheduler::run_until_idle`] call.
///
/// Protects hosts from self-rescheduling task loops.
pub const MAX_TASKS_PER_DRAIN: usize = 10_000;

type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
	deadline: Duration,
	seq: u64,
}

impl TimerHandle {
	/// Virtual time at which the task is due.
	pub fn deadline(&self) -> Duration {
		self.deadline
	}
}

#[derive(Default)]
struct SchedulerState {
	now: Duration,
	next_seq: u64,
	queue: BTreeMap<(Duration, u64), Task>,
}

/// Single-threaded timer queue with a virtual clock.
///
/// Cloning a `Scheduler` yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
	state: Rc<RefCell<SchedulerState>>,
}

impl fmt::Debug for Scheduler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("Scheduler")
			.field("now", &state.now)
			.field("pending", &state.queue.len())
			.finish()
	}
}

impl Scheduler {
	/// Creates a scheduler with its clock at zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current virtual time.
	pub fn now(&self) -> Duration {
		self.state.borrow().now
	}

	/// Number of queued tasks.
	pub fn pending(&self) -> usize {
		self.state.borrow().queue.len()
	}

	/// Queues `task` to run once `delay` has elapsed on the virtual clock.
	pub fn schedule<F>(&self, delay: Duration, task: F) -> TimerHandle
	where
		F: FnOnce() + 'static,
	{
		let mut state = self.state.borrow_mut();
		let handle = TimerHandle {
			deadline: state.now + delay,
			seq: state.next_seq,
		};
		state.next_seq += 1;
		state
			.queue
			.insert((handle.deadline, handle.seq), Box::new(task));
		handle
	}

	/// Queues `task` for the current turn.
	pub fn defer<F>(&self, task: F) -> TimerHandle
	where
		F: FnOnce() + 'static,
	{
		self.schedule(Duration::ZERO, task)
	}

	/// Removes a queued task. Returns `false` if it already ran or was cancelled.
	pub fn cancel(&self, handle: TimerHandle) -> bool {
		// The task is dropped after the borrow ends: its captures may own
		// handles that call back into the scheduler when dropped.
		let removed = self
			.state
			.borrow_mut()
			.queue
			.remove(&(handle.deadline, handle.seq));
		removed.is_some()
	}

	/// Returns `true` while the task behind `handle` is still queued.
	pub fn is_pending(&self, handle: TimerHandle) -> bool {
		self.state
			.borrow()
			.queue
			.contains_key(&(handle.deadline, handle.seq))
	}

	/// Advances the clock by `by`, running every task that becomes due.
	///
	/// Returns the number of tasks executed.
	pub fn advance(&self, by: Duration) -> usize {
		let target = self.now() + by;
		self.advance_to(target)
	}

	/// Advances the clock to `target`, running every task due at or before it.
	///
	/// A `target` in the past only runs tasks that are already due.
	pub fn advance_to(&self, target: Duration) -> usize {
		let mut executed = 0;
		while let Some(task) = self.pop_due(target) {
			task();
			executed += 1;
		}
		let mut state = self.state.borrow_mut();
		if target > state.now {
			state.now = target;
		}
		executed
	}

	/// Runs queued tasks, jumping the clock forward, until the queue is empty.
	///
	/// Stops after [`MAX_TASKS_PER_DRAIN`] tasks.
	pub fn run_until_idle(&self) -> usize {
		let mut executed = 0;
		while executed < MAX_TASKS_PER_DRAIN {
			let next = self.state.borrow().queue.keys().next().map(|(d, _)| *d);
			let Some(deadline) = next else {
				return executed;
			};
			if let Some(task) = self.pop_due(deadline) {
				task();
				executed += 1;
			}
		}
		tracing::warn!(
			target: targets::SCHEDULER,
			executed,
			pending = self.pending(),
			"scheduler drain limit reached"
		);
		executed
	}

	fn pop_due(&self, target: Duration) -> Option<Task> {
		let mut state = self.state.borrow_mut();
		let key = *state.queue.keys().next()?;
		if key.0 > target {
			return None;
		}
		if key.0 > state.now {
			state.now = key.0;
		}
		state.queue.remove(&key)
	}
}
