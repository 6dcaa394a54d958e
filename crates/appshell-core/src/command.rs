//! Commands
//!
//! A [`Command`] is a guarded, parameterized action. Callers check
//! [`Command::can_execute`] before calling [`Command::execute`]; the binding
//! runtime never executes a command whose guard rejects the parameter.
//!
//! Successful results are broadcast on [`Command::results`], failures on
//! [`Command::thrown_errors`]. A command refuses to run while a previous
//! execution of the same command is still on the stack.
//!
//! ## Example
//!
//! ```
//! use appshell_core::command::Command;
//!
//! let double = Command::with_guard("double", |n: &i32| *n >= 0, |n: i32| Ok(n * 2));
//!
//! assert!(double.can_execute(&2));
//! assert!(!double.can_execute(&-1));
//! assert_eq!(double.execute(21), Ok(42));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::ShellError;
use crate::logging::targets;
use crate::reactive::{Observable, Subject, Subscription};

type GuardFn<P> = Box<dyn Fn(&P) -> bool>;
type BodyFn<P, R> = Box<dyn Fn(P) -> Result<R, ShellError>>;

struct CommandInner<P: 'static, R: 'static> {
	name: String,
	guard: Option<GuardFn<P>>,
	body: BodyFn<P, R>,
	executing: Cell<bool>,
	results: Subject<R>,
	thrown_errors: Subject<ShellError>,
}

/// Guarded action taking a `P` and producing an `R`.
///
/// Cloning a `Command` yields another handle to the same action.
pub struct Command<P: 'static = (), R: 'static = ()> {
	inner: Rc<CommandInner<P, R>>,
}

impl<P: 'static, R: 'static> Clone for Command<P, R> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<P: 'static, R: 'static> fmt::Debug for Command<P, R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command")
			.field("name", &self.inner.name)
			.field("guarded", &self.inner.guard.is_some())
			.field("executing", &self.inner.executing.get())
			.finish()
	}
}

/// Resets the executing flag even if the body panics.
struct ExecutingGuard<'a>(&'a Cell<bool>);

impl Drop for ExecutingGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

impl<P: 'static, R: Clone + 'static> Command<P, R> {
	/// Creates a command that can always execute.
	pub fn new<B>(name: impl Into<String>, body: B) -> Self
	where
		B: Fn(P) -> Result<R, ShellError> + 'static,
	{
		Self::build(name.into(), None, Box::new(body))
	}

	/// Creates a command whose executability depends on its parameter.
	pub fn with_guard<G, B>(name: impl Into<String>, guard: G, body: B) -> Self
	where
		G: Fn(&P) -> bool + 'static,
		B: Fn(P) -> Result<R, ShellError> + 'static,
	{
		Self::build(name.into(), Some(Box::new(guard)), Box::new(body))
	}

	fn build(name: String, guard: Option<GuardFn<P>>, body: BodyFn<P, R>) -> Self {
		Self {
			inner: Rc::new(CommandInner {
				name,
				guard,
				body,
				executing: Cell::new(false),
				results: Subject::new(),
				thrown_errors: Subject::new(),
			}),
		}
	}

	/// Name used in logs and error messages.
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// Returns `true` while the body is running.
	pub fn is_executing(&self) -> bool {
		self.inner.executing.get()
	}

	/// Returns `true` if `parameter` passes the guard and the command is idle.
	pub fn can_execute(&self, parameter: &P) -> bool {
		if self.inner.executing.get() {
			return false;
		}
		self.inner
			.guard
			.as_ref()
			.is_none_or(|guard| guard(parameter))
	}

	/// Runs the command body.
	///
	/// Does not consult the guard; see [`Command::can_execute`].
	///
	/// # Errors
	///
	/// Returns [`ShellError::CommandBusy`] if the command is already
	/// executing, otherwise whatever the body returns.
	pub fn execute(&self, parameter: P) -> Result<R, ShellError> {
		if self.inner.executing.get() {
			return Err(ShellError::CommandBusy(self.inner.name.clone()));
		}

		let outcome = {
			self.inner.executing.set(true);
			let _guard = ExecutingGuard(&self.inner.executing);
			(self.inner.body)(parameter)
		};

		match &outcome {
			Ok(result) => self.inner.results.next(result.clone()),
			Err(err) => {
				tracing::debug!(
					target: targets::COMMAND,
					command = %self.inner.name,
					error = %err,
					"command execution failed"
				);
				self.inner.thrown_errors.next(err.clone());
			}
		}
		outcome
	}

	/// Stream of successful results.
	pub fn results(&self) -> Observable<R> {
		self.inner.results.as_observable()
	}

	/// Stream of execution failures.
	pub fn thrown_errors(&self) -> Observable<ShellError> {
		self.inner.thrown_errors.as_observable()
	}
}

impl<T: Clone + 'static> Observable<T> {
	/// Executes `command` with every value of this stream that it accepts.
	///
	/// Values the command cannot execute at that moment are skipped. Failures
	/// surface on the command's [`thrown_errors`](Command::thrown_errors).
	pub fn invoke_command<R: Clone + 'static>(&self, command: &Command<T, R>) -> Subscription {
		let command = command.clone();
		self.subscribe_next(move |value| {
			if command.can_execute(value) {
				let _ = command.execute(value.clone());
			} else {
				tracing::trace!(
					target: targets::COMMAND,
					command = %command.name(),
					"skipping emission, command cannot execute"
				);
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::RefCell;

	#[rstest]
	fn test_results_and_errors_are_split() {
		// Arrange
		let command = Command::new("parse", |text: String| {
			text.parse::<i32>()
				.map_err(|e| ShellError::command_failed("parse", e.to_string()))
		});
		let results = Rc::new(RefCell::new(Vec::new()));
		let errors = Rc::new(Cell::new(0));
		let r = results.clone();
		let e = errors.clone();
		let _s1 = command.results().subscribe_next(move |v| r.borrow_mut().push(*v));
		let _s2 = command.thrown_errors().subscribe_next(move |_| e.set(e.get() + 1));

		// Act
		let ok = command.execute("12".to_string());
		let failed = command.execute("twelve".to_string());

		// Assert
		assert_eq!(ok, Ok(12));
		assert!(failed.is_err());
		assert_eq!(*results.borrow(), vec![12]);
		assert_eq!(errors.get(), 1);
	}

	#[rstest]
	fn test_command_cannot_reenter_itself() {
		// Arrange: the body tries to run its own command again.
		let slot: Rc<RefCell<Option<Command<(), bool>>>> = Rc::new(RefCell::new(None));
		let reentry = slot.clone();
		let command = Command::new("reentrant", move |_: ()| {
			let inner = reentry.borrow().clone();
			Ok(inner.is_some_and(|cmd| cmd.can_execute(&()) || cmd.execute(()).is_ok()))
		});
		*slot.borrow_mut() = Some(command.clone());

		// Act
		let reentered = command.execute(());

		// Assert
		assert_eq!(reentered, Ok(false));
		assert!(!command.is_executing());
		assert!(command.can_execute(&()));
	}

	#[rstest]
	fn test_invoke_command_respects_guard() {
		// Arrange
		let subject = Subject::<i32>::new();
		let executed = Rc::new(RefCell::new(Vec::new()));
		let sink = executed.clone();
		let command = Command::with_guard("positive", |n: &i32| *n > 0, move |n: i32| {
			sink.borrow_mut().push(n);
			Ok(())
		});
		let _subscription = subject.as_observable().invoke_command(&command);

		// Act
		subject.next(-1);
		subject.next(3);

		// Assert
		assert_eq!(*executed.borrow(), vec![3]);
	}
}
