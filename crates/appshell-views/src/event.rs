//! Gated event-to-command dispatch.
//!
//! An [`EventHandler`] turns a UI event into a command execution of a
//! view-model. The command is looked up on the view-model when the event
//! fires, so a handler built from a [`ViewBinding`](crate::ViewBinding)
//! always reaches the currently bound view-model. Then every gate must pass:
//!
//! 1. the parameter is selected from the event (or defaults),
//! 2. the optional condition, given the event and the parameter, does not
//!    veto the event,
//! 3. the command's `can_execute` accepts the parameter.
//!
//! Failures returned by the command go to the view-model's
//! `alert_for_error`, not to the caller.

use std::fmt;
use std::rc::Rc;

use appshell_core::logging::targets;
use appshell_core::{Command, ShellError};

use crate::lifecycle::ViewModel;

type Selector<E, P> = Box<dyn Fn(&E) -> P>;
type Condition<E, P> = Box<dyn Fn(&E, &P) -> bool>;
type Resolver<P, R> = Box<dyn Fn() -> Option<Target<P, R>>>;

/// Outcome of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
	/// The command ran and succeeded.
	Executed,
	/// No view-model is bound; nothing ran.
	Detached,
	/// The condition vetoed the event.
	Vetoed,
	/// The command could not execute with the selected parameter.
	Rejected,
	/// The command ran and failed; the error was alerted.
	Failed(ShellError),
}

/// A command together with the view-model that receives its failures.
pub(crate) struct Target<P: 'static, R: 'static> {
	command: Command<P, R>,
	alert: Box<dyn Fn(&ShellError)>,
}

impl<P: 'static, R: 'static> Target<P, R> {
	pub(crate) fn of<M>(model: &Rc<M>, command: Command<P, R>) -> Self
	where
		M: ViewModel + ?Sized + 'static,
	{
		let model = model.clone();
		Self {
			command,
			alert: Box::new(move |error: &ShellError| model.alert_for_error(error)),
		}
	}
}

/// Builder for an [`EventHandler`].
///
/// Obtained from [`ViewBinding::bind_event`](crate::ViewBinding::bind_event)
/// or, for a view-model without a binding, [`EventBinding::for_model`].
pub struct EventBinding<E: 'static, P: 'static, R: 'static> {
	resolve: Resolver<P, R>,
	selector: Selector<E, P>,
	condition: Option<Condition<E, P>>,
}

impl<E: 'static, P: 'static, R: Clone + 'static> EventBinding<E, P, R> {
	pub(crate) fn resolving<F, S>(resolve: F, selector: S) -> Self
	where
		F: Fn() -> Option<Target<P, R>> + 'static,
		S: Fn(&E) -> P + 'static,
	{
		Self {
			resolve: Box::new(resolve),
			selector: Box::new(selector),
			condition: None,
		}
	}

	/// Dispatches to the command `command` picks from `model`, with
	/// `P::default()` as parameter.
	pub fn for_model<M, C>(model: &Rc<M>, command: C) -> Self
	where
		M: ViewModel + ?Sized + 'static,
		C: Fn(&M) -> Command<P, R> + 'static,
		P: Default,
	{
		Self::for_model_with(model, command, |_: &E| P::default())
	}

	/// Dispatches to the command `command` picks from `model`, with the
	/// parameter `selector` picks from the event.
	pub fn for_model_with<M, C, S>(model: &Rc<M>, command: C, selector: S) -> Self
	where
		M: ViewModel + ?Sized + 'static,
		C: Fn(&M) -> Command<P, R> + 'static,
		S: Fn(&E) -> P + 'static,
	{
		let model = model.clone();
		Self::resolving(move || Some(Target::of(&model, command(&*model))), selector)
	}

	/// Only dispatch when `condition` accepts the event and its parameter.
	pub fn when<C>(mut self, condition: C) -> Self
	where
		C: Fn(&E, &P) -> bool + 'static,
	{
		self.condition = Some(Box::new(condition));
		self
	}

	/// Finishes the handler.
	pub fn build(self) -> EventHandler<E> {
		let Self {
			resolve,
			selector,
			condition,
		} = self;

		EventHandler {
			dispatch: Rc::new(move |event: &E| {
				let Some(target) = resolve() else {
					tracing::trace!(target: targets::COMMAND, "event ignored, no view-model bound");
					return Dispatch::Detached;
				};
				let command = &target.command;

				let parameter = selector(event);
				if let Some(condition) = &condition
					&& !condition(event, &parameter)
				{
					return Dispatch::Vetoed;
				}

				if !command.can_execute(&parameter) {
					tracing::trace!(
						target: targets::COMMAND,
						command = %command.name(),
						"event ignored, command cannot execute"
					);
					return Dispatch::Rejected;
				}

				match command.execute(parameter) {
					Ok(_) => Dispatch::Executed,
					Err(err) => {
						(target.alert)(&err);
						Dispatch::Failed(err)
					}
				}
			}),
		}
	}
}

/// Handler produced by [`EventBinding::build`].
///
/// Cloning yields another handle to the same handler, so it can be attached
/// to several event sources.
pub struct EventHandler<E: 'static> {
	dispatch: Rc<dyn Fn(&E) -> Dispatch>,
}

impl<E: 'static> Clone for EventHandler<E> {
	fn clone(&self) -> Self {
		Self {
			dispatch: self.dispatch.clone(),
		}
	}
}

impl<E: 'static> fmt::Debug for EventHandler<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventHandler").finish_non_exhaustive()
	}
}

impl<E: 'static> EventHandler<E> {
	/// Runs the gates for `event` and executes the command if they pass.
	pub fn handle(&self, event: &E) -> Dispatch {
		(self.dispatch)(event)
	}

	/// Turns the handler into a plain callback that discards the outcome.
	pub fn into_callback(self) -> impl Fn(&E) {
		move |event: &E| {
			self.handle(event);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lifecycle::{Cleanable, Initializable};
	use appshell_core::Observable;
	use rstest::rstest;
	use std::cell::{Cell, RefCell};

	#[derive(Debug)]
	struct Click {
		button: u8,
		row: Option<u32>,
	}

	struct Table {
		delete: Command<u32, ()>,
		alerts: RefCell<Vec<String>>,
	}

	impl Table {
		fn new(deleted: &Rc<RefCell<Vec<u32>>>) -> Rc<Self> {
			let sink = deleted.clone();
			Rc::new(Self {
				delete: Command::with_guard("delete", |row: &u32| *row != 0, move |row: u32| {
					if row > 99 {
						return Err(ShellError::command_failed("delete", "row is locked"));
					}
					sink.borrow_mut().push(row);
					Ok(())
				}),
				alerts: RefCell::new(Vec::new()),
			})
		}
	}

	impl Initializable for Table {}

	impl Cleanable for Table {}

	impl ViewModel for Table {
		fn display_name(&self) -> &str {
			"Table"
		}

		fn state_changed(&self) -> Observable<()> {
			Observable::from(&appshell_core::Subject::new())
		}

		fn alert_for_error(&self, error: &ShellError) {
			self.alerts.borrow_mut().push(error.to_string());
		}
	}

	fn on_row(table: &Rc<Table>) -> EventBinding<Click, u32, ()> {
		EventBinding::for_model_with(table, |table: &Table| table.delete.clone(), |click: &Click| {
			click.row.unwrap_or(0)
		})
	}

	#[rstest]
	fn test_rejected_parameter_never_executes() {
		// Arrange
		let deleted = Rc::new(RefCell::new(Vec::new()));
		let table = Table::new(&deleted);
		let handler = on_row(&table).build();

		// Act
		let outcome = handler.handle(&Click { button: 0, row: None });

		// Assert
		assert_eq!(outcome, Dispatch::Rejected);
		assert!(deleted.borrow().is_empty());
	}

	#[rstest]
	fn test_condition_sees_selected_parameter() {
		// Arrange
		let deleted = Rc::new(RefCell::new(Vec::new()));
		let table = Table::new(&deleted);
		let handler = on_row(&table)
			.when(|click: &Click, row: &u32| click.button == 0 && *row % 2 == 0)
			.build();

		// Act
		let odd = handler.handle(&Click { button: 0, row: Some(3) });
		let right_button = handler.handle(&Click { button: 2, row: Some(4) });
		let even = handler.handle(&Click { button: 0, row: Some(4) });

		// Assert
		assert_eq!(odd, Dispatch::Vetoed);
		assert_eq!(right_button, Dispatch::Vetoed);
		assert_eq!(even, Dispatch::Executed);
		assert_eq!(*deleted.borrow(), vec![4]);
	}

	#[rstest]
	fn test_veto_skips_guard() {
		let guard_calls = Rc::new(Cell::new(0));
		let counter = guard_calls.clone();
		let table = Table::new(&Rc::new(RefCell::new(Vec::new())));
		let open = Command::with_guard(
			"open",
			move |_: &()| {
				counter.set(counter.get() + 1);
				true
			},
			|_: ()| Ok(()),
		);
		let handler = EventBinding::for_model(&table, move |_: &Table| open.clone())
			.when(|click: &Click, _: &()| click.button == 0)
			.build();

		assert_eq!(handler.handle(&Click { button: 2, row: None }), Dispatch::Vetoed);
		assert_eq!(guard_calls.get(), 0);
		assert_eq!(handler.handle(&Click { button: 0, row: None }), Dispatch::Executed);
	}

	#[rstest]
	fn test_failure_is_alerted_to_view_model() {
		// Arrange
		let table = Table::new(&Rc::new(RefCell::new(Vec::new())));
		let handler = on_row(&table).build();

		// Act
		let outcome = handler.handle(&Click { button: 0, row: Some(100) });

		// Assert
		assert_eq!(
			outcome,
			Dispatch::Failed(ShellError::command_failed("delete", "row is locked"))
		);
		assert_eq!(
			*table.alerts.borrow(),
			vec!["Command 'delete' failed: row is locked".to_string()]
		);
	}

	#[rstest]
	fn test_unresolved_target_is_detached() {
		let handler = EventBinding::<Click, (), ()>::resolving(|| None, |_: &Click| ()).build();

		assert_eq!(handler.handle(&Click { button: 0, row: None }), Dispatch::Detached);
	}
}
