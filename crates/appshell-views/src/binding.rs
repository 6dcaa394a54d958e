//! View binding runtime
//!
//! A [`ViewBinding`] keeps one view rendered against one view-model at a time
//! and drives the view-model's lifecycle hooks.
//!
//! ## States
//!
//! ```text
//! Unbound → Initializing → Active → (Rebinding → Active)* → Cleaned
//! ```
//!
//! - **Initializing**: view-model `initialize`, view `initialize`, subscribe,
//!   first render, view-model `loaded`.
//! - **Active**: the view's extra triggers and the view-model's
//!   `state_changed` are merged and debounced (per view rate limit). Each
//!   settled pulse requests a render; requests collapse into at most one
//!   pending render. After each re-render the view-model's `updated` runs.
//!   Errors skip the debounce and go straight to `alert_for_error`.
//! - **Rebinding** (different view-model): old `cleanup`, old subscription
//!   and pending render dropped, swap, new `initialize`, subscribe, render,
//!   new `loaded`.
//! - **Cleaned**: view `cleanup`, view-model `cleanup`, subscription dropped.
//!   Terminal; later renders and rebinds are ignored.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use appshell_core::logging::targets;
use appshell_core::{
	BindingSettings, Command, CompositeSubscription, Debouncer, Scheduler, TimerHandle, Trigger,
};

use crate::event::{EventBinding, Target};
use crate::lifecycle::{Cleanable, Initializable, ViewModel};

/// A renderable view of some view-model type.
pub trait View: 'static {
	/// The view-model type this view renders.
	type Model: ViewModel + ?Sized + 'static;

	/// Name used in logs.
	fn display_name(&self) -> &str;

	/// Extra streams that should trigger a re-render for `model`.
	fn update_on(&self, _model: &Self::Model) -> Vec<Trigger> {
		Vec::new()
	}

	/// Debounce interval for re-renders; `None` uses the binding settings.
	fn rate_limit(&self) -> Option<Duration> {
		None
	}

	/// Called once, before the first render.
	fn initialize(&self) {}

	/// Called once, when the binding is cleaned up.
	fn cleanup(&self) {}

	/// Draws `model`.
	fn render(&self, model: &Self::Model);
}

/// Lifecycle state of a [`ViewBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
	/// No view-model bound yet.
	Unbound,
	/// First view-model being set up.
	Initializing,
	/// Rendering on updates.
	Active,
	/// Switching to another view-model.
	Rebinding,
	/// Torn down.
	Cleaned,
}

/// Merged update subscription for one view-model.
struct UpdateSubscription {
	triggers: CompositeSubscription,
	debouncer: Rc<Debouncer<()>>,
}

impl UpdateSubscription {
	fn dispose(self) {
		self.debouncer.cancel();
		self.triggers.dispose();
	}
}

struct BindingInner<V: View> {
	view: V,
	scheduler: Scheduler,
	rate_limit: Duration,
	state: Cell<BindingState>,
	model: RefCell<Option<Rc<V::Model>>>,
	subscription: RefCell<Option<UpdateSubscription>>,
	generation: Cell<u64>,
	pending_render: Cell<Option<TimerHandle>>,
	renders: Cell<usize>,
}

impl<V: View> BindingInner<V> {
	fn model(&self) -> Option<Rc<V::Model>> {
		self.model.borrow().clone()
	}

	fn is_current(&self, generation: u64) -> bool {
		self.generation.get() == generation && self.state.get() != BindingState::Cleaned
	}

	fn subscribe(self: &Rc<Self>, model: &Rc<V::Model>) {
		let generation = self.generation.get() + 1;
		self.generation.set(generation);

		let weak: Weak<Self> = Rc::downgrade(self);
		let debouncer = Rc::new(Debouncer::new(self.scheduler.clone(), self.rate_limit, move |()| {
			if let Some(inner) = weak.upgrade()
				&& inner.is_current(generation)
			{
				inner.request_render();
			}
		}));

		let mut triggers = self.view.update_on(model);
		triggers.push(model.state_changed().as_trigger());

		let weak: Weak<Self> = Rc::downgrade(self);
		let pulses = debouncer.clone();
		let triggers = Trigger::merge(&triggers, move |emission| match emission {
			Ok(()) => pulses.push(()),
			Err(err) => {
				let Some(inner) = weak.upgrade() else {
					return;
				};
				if !inner.is_current(generation) {
					return;
				}
				if let Some(model) = inner.model() {
					model.alert_for_error(err);
				}
			}
		});

		let previous = self
			.subscription
			.replace(Some(UpdateSubscription { triggers, debouncer }));
		if let Some(previous) = previous {
			previous.dispose();
		}
	}

	fn unsubscribe(&self) {
		let subscription = self.subscription.borrow_mut().take();
		if let Some(subscription) = subscription {
			subscription.dispose();
		}
		if let Some(handle) = self.pending_render.take() {
			self.scheduler.cancel(handle);
		}
	}

	fn request_render(self: &Rc<Self>) {
		if self.pending_render.get().is_some() {
			tracing::trace!(
				target: targets::BINDING,
				display_name = self.view.display_name(),
				"render already pending"
			);
			return;
		}

		let weak: Weak<Self> = Rc::downgrade(self);
		let generation = self.generation.get();
		let handle = self.scheduler.defer(move || {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			inner.pending_render.set(None);
			if !inner.is_current(generation) {
				return;
			}
			tracing::debug!(
				target: targets::BINDING,
				display_name = inner.view.display_name(),
				"re-rendering"
			);
			if let Some(model) = inner.render() {
				model.updated();
			}
		});
		self.pending_render.set(Some(handle));
	}

	/// Renders the bound view-model; returns it for follow-up hooks.
	fn render(&self) -> Option<Rc<V::Model>> {
		let model = self.model()?;
		self.view.render(&model);
		self.renders.set(self.renders.get() + 1);
		Some(model)
	}
}

/// Binds a [`View`] to its view-model.
///
/// Cloning yields another handle to the same binding.
pub struct ViewBinding<V: View> {
	inner: Rc<BindingInner<V>>,
}

impl<V: View> Clone for ViewBinding<V> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<V: View> fmt::Debug for ViewBinding<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewBinding")
			.field("view", &self.inner.view.display_name())
			.field("state", &self.inner.state.get())
			.field("renders", &self.inner.renders.get())
			.finish()
	}
}

impl<V: View> ViewBinding<V> {
	/// Creates an unbound binding for `view`.
	pub fn new(view: V, scheduler: Scheduler, settings: &BindingSettings) -> Self {
		let rate_limit = view.rate_limit().unwrap_or_else(|| settings.rate_limit());
		Self {
			inner: Rc::new(BindingInner {
				view,
				scheduler,
				rate_limit,
				state: Cell::new(BindingState::Unbound),
				model: RefCell::new(None),
				subscription: RefCell::new(None),
				generation: Cell::new(0),
				pending_render: Cell::new(None),
				renders: Cell::new(0),
			}),
		}
	}

	/// Creates a binding and binds `model` right away.
	pub fn mount(view: V, model: Rc<V::Model>, scheduler: Scheduler, settings: &BindingSettings) -> Self {
		let binding = Self::new(view, scheduler, settings);
		binding.bind(model);
		binding
	}

	/// The bound view.
	pub fn view(&self) -> &V {
		&self.inner.view
	}

	/// The bound view-model, if any.
	pub fn model(&self) -> Option<Rc<V::Model>> {
		self.inner.model()
	}

	/// Current lifecycle state.
	pub fn state(&self) -> BindingState {
		self.inner.state.get()
	}

	/// Number of renders so far.
	pub fn render_count(&self) -> usize {
		self.inner.renders.get()
	}

	/// Returns `true` while a render is queued.
	pub fn has_pending_render(&self) -> bool {
		self.inner.pending_render.get().is_some()
	}

	/// Debounce interval used for re-renders.
	pub fn rate_limit(&self) -> Duration {
		self.inner.rate_limit
	}

	/// Routes events to the command `command` picks from the bound
	/// view-model, with `P::default()` as parameter.
	///
	/// The command is looked up when the event fires, so after a rebind the
	/// handler reaches the new view-model. Once cleaned up, events dispatch
	/// to nothing.
	pub fn bind_event<E, P, R, C>(&self, command: C) -> EventBinding<E, P, R>
	where
		E: 'static,
		P: Default + 'static,
		R: Clone + 'static,
		C: Fn(&V::Model) -> Command<P, R> + 'static,
	{
		self.bind_event_with(command, |_: &E| P::default())
	}

	/// Like [`bind_event`](Self::bind_event), with the parameter `selector`
	/// picks from the event.
	pub fn bind_event_with<E, P, R, C, S>(&self, command: C, selector: S) -> EventBinding<E, P, R>
	where
		E: 'static,
		P: 'static,
		R: Clone + 'static,
		C: Fn(&V::Model) -> Command<P, R> + 'static,
		S: Fn(&E) -> P + 'static,
	{
		let weak: Weak<BindingInner<V>> = Rc::downgrade(&self.inner);
		EventBinding::resolving(
			move || {
				let inner = weak.upgrade()?;
				if inner.state.get() == BindingState::Cleaned {
					return None;
				}
				let model = inner.model()?;
				let selected = command(&*model);
				Some(Target::of(&model, selected))
			},
			selector,
		)
	}

	/// Binds the first view-model, or rebinds if one is already bound.
	pub fn bind(&self, model: Rc<V::Model>) {
		match self.inner.state.get() {
			BindingState::Unbound => self.initialize(model),
			_ => self.rebind(model),
		}
	}

	fn initialize(&self, model: Rc<V::Model>) {
		let inner = &self.inner;
		inner.state.set(BindingState::Initializing);
		*inner.model.borrow_mut() = Some(model.clone());

		model.initialize();
		inner.view.initialize();
		inner.subscribe(&model);

		tracing::debug!(
			target: targets::BINDING,
			display_name = inner.view.display_name(),
			view_model = model.display_name(),
			"rendering"
		);
		inner.render();
		model.loaded();

		if inner.state.get() == BindingState::Initializing {
			inner.state.set(BindingState::Active);
		}
	}

	/// Switches the view to `model`.
	///
	/// Rebinding to the bound instance does nothing. After cleanup this is
	/// ignored. A rebind requested while another bind is in progress runs on
	/// the next scheduler turn.
	pub fn rebind(&self, model: Rc<V::Model>) {
		let inner = &self.inner;
		match inner.state.get() {
			BindingState::Unbound => return self.initialize(model),
			BindingState::Cleaned => {
				tracing::trace!(
					target: targets::BINDING,
					display_name = inner.view.display_name(),
					"ignoring rebind after cleanup"
				);
				return;
			}
			BindingState::Initializing | BindingState::Rebinding => {
				let binding = self.clone();
				inner.scheduler.defer(move || binding.rebind(model));
				return;
			}
			BindingState::Active => {}
		}

		let Some(old) = inner.model() else {
			return self.initialize(model);
		};
		if Rc::ptr_eq(&old, &model) {
			return;
		}

		inner.state.set(BindingState::Rebinding);
		tracing::debug!(
			target: targets::BINDING,
			display_name = inner.view.display_name(),
			from = old.display_name(),
			to = model.display_name(),
			"rebinding"
		);

		old.cleanup();
		inner.unsubscribe();
		*inner.model.borrow_mut() = Some(model.clone());
		drop(old);

		model.initialize();
		inner.subscribe(&model);
		inner.render();
		model.loaded();

		if inner.state.get() == BindingState::Rebinding {
			inner.state.set(BindingState::Active);
		}
	}

	/// Renders now, outside the debounce.
	pub fn render_now(&self) {
		if self.inner.state.get() == BindingState::Cleaned {
			return;
		}
		self.inner.render();
	}

	/// Tears the binding down. Later calls do nothing.
	pub fn cleanup(&self) {
		let inner = &self.inner;
		if inner.state.replace(BindingState::Cleaned) == BindingState::Cleaned {
			return;
		}
		tracing::debug!(
			target: targets::BINDING,
			display_name = inner.view.display_name(),
			"cleaning up"
		);

		inner.view.cleanup();
		let model = inner.model.borrow_mut().take();
		if let Some(model) = model {
			model.cleanup();
		}
		inner.unsubscribe();
	}
}
