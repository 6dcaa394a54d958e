//! Shell context
//!
//! [`ShellContext`] is created once at startup and passed to whatever needs
//! the shell's shared services. It owns:
//!
//! - the validated [`ShellSettings`]
//! - the [`Scheduler`] all deferred work runs on
//! - the [`NotificationBus`]
//! - the [`HashLocation`] and the [`RouteManager`] following it
//! - in a browser, the clock that advances the scheduler
//!
//! ## Example
//!
//! ```
//! use appshell_core::ShellSettings;
//! use appshell_views::ShellContext;
//!
//! let (context, _location) = ShellContext::headless(ShellSettings::default(), "#/start").unwrap();
//! context.scheduler().run_until_idle();
//!
//! assert_eq!(context.router().route().map(|r| r.path).as_deref(), Some("/start"));
//! context.shutdown();
//! ```

use std::rc::Rc;

use appshell_core::logging::targets;
use appshell_core::{NotificationBus, Scheduler, SettingsError, ShellSettings};
use appshell_router::{HashLocation, MemoryLocation, RouteManager, RouteTable};

use crate::binding::{View, ViewBinding};
use crate::host::{RouteHost, UnitRef};

/// Interval at which the browser clock advances the scheduler.
#[cfg(target_arch = "wasm32")]
pub const BROWSER_CLOCK_PERIOD_MS: i32 = 16;

/// Scheduler, bus, location, router and settings of one shell instance.
#[derive(Debug, Clone)]
pub struct ShellContext {
	settings: Rc<ShellSettings>,
	scheduler: Scheduler,
	bus: NotificationBus,
	router: RouteManager,
	#[cfg(target_arch = "wasm32")]
	clock: Option<Rc<appshell_router::BrowserClock>>,
}

impl ShellContext {
	/// Creates a context over `location`.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Invalid`] if `settings` do not validate.
	pub fn new(
		settings: ShellSettings,
		location: Rc<dyn HashLocation>,
		scheduler: Scheduler,
	) -> Result<Self, SettingsError> {
		settings.validate()?;
		let router = RouteManager::new(location, scheduler.clone(), &settings.router);
		tracing::debug!(
			target: targets::ROUTER,
			debounce_ms = settings.router.debounce_ms,
			uri_encode = settings.router.uri_encode,
			"shell context created"
		);
		Ok(Self {
			settings: Rc::new(settings),
			scheduler,
			bus: NotificationBus::new(),
			router,
			#[cfg(target_arch = "wasm32")]
			clock: None,
		})
	}

	/// Creates a context over an in-memory location showing `initial_hash`.
	///
	/// # Errors
	///
	/// See [`new`](Self::new).
	pub fn headless(
		settings: ShellSettings,
		initial_hash: &str,
	) -> Result<(Self, MemoryLocation), SettingsError> {
		let scheduler = Scheduler::new();
		let location = MemoryLocation::new(scheduler.clone(), initial_hash);
		let context = Self::new(settings, Rc::new(location.clone()), scheduler)?;
		Ok((context, location))
	}

	/// Creates a context over the browser location.
	///
	/// The scheduler is driven by a [`BrowserClock`](appshell_router::BrowserClock)
	/// that lives as long as the context. Returns `Ok(None)` outside a
	/// browser window.
	///
	/// # Errors
	///
	/// See [`new`](Self::new).
	#[cfg(target_arch = "wasm32")]
	pub fn browser(settings: ShellSettings) -> Result<Option<Self>, SettingsError> {
		let Some(location) = appshell_router::BrowserLocation::new() else {
			return Ok(None);
		};
		let scheduler = Scheduler::new();
		let mut context = Self::new(settings, Rc::new(location), scheduler.clone())?;
		let Some(clock) = appshell_router::BrowserClock::start(scheduler, BROWSER_CLOCK_PERIOD_MS)
		else {
			return Ok(None);
		};
		context.clock = Some(Rc::new(clock));
		Ok(Some(context))
	}

	/// Returns `true` when a browser clock drives the scheduler.
	#[cfg(target_arch = "wasm32")]
	pub fn has_clock(&self) -> bool {
		self.clock.is_some()
	}

	/// The validated settings.
	pub fn settings(&self) -> &ShellSettings {
		&self.settings
	}

	/// The shared scheduler.
	pub fn scheduler(&self) -> &Scheduler {
		&self.scheduler
	}

	/// The notification bus.
	pub fn bus(&self) -> &NotificationBus {
		&self.bus
	}

	/// The route manager.
	pub fn router(&self) -> &RouteManager {
		&self.router
	}

	/// The location the router follows.
	pub fn location(&self) -> Rc<dyn HashLocation> {
		self.router.location()
	}

	/// Starts a route host over `table`.
	pub fn route_host(&self, table: RouteTable<UnitRef>) -> RouteHost {
		RouteHost::new(self.router.clone(), &self.bus, table, &self.settings.router)
	}

	/// Binds `view` to `model` with the configured rate limit.
	pub fn bind<V: View>(&self, view: V, model: Rc<V::Model>) -> ViewBinding<V> {
		ViewBinding::mount(view, model, self.scheduler.clone(), &self.settings.binding)
	}

	/// An unbound binding for `view`, for use with [`RouteHost::attach`].
	pub fn binding<V: View>(&self, view: V) -> ViewBinding<V> {
		ViewBinding::new(view, self.scheduler.clone(), &self.settings.binding)
	}

	/// Stops routing. Pending navigation events are dropped.
	pub fn shutdown(&self) {
		tracing::debug!(target: targets::ROUTER, "shell context shutting down");
		self.router.dispose();
	}
}
