//! # appshell-core
//!
//! Foundation types shared by the appshell router and binding runtime.
//!
//! ## Modules
//!
//! - [`scheduler`]: single-threaded timer queue with a virtual clock
//! - [`reactive`]: `Subject`, `Observable`, `Property`, `Trigger`, `Debouncer`
//! - [`command`]: guarded, parameterized actions
//! - [`bus`]: topic publish/subscribe channel
//! - [`settings`]: TOML-backed configuration
//! - [`logging`]: `tracing` setup and per-component targets
//! - [`error`]: the [`ShellError`] carried through streams

#![warn(missing_docs)]

pub mod bus;
pub mod command;
pub mod error;
pub mod logging;
pub mod reactive;
pub mod scheduler;
pub mod settings;

pub use bus::{BusSubscription, NotificationBus, Topic};
pub use command::Command;
pub use error::ShellError;
pub use logging::init_logging;
pub use reactive::{
	CompositeSubscription, Debouncer, Emission, Observable, Property, Subject, Subscription,
	Trigger,
};
pub use scheduler::{Scheduler, TimerHandle};
pub use settings::{
	BindingSettings, LoggingSettings, RouterSettings, SettingsError, ShellSettings,
};
