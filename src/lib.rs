//! # appshell
//!
//! A client-side application shell: URL-hash routing plus a reactive
//! view/view-model binding runtime, on a single-threaded cooperative
//! scheduler.
//!
//! ## Feature Flags
//!
//! - `minimal` - scheduler, reactive primitives, commands, bus and settings
//! - `router` - hash codec, route manager, route table
//! - `views` - view-model contract, binding runtime, route host
//! - `full` (default) - everything
//!
//! ## Quick Example
//!
//! ```
//! use appshell::prelude::*;
//!
//! let (context, location) = ShellContext::headless(ShellSettings::default(), "#/users/42/edit").unwrap();
//! context.scheduler().run_until_idle();
//!
//! context.router().navigate("../list");
//! context.scheduler().run_until_idle();
//!
//! assert_eq!(location.hash(), "#/users/list");
//! ```

pub mod core;
#[cfg(feature = "router")]
pub mod router;
#[cfg(feature = "views")]
pub mod views;

pub use appshell_core::{
	Command, NotificationBus, Observable, Property, Scheduler, ShellError, ShellSettings, Subject,
	Subscription, Topic, Trigger, init_logging,
};

#[cfg(feature = "router")]
pub use appshell_router::{HashCodec, HashLocation, MemoryLocation, Route, RouteManager, RouteTable};

#[cfg(feature = "views")]
pub use appshell_views::{
	Alert, AlertKind, Dispatch, EventBinding, RouteHost, ShellContext, View, ViewBinding,
	ViewModel, ViewModelBase,
};

/// Everything an application built on the shell usually needs.
pub mod prelude {
	pub use crate::{
		Command, NotificationBus, Observable, Property, Scheduler, ShellError, ShellSettings,
		Subject, Subscription, Topic, Trigger, init_logging,
	};

	pub use serde::{Deserialize, Serialize};

	#[cfg(feature = "router")]
	pub use crate::{HashCodec, HashLocation, MemoryLocation, Route, RouteManager, RouteTable};

	#[cfg(feature = "views")]
	pub use crate::{
		Alert, AlertKind, Dispatch, EventBinding, RouteHost, ShellContext, View, ViewBinding,
		ViewModel, ViewModelBase,
	};

	#[cfg(feature = "views")]
	pub use appshell_views::{Cleanable, Initializable, Routable, RoutableUnit, RoutingSupport, unit};
}
