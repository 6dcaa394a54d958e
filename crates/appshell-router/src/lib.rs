//! # appshell-router
//!
//! URL-hash routing for appshell.
//!
//! ## Modules
//!
//! - [`path`]: normalization and relative resolution of hash paths
//! - [`codec`]: `<path>[?<json>]` hash encoding and decoding
//! - [`route`]: the decoded [`Route`]
//! - [`location`]: where hashes are read from and written to
//! - [`manager`]: the [`RouteManager`] owning the current route
//! - [`table`]: exact and pattern route lookup
//!
//! ## Example
//!
//! ```
//! use appshell_core::{RouterSettings, Scheduler};
//! use appshell_router::{MemoryLocation, RouteManager};
//! use std::rc::Rc;
//!
//! let scheduler = Scheduler::new();
//! let location = MemoryLocation::new(scheduler.clone(), "#/users/42/edit");
//! let manager = RouteManager::new(Rc::new(location.clone()), scheduler.clone(), &RouterSettings::default());
//!
//! scheduler.run_until_idle();
//! assert_eq!(manager.route().map(|r| r.path).as_deref(), Some("/users/42/edit"));
//!
//! manager.navigate("../list");
//! scheduler.run_until_idle();
//! assert_eq!(manager.route().map(|r| r.path).as_deref(), Some("/users/list"));
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod location;
pub mod manager;
pub mod path;
pub mod route;
pub mod table;

pub use codec::HashCodec;
pub use location::{HashLocation, MemoryLocation, WRITE_HISTORY_LIMIT};
pub use manager::RouteManager;
pub use route::Route;
pub use table::{Activation, Activator, Resolution, RouteTable, RouteTableError, RouteTarget};

#[cfg(target_arch = "wasm32")]
pub use location::{BrowserClock, BrowserLocation};
