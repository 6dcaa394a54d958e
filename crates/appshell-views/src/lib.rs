//! # appshell-views
//!
//! View/view-model binding runtime and routing container.
//!
//! ## Modules
//!
//! - [`lifecycle`]: `Initializable`, `Cleanable`, `ViewModel`, `Routable`
//! - [`view_model`]: [`ViewModelBase`] for concrete view-models
//! - [`routable`]: [`RoutingSupport`] and the routing-state bus payload
//! - [`alert`]: alerts published on `Topic::ALERT_CREATED`
//! - [`binding`]: [`ViewBinding`] driving one view
//! - [`event`]: gated event-to-command dispatch
//! - [`host`]: [`RouteHost`], from current route to active unit
//! - [`context`]: [`ShellContext`] owning the shared services

#![warn(missing_docs)]

pub mod alert;
pub mod binding;
pub mod context;
pub mod event;
pub mod host;
pub mod lifecycle;
pub mod routable;
pub mod view_model;

pub use alert::{Alert, AlertKind};
pub use binding::{BindingState, View, ViewBinding};
pub use context::ShellContext;
pub use event::{Dispatch, EventBinding, EventHandler};
pub use host::{MAX_REDIRECT_DEPTH, RouteHost, UnitRef, unit};
pub use lifecycle::{Cleanable, Initializable, Routable, RoutableUnit, ViewModel};
pub use routable::{RoutingStateChanged, RoutingSupport};
pub use view_model::ViewModelBase;
