//! Logging setup
//!
//! The shell logs through `tracing`. Each component uses a fixed target so
//! output can be filtered per component:
//!
//! | Target | Component |
//! |--------|-----------|
//! | `appshell::scheduler` | cooperative scheduler |
//! | `appshell::command` | command execution |
//! | `appshell::bus` | notification bus |
//! | `appshell::router` | route manager and hash codec |
//! | `appshell::routing` | route table and route host |
//! | `appshell::binding` | view binding runtime |
//! | `appshell::view_model` | view-model lifecycle and alerts |

use tracing_subscriber::EnvFilter;

use crate::settings::{LoggingSettings, SettingsError};

/// `tracing` targets used across the workspace.
pub mod targets {
	/// Cooperative scheduler.
	pub const SCHEDULER: &str = "appshell::scheduler";
	/// Command execution.
	pub const COMMAND: &str = "appshell::command";
	/// Notification bus.
	pub const BUS: &str = "appshell::bus";
	/// Route manager and hash codec.
	pub const ROUTER: &str = "appshell::router";
	/// Route table resolution and the route host.
	pub const ROUTING: &str = "appshell::routing";
	/// View binding runtime.
	pub const BINDING: &str = "appshell::binding";
	/// View-model lifecycle and alerts.
	pub const VIEW_MODEL: &str = "appshell::view_model";
}

/// Installs a global `fmt` subscriber configured by `settings`.
///
/// `RUST_LOG` takes precedence over the configured level when set. Returns
/// `Ok(false)` if a global subscriber was already installed.
///
/// # Errors
///
/// Returns [`SettingsError::Invalid`] if the level is not a valid filter.
pub fn init_logging(settings: &LoggingSettings) -> Result<bool, SettingsError> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(&settings.level).map_err(|err| SettingsError::Invalid {
			field: "logging.level",
			reason: err.to_string(),
		})?,
	};

	let installed = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(settings.with_target)
		.try_init()
		.is_ok();

	if installed {
		tracing::debug!(level = %settings.level, "appshell logging initialized");
	}
	Ok(installed)
}
