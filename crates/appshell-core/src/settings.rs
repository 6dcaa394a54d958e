//! Shell settings
//!
//! Configuration for the router, the binding runtime and logging. Every field
//! has a default, so an empty TOML document is a valid configuration.
//!
//! ```toml
//! [router]
//! debounce_ms = 100
//! uri_encode = false
//! default_route = "/demo"
//!
//! [binding]
//! rate_limit_ms = 100
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default quiet period for navigation events and view re-renders.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		/// File that failed to load.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},

	/// The TOML document is malformed or has wrongly typed fields.
	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value is out of range.
	#[error("Invalid setting `{field}`: {reason}")]
	Invalid {
		/// Dotted path of the offending field.
		field: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}

/// Top-level shell configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
	/// Route manager configuration.
	pub router: RouterSettings,
	/// View binding configuration.
	pub binding: BindingSettings,
	/// Log output configuration.
	pub logging: LoggingSettings,
}

impl ShellSettings {
	/// Parses and validates settings from a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates a TOML settings file.
	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}

	/// Checks value ranges that serde cannot express.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.router.debounce_ms == 0 {
			return Err(SettingsError::Invalid {
				field: "router.debounce_ms",
				reason: "must be greater than zero".to_string(),
			});
		}
		if self.binding.rate_limit_ms == 0 {
			return Err(SettingsError::Invalid {
				field: "binding.rate_limit_ms",
				reason: "must be greater than zero".to_string(),
			});
		}
		if let Some(route) = &self.router.default_route
			&& route.trim().is_empty()
		{
			return Err(SettingsError::Invalid {
				field: "router.default_route",
				reason: "must not be empty".to_string(),
			});
		}
		let level = self.logging.level.to_ascii_lowercase();
		if !LOG_LEVELS.contains(&level.as_str()) {
			return Err(SettingsError::Invalid {
				field: "logging.level",
				reason: format!("unknown level '{}'", self.logging.level),
			});
		}
		Ok(())
	}
}

/// Route manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Quiet period applied to navigation change events, in milliseconds.
	pub debounce_ms: u64,
	/// Percent-encode hashes written by routing-state round trips.
	pub uri_encode: bool,
	/// Where unresolved routes are sent.
	pub default_route: Option<String>,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			uri_encode: false,
			default_route: None,
		}
	}
}

impl RouterSettings {
	/// [`debounce_ms`](Self::debounce_ms) as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

/// View binding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingSettings {
	/// Default quiet period before a view re-renders, in milliseconds.
	pub rate_limit_ms: u64,
}

impl Default for BindingSettings {
	fn default() -> Self {
		Self {
			rate_limit_ms: DEFAULT_DEBOUNCE_MS,
		}
	}
}

impl BindingSettings {
	/// [`rate_limit_ms`](Self::rate_limit_ms) as a [`Duration`].
	pub fn rate_limit(&self) -> Duration {
		Duration::from_millis(self.rate_limit_ms)
	}
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Default filter directive (`trace`, `debug`, `info`, `warn`, `error`, `off`).
	pub level: String,
	/// Include the event target (`appshell::router`, ...) in output.
	pub with_target: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			with_target: true,
		}
	}
}
