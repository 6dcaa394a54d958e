//! User-visible alerts raised by view-models.

use std::fmt;

use appshell_core::ShellError;
use serde::{Deserialize, Serialize};

/// Severity of an [`Alert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
	/// Neutral information.
	#[default]
	Info,
	/// A completed action.
	Success,
	/// Something needs attention.
	Warning,
	/// An operation failed.
	Danger,
}

/// A message for the user, published on `Topic::ALERT_CREATED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
	/// Short title, usually the display name of the raising view-model.
	pub header: String,
	/// Message body.
	pub text: String,
	/// Severity.
	#[serde(default)]
	pub kind: AlertKind,
}

impl Alert {
	/// Creates an alert.
	pub fn new(kind: AlertKind, header: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			header: header.into(),
			text: text.into(),
			kind,
		}
	}

	/// An [`AlertKind::Info`] alert.
	pub fn info(header: impl Into<String>, text: impl Into<String>) -> Self {
		Self::new(AlertKind::Info, header, text)
	}

	/// An [`AlertKind::Success`] alert.
	pub fn success(header: impl Into<String>, text: impl Into<String>) -> Self {
		Self::new(AlertKind::Success, header, text)
	}

	/// An [`AlertKind::Warning`] alert.
	pub fn warning(header: impl Into<String>, text: impl Into<String>) -> Self {
		Self::new(AlertKind::Warning, header, text)
	}

	/// An [`AlertKind::Danger`] alert.
	pub fn danger(header: impl Into<String>, text: impl Into<String>) -> Self {
		Self::new(AlertKind::Danger, header, text)
	}

	/// A danger alert describing `error`.
	pub fn from_error(header: impl Into<String>, error: &ShellError) -> Self {
		Self::danger(header, error.to_string())
	}
}

impl fmt::Display for Alert {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.header, self.text)
	}
}
