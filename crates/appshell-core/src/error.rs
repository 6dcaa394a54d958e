//! Error types shared across the shell.

use thiserror::Error;

/// Runtime error carried through reactive streams and command results.
///
/// `ShellError` is `Clone` so that a single failure can be delivered to every
/// observer of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
	/// A command body returned a failure.
	#[error("Command '{command}' failed: {message}")]
	CommandFailed {
		/// Name of the failing command.
		command: String,
		/// Human readable failure description.
		message: String,
	},

	/// A command was executed while a previous execution was still running.
	#[error("Command '{0}' is already executing")]
	CommandBusy(String),

	/// Routing or view-model state could not be (de)serialized.
	#[error("State serialization failed: {0}")]
	StateSerialization(String),

	/// A view-model reported a failure on its state stream.
	#[error("{0}")]
	ViewModel(String),
}

impl ShellError {
	/// Creates a [`ShellError::ViewModel`] from any displayable message.
	pub fn msg(message: impl Into<String>) -> Self {
		Self::ViewModel(message.into())
	}

	/// Creates a [`ShellError::CommandFailed`] for the named command.
	pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
		Self::CommandFailed {
			command: command.into(),
			message: message.into(),
		}
	}
}

impl From<serde_json::Error> for ShellError {
	fn from(err: serde_json::Error) -> Self {
		Self::StateSerialization(err.to_string())
	}
}
