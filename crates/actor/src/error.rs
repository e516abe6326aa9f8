//! Error types surfaced by the runtime.
//!
//! Timeouts and handler failures are values, never panics escaping a turn.

use std::time::Duration;

use thiserror::Error;

use crate::Pid;

/// Failure outcome of a [`ReplyFuture`](crate::ReplyFuture).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FutureError {
	/// No reply arrived before the deadline.
	#[error("future {pid} timed out after {timeout:?}")]
	Timeout {
		/// Ephemeral pid backing the expired future.
		pid: Pid,
		/// Timeout the request was issued with.
		timeout: Duration,
	},
	/// The runtime was torn down before the future resolved.
	#[error("future {pid} was abandoned before it resolved")]
	Abandoned {
		/// Ephemeral pid backing the abandoned future.
		pid: Pid,
	},
}

impl FutureError {
	/// Returns true for [`FutureError::Timeout`].
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}

	/// Pid of the future this error belongs to.
	pub fn pid(&self) -> &Pid {
		match self {
			Self::Timeout { pid, .. } | Self::Abandoned { pid } => pid,
		}
	}
}

/// Failure returned from one message-processing turn.
///
/// The failure is reported on the event stream and the actor continues with
/// its next message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
	/// Creates a handler error from any displayable reason.
	pub fn new(reason: impl Into<String>) -> Self {
		Self(reason.into())
	}

	/// Failure description.
	pub fn reason(&self) -> &str {
		&self.0
	}
}

impl From<String> for HandlerError {
	fn from(reason: String) -> Self {
		Self(reason)
	}
}

impl From<&str> for HandlerError {
	fn from(reason: &str) -> Self {
		Self(reason.to_owned())
	}
}

/// Invalid runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// A capacity setting was zero.
	#[error("{0} must be > 0")]
	ZeroCapacity(&'static str),
	/// The local address was empty.
	#[error("address must not be empty")]
	EmptyAddress,
}
