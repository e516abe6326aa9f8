use serde::Deserialize;

use crate::ConfigError;

/// Runtime configuration for one [`ActorSystem`](crate::ActorSystem).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
	pub(crate) address: String,
	pub(crate) dead_letter_capacity: usize,
	pub(crate) event_buffer: usize,
}

impl SystemConfig {
	/// Sets the logical host name stamped on every pid.
	#[must_use]
	pub fn address(mut self, address: impl Into<String>) -> Self {
		self.address = address.into();
		self
	}

	/// Sets how many dead letters are retained for [`ActorSystem::dead_letters`](crate::ActorSystem::dead_letters).
	#[must_use]
	pub fn dead_letter_capacity(mut self, capacity: usize) -> Self {
		self.dead_letter_capacity = capacity;
		self
	}

	/// Sets the event broadcast buffer capacity.
	#[must_use]
	pub fn event_buffer(mut self, size: usize) -> Self {
		self.event_buffer = size;
		self
	}

	/// Logical host name.
	pub fn local_address(&self) -> &str {
		&self.address
	}

	/// Checks that every setting is usable.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.address.is_empty() {
			return Err(ConfigError::EmptyAddress);
		}
		if self.dead_letter_capacity == 0 {
			return Err(ConfigError::ZeroCapacity("dead_letter_capacity"));
		}
		if self.event_buffer == 0 {
			return Err(ConfigError::ZeroCapacity("event_buffer"));
		}
		Ok(())
	}
}

impl Default for SystemConfig {
	fn default() -> Self {
		Self {
			address: "nonhost".to_owned(),
			dead_letter_capacity: 512,
			event_buffer: 256,
		}
	}
}
