//! Demo settings: built-in defaults, then an optional TOML file, then CLI flags.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parley_actor::SystemConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::{Overrides, Strategy};

/// Errors that can occur while loading demo settings.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading the config file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or fields.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A setting has an unusable value.
	#[error("invalid setting: {0}")]
	Invalid(&'static str),

	/// The actor system settings were rejected.
	#[error("invalid [system] table: {0}")]
	System(#[from] parley_actor::ConfigError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Contents of a demo config file. Every field is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
	pub tick_ms: Option<u64>,
	pub timeout_ms: Option<u64>,
	pub pool_size: Option<usize>,
	pub system: Option<SystemConfig>,
}

impl FileConfig {
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input)
	}
}

const DEFAULT_POOL_SIZE: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Resolved settings for one demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
	pub tick: Duration,
	pub timeout: Duration,
	pub pool_size: NonZeroUsize,
	pub system: SystemConfig,
}

impl DemoConfig {
	/// Defaults for `strategy`: the wait demo ticks every 2 s with a 1 s
	/// timeout, the others every 1 s with 2.5 s against ten workers.
	pub fn defaults(strategy: Strategy) -> Self {
		let (tick, timeout) = match strategy {
			Strategy::Wait => (Duration::from_secs(2), Duration::from_secs(1)),
			Strategy::Await | Strategy::Pipe | Strategy::Reenter => (Duration::from_secs(1), Duration::from_millis(2500)),
		};
		Self {
			tick,
			timeout,
			pool_size: DEFAULT_POOL_SIZE,
			system: SystemConfig::default(),
		}
	}

	/// Layers `file` and then `overrides` over the defaults for `strategy`.
	pub fn resolve(strategy: Strategy, file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
		let file = match file {
			Some(path) => FileConfig::load(path)?,
			None => FileConfig::default(),
		};
		Self::layered(strategy, file, overrides)
	}

	fn layered(strategy: Strategy, file: FileConfig, overrides: &Overrides) -> Result<Self> {
		let mut config = Self::defaults(strategy);

		if let Some(ms) = overrides.tick_ms.or(file.tick_ms) {
			config.tick = Duration::from_millis(ms);
		}
		if let Some(ms) = overrides.timeout_ms.or(file.timeout_ms) {
			config.timeout = Duration::from_millis(ms);
		}
		if let Some(size) = overrides.pool_size {
			config.pool_size = size;
		} else if let Some(size) = file.pool_size {
			config.pool_size = NonZeroUsize::new(size).ok_or(ConfigError::Invalid("pool_size must be > 0"))?;
		}
		if let Some(system) = file.system {
			system.validate()?;
			config.system = system;
		}

		if config.tick.is_zero() {
			return Err(ConfigError::Invalid("tick_ms must be > 0"));
		}
		if config.timeout.is_zero() {
			return Err(ConfigError::Invalid("timeout_ms must be > 0"));
		}
		Ok(config)
	}
}
