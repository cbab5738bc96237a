//! Configuration loading for the intent watcher.
//!
//! The watcher is configured by a single TOML file. `${VAR}` references are
//! replaced from the environment before parsing, a few engine settings can be
//! overridden by `INTENT_`-prefixed variables, and intents may additionally
//! be read from an intents directory.

use regex::Regex;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub mod intents;
pub mod types;

pub use intents::load_intents_dir;
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "INTENT_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let Some(file_path) = &self.file_path else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		info!("Loading configuration from {}", file_path);
		let mut config = self.load_from_file(file_path).await?;

		if let Some(base) = Path::new(file_path).parent() {
			config.resolve_paths(base);
		}

		self.apply_env_overrides(&mut config)?;

		if let Some(dir) = config.intents_dir.clone() {
			let definitions = load_intents_dir(&dir).await?;
			info!(
				"Loaded {} intent definitions from {}",
				definitions.len(),
				dir.display()
			);
			config.intents.extend(definitions);
		}

		self.validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<Config, ConfigError> {
		let content = tokio::fs::read_to_string(file_path)
			.await
			.map_err(|e| ConfigError::FileNotFound(format!("{}: {}", file_path, e)))?;

		self.parse_toml(&content)
	}

	/// Parses configuration text after substituting environment variables.
	pub fn parse_toml(&self, content: &str) -> Result<Config, ConfigError> {
		let substituted_content = substitute_env_vars(content)?;

		toml::from_str(&substituted_content).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	fn apply_env_overrides(&self, config: &mut Config) -> Result<(), ConfigError> {
		if let Ok(interval) = env::var(format!("{}POLL_INTERVAL_MS", self.env_prefix)) {
			debug!("Overriding poll interval from environment");
			config.engine.poll_interval_ms = interval.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid poll interval: {}", e))
			})?;
		}

		if let Ok(capacity) = env::var(format!("{}DEDUP_CAPACITY", self.env_prefix)) {
			debug!("Overriding dedup capacity from environment");
			config.engine.dedup_capacity = capacity.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid dedup capacity: {}", e))
			})?;
		}

		Ok(())
	}

	/// Checks the cross-field rules serde cannot express.
	pub fn validate_config(&self, config: &Config) -> Result<(), ConfigError> {
		if config.targets.is_empty() {
			return Err(ConfigError::ValidationError(
				"At least one target must be configured".to_string(),
			));
		}

		if config.engine.dedup_capacity == 0 {
			return Err(ConfigError::ValidationError(
				"engine.dedup_capacity must be greater than 0".to_string(),
			));
		}

		if config.engine.poll_interval_ms == 0 {
			return Err(ConfigError::ValidationError(
				"engine.poll_interval_ms must be greater than 0".to_string(),
			));
		}

		if config.engine.poll_timeout_ms == 0 {
			return Err(ConfigError::ValidationError(
				"engine.poll_timeout_ms must be greater than 0".to_string(),
			));
		}

		if config.engine.backoff_initial_ms > config.engine.backoff_max_ms {
			return Err(ConfigError::ValidationError(
				"engine.backoff_initial_ms must not exceed engine.backoff_max_ms".to_string(),
			));
		}

		if config.source.event.trim().is_empty() {
			return Err(ConfigError::ValidationError(
				"source.event must not be empty".to_string(),
			));
		}

		if config.source.abi_path.is_none() && config.source.explorer.is_none() {
			return Err(ConfigError::ValidationError(
				"source needs either abi_path or an [source.explorer] section".to_string(),
			));
		}

		Ok(())
	}
}

/// Replaces `${VAR_NAME}` with the variable's value. Comment lines are left
/// untouched so documented examples do not require the variable to exist.
pub fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;

	let mut result = String::with_capacity(content.len());
	for line in content.split_inclusive('\n') {
		if line.trim_start().starts_with('#') {
			result.push_str(line);
			continue;
		}

		let mut substituted = line.to_string();
		for cap in re.captures_iter(line) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			substituted = substituted.replace(full_match, &env_value);
		}
		result.push_str(&substituted);
	}

	Ok(result)
}
