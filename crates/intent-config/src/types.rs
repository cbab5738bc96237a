//! Configuration types for the watcher.

use intent_targets::TargetDefinition;
use intent_types::IntentDefinition;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete watcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Polling, dedup and backoff settings
	#[serde(default)]
	pub engine: EngineSettings,
	/// What to watch
	pub source: SourceSettings,
	/// Named action targets
	#[serde(default)]
	pub targets: Vec<TargetDefinition>,
	/// Directory of `<folder>/intent.yaml` files
	#[serde(default)]
	pub intents_dir: Option<PathBuf>,
	/// Inline intent definitions
	#[serde(default)]
	pub intents: Vec<IntentDefinition>,
}

impl Config {
	/// Makes relative file paths relative to `base` instead of the working
	/// directory.
	pub fn resolve_paths(&mut self, base: &Path) {
		if let Some(dir) = self.intents_dir.as_mut() {
			if dir.is_relative() {
				*dir = base.join(&*dir);
			}
		}
		if let Some(path) = self.source.abi_path.as_mut() {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		}
	}
}

/// Engine timings and bounds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineSettings {
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	#[serde(default = "default_poll_timeout_ms")]
	pub poll_timeout_ms: u64,
	/// Seen dedupe keys kept before the set is cleared
	#[serde(default = "default_dedup_capacity")]
	pub dedup_capacity: usize,
	#[serde(default = "default_backoff_initial_ms")]
	pub backoff_initial_ms: u64,
	#[serde(default = "default_backoff_max_ms")]
	pub backoff_max_ms: u64,
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			poll_timeout_ms: default_poll_timeout_ms(),
			dedup_capacity: default_dedup_capacity(),
			backoff_initial_ms: default_backoff_initial_ms(),
			backoff_max_ms: default_backoff_max_ms(),
		}
	}
}

fn default_poll_interval_ms() -> u64 {
	1_000
}

fn default_poll_timeout_ms() -> u64 {
	10_000
}

fn default_dedup_capacity() -> usize {
	1_000
}

fn default_backoff_initial_ms() -> u64 {
	1_000
}

fn default_backoff_max_ms() -> u64 {
	30_000
}

/// Event source settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceSettings {
	/// Source implementation, e.g. `onchain`
	#[serde(default = "default_source_kind")]
	pub kind: String,
	/// Event name to subscribe to
	pub event: String,
	/// Emitting contract. Absent or `dynamic` watches every contract.
	#[serde(default)]
	pub contract_address: Option<String>,
	/// ABI file on disk
	#[serde(default)]
	pub abi_path: Option<PathBuf>,
	/// Block explorer to fetch the ABI from when no file is given
	#[serde(default)]
	pub explorer: Option<ExplorerSettings>,
	/// Implementation-specific configuration
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

fn default_source_kind() -> String {
	"onchain".to_string()
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::Table::new())
}

/// Etherscan-compatible API endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplorerSettings {
	pub url: String,
	#[serde(default)]
	pub api_key: String,
}
