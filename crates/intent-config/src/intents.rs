//! Intent directory loading.
//!
//! Each intent lives in its own folder as `<dir>/<folder>/intent.yaml`.
//! Folders without an `intent.yaml` are ignored and a file that fails to parse
//! is logged and skipped, so one broken intent never hides the others.

use crate::ConfigError;
use intent_types::IntentDefinition;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up inside every intent folder.
pub const INTENT_FILE: &str = "intent.yaml";

/// Reads every `<dir>/*/intent.yaml`, ordered by folder name.
pub async fn load_intents_dir(dir: &Path) -> Result<Vec<IntentDefinition>, ConfigError> {
	let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
		ConfigError::FileNotFound(format!("Intents directory {}: {}", dir.display(), e))
	})?;

	let mut files: Vec<PathBuf> = Vec::new();
	while let Some(entry) = entries.next_entry().await? {
		let path = entry.path().join(INTENT_FILE);
		if tokio::fs::metadata(&path)
			.await
			.map(|meta| meta.is_file())
			.unwrap_or(false)
		{
			files.push(path);
		}
	}
	files.sort();

	let mut definitions = Vec::with_capacity(files.len());
	for path in files {
		match read_intent_file(&path).await {
			Ok(definition) => {
				debug!("Loaded intent '{}' from {}", definition.name, path.display());
				definitions.push(definition);
			}
			Err(e) => warn!("Skipping intent file {}: {}", path.display(), e),
		}
	}

	Ok(definitions)
}

async fn read_intent_file(path: &Path) -> Result<IntentDefinition, ConfigError> {
	let content = tokio::fs::read_to_string(path).await?;
	serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}
