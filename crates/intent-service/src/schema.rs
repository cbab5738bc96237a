//! Resolves the ABI document the on-chain source decodes against.

use anyhow::{bail, Context, Result};
use intent_config::SourceSettings;
use intent_source::abi::fetch_contract_abi;
use intent_types::DYNAMIC_ADDRESS;
use std::time::Duration;
use tracing::info;

const EXPLORER_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads the ABI from `abi_path`, or fetches it from the configured explorer
/// when no file is given.
pub async fn resolve_abi(source: &SourceSettings) -> Result<serde_json::Value> {
	if let Some(path) = &source.abi_path {
		info!("Reading ABI from {}", path.display());
		let content = tokio::fs::read_to_string(path)
			.await
			.with_context(|| format!("Failed to read ABI file {}", path.display()))?;
		return serde_json::from_str(&content)
			.with_context(|| format!("ABI file {} is not valid JSON", path.display()));
	}

	let Some(explorer) = &source.explorer else {
		bail!("No ABI source configured: set source.abi_path or [source.explorer]");
	};

	let address = match source.contract_address.as_deref().map(str::trim) {
		Some(address) if !address.is_empty() && !address.eq_ignore_ascii_case(DYNAMIC_ADDRESS) => {
			address
		}
		_ => bail!("Fetching the ABI from an explorer needs a concrete source.contract_address"),
	};

	let client = reqwest::Client::builder()
		.timeout(EXPLORER_TIMEOUT)
		.build()
		.context("Failed to build HTTP client")?;

	fetch_contract_abi(&client, &explorer.url, address, &explorer.api_key)
		.await
		.context("Failed to fetch ABI from block explorer")
}
