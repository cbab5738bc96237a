//! Contract ABI helpers.
//!
//! The on-chain source decodes logs against a JSON ABI. The document can come
//! from disk or from an Etherscan-compatible block explorer.

use crate::SourceError;
use alloy_json_abi::{Event as AbiEvent, JsonAbi};
use serde::Deserialize;
use tracing::{debug, info};

/// Parses an ABI document. Accepts a bare ABI array or a build artifact
/// object carrying it under `"abi"`.
pub fn parse_abi(document: &serde_json::Value) -> Result<JsonAbi, SourceError> {
	let abi = match document.get("abi") {
		Some(inner) => inner,
		None => document,
	};
	serde_json::from_value(abi.clone()).map_err(|e| SourceError::Schema(e.to_string()))
}

/// Names of all events declared in the ABI, sorted.
pub fn event_names(abi: &JsonAbi) -> Vec<String> {
	let mut names: Vec<String> = Vec::new();
	for event in abi.events() {
		if !names.contains(&event.name) {
			names.push(event.name.clone());
		}
	}
	names.sort();
	names
}

/// Looks up the event called `name`. Overloads resolve to the first declaration.
pub fn find_event<'a>(abi: &'a JsonAbi, name: &str) -> Result<&'a AbiEvent, SourceError> {
	abi.event(name)
		.and_then(|overloads| overloads.first())
		.ok_or_else(|| SourceError::InvalidSelector(format!("ABI declares no event '{}'", name)))
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
	status: String,
	message: String,
	result: String,
}

/// Fetches a verified contract's ABI from an Etherscan-compatible API.
pub async fn fetch_contract_abi(
	client: &reqwest::Client,
	api_url: &str,
	address: &str,
	api_key: &str,
) -> Result<serde_json::Value, SourceError> {
	info!("Fetching ABI for {} from {}", address, api_url);

	let response: ExplorerResponse = client
		.get(api_url)
		.query(&[
			("module", "contract"),
			("action", "getabi"),
			("address", address),
			("apikey", api_key),
		])
		.send()
		.await
		.map_err(|e| SourceError::Unavailable(format!("Explorer request failed: {}", e)))?
		.json()
		.await
		.map_err(|e| SourceError::Schema(format!("Unexpected explorer response: {}", e)))?;

	parse_explorer_response(response)
}

fn parse_explorer_response(response: ExplorerResponse) -> Result<serde_json::Value, SourceError> {
	if response.status != "1" {
		return Err(SourceError::Schema(format!(
			"Error fetching ABI: {} ({})",
			response.message, response.result
		)));
	}
	debug!("Explorer returned {} bytes of ABI", response.result.len());
	serde_json::from_str(&response.result).map_err(|e| SourceError::Schema(e.to_string()))
}
