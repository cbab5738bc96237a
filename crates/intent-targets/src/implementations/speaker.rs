//! Smart speaker target.
//!
//! Sends the action's `command` parameter to a speaker's HTTP command
//! endpoint as `{"command": ...}`.

use crate::{required_str, ActionRequest, TargetError, TargetInterface};
use async_trait::async_trait;
use intent_types::{http_url, ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::time::Duration;
use tracing::info;

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

pub struct SpeakerTarget {
	client: reqwest::Client,
	endpoint: String,
}

impl SpeakerTarget {
	pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TargetError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| TargetError::Execution(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			endpoint: endpoint.into(),
		})
	}
}

pub struct SpeakerTargetSchema;

impl ConfigSchema for SpeakerTargetSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(
			vec![Field::new("endpoint", FieldType::String).with_validator(http_url)],
			vec![Field::new(
				"timeout_ms",
				FieldType::Integer {
					min: Some(1),
					max: Some(60_000),
				},
			)],
		)
		.validate(config)
	}
}

#[async_trait]
impl TargetInterface for SpeakerTarget {
	fn kind(&self) -> &str {
		"speaker"
	}

	async fn execute(&self, request: &ActionRequest) -> Result<(), TargetError> {
		let command = required_str(&request.parameters, "command")?;

		let response = self
			.client
			.post(&self.endpoint)
			.json(&serde_json::json!({ "command": command }))
			.send()
			.await
			.map_err(|e| TargetError::Execution(format!("Failed to send command: {}", e)))?;

		let status = response.status();
		if !status.is_success() {
			return Err(TargetError::Execution(format!(
				"Speaker rejected command with status {}",
				status
			)));
		}

		info!(
			endpoint = %self.endpoint,
			intent = %request.intent,
			status = status.as_u16(),
			"Speaker accepted command '{}'",
			command
		);
		Ok(())
	}
}

/// Factory for `kind = "speaker"`.
///
/// Configuration parameters:
/// - `endpoint`: command URL, e.g. `https://googlehome.local/command`
/// - `timeout_ms`: request timeout (default: 5000)
pub fn create_target(config: &toml::Value) -> Result<Box<dyn TargetInterface>, TargetError> {
	SpeakerTargetSchema.validate(config)?;

	let endpoint = config
		.get("endpoint")
		.and_then(|v| v.as_str())
		.unwrap_or_default();
	let timeout_ms = config
		.get("timeout_ms")
		.and_then(|v| v.as_integer())
		.map(|v| v as u64)
		.unwrap_or(DEFAULT_TIMEOUT_MS);

	Ok(Box::new(SpeakerTarget::new(
		endpoint,
		Duration::from_millis(timeout_ms),
	)?))
}
