//! Observed event types.
//!
//! An [`Event`] is what an event source hands to the engine after decoding
//! one entry of the external stream (for on-chain sources, one contract log).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single occurrence observed on the watched stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	/// Event kind, e.g. the contract event name (`Transfer`).
	pub name: String,
	/// Entity that raised the event, e.g. the emitting contract address.
	pub source_identity: Option<String>,
	/// Value unique to this occurrence, used to suppress redelivery.
	pub dedupe_key: Option<String>,
	/// Decoded event data. Never inspected by the matcher.
	pub payload: serde_json::Value,
	/// When the source produced this event.
	pub observed_at: DateTime<Utc>,
}

impl Event {
	/// Creates an event with no identity, no dedupe key and a null payload.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			source_identity: None,
			dedupe_key: None,
			payload: serde_json::Value::Null,
			observed_at: Utc::now(),
		}
	}

	pub fn with_source_identity(mut self, identity: impl Into<String>) -> Self {
		self.source_identity = Some(identity.into());
		self
	}

	pub fn with_dedupe_key(mut self, key: impl Into<String>) -> Self {
		self.dedupe_key = Some(key.into());
		self
	}

	pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
		self.payload = payload;
		self
	}

	/// Short label for log lines: the dedupe key when present, else the name.
	pub fn label(&self) -> &str {
		self.dedupe_key.as_deref().unwrap_or(&self.name)
	}
}
