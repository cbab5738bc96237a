//! Event source adapters.
//!
//! An event source turns an external stream into [`Event`]s through a small
//! cursor protocol: [`open`](SourceInterface::open) establishes a subscription
//! and returns the starting [`Cursor`], and each [`poll`](SourceInterface::poll)
//! returns whatever arrived after that cursor together with the advanced one.
//!
//! Sources do not retry. A transport failure surfaces as
//! [`SourceError::Unavailable`] and the caller decides when to reopen.

use async_trait::async_trait;
use intent_types::{Event, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod abi;

pub mod implementations {
	pub mod onchain;
}

#[derive(Debug, Error)]
pub enum SourceError {
	/// Transient transport failure. The caller should reopen and back off.
	#[error("Source unavailable: {0}")]
	Unavailable(String),
	#[error("Invalid selector: {0}")]
	InvalidSelector(String),
	#[error("Invalid schema document: {0}")]
	Schema(String),
	#[error("Invalid configuration: {0}")]
	InvalidConfig(#[from] ValidationError),
	#[error("Source polled before it was opened")]
	NotOpen,
}

impl SourceError {
	/// Whether reopening the source can succeed. Selector, schema and
	/// configuration errors repeat on every attempt.
	pub fn is_transient(&self) -> bool {
		matches!(self, SourceError::Unavailable(_) | SourceError::NotOpen)
	}
}

/// What to watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
	/// Event kind, e.g. `Transfer`.
	pub event_name: String,
	/// Restrict to one emitter, e.g. a contract address.
	pub source_identity: Option<String>,
	/// Schema used to decode raw entries, e.g. a contract ABI.
	pub schema: serde_json::Value,
}

/// Position in the stream up to which entries have been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cursor {
	pub position: u64,
}

impl Cursor {
	pub fn new(position: u64) -> Self {
		Self { position }
	}
}

#[async_trait]
pub trait SourceInterface: Send + Sync {
	/// Short implementation name used in log lines.
	fn kind(&self) -> &str;

	/// Establishes (or re-establishes) the subscription described by `selector`.
	async fn open(&mut self, selector: &Selector) -> Result<Cursor, SourceError>;

	/// Returns events after `cursor` and the cursor to use next time.
	async fn poll(&mut self, cursor: Cursor) -> Result<(Vec<Event>, Cursor), SourceError>;
}

/// Builds an event source from its implementation-specific configuration.
pub type SourceFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn SourceInterface>, SourceError> + Send + Sync>;
