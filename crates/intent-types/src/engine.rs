//! Notifications published by the engine while it runs.
//!
//! These mirror the log lines the engine writes, so an embedding application
//! (or a test) can observe matches, dispatches and source failures without
//! scraping logs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
	Source(SourceEvent),
	Match(MatchEvent),
	Dispatch(DispatchEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceEvent {
	/// A subscription was (re)established at the given cursor position.
	Opened { position: u64 },
	/// A poll failed or timed out; the engine will reopen and back off.
	PollFailed { error: String },
	/// Opening the subscription failed.
	OpenFailed { error: String },
	/// The dedup set crossed its bound and was emptied.
	DedupCleared { size: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
	Matched {
		intent: String,
		event: String,
		dedupe_key: Option<String>,
	},
	Unmatched {
		event: String,
		dedupe_key: Option<String>,
	},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DispatchEvent {
	Succeeded {
		intent: String,
		target: String,
	},
	Failed {
		intent: String,
		target: String,
		error: String,
	},
}
