//! Intent model and definition format.
//!
//! Intents arrive as loosely typed [`IntentDefinition`] records (from TOML or
//! YAML) and are converted into validated [`Intent`] values before the engine
//! ever sees them. A definition without a trigger event is rejected here so
//! the matcher never has to handle it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trigger address value that matches any source identity.
pub const DYNAMIC_ADDRESS: &str = "dynamic";

/// Target-specific action parameters. Opaque to the engine.
pub type ActionParameters = serde_json::Map<String, serde_json::Value>;

/// Errors raised while turning a definition into an [`Intent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
	/// The definition has no trigger section at all.
	#[error("Intent '{0}' has no trigger")]
	MissingTrigger(String),
	/// The trigger exists but names no event.
	#[error("Intent '{0}' trigger has no event name")]
	MissingEventName(String),
	/// Any other structural problem.
	#[error("Invalid intent '{name}': {reason}")]
	InvalidDefinition { name: String, reason: String },
}

/// Predicate portion of an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
	/// Event name that must match exactly.
	pub event_name: String,
	/// Required source identity. `None` matches any source.
	pub contract_address: Option<String>,
}

impl Trigger {
	/// Whether this trigger accepts events from any source identity.
	pub fn is_wildcard(&self) -> bool {
		match &self.contract_address {
			None => true,
			Some(address) => address.eq_ignore_ascii_case(DYNAMIC_ADDRESS),
		}
	}
}

/// One step of an intent, addressed to a registered target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
	pub target: String,
	pub parameters: ActionParameters,
}

/// A validated rule: a trigger plus the actions it runs, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
	pub name: String,
	/// Optional handler label carried over from the definition, used in logs.
	pub module: Option<String>,
	pub trigger: Trigger,
	pub actions: Vec<Action>,
}

/// Raw intent record as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefinition {
	pub name: String,
	#[serde(default)]
	pub module: Option<String>,
	#[serde(default)]
	pub trigger: Option<TriggerDefinition>,
	#[serde(default)]
	pub actions: Vec<ActionDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerDefinition {
	#[serde(default)]
	pub event: Option<String>,
	#[serde(default)]
	pub contract_address: Option<String>,
}

/// Raw action record. Every key other than the target is a parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
	#[serde(alias = "device")]
	pub target: String,
	#[serde(flatten)]
	pub parameters: ActionParameters,
}

impl TryFrom<IntentDefinition> for Intent {
	type Error = IntentError;

	fn try_from(definition: IntentDefinition) -> Result<Self, Self::Error> {
		let name = definition.name.trim().to_string();
		if name.is_empty() {
			return Err(IntentError::InvalidDefinition {
				name: "<unnamed>".to_string(),
				reason: "name must not be empty".to_string(),
			});
		}

		let trigger = definition
			.trigger
			.ok_or_else(|| IntentError::MissingTrigger(name.clone()))?;

		let event_name = trigger
			.event
			.map(|event| event.trim().to_string())
			.filter(|event| !event.is_empty())
			.ok_or_else(|| IntentError::MissingEventName(name.clone()))?;

		let contract_address = trigger
			.contract_address
			.map(|address| address.trim().to_string())
			.filter(|address| !address.is_empty());

		let mut actions = Vec::with_capacity(definition.actions.len());
		for (index, action) in definition.actions.into_iter().enumerate() {
			if action.target.trim().is_empty() {
				return Err(IntentError::InvalidDefinition {
					name,
					reason: format!("actions[{}] has an empty target", index),
				});
			}
			actions.push(Action {
				target: action.target.trim().to_string(),
				parameters: action.parameters,
			});
		}

		Ok(Intent {
			name,
			module: definition.module,
			trigger: Trigger {
				event_name,
				contract_address,
			},
			actions,
		})
	}
}
