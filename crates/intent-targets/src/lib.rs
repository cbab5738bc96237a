//! Action targets and the registry that dispatches to them.
//!
//! A target is anything that can carry out one action: switch an LED, send a
//! command to a speaker, call a webhook. The engine never talks to a target
//! directly. It asks the [`TargetRegistry`] to dispatch by name, and the
//! registry turns every failure into a [`DispatchError`] the caller can log
//! and move past.

use async_trait::async_trait;
use intent_types::{ActionParameters, Event, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub mod implementations {
	pub mod led;
	pub mod speaker;
}

/// Errors raised by a target while being built or while executing.
#[derive(Debug, Error)]
pub enum TargetError {
	#[error("Invalid configuration: {0}")]
	InvalidConfig(#[from] ValidationError),
	#[error("Unknown target kind: {0}")]
	UnknownKind(String),
	#[error("Duplicate target name: {0}")]
	DuplicateName(String),
	#[error("Invalid action parameters: {0}")]
	InvalidParameters(String),
	#[error("Execution failed: {0}")]
	Execution(String),
}

/// Errors surfaced by [`TargetRegistry::dispatch`].
#[derive(Debug, Error)]
pub enum DispatchError {
	#[error("Target not found: {0}")]
	TargetNotFound(String),
	#[error("Target '{target}' failed: {source}")]
	TargetExecution {
		target: String,
		#[source]
		source: TargetError,
	},
}

/// Everything a target gets to see for one action.
#[derive(Debug, Clone)]
pub struct ActionRequest {
	/// Name of the intent the action belongs to.
	pub intent: String,
	pub parameters: ActionParameters,
	/// The event that fired the intent.
	pub event: Event,
}

/// Capability implemented by every action target.
#[async_trait]
pub trait TargetInterface: Send + Sync {
	/// Short implementation name used in log lines.
	fn kind(&self) -> &str;

	/// Performs the action's side effect.
	async fn execute(&self, request: &ActionRequest) -> Result<(), TargetError>;
}

/// Builds a target from its implementation-specific configuration.
pub type TargetFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn TargetInterface>, TargetError> + Send + Sync>;

/// One `[[targets]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefinition {
	pub name: String,
	pub kind: String,
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::Table::new())
}

/// A definition that could not be turned into a target.
#[derive(Debug)]
pub struct LoadFailure {
	pub name: String,
	pub error: TargetError,
}

/// Name-keyed collection of constructed targets.
///
/// The registry owns every target it holds. Loading is best effort: one
/// broken definition is recorded in [`failures`](Self::failures) and the
/// remaining definitions still load.
#[derive(Default)]
pub struct TargetRegistry {
	targets: HashMap<String, Box<dyn TargetInterface>>,
	failures: Vec<LoadFailure>,
}

impl TargetRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a registry from definitions, resolving each kind through `factories`.
	pub fn load(
		definitions: &[TargetDefinition],
		factories: &HashMap<String, TargetFactory>,
	) -> Self {
		let mut registry = Self::new();

		for definition in definitions {
			match registry.build(definition, factories) {
				Ok(target) => {
					info!(
						target_name = %definition.name,
						kind = %definition.kind,
						"Loaded action target"
					);
					registry.targets.insert(definition.name.clone(), target);
				}
				Err(e) => {
					error!(
						target_name = %definition.name,
						kind = %definition.kind,
						error = %e,
						"Failed to load action target"
					);
					registry.failures.push(LoadFailure {
						name: definition.name.clone(),
						error: e,
					});
				}
			}
		}

		registry
	}

	fn build(
		&self,
		definition: &TargetDefinition,
		factories: &HashMap<String, TargetFactory>,
	) -> Result<Box<dyn TargetInterface>, TargetError> {
		if self.targets.contains_key(&definition.name) {
			return Err(TargetError::DuplicateName(definition.name.clone()));
		}
		let factory = factories
			.get(&definition.kind)
			.ok_or_else(|| TargetError::UnknownKind(definition.kind.clone()))?;
		factory(&definition.config)
	}

	/// Registers an already constructed target, replacing any previous one.
	pub fn register(&mut self, name: impl Into<String>, target: Box<dyn TargetInterface>) {
		let name = name.into();
		if self.targets.insert(name.clone(), target).is_some() {
			warn!(target_name = %name, "Replaced existing action target");
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.targets.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.targets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}

	/// Registered target names, sorted.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn failures(&self) -> &[LoadFailure] {
		&self.failures
	}

	/// Forwards `request` to the target registered as `name`.
	pub async fn dispatch(&self, name: &str, request: &ActionRequest) -> Result<(), DispatchError> {
		let Some(target) = self.targets.get(name) else {
			warn!(target_name = %name, intent = %request.intent, "Action target not found");
			return Err(DispatchError::TargetNotFound(name.to_string()));
		};

		debug!(
			target_name = %name,
			kind = target.kind(),
			intent = %request.intent,
			event = %request.event.label(),
			"Dispatching action"
		);

		match target.execute(request).await {
			Ok(()) => {
				debug!(
					target_name = %name,
					intent = %request.intent,
					event = %request.event.label(),
					"Action dispatched"
				);
				Ok(())
			}
			Err(e) => {
				error!(
					target_name = %name,
					intent = %request.intent,
					event = %request.event.label(),
					error = %e,
					"Action target failed"
				);
				Err(DispatchError::TargetExecution {
					target: name.to_string(),
					source: e,
				})
			}
		}
	}
}

/// Reads a required string parameter from an action.
pub fn required_str<'a>(parameters: &'a ActionParameters, key: &str) -> Result<&'a str, TargetError> {
	parameters
		.get(key)
		.and_then(|value| value.as_str())
		.ok_or_else(|| TargetError::InvalidParameters(format!("missing string parameter '{}'", key)))
}
