//! Event-to-action dispatch engine.
//!
//! Wires an event source, a set of intents and a target registry into the
//! [`IntentEngine`] loop. Concrete sources and targets are plugged in by kind
//! through [`EngineBuilder`], so this crate never names an implementation.

use intent_config::Config;
use intent_source::{Selector, SourceError, SourceFactory, SourceInterface};
use intent_targets::{TargetError, TargetFactory, TargetInterface, TargetRegistry};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub mod dedup;
pub mod engine;
pub mod event_bus;
pub mod matching;

pub use dedup::DedupSet;
pub use engine::{load_intents, CycleStats, EngineConfig, IntentEngine};
pub use event_bus::EventBus;
pub use matching::{find_matches, trigger_matches, unreachable_intents};

#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Event source error: {0}")]
	Source(#[from] SourceError),
	#[error("Event source did not respond within {0:?}")]
	Timeout(Duration),
}

impl EngineError {
	/// Whether the loop should back off and reopen rather than stop.
	pub fn is_transient(&self) -> bool {
		match self {
			EngineError::Source(e) => e.is_transient(),
			EngineError::Timeout(_) => true,
			EngineError::Config(_) => false,
		}
	}
}

/// Assembles an [`IntentEngine`] from configuration and kind-keyed factories.
pub struct EngineBuilder {
	config: Config,
	schema: Option<serde_json::Value>,
	source_factories: HashMap<String, SourceFactory>,
	target_factories: HashMap<String, TargetFactory>,
	event_bus: Option<EventBus>,
}

impl EngineBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			schema: None,
			source_factories: HashMap::new(),
			target_factories: HashMap::new(),
			event_bus: None,
		}
	}

	/// Schema document handed to the source on open (the contract ABI).
	pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
		self.schema = Some(schema);
		self
	}

	pub fn with_source_factory<F>(mut self, kind: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn SourceInterface>, SourceError>
			+ Send
			+ Sync
			+ 'static,
	{
		self.source_factories
			.insert(kind.to_string(), Box::new(factory));
		self
	}

	pub fn with_target_factory<F>(mut self, kind: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn TargetInterface>, TargetError>
			+ Send
			+ Sync
			+ 'static,
	{
		self.target_factories
			.insert(kind.to_string(), Box::new(factory));
		self
	}

	pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
		self.event_bus = Some(event_bus);
		self
	}

	/// Builds the engine. Fails only on source problems; broken target or
	/// intent definitions are logged and left out.
	pub fn build(self) -> Result<IntentEngine, EngineError> {
		let schema = self
			.schema
			.ok_or_else(|| EngineError::Config("Event schema not provided".into()))?;

		let source_settings = &self.config.source;
		let factory = self
			.source_factories
			.get(&source_settings.kind)
			.ok_or_else(|| {
				EngineError::Config(format!("Unknown source kind: {}", source_settings.kind))
			})?;
		let source = factory(&source_settings.config)?;

		let selector = Selector {
			event_name: source_settings.event.trim().to_string(),
			source_identity: source_settings
				.contract_address
				.as_ref()
				.map(|address| address.trim().to_string())
				.filter(|address| !address.is_empty()),
			schema,
		};

		let registry = TargetRegistry::load(&self.config.targets, &self.target_factories);
		let intents = load_intents(self.config.intents.clone());

		for intent in &intents {
			for action in &intent.actions {
				if !registry.contains(&action.target) {
					warn!(
						intent = %intent.name,
						target_name = %action.target,
						"Intent refers to a target that is not loaded"
					);
				}
			}
		}

		for intent in unreachable_intents(&intents, &selector.event_name) {
			warn!(
				intent = %intent.name,
				trigger_event = %intent.trigger.event_name,
				watched_event = %selector.event_name,
				"Intent can never fire: its trigger event is not the watched event"
			);
		}

		let engine = IntentEngine::new(
			EngineConfig::from(&self.config.engine),
			source,
			selector,
			intents,
			registry,
		);

		Ok(match self.event_bus {
			Some(bus) => engine.with_event_bus(bus),
			None => engine,
		})
	}
}
