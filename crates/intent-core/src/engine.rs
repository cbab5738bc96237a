//! The dispatch loop.
//!
//! [`IntentEngine`] owns the event source, the loaded intents and the target
//! registry, and runs them as one sequential worker: poll the source, drop
//! events already seen, match the rest against the intents and dispatch each
//! matched intent's actions in order. Target failures and transient source
//! failures never stop the loop; a source that rejects its selector or
//! configuration does, as does the shutdown future.

use crate::dedup::DedupSet;
use crate::event_bus::EventBus;
use crate::matching::find_matches;
use crate::EngineError;
use backoff::{backoff::Backoff, ExponentialBackoff};
use intent_source::{Cursor, Selector, SourceInterface};
use intent_targets::{ActionRequest, TargetRegistry};
use intent_types::{
	DispatchEvent, EngineEvent, Event, Intent, IntentDefinition, MatchEvent, SourceEvent,
};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Timing and sizing knobs for the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
	/// Pause between successful cycles.
	pub poll_interval: Duration,
	/// Upper bound on a single open or poll call.
	pub poll_timeout: Duration,
	/// Dedupe keys kept before the set is cleared.
	pub dedup_capacity: usize,
	pub backoff_initial: Duration,
	pub backoff_max: Duration,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_millis(1_000),
			poll_timeout: Duration::from_millis(10_000),
			dedup_capacity: 1_000,
			backoff_initial: Duration::from_millis(1_000),
			backoff_max: Duration::from_millis(30_000),
		}
	}
}

impl From<&intent_config::EngineSettings> for EngineConfig {
	fn from(settings: &intent_config::EngineSettings) -> Self {
		Self {
			poll_interval: Duration::from_millis(settings.poll_interval_ms),
			poll_timeout: Duration::from_millis(settings.poll_timeout_ms),
			dedup_capacity: settings.dedup_capacity,
			backoff_initial: Duration::from_millis(settings.backoff_initial_ms),
			backoff_max: Duration::from_millis(settings.backoff_max_ms),
		}
	}
}

/// Counters for one batch of events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
	pub events: usize,
	pub duplicates: usize,
	pub matched: usize,
	pub dispatched: usize,
	pub failed: usize,
}

/// Converts definitions into intents, logging and dropping the invalid ones.
pub fn load_intents(definitions: Vec<IntentDefinition>) -> Vec<Intent> {
	let mut intents = Vec::with_capacity(definitions.len());
	for definition in definitions {
		let name = definition.name.clone();
		match Intent::try_from(definition) {
			Ok(intent) => {
				debug!(
					intent = %intent.name,
					event = %intent.trigger.event_name,
					actions = intent.actions.len(),
					"Loaded intent"
				);
				intents.push(intent);
			}
			Err(e) => error!(intent = %name, error = %e, "Rejected intent definition"),
		}
	}
	intents
}

fn new_backoff(config: &EngineConfig) -> ExponentialBackoff {
	let mut backoff = ExponentialBackoff {
		initial_interval: config.backoff_initial,
		max_interval: config.backoff_max,
		max_elapsed_time: None,
		..Default::default()
	};
	backoff.reset();
	backoff
}

pub struct IntentEngine {
	config: EngineConfig,
	source: Box<dyn SourceInterface>,
	selector: Selector,
	intents: Vec<Intent>,
	registry: TargetRegistry,
	dedup: DedupSet,
	/// `None` until the source is opened, and again after any source failure.
	cursor: Option<Cursor>,
	backoff: ExponentialBackoff,
	event_bus: EventBus,
}

impl IntentEngine {
	pub fn new(
		config: EngineConfig,
		source: Box<dyn SourceInterface>,
		selector: Selector,
		intents: Vec<Intent>,
		registry: TargetRegistry,
	) -> Self {
		Self {
			dedup: DedupSet::new(config.dedup_capacity),
			backoff: new_backoff(&config),
			config,
			source,
			selector,
			intents,
			registry,
			cursor: None,
			event_bus: EventBus::default(),
		}
	}

	pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
		self.event_bus = event_bus;
		self
	}

	pub fn intents(&self) -> &[Intent] {
		&self.intents
	}

	pub fn registry(&self) -> &TargetRegistry {
		&self.registry
	}

	pub fn selector(&self) -> &Selector {
		&self.selector
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Runs until `shutdown` resolves.
	///
	/// Every wait (open, poll, interval sleep, backoff sleep) races the
	/// shutdown future. Dispatching a batch is never interrupted. Returns an
	/// error only when the source fails in a way reopening cannot fix.
	pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), EngineError>
	where
		F: Future<Output = ()>,
	{
		tokio::pin!(shutdown);

		info!(
			source = self.source.kind(),
			event = %self.selector.event_name,
			address = ?self.selector.source_identity,
			intents = self.intents.len(),
			targets = self.registry.len(),
			"Intent engine started"
		);

		loop {
			let polled = tokio::select! {
				biased;
				_ = &mut shutdown => break,
				polled = self.poll_source() => polled,
			};

			let pause = match polled {
				Ok(events) => {
					self.backoff.reset();
					let stats = self.process_events(events).await;
					if stats.events > 0 {
						debug!(?stats, "Cycle complete");
					}
					self.config.poll_interval
				}
				Err(e) if !e.is_transient() => {
					error!(error = %e, "Event source cannot be recovered, stopping");
					return Err(e);
				}
				Err(e) => {
					let delay = self.backoff.next_backoff().unwrap_or(self.config.backoff_max);
					warn!(error = %e, retry_in = ?delay, "Event source failed, will reopen");
					delay
				}
			};

			tokio::select! {
				biased;
				_ = &mut shutdown => break,
				_ = tokio::time::sleep(pause) => {}
			}
		}

		info!("Intent engine stopped");
		Ok(())
	}

	/// One poll and dispatch pass without any sleeping.
	pub async fn run_cycle(&mut self) -> Result<CycleStats, EngineError> {
		let events = self.poll_source().await?;
		Ok(self.process_events(events).await)
	}

	/// Polls the source, opening it first if there is no cursor. Any failure
	/// drops the cursor so the next call reopens.
	async fn poll_source(&mut self) -> Result<Vec<Event>, EngineError> {
		let cursor = match self.cursor {
			Some(cursor) => cursor,
			None => self.open_source().await?,
		};

		let result = match tokio::time::timeout(self.config.poll_timeout, self.source.poll(cursor))
			.await
		{
			Ok(Ok((events, next))) => {
				self.cursor = Some(next);
				return Ok(events);
			}
			Ok(Err(e)) => EngineError::Source(e),
			Err(_) => EngineError::Timeout(self.config.poll_timeout),
		};

		self.cursor = None;
		self.publish(EngineEvent::Source(SourceEvent::PollFailed {
			error: result.to_string(),
		}));
		Err(result)
	}

	async fn open_source(&mut self) -> Result<Cursor, EngineError> {
		let opened =
			tokio::time::timeout(self.config.poll_timeout, self.source.open(&self.selector)).await;

		let error = match opened {
			Ok(Ok(cursor)) => {
				info!(position = cursor.position, "Event source opened");
				self.cursor = Some(cursor);
				self.publish(EngineEvent::Source(SourceEvent::Opened {
					position: cursor.position,
				}));
				return Ok(cursor);
			}
			Ok(Err(e)) => EngineError::Source(e),
			Err(_) => EngineError::Timeout(self.config.poll_timeout),
		};

		self.publish(EngineEvent::Source(SourceEvent::OpenFailed {
			error: error.to_string(),
		}));
		Err(error)
	}

	/// Dedups, matches and dispatches a batch in order, then trims the dedup
	/// set if it outgrew its bound.
	pub async fn process_events(&mut self, events: Vec<Event>) -> CycleStats {
		let mut stats = CycleStats::default();

		for event in events {
			stats.events += 1;

			if let Some(key) = &event.dedupe_key {
				if !self.dedup.check_and_insert(key) {
					stats.duplicates += 1;
					debug!(dedupe_key = %key, "Skipping already seen event");
					continue;
				}
			}

			let matched = find_matches(&self.intents, &event);
			if matched.is_empty() {
				debug!(
					event = %event.name,
					source_identity = ?event.source_identity,
					dedupe_key = ?event.dedupe_key,
					"No intent matched"
				);
				self.publish(EngineEvent::Match(MatchEvent::Unmatched {
					event: event.name.clone(),
					dedupe_key: event.dedupe_key.clone(),
				}));
				continue;
			}

			for intent in matched {
				stats.matched += 1;
				info!(
					intent = %intent.name,
					module = ?intent.module,
					event = %event.name,
					dedupe_key = ?event.dedupe_key,
					"Intent matched"
				);
				self.publish(EngineEvent::Match(MatchEvent::Matched {
					intent: intent.name.clone(),
					event: event.name.clone(),
					dedupe_key: event.dedupe_key.clone(),
				}));

				for action in &intent.actions {
					let request = ActionRequest {
						intent: intent.name.clone(),
						parameters: action.parameters.clone(),
						event: event.clone(),
					};

					let outcome = match self.registry.dispatch(&action.target, &request).await {
						Ok(()) => {
							stats.dispatched += 1;
							DispatchEvent::Succeeded {
								intent: intent.name.clone(),
								target: action.target.clone(),
							}
						}
						Err(e) => {
							stats.failed += 1;
							DispatchEvent::Failed {
								intent: intent.name.clone(),
								target: action.target.clone(),
								error: e.to_string(),
							}
						}
					};
					self.publish(EngineEvent::Dispatch(outcome));
				}
			}
		}

		if let Some(size) = self.dedup.clear_if_over() {
			info!(
				size,
				capacity = self.dedup.capacity(),
				"Dedup set full, cleared"
			);
			self.publish(EngineEvent::Source(SourceEvent::DedupCleared { size }));
		}

		stats
	}

	fn publish(&self, event: EngineEvent) {
		self.event_bus.publish(event).ok();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use intent_source::SourceError;
	use intent_targets::{TargetError, TargetInterface};
	use intent_types::{Action, ActionParameters, Trigger};
	use std::collections::VecDeque;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::{Arc, Mutex};

	enum Step {
		Events(Vec<Event>),
		Fail,
	}

	struct ScriptedSource {
		steps: Arc<Mutex<VecDeque<Step>>>,
		opens: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl SourceInterface for ScriptedSource {
		fn kind(&self) -> &str {
			"scripted"
		}

		async fn open(&mut self, _selector: &Selector) -> Result<Cursor, SourceError> {
			self.opens.fetch_add(1, Ordering::SeqCst);
			Ok(Cursor::new(0))
		}

		async fn poll(&mut self, cursor: Cursor) -> Result<(Vec<Event>, Cursor), SourceError> {
			let step = self.steps.lock().unwrap().pop_front();
			match step {
				Some(Step::Events(events)) => Ok((events, Cursor::new(cursor.position + 1))),
				Some(Step::Fail) => Err(SourceError::Unavailable("connection reset".to_string())),
				None => Ok((Vec::new(), cursor)),
			}
		}
	}

	type Calls = Arc<Mutex<Vec<(String, ActionParameters)>>>;

	struct RecordingTarget {
		calls: Calls,
	}

	#[async_trait]
	impl TargetInterface for RecordingTarget {
		fn kind(&self) -> &str {
			"recording"
		}

		async fn execute(&self, request: &ActionRequest) -> Result<(), TargetError> {
			self.calls
				.lock()
				.unwrap()
				.push((request.intent.clone(), request.parameters.clone()));
			Ok(())
		}
	}

	struct FailingTarget;

	#[async_trait]
	impl TargetInterface for FailingTarget {
		fn kind(&self) -> &str {
			"failing"
		}

		async fn execute(&self, _request: &ActionRequest) -> Result<(), TargetError> {
			Err(TargetError::Execution("unplugged".to_string()))
		}
	}

	struct Harness {
		engine: IntentEngine,
		steps: Arc<Mutex<VecDeque<Step>>>,
		opens: Arc<AtomicUsize>,
		speaker: Calls,
		led: Calls,
	}

	impl Harness {
		fn push(&self, events: Vec<Event>) {
			self.steps.lock().unwrap().push_back(Step::Events(events));
		}

		fn fail(&self) {
			self.steps.lock().unwrap().push_back(Step::Fail);
		}
	}

	fn params(value: serde_json::Value) -> ActionParameters {
		value.as_object().cloned().unwrap_or_default()
	}

	fn dai_monitor() -> Intent {
		Intent {
			name: "dai_monitor".to_string(),
			module: Some("dai_monitor".to_string()),
			trigger: Trigger {
				event_name: "Transfer".to_string(),
				contract_address: Some("0xDAI".to_string()),
			},
			actions: vec![
				Action {
					target: "speaker".to_string(),
					parameters: params(serde_json::json!({ "command": "play" })),
				},
				Action {
					target: "led".to_string(),
					parameters: params(serde_json::json!({ "state": "on" })),
				},
			],
		}
	}

	fn transfer(tx: &str, address: &str) -> Event {
		Event::new("Transfer")
			.with_source_identity(address)
			.with_dedupe_key(tx)
	}

	fn harness(intents: Vec<Intent>, config: EngineConfig) -> Harness {
		let steps = Arc::new(Mutex::new(VecDeque::new()));
		let opens = Arc::new(AtomicUsize::new(0));
		let speaker: Calls = Arc::new(Mutex::new(Vec::new()));
		let led: Calls = Arc::new(Mutex::new(Vec::new()));

		let mut registry = TargetRegistry::new();
		registry.register(
			"speaker",
			Box::new(RecordingTarget {
				calls: speaker.clone(),
			}),
		);
		registry.register("led", Box::new(RecordingTarget { calls: led.clone() }));
		registry.register("broken", Box::new(FailingTarget));

		let source = ScriptedSource {
			steps: steps.clone(),
			opens: opens.clone(),
		};
		let selector = Selector {
			event_name: "Transfer".to_string(),
			source_identity: Some("0xDAI".to_string()),
			schema: serde_json::Value::Null,
		};

		Harness {
			engine: IntentEngine::new(config, Box::new(source), selector, intents, registry),
			steps,
			opens,
			speaker,
			led,
		}
	}

	fn fast_config() -> EngineConfig {
		EngineConfig {
			poll_interval: Duration::from_millis(5),
			poll_timeout: Duration::from_millis(200),
			dedup_capacity: 1_000,
			backoff_initial: Duration::from_millis(5),
			backoff_max: Duration::from_millis(20),
		}
	}

	#[tokio::test]
	async fn test_transfer_dispatches_once_across_polls() {
		let mut h = harness(vec![dai_monitor()], fast_config());
		h.push(vec![transfer("tx1", "0xDAI")]);
		h.push(vec![transfer("tx1", "0xDAI")]);

		let first = h.engine.run_cycle().await.unwrap();
		assert_eq!(first.matched, 1);
		assert_eq!(first.dispatched, 2);

		let second = h.engine.run_cycle().await.unwrap();
		assert_eq!(second.duplicates, 1);
		assert_eq!(second.dispatched, 0);

		let speaker = h.speaker.lock().unwrap();
		assert_eq!(speaker.len(), 1);
		assert_eq!(speaker[0].0, "dai_monitor");
		assert_eq!(speaker[0].1["command"], "play");
		let led = h.led.lock().unwrap();
		assert_eq!(led.len(), 1);
		assert_eq!(led[0].1["state"], "on");
	}

	#[tokio::test]
	async fn test_other_contract_dispatches_nothing() {
		let mut h = harness(vec![dai_monitor()], fast_config());
		h.push(vec![transfer("tx2", "0xOTHER")]);

		let stats = h.engine.run_cycle().await.unwrap();
		assert_eq!(stats.events, 1);
		assert_eq!(stats.matched, 0);
		assert!(h.speaker.lock().unwrap().is_empty());
		assert!(h.led.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_redelivery_after_dedup_clear_dispatches_again() {
		let config = EngineConfig {
			dedup_capacity: 1,
			..fast_config()
		};
		let mut h = harness(vec![dai_monitor()], config);
		h.push(vec![transfer("tx1", "0xDAI"), transfer("tx2", "0xDAI")]);
		h.push(vec![transfer("tx1", "0xDAI")]);

		h.engine.run_cycle().await.unwrap();
		let again = h.engine.run_cycle().await.unwrap();

		assert_eq!(again.duplicates, 0);
		assert_eq!(again.matched, 1);
		assert_eq!(h.speaker.lock().unwrap().len(), 3);
	}

	#[tokio::test]
	async fn test_events_without_dedupe_key_always_processed() {
		let mut h = harness(vec![dai_monitor()], fast_config());
		let event = Event::new("Transfer").with_source_identity("0xdai");
		h.push(vec![event.clone(), event]);

		let stats = h.engine.run_cycle().await.unwrap();
		assert_eq!(stats.matched, 2);
		assert_eq!(h.led.lock().unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_failed_action_does_not_abort_siblings() {
		let mut intent = dai_monitor();
		intent.actions.insert(
			0,
			Action {
				target: "broken".to_string(),
				parameters: ActionParameters::new(),
			},
		);
		intent.actions.insert(
			1,
			Action {
				target: "missing".to_string(),
				parameters: ActionParameters::new(),
			},
		);
		let mut h = harness(vec![intent], fast_config());
		let mut events = h.engine.event_bus().subscribe();
		h.push(vec![transfer("tx1", "0xDAI")]);

		let stats = h.engine.run_cycle().await.unwrap();

		assert_eq!(stats.failed, 2);
		assert_eq!(stats.dispatched, 2);
		assert_eq!(h.speaker.lock().unwrap().len(), 1);
		assert_eq!(h.led.lock().unwrap().len(), 1);

		let mut failed_targets = Vec::new();
		while let Ok(event) = events.try_recv() {
			if let EngineEvent::Dispatch(DispatchEvent::Failed { target, .. }) = event {
				failed_targets.push(target);
			}
		}
		assert_eq!(failed_targets, vec!["broken", "missing"]);
	}

	#[tokio::test]
	async fn test_poll_failure_reopens_source() {
		let mut h = harness(vec![dai_monitor()], fast_config());
		let mut events = h.engine.event_bus().subscribe();
		h.fail();
		h.push(vec![transfer("tx1", "0xDAI")]);

		assert!(matches!(
			h.engine.run_cycle().await,
			Err(EngineError::Source(SourceError::Unavailable(_)))
		));
		assert_eq!(h.opens.load(Ordering::SeqCst), 1);

		let stats = h.engine.run_cycle().await.unwrap();
		assert_eq!(stats.dispatched, 2);
		assert_eq!(h.opens.load(Ordering::SeqCst), 2);

		assert_eq!(
			events.try_recv().unwrap(),
			EngineEvent::Source(SourceEvent::Opened { position: 0 })
		);
		assert!(matches!(
			events.try_recv().unwrap(),
			EngineEvent::Source(SourceEvent::PollFailed { .. })
		));
		assert_eq!(
			events.try_recv().unwrap(),
			EngineEvent::Source(SourceEvent::Opened { position: 0 })
		);
	}

	#[tokio::test]
	async fn test_run_until_stops_on_shutdown() {
		let mut h = harness(vec![dai_monitor()], fast_config());
		h.push(vec![transfer("tx1", "0xDAI")]);
		h.fail();

		let (tx, rx) = tokio::sync::oneshot::channel::<()>();
		let shutdown = async move {
			rx.await.ok();
		};

		let stopper = tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(100)).await;
			tx.send(()).ok();
		});

		let result = tokio::time::timeout(Duration::from_secs(5), h.engine.run_until(shutdown)).await;
		stopper.await.unwrap();

		assert!(matches!(result, Ok(Ok(()))));
		assert_eq!(h.speaker.lock().unwrap().len(), 1);
		assert!(h.opens.load(Ordering::SeqCst) >= 2);
	}

	struct RejectingSource {
		opens: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl SourceInterface for RejectingSource {
		fn kind(&self) -> &str {
			"rejecting"
		}

		async fn open(&mut self, selector: &Selector) -> Result<Cursor, SourceError> {
			self.opens.fetch_add(1, Ordering::SeqCst);
			Err(SourceError::InvalidSelector(format!(
				"event '{}' not found in ABI",
				selector.event_name
			)))
		}

		async fn poll(&mut self, _cursor: Cursor) -> Result<(Vec<Event>, Cursor), SourceError> {
			Err(SourceError::NotOpen)
		}
	}

	struct HangingSource {
		opens: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl SourceInterface for HangingSource {
		fn kind(&self) -> &str {
			"hanging"
		}

		async fn open(&mut self, _selector: &Selector) -> Result<Cursor, SourceError> {
			self.opens.fetch_add(1, Ordering::SeqCst);
			Ok(Cursor::new(0))
		}

		async fn poll(&mut self, _cursor: Cursor) -> Result<(Vec<Event>, Cursor), SourceError> {
			std::future::pending().await
		}
	}

	fn engine_with_source(source: Box<dyn SourceInterface>, config: EngineConfig) -> IntentEngine {
		let selector = Selector {
			event_name: "Transfr".to_string(),
			source_identity: Some("0xDAI".to_string()),
			schema: serde_json::Value::Null,
		};
		IntentEngine::new(config, source, selector, vec![dai_monitor()], TargetRegistry::new())
	}

	#[tokio::test]
	async fn test_invalid_selector_stops_run_until() {
		let opens = Arc::new(AtomicUsize::new(0));
		let mut engine = engine_with_source(
			Box::new(RejectingSource {
				opens: opens.clone(),
			}),
			fast_config(),
		);

		let result = tokio::time::timeout(
			Duration::from_secs(2),
			engine.run_until(std::future::pending::<()>()),
		)
		.await;

		assert!(matches!(
			result,
			Ok(Err(EngineError::Source(SourceError::InvalidSelector(_))))
		));
		assert_eq!(opens.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_hanging_poll_times_out_and_reopens() {
		let opens = Arc::new(AtomicUsize::new(0));
		let config = EngineConfig {
			poll_timeout: Duration::from_millis(30),
			..fast_config()
		};
		let mut engine = engine_with_source(
			Box::new(HangingSource {
				opens: opens.clone(),
			}),
			config,
		);

		let first = engine.run_cycle().await;
		assert!(matches!(first, Err(EngineError::Timeout(d)) if d == Duration::from_millis(30)));
		assert!(first.unwrap_err().is_transient());

		assert!(matches!(engine.run_cycle().await, Err(EngineError::Timeout(_))));
		assert_eq!(opens.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_shutdown_interrupts_hanging_poll() {
		let opens = Arc::new(AtomicUsize::new(0));
		let config = EngineConfig {
			poll_timeout: Duration::from_secs(60),
			..fast_config()
		};
		let mut engine = engine_with_source(
			Box::new(HangingSource {
				opens: opens.clone(),
			}),
			config,
		);

		let shutdown = tokio::time::sleep(Duration::from_millis(50));
		let result = tokio::time::timeout(Duration::from_secs(2), engine.run_until(shutdown)).await;

		assert!(matches!(result, Ok(Ok(()))));
		assert_eq!(opens.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_load_intents_drops_invalid_definitions() {
		let definitions: Vec<IntentDefinition> = vec![
			toml::from_str(
				r#"
name = "dai_monitor"
trigger = { event = "Transfer" }
actions = [{ device = "led", state = "on" }]
"#,
			)
			.unwrap(),
			toml::from_str(r#"name = "no_trigger""#).unwrap(),
			toml::from_str(
				r#"
name = "no_event"
trigger = { contract_address = "0xDAI" }
"#,
			)
			.unwrap(),
		];

		let intents = load_intents(definitions);
		assert_eq!(intents.len(), 1);
		assert_eq!(intents[0].name, "dai_monitor");
	}

	#[test]
	fn test_engine_config_from_settings() {
		let config = EngineConfig::from(&intent_config::EngineSettings::default());
		assert_eq!(config, EngineConfig::default());
	}
}
