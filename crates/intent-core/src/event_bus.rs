//! Broadcast channel for engine notifications.
//!
//! The engine publishes an [`EngineEvent`] for every match decision, dispatch
//! outcome and source failure. Publishing never blocks and succeeds whether
//! or not anyone is listening.

use intent_types::EngineEvent;
use tokio::sync::broadcast;

/// Event bus for broadcasting engine events to any number of subscribers.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
	/// Creates a bus buffering up to `capacity` events per slow subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Each subscriber receives every event published after it subscribed.
	pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns an error if there are no active subscribers, which callers
	/// usually ignore.
	pub fn publish(
		&self,
		event: EngineEvent,
	) -> Result<(), broadcast::error::SendError<EngineEvent>> {
		self.sender.send(event)?;
		Ok(())
	}

	pub fn subscriber_count(&self) -> usize {
		self.sender.receiver_count()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(1000)
	}
}
