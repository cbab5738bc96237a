//! Intent matching.
//!
//! Matching is a pure function of the loaded intents and one event. Every
//! intent is checked, in load order, and all that match are returned.

use intent_types::{Event, Intent, Trigger};

/// Whether `trigger` accepts `event`.
///
/// The event name must match exactly. A trigger with no address, or the
/// `dynamic` sentinel, accepts any source; otherwise the event's source
/// identity must equal the address, ignoring ASCII case.
pub fn trigger_matches(trigger: &Trigger, event: &Event) -> bool {
	if trigger.event_name != event.name {
		return false;
	}
	if trigger.is_wildcard() {
		return true;
	}
	match (&trigger.contract_address, &event.source_identity) {
		(Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
		_ => false,
	}
}

/// Returns the intents that fire for `event`, in load order.
pub fn find_matches<'a>(intents: &'a [Intent], event: &Event) -> Vec<&'a Intent> {
	intents
		.iter()
		.filter(|intent| trigger_matches(&intent.trigger, event))
		.collect()
}

/// Intents whose trigger names a different event than the source watches.
/// The source never delivers those, so they can never fire.
pub fn unreachable_intents<'a>(intents: &'a [Intent], watched_event: &str) -> Vec<&'a Intent> {
	intents
		.iter()
		.filter(|intent| intent.trigger.event_name != watched_event)
		.collect()
}
