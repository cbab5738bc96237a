//! GPIO LED target.
//!
//! Drives a single output pin on or off. The pin is simulated in memory, so
//! the target runs anywhere; the state it would have written is logged and
//! can be read back with [`LedTarget::is_lit`].

use crate::{required_str, ActionRequest, TargetError, TargetInterface};
use async_trait::async_trait;
use intent_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

pub struct LedTarget {
	pin: u8,
	lit: AtomicBool,
}

impl LedTarget {
	pub fn new(pin: u8) -> Self {
		Self {
			pin,
			lit: AtomicBool::new(false),
		}
	}

	pub fn is_lit(&self) -> bool {
		self.lit.load(Ordering::SeqCst)
	}
}

pub struct LedTargetSchema;

impl ConfigSchema for LedTargetSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(
			vec![Field::new(
				"pin",
				FieldType::Integer {
					min: Some(0),
					max: Some(40),
				},
			)],
			vec![],
		)
		.validate(config)
	}
}

#[async_trait]
impl TargetInterface for LedTarget {
	fn kind(&self) -> &str {
		"led"
	}

	async fn execute(&self, request: &ActionRequest) -> Result<(), TargetError> {
		let on = match required_str(&request.parameters, "state")? {
			"on" => true,
			"off" => false,
			other => {
				return Err(TargetError::InvalidParameters(format!(
					"unknown LED state '{}'",
					other
				)))
			}
		};

		self.lit.store(on, Ordering::SeqCst);
		info!(
			pin = self.pin,
			intent = %request.intent,
			"LED turned {}",
			if on { "ON" } else { "OFF" }
		);
		Ok(())
	}
}

/// Factory for `kind = "led"`.
///
/// Configuration parameters:
/// - `pin`: GPIO pin number (0-40)
pub fn create_target(config: &toml::Value) -> Result<Box<dyn TargetInterface>, TargetError> {
	LedTargetSchema.validate(config)?;

	let pin = config
		.get("pin")
		.and_then(|v| v.as_integer())
		.and_then(|v| u8::try_from(v).ok())
		.ok_or_else(|| TargetError::InvalidParameters("pin out of range".to_string()))?;

	Ok(Box::new(LedTarget::new(pin)))
}
