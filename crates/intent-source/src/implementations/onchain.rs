//! On-chain log event source.
//!
//! Polls an EVM JSON-RPC endpoint for logs of one ABI event, optionally
//! restricted to a single contract. The cursor position is the last block
//! whose logs have been delivered. Logs are decoded against the ABI into a
//! JSON payload of named arguments.

use crate::abi::{find_event, parse_abi};
use crate::{Cursor, Selector, SourceError, SourceInterface};
use alloy_dyn_abi::{DynSolValue, EventExt};
use alloy_json_abi::Event as AbiEvent;
use alloy_primitives::{Address, B256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::{Filter, Log};
use alloy_transport_http::Http;
use async_trait::async_trait;
use intent_types::{
	http_url, ConfigSchema, Event, Field, FieldType, Schema, ValidationError, DYNAMIC_ADDRESS,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const DEFAULT_MAX_BLOCK_RANGE: u64 = 1_000;

/// The decoded subscription established by `open`.
#[derive(Debug, Clone)]
struct Subscription {
	event: AbiEvent,
	address: Option<Address>,
}

pub struct OnchainSource {
	provider: RootProvider<Http<reqwest::Client>>,
	/// First block to read on the initial open. `None` starts at the head.
	start_block: Option<u64>,
	/// Largest block span requested in one `eth_getLogs` call.
	max_block_range: u64,
	/// Blocks to stay behind the head.
	confirmations: u64,
	subscription: Option<Subscription>,
	/// Highest block delivered so far; reopening resumes from here.
	delivered: Option<u64>,
}

impl OnchainSource {
	pub fn new(rpc_url: &str) -> Result<Self, SourceError> {
		let url = rpc_url
			.parse::<reqwest::Url>()
			.map_err(|e| SourceError::InvalidSelector(format!("Invalid RPC URL: {}", e)))?;

		Ok(Self {
			provider: RootProvider::new_http(url),
			start_block: None,
			max_block_range: DEFAULT_MAX_BLOCK_RANGE,
			confirmations: 0,
			subscription: None,
			delivered: None,
		})
	}

	pub fn with_start_block(mut self, block: u64) -> Self {
		self.start_block = Some(block);
		self
	}

	pub fn with_max_block_range(mut self, range: u64) -> Self {
		self.max_block_range = range.max(1);
		self
	}

	pub fn with_confirmations(mut self, confirmations: u64) -> Self {
		self.confirmations = confirmations;
		self
	}

	/// Latest block considered final enough to read.
	async fn safe_head(&self) -> Result<u64, SourceError> {
		let head = self
			.provider
			.get_block_number()
			.await
			.map_err(|e| SourceError::Unavailable(format!("Failed to get block number: {}", e)))?;
		Ok(head.saturating_sub(self.confirmations))
	}
}

/// Parses the selector's identity into a contract address filter.
fn parse_address(identity: Option<&str>) -> Result<Option<Address>, SourceError> {
	match identity {
		None => Ok(None),
		Some(value) if value.eq_ignore_ascii_case(DYNAMIC_ADDRESS) => Ok(None),
		Some(value) => value
			.parse::<Address>()
			.map(Some)
			.map_err(|e| SourceError::InvalidSelector(format!("Invalid contract address: {}", e))),
	}
}

/// Where to start on open, as a "last delivered" position.
///
/// The cursor names the last block already read, so the earliest block a
/// source can deliver is 1: `start_block = 0` and `start_block = 1` both
/// begin at block 1. The genesis block carries no transactions and so no logs.
fn initial_position(head: u64, start_block: Option<u64>, delivered: Option<u64>) -> u64 {
	match (delivered, start_block) {
		(Some(delivered), _) => delivered.min(head),
		(None, Some(start)) => start.saturating_sub(1).min(head),
		(None, None) => head,
	}
}

/// Converts a decoded Solidity value into JSON. Integers become decimal
/// strings so 256-bit values survive.
fn sol_value_to_json(value: &DynSolValue) -> Value {
	match value {
		DynSolValue::Bool(b) => Value::Bool(*b),
		DynSolValue::Int(i, _) => Value::String(i.to_string()),
		DynSolValue::Uint(u, _) => Value::String(u.to_string()),
		DynSolValue::FixedBytes(word, size) => {
			Value::String(format!("0x{}", hex::encode(&word[..*size])))
		}
		DynSolValue::Address(address) => Value::String(address.to_string()),
		DynSolValue::Function(function) => {
			Value::String(format!("0x{}", hex::encode(function.as_slice())))
		}
		DynSolValue::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
		DynSolValue::String(s) => Value::String(s.clone()),
		DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
			Value::Array(items.iter().map(sol_value_to_json).collect())
		}
		#[allow(unreachable_patterns)]
		_ => Value::Null,
	}
}

/// Position metadata of a raw log.
#[derive(Debug, Clone, Copy, Default)]
struct LogMeta {
	block_number: Option<u64>,
	transaction_hash: Option<B256>,
	log_index: Option<u64>,
}

/// Decodes one raw log into an [`Event`].
fn decode_entry(
	event: &AbiEvent,
	address: Address,
	topics: &[B256],
	data: &[u8],
	meta: LogMeta,
) -> Result<Event, SourceError> {
	let decoded = event
		.decode_log_parts(topics.iter().copied(), data, true)
		.map_err(|e| SourceError::Schema(format!("Failed to decode {}: {}", event.name, e)))?;

	let mut indexed = decoded.indexed.iter();
	let mut body = decoded.body.iter();
	let mut args = serde_json::Map::new();
	for (position, param) in event.inputs.iter().enumerate() {
		let value = if param.indexed {
			indexed.next()
		} else {
			body.next()
		};
		let key = if param.name.is_empty() {
			format!("arg{}", position)
		} else {
			param.name.clone()
		};
		args.insert(key, value.map(sol_value_to_json).unwrap_or(Value::Null));
	}

	let transaction_hash = meta
		.transaction_hash
		.map(|hash| format!("0x{}", hex::encode(hash)));
	let dedupe_key = transaction_hash
		.as_ref()
		.map(|hash| format!("{}:{}", hash, meta.log_index.unwrap_or_default()));

	let payload = json!({
		"args": args,
		"block_number": meta.block_number,
		"transaction_hash": transaction_hash,
		"log_index": meta.log_index,
	});

	let mut observed = Event::new(event.name.clone())
		.with_source_identity(address.to_string())
		.with_payload(payload);
	observed.dedupe_key = dedupe_key;
	Ok(observed)
}

fn decode_log(event: &AbiEvent, log: &Log) -> Result<Event, SourceError> {
	decode_entry(
		event,
		log.address(),
		log.topics(),
		&log.data().data,
		LogMeta {
			block_number: log.block_number,
			transaction_hash: log.transaction_hash,
			log_index: log.log_index,
		},
	)
}

/// Configuration schema for the on-chain source.
pub struct OnchainSourceSchema;

impl ConfigSchema for OnchainSourceSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(
			vec![Field::new("rpc_url", FieldType::String).with_validator(http_url)],
			vec![
				Field::new(
					"start_block",
					FieldType::Integer {
						min: Some(0),
						max: None,
					},
				),
				Field::new(
					"max_block_range",
					FieldType::Integer {
						min: Some(1),
						max: Some(100_000),
					},
				),
				Field::new(
					"confirmations",
					FieldType::Integer {
						min: Some(0),
						max: Some(100),
					},
				),
			],
		)
		.validate(config)
	}
}

#[async_trait]
impl SourceInterface for OnchainSource {
	fn kind(&self) -> &str {
		"onchain"
	}

	async fn open(&mut self, selector: &Selector) -> Result<Cursor, SourceError> {
		let abi = parse_abi(&selector.schema)?;
		let event = find_event(&abi, &selector.event_name)?.clone();
		if event.anonymous {
			return Err(SourceError::InvalidSelector(format!(
				"Anonymous event '{}' cannot be filtered by signature",
				event.name
			)));
		}
		let address = parse_address(selector.source_identity.as_deref())?;

		let head = self.safe_head().await?;
		let position = initial_position(head, self.start_block, self.delivered);

		info!(
			event = %event.name,
			address = ?address,
			position,
			"Opened on-chain log subscription"
		);
		self.subscription = Some(Subscription { event, address });
		Ok(Cursor::new(position))
	}

	async fn poll(&mut self, cursor: Cursor) -> Result<(Vec<Event>, Cursor), SourceError> {
		let subscription = self.subscription.clone().ok_or(SourceError::NotOpen)?;

		let head = self.safe_head().await?;
		if head <= cursor.position {
			debug!("No new blocks past {}", cursor.position);
			return Ok((Vec::new(), cursor));
		}

		let from = cursor.position + 1;
		let to = head.min(cursor.position.saturating_add(self.max_block_range));

		let mut filter = Filter::new()
			.event_signature(subscription.event.selector())
			.from_block(from)
			.to_block(to);
		if let Some(address) = subscription.address {
			filter = filter.address(address);
		}

		let logs = self
			.provider
			.get_logs(&filter)
			.await
			.map_err(|e| SourceError::Unavailable(format!("Failed to get logs: {}", e)))?;

		debug!("Fetched {} logs for blocks {}..={}", logs.len(), from, to);

		let mut events = Vec::with_capacity(logs.len());
		for log in logs.iter().filter(|log| !log.removed) {
			match decode_log(&subscription.event, log) {
				Ok(event) => events.push(event),
				Err(e) => warn!("Skipping undecodable log: {}", e),
			}
		}

		self.delivered = Some(to);
		Ok((events, Cursor::new(to)))
	}
}

/// Factory function to create an on-chain source from configuration.
///
/// Configuration parameters:
/// - `rpc_url`: HTTP RPC endpoint
/// - `start_block`: first block to read (default: current head)
/// - `max_block_range`: blocks per `eth_getLogs` request (default: 1000)
/// - `confirmations`: blocks to stay behind the head (default: 0)
pub fn create_source(
	config: &toml::Value,
) -> Result<Box<dyn SourceInterface>, SourceError> {
	OnchainSourceSchema.validate(config)?;

	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.unwrap_or_default();
	let integer = |key: &str| {
		config
			.get(key)
			.and_then(|v| v.as_integer())
			.map(|v| v as u64)
	};

	let mut source = OnchainSource::new(rpc_url)?
		.with_max_block_range(integer("max_block_range").unwrap_or(DEFAULT_MAX_BLOCK_RANGE))
		.with_confirmations(integer("confirmations").unwrap_or(0));
	if let Some(start) = integer("start_block") {
		source = source.with_start_block(start);
	}

	Ok(Box::new(source))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abi::tests::erc20_abi;
	use alloy_primitives::U256;

	fn transfer_event() -> AbiEvent {
		let abi = parse_abi(&erc20_abi()).unwrap();
		find_event(&abi, "Transfer").unwrap().clone()
	}

	#[test]
	fn test_decode_transfer_log() {
		let event = transfer_event();
		let contract = Address::repeat_byte(0xda);
		let from = Address::repeat_byte(0x11);
		let to = Address::repeat_byte(0x22);
		let topics = vec![
			event.selector(),
			B256::left_padding_from(from.as_slice()),
			B256::left_padding_from(to.as_slice()),
		];
		let data = U256::from(1_000u64).to_be_bytes::<32>();
		let meta = LogMeta {
			block_number: Some(42),
			transaction_hash: Some(B256::repeat_byte(0xab)),
			log_index: Some(3),
		};

		let decoded = decode_entry(&event, contract, &topics, &data, meta).unwrap();

		assert_eq!(decoded.name, "Transfer");
		assert_eq!(
			decoded.source_identity.as_deref().map(str::to_lowercase),
			Some(format!("0x{}", "da".repeat(20)))
		);
		assert_eq!(
			decoded.dedupe_key,
			Some(format!("0x{}:3", "ab".repeat(32)))
		);
		assert_eq!(decoded.payload["args"]["value"], "1000");
		assert_eq!(
			decoded.payload["args"]["from"]
				.as_str()
				.map(str::to_lowercase),
			Some(format!("0x{}", "11".repeat(20)))
		);
		assert_eq!(decoded.payload["block_number"], 42);
		assert_eq!(decoded.payload["log_index"], 3);
	}

	#[test]
	fn test_decode_rejects_wrong_topic_count() {
		let event = transfer_event();
		let topics = vec![event.selector()];
		let data = U256::from(1u64).to_be_bytes::<32>();

		let result = decode_entry(
			&event,
			Address::ZERO,
			&topics,
			&data,
			LogMeta::default(),
		);
		assert!(matches!(result, Err(SourceError::Schema(_))));
	}

	#[test]
	fn test_log_without_tx_hash_has_no_dedupe_key() {
		let event = transfer_event();
		let topics = vec![
			event.selector(),
			B256::ZERO,
			B256::ZERO,
		];
		let data = [0u8; 32];

		let decoded = decode_entry(&event, Address::ZERO, &topics, &data, LogMeta::default()).unwrap();
		assert!(decoded.dedupe_key.is_none());
		assert!(decoded.payload["transaction_hash"].is_null());
	}

	#[test]
	fn test_parse_address() {
		assert_eq!(parse_address(None).unwrap(), None);
		assert_eq!(parse_address(Some("dynamic")).unwrap(), None);
		assert_eq!(
			parse_address(Some("0xFF34B3d4Aee8ddCd6F9AFFFB6Fe49bD371b8a357")).unwrap(),
			Some(Address::new([
				0xff, 0x34, 0xb3, 0xd4, 0xae, 0xe8, 0xdd, 0xcd, 0x6f, 0x9a, 0xff, 0xfb, 0x6f,
				0xe4, 0x9b, 0xd3, 0x71, 0xb8, 0xa3, 0x57
			]))
		);
		assert!(matches!(
			parse_address(Some("0xDAI")),
			Err(SourceError::InvalidSelector(_))
		));
	}

	#[test]
	fn test_initial_position() {
		assert_eq!(initial_position(100, None, None), 100);
		assert_eq!(initial_position(100, Some(90), None), 89);
		assert_eq!(initial_position(100, Some(500), None), 100);
		assert_eq!(initial_position(100, Some(10), Some(95)), 95);
		assert_eq!(initial_position(50, None, Some(95)), 50);
	}

	#[test]
	fn test_start_block_zero_reads_from_block_one() {
		assert_eq!(initial_position(100, Some(0), None), 0);
		assert_eq!(initial_position(100, Some(1), None), 0);
		assert_eq!(initial_position(0, Some(0), None), 0);
	}

	#[test]
	fn test_sol_value_to_json() {
		let value = DynSolValue::Tuple(vec![
			DynSolValue::Bool(true),
			DynSolValue::Uint(U256::from(7u64), 256),
			DynSolValue::Bytes(vec![0xde, 0xad]),
			DynSolValue::FixedBytes(B256::repeat_byte(0x01), 2),
			DynSolValue::String("dai".to_string()),
		]);
		assert_eq!(
			sol_value_to_json(&value),
			json!([true, "7", "0xdead", "0x0101", "dai"])
		);
	}

	#[test]
	fn test_factory_validates_config() {
		let valid: toml::Value = toml::from_str(
			r#"
rpc_url = "https://sepolia.example.org"
start_block = 100
confirmations = 2
"#,
		)
		.unwrap();
		assert!(create_source(&valid).is_ok());

		let invalid: toml::Value = toml::from_str(r#"rpc_url = "wss://nope""#).unwrap();
		assert!(matches!(
			create_source(&invalid),
			Err(SourceError::InvalidConfig(_))
		));
	}
}
