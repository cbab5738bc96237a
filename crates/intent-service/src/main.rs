use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use intent_config::{Config, ConfigLoader};
use intent_core::{load_intents, unreachable_intents, EngineBuilder};
use intent_source::abi::{event_names, parse_abi};
use intent_source::implementations::onchain;
use intent_targets::implementations::{led, speaker};
use intent_targets::{TargetFactory, TargetRegistry};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod schema;

#[derive(Parser)]
#[command(name = "intent-watcher")]
#[command(about = "Runs device actions when on-chain events match an intent", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[arg(short, long, value_name = "FILE", default_value = "config/watcher.toml")]
	config: PathBuf,

	#[arg(long, env = "INTENT_LOG_LEVEL", default_value = "info")]
	log_level: String,

	#[arg(long, value_enum, default_value_t = LogFormat::Text)]
	log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
	/// Watch the configured event and dispatch matching intents
	Start,
	/// Validate the configuration, targets and intents
	Validate,
	/// List the events declared by the configured ABI
	Events,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
	Text,
	Json,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level, cli.log_format)?;

	match cli.command {
		Some(Commands::Start) | None => start_service(cli).await,
		Some(Commands::Validate) => validate_config(cli).await,
		Some(Commands::Events) => list_events(cli).await,
	}
}

fn target_factories() -> HashMap<String, TargetFactory> {
	let mut factories: HashMap<String, TargetFactory> = HashMap::new();
	factories.insert("led".to_string(), Box::new(led::create_target));
	factories.insert("speaker".to_string(), Box::new(speaker::create_target));
	factories
}

async fn load_config(cli: &Cli) -> Result<Config> {
	ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")
}

async fn start_service(cli: Cli) -> Result<()> {
	info!("Starting intent watcher");
	let config = load_config(&cli).await?;

	let abi = schema::resolve_abi(&config.source).await?;

	let mut engine = EngineBuilder::new(config)
		.with_schema(abi)
		.with_source_factory("onchain", onchain::create_source)
		.with_target_factory("led", led::create_target)
		.with_target_factory("speaker", speaker::create_target)
		.build()
		.context("Failed to build intent engine")?;

	if engine.intents().is_empty() {
		bail!("No valid intents loaded, refusing to start");
	}
	if engine.registry().is_empty() {
		bail!("No action targets loaded, refusing to start");
	}

	info!(
		intents = engine.intents().len(),
		targets = ?engine.registry().names(),
		"Intent watcher started"
	);

	engine
		.run_until(setup_shutdown_signal())
		.await
		.context("Intent engine failed")?;

	info!("Intent watcher stopped");
	Ok(())
}

async fn validate_config(cli: Cli) -> Result<()> {
	info!("Validating configuration file: {:?}", cli.config);
	let config = load_config(&cli).await?;

	info!("Configuration is valid");
	info!(
		"Source: {} event '{}' on {}",
		config.source.kind,
		config.source.event,
		config.source.contract_address.as_deref().unwrap_or("any contract")
	);

	let registry = TargetRegistry::load(&config.targets, &target_factories());
	for name in registry.names() {
		info!("  Target: {}", name);
	}

	let intents = load_intents(config.intents.clone());
	for intent in &intents {
		info!(
			"  Intent: {} ({} -> {} actions)",
			intent.name,
			intent.trigger.event_name,
			intent.actions.len()
		);
		for action in &intent.actions {
			if !registry.contains(&action.target) {
				warn!("    action target '{}' is not loaded", action.target);
			}
		}
	}

	for intent in unreachable_intents(&intents, config.source.event.trim()) {
		warn!(
			"  Intent '{}' triggers on '{}' but the source watches '{}'; it will never fire",
			intent.name,
			intent.trigger.event_name,
			config.source.event.trim()
		);
	}

	let rejected_intents = config.intents.len() - intents.len();
	if !registry.failures().is_empty() || rejected_intents > 0 {
		bail!(
			"{} target(s) and {} intent(s) failed to load",
			registry.failures().len(),
			rejected_intents
		);
	}

	Ok(())
}

async fn list_events(cli: Cli) -> Result<()> {
	let config = load_config(&cli).await?;
	let document = schema::resolve_abi(&config.source).await?;
	let abi = parse_abi(&document).context("Failed to parse ABI")?;

	for name in event_names(&abi) {
		let marker = if name == config.source.event { "*" } else { " " };
		println!("{} {}", marker, name);
	}

	Ok(())
}

fn setup_tracing(log_level: &str, format: LogFormat) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
		.with_context(|| format!("Invalid log level: {}", log_level))?;

	let registry = tracing_subscriber::registry().with(env_filter);
	match format {
		LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json())
			.try_init(),
	}
	.context("Failed to initialise logging")?;

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			error!("Failed to listen for Ctrl+C: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				error!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received");
}
