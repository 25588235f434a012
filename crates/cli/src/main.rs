//! barge-in command line
//!
//! Offline driver for the session tracker: run the built-in scenarios,
//! classify a single utterance, or replay a recorded event script.

mod replay;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use barge_in_config::{constants::env, load_settings, Settings};
use barge_in_core::{tokenize, DecisionEngine};

#[derive(Parser)]
#[command(name = "barge-in")]
#[command(about = "Backchannel-aware interruption handling for voice agents", long_about = None)]
struct Cli {
    /// Config environment (loads config/{env}.*); defaults to $BARGE_IN_ENV
    #[arg(long, global = true)]
    env: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in conversation scenarios
    Simulate,
    /// Classify one utterance as if the agent were speaking
    Decide {
        /// Transcript text
        text: String,
    },
    /// Print the tokens of an utterance
    Tokenize {
        /// Transcript text
        text: String,
    },
    /// Feed an event script (YAML or JSON) through a session tracker
    Replay {
        /// Path to the event script
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_name = cli.env.clone().or_else(|| std::env::var(env::ENVIRONMENT).ok());
    let mut settings = match load_settings(env_name.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };
    if cli.log_json {
        settings.observability.log_json = true;
    }

    init_tracing(&settings);
    tracing::debug!(
        environment = ?settings.environment,
        config = env_name.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Simulate => simulate::run(&settings)?,
        Commands::Decide { text } => decide(&settings, &text)?,
        Commands::Tokenize { text } => println!("{:?}", tokenize(&text)),
        Commands::Replay { file } => replay::run(&settings, &file).await?,
    }

    Ok(())
}

fn decide(settings: &Settings, text: &str) -> Result<()> {
    let vocabulary = settings
        .interrupt
        .vocabulary()
        .context("Failed to build vocabulary")?;
    let evaluation = DecisionEngine::new(vocabulary).evaluate(text);

    println!("tokens:   {:?}", evaluation.tokens);
    println!("decision: {}", evaluation.decision);
    println!("reason:   {}", evaluation.reason);
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("barge_in={},warn", level).into()
    });

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(false).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
