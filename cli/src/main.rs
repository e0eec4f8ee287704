//! CLI entrypoint for debate-arena
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod args;
mod output;
mod progress;

use anyhow::{Context, Result};
use args::{Cli, OutputFormat};
use arena_application::{ExperimentInput, RunExperimentUseCase, default_conditions};
use arena_domain::Question;
use arena_infrastructure::{
    ConfigLoader, CredentialStore, HttpGateway, JsonlTranscriptLogger, QuotaRouter,
};
use clap::Parser;
use output::ConsoleFormatter;
use progress::ProgressReporter;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    let mut params = config.execution_params()?;
    if let Some(rounds) = cli.rounds {
        params = params.with_rounds(rounds);
    }
    if let Some(mode) = cli.mode {
        params = params.with_mode(mode.into());
    }

    // Request-level validation happens before any backend work
    let question = Question::new(cli.question.as_str())?;

    // === Dependency Injection ===
    let credentials = CredentialStore::from_env(
        &config.providers.gemini.api_key_env,
        &config.providers.openai.api_key_env,
    );
    let gateway = Arc::new(HttpGateway::new(config.gateway_config(), credentials));
    let router = Arc::new(QuotaRouter::new(
        gateway,
        config.model_catalog(),
        config.retry_policy(),
    ));

    let mut use_case = RunExperimentUseCase::new(router);
    if !cli.quiet {
        use_case = use_case.with_progress(Arc::new(ProgressReporter::new()));
    }
    if let Some(dir) = &config.log.transcript_dir
        && let Some(logger) = JsonlTranscriptLogger::create_in(dir)
    {
        info!("Transcript log: {}", logger.path().display());
        use_case = use_case.with_logger(Arc::new(logger));
    }

    let catalog = config.model_catalog();
    let plans = default_conditions(&catalog, params.rounds);

    if !cli.quiet {
        println!();
        println!("debate-arena - blinded answer experiment");
        println!("Question: {}", question.content());
        println!(
            "Mode: {}, rounds: {}",
            params.mode.as_str(),
            params.rounds
        );
        println!();
    }

    let run = use_case
        .execute(ExperimentInput::new(question, plans, params))
        .await;

    // Output results
    let rendered = match cli.output {
        OutputFormat::Answers => ConsoleFormatter::format(&run, false),
        OutputFormat::Full => ConsoleFormatter::format(&run, true),
        OutputFormat::Json => ConsoleFormatter::format_json(&run),
    };
    println!("{rendered}");

    if cli.reveal && !matches!(cli.output, OutputFormat::Json) {
        println!("{}", ConsoleFormatter::format_reveal(&run));
    }

    Ok(())
}
