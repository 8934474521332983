//! Sentiment Console
//!
//! Terminal front end for the remote sentiment classifier.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sentiment_console::{
    client::{Classifier, HttpClassifier},
    config::Config,
    controller::{RequestController, SubmitOutcome},
    presentation::{self, TerminalPresenter},
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sentiment-console")]
#[command(about = "Classify text sentiment with a remote model service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to ./config.toml, then built-in defaults)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single piece of text
    Analyze {
        /// Text to classify
        text: String,
    },
    /// Read lines from stdin and analyze each one
    Interactive,
    /// Check that the classification service is up
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path))?,
        None => Config::load_default()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let classifier = Arc::new(HttpClassifier::new(&config.classifier)?);
    tracing::debug!(endpoint = classifier.predict_url(), "classifier ready");

    match cli.command {
        Commands::Analyze { text } => analyze(classifier, &text).await,
        Commands::Interactive => interactive(classifier).await,
        Commands::Health => health(classifier).await,
    }
}

async fn analyze(classifier: Arc<HttpClassifier>, text: &str) -> anyhow::Result<ExitCode> {
    let controller = RequestController::new(classifier)
        .with_presenter(Arc::new(TerminalPresenter::stdout()));

    match controller.submit(text).await {
        SubmitOutcome::Settled(state) if state.result().is_some() => Ok(ExitCode::SUCCESS),
        SubmitOutcome::Settled(_) => Ok(ExitCode::FAILURE),
        SubmitOutcome::Ignored => {
            eprintln!("Nothing to analyze: input is blank");
            Ok(ExitCode::from(2))
        }
        SubmitOutcome::Rejected => Ok(ExitCode::FAILURE),
    }
}

async fn interactive(classifier: Arc<HttpClassifier>) -> anyhow::Result<ExitCode> {
    const PROMPT: &str = "> ";

    let controller = Arc::new(
        RequestController::new(classifier)
            .with_presenter(Arc::new(TerminalPresenter::stdout().with_prompt(PROMPT))),
    );

    println!("{}", presentation::DEFAULT_PLACEHOLDER);
    println!("{}  (blank lines are skipped, \"quit\" exits)", presentation::suggestion());
    print!("{}", PROMPT);
    std::io::Write::flush(&mut std::io::stdout()).ok();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        let controller = controller.clone();
        in_flight.spawn(async move {
            match controller.submit(&line).await {
                SubmitOutcome::Rejected => println!("Still analyzing the previous text; input ignored"),
                SubmitOutcome::Ignored => print!("{}", PROMPT),
                SubmitOutcome::Settled(_) => {}
            }
        });

        // Reap finished submissions
        while let Some(joined) = in_flight.try_join_next() {
            joined?;
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        joined?;
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

async fn health(classifier: Arc<HttpClassifier>) -> anyhow::Result<ExitCode> {
    match classifier.health().await {
        Ok(status) if status.is_healthy() => {
            println!("Service healthy (model loaded)");
            Ok(ExitCode::SUCCESS)
        }
        Ok(status) => {
            println!(
                "Service reachable but not ready: status={}, model_loaded={}",
                status.status, status.model_loaded
            );
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            println!("Service unavailable: {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
