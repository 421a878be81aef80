//! taskgen - HTTP Server Entry Point
//!
//! Starts the HTTP server, or with `--topic` generates a single task and
//! prints it as JSON.

use clap::Parser;
use taskgen::{api, config::Config, task::TaskGenerator, task::TaskKind};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "taskgen",
    version,
    about = "Generate TOEFL speaking or writing tasks"
)]
struct Cli {
    /// Generate one task for this topic and print it instead of starting the server
    #[arg(long)]
    topic: Option<String>,

    /// Type of task to generate
    #[arg(
        long = "type",
        value_enum,
        default_value_t = TaskKind::Speaking,
        requires = "topic"
    )]
    kind: TaskKind,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    if let Some(topic) = cli.topic {
        let config = Config::one_shot_from_env()?;
        // Keep stdout clean for the JSON output.
        init_logging(config.debug, true);
        println!("{}", run_once(&config, cli.kind, &topic).await?);
        return Ok(());
    }

    let config = Config::from_env()?;
    init_logging(config.debug, false);

    info!("Starting task generation service on {}", config.bind_addr());
    if config.api_key_configured() {
        info!("OpenAI API key: set");
    } else {
        warn!("OpenAI API key: NOT SET - every request will return the fallback task");
    }
    info!(
        "Loaded configuration: model={}, debug={}, timeout={:?}",
        config.model, config.debug, config.request_timeout
    );

    api::serve(config).await?;

    Ok(())
}

/// Generate one task and render it as pretty JSON.
async fn run_once(config: &Config, kind: TaskKind, topic: &str) -> anyhow::Result<String> {
    let generator = TaskGenerator::from_config(config)?;
    if !generator.has_credential() {
        warn!("OPENAI_API_KEY is not set; the fallback task will be printed");
    }
    let task = generator.generate(kind, topic).await;
    Ok(serde_json::to_string_pretty(&task)?)
}

fn init_logging(debug: bool, to_stderr: bool) {
    let default_filter = if debug {
        "taskgen=debug,tower_http=debug"
    } else {
        "taskgen=info,tower_http=info"
    };
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into()),
    );

    if to_stderr {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
