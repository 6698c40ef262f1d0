use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use beacon_skill::api::{ApiServer, ApiState};
use beacon_skill::{Config, Skill, UpstreamClient};

/// Beacon Skill - voice assistant skill backed by Perplexity
#[derive(Parser)]
#[command(name = "beacon-skill", version, about)]
struct Cli {
    /// Port to listen on (overrides config file and `PORT`)
    #[arg(long, env = "BEACON_SKILL_PORT")]
    port: Option<u16>,

    /// Perplexity model (overrides config file)
    #[arg(long, env = "PERPLEXITY_MODEL")]
    model: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the skill endpoint over HTTP (default)
    Serve,
    /// Handle a single event and print the response
    Invoke {
        /// Event JSON file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Ask a question directly and print the spoken answer
    Ask {
        /// The question
        query: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,beacon_skill=info",
        1 => "info,beacon_skill=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(model) = cli.model {
        config.upstream.model = model;
    }
    tracing::debug!(?config, "loaded configuration");

    let port = config.server.port;
    let upstream = UpstreamClient::new(config.upstream).context("failed to build HTTP client")?;
    let skill = Skill::new(upstream);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(port, model = %skill.upstream().model(), "starting beacon skill");
            ApiServer::new(ApiState::new(skill), port).run().await?;
        }
        Command::Invoke { file } => invoke(&skill, file).await?,
        Command::Ask { query } => println!("{}", skill.upstream().ask(&query).await),
    }

    Ok(())
}

/// Run one event through the skill, like a single function invocation
async fn invoke(skill: &Skill, file: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let event: serde_json::Value = serde_json::from_str(&raw).context("event is not valid JSON")?;
    let response = skill.handle(&event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
