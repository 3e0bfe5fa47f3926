//! `trendcast` CLI - turn a trending topic into a published video

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "trendcast")]
#[command(about = "Turn a trending topic into a narrated video and publish it")]
#[command(version)]
struct Cli {
    /// Credential file (created interactively on first run)
    #[arg(long, global = true, default_value = trendcast::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Settings file [default: ~/.config/trendcast/settings.toml]
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Debug logging (ignored when `RUST_LOG` is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the whole pipeline once and publish
    Run,

    /// Fetch and print one trending topic
    Topic,

    /// Show which integrations are enabled
    Status,

    /// Assemble a video from existing images and narration
    Assemble {
        /// Image folder [default: from settings]
        #[arg(long)]
        images: Option<PathBuf>,

        /// Narration file [default: from settings]
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Output video [default: from settings]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let settings = trendcast::Settings::load(cli.settings.as_deref())?;

    match cli.command {
        Commands::Run => cmd::run::cmd_run(&cli.config, &settings).await?,
        Commands::Topic => cmd::topic::cmd_topic(&settings).await?,
        Commands::Status => cmd::status::cmd_status(&cli.config, &settings).await?,
        Commands::Assemble {
            images,
            audio,
            output,
        } => {
            cmd::assemble::cmd_assemble(
                &settings,
                images.as_deref(),
                audio.as_deref(),
                output.as_deref(),
            )
            .await?;
        }
    }

    Ok(())
}
