mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "roast-cli")]
#[command(about = "Persona roast pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a batch of profile identifiers through the full pipeline.
    Roast {
        #[arg(required = true)]
        identifiers: Vec<String>,
        /// Skip talking-head video rendering.
        #[arg(long)]
        no_video: bool,
        /// POST the finished batch to this URL.
        #[arg(long)]
        callback_url: Option<String>,
    },
    /// Classify a profile stored as JSON, without calling any service.
    Classify { profile: PathBuf },
    /// Render a video from an audio file using the short poll policy.
    Video {
        audio: PathBuf,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Check the status of a video job once.
    Status { talk_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Roast {
            identifiers,
            no_video,
            callback_url,
        } => commands::run_roast(identifiers, !no_video, callback_url).await,
        Commands::Classify { profile } => commands::run_classify(&profile),
        Commands::Video { audio, image_url } => commands::run_video(&audio, image_url).await,
        Commands::Status { talk_id } => commands::run_status(&talk_id).await,
    }
}

#[cfg(test)]
mod tests;
