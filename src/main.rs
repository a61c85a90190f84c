//! tgscraper CLI - main entry point
//!
//! A bare run performs one full configure -> authenticate -> fetch -> write
//! cycle over every configured channel and exits; the flags only override
//! paths and the per-channel limit.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use tgscraper::config::{Config, CONFIG_FILE};
use tgscraper::export;
use tgscraper::fetch::{self, ChannelSource, DEFAULT_FETCH_LIMIT};
use tgscraper::logging;
use tgscraper::session::{self, SessionLock, TelegramClient};

#[derive(Parser)]
#[command(name = "tgscraper")]
#[command(about = "Fetch recent posts from Telegram channels into CSV files", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Directory for per-channel CSV files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Directory for per-run log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Directory where the session file is stored
    #[arg(long, default_value = ".")]
    session_dir: PathBuf,

    /// Maximum number of messages to fetch per channel
    #[arg(short, long, default_value_t = DEFAULT_FETCH_LIMIT)]
    limit: usize,

    /// Log to stderr instead of a log file
    #[arg(long, default_value_t = false)]
    console: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_dir = if cli.console {
        None
    } else {
        Some(cli.log_dir.clone())
    };
    logging::init(log_dir.as_deref())?;

    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::resolve(&cli.config)?;
    let channels = config.input.channels()?;

    fs::create_dir_all(&cli.session_dir)?;
    let _lock = SessionLock::acquire(&session::lock_file(
        &cli.session_dir,
        &config.telegram.username,
    ))?;

    let session_path = session::session_file(&cli.session_dir, &config.telegram.username);
    let client = TelegramClient::connect(&session_path, config.telegram.api_id).await?;
    session::authorize(&client, &config.telegram).await?;

    info!("Credentials loaded, telegram client started");

    let source = ChannelSource::new(&client);

    for link in channels {
        let stem = fetch::channel_stem(link);
        info!("Fetching up to {} posts from {}", cli.limit, stem);

        let posts = fetch::fetch_posts(&source, link, cli.limit).await?;
        let path = export::write_posts(&cli.output_dir, stem, &posts)?;

        info!(
            "Saved {} posts from {} to {}",
            posts.len(),
            stem,
            path.display()
        );
    }

    Ok(())
}
