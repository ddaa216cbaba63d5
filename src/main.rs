//! # ArtBot CLI
//!
//! IRC bot that paints ASCII art followed by a calming quote, on command
//! or at lunchtime, breaktime, teatime and on humpday.
//!
//! Usage:
//!   artbot run                     # Connect and serve
//!   artbot check                   # Validate configuration
//!   artbot tags                    # List painting tags
//!   artbot preview tree            # Print a painting locally
//!   artbot info                    # Show version and paths

use std::sync::Arc;

use anyhow::Result;
use artbot_channels::{IrcChannel, IrcConfig};
use artbot_core::traits::Channel;
use artbot_core::{ArtBotConfig, MessageCatalog};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "artbot",
    version,
    about = "🎨 ArtBot: paints ASCII art on IRC",
    long_about = "IRC bot that paints ASCII art messages with a quote from Bob Ross,\non request or whenever lunchtime, breaktime, teatime or humpday arrives."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the server and start painting
    Run,

    /// Validate the configuration and print a summary
    Check,

    /// List painting tags
    Tags,

    /// Print a painting to the terminal
    Preview {
        /// Painting tag
        tag: String,
    },

    /// Show system info
    Info,
}

fn load_config(path: Option<&str>) -> Result<ArtBotConfig> {
    let config = match path {
        Some(p) => ArtBotConfig::load_from(std::path::Path::new(p))?,
        None => ArtBotConfig::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "artbot=debug,artbot_core=debug,artbot_scheduler=debug,artbot_channels=debug,artbot_agent=debug"
    } else {
        "artbot=info,artbot_scheduler=info,artbot_channels=info,artbot_agent=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run => {
            let config = load_config(cli.config.as_deref())?;

            let mut irc = IrcChannel::new(IrcConfig::from_config(&config));
            irc.connect().await?;
            let incoming = irc.listen().await?;
            let sink = Arc::new(irc.sender()?);

            let bot = artbot_agent::ArtBot::new(config, sink);
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl+C: {e}");
                    std::future::pending::<()>().await;
                }
            };
            bot.run(incoming, shutdown).await?;

            irc.disconnect().await?;
            println!("\n👋 Happy painting!");
        }

        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            println!("✅ Configuration is valid");
            println!("   Server: {}:{}", config.server, config.port);
            println!("   Nick: {}", config.nick);
            println!("   Channels: {} (art), {} (tea)", config.art_channel, config.tea_channel);
            println!("   Humpday: {} at {}", config.humpday, config.daily_event_time);
            println!("   Lunchtime: {}", config.lunchtime);
            println!("   Breaktime: {}", config.breaktime);
            println!("   Teatime: {}", config.teatime);
            println!("   Paintings: {} | Quotes: {}", config.paintings.len(), config.quotes.len());
        }

        Commands::Tags => {
            let config = load_config(cli.config.as_deref())?;
            let catalog = MessageCatalog::from_config(&config);
            println!("{}", catalog.tags().join(", "));
        }

        Commands::Preview { tag } => {
            let config = load_config(cli.config.as_deref())?;
            let catalog = MessageCatalog::from_config(&config);
            let Some(painting) = catalog.painting_by_tag(&tag) else {
                println!("❌ No painting tagged {tag:?}");
                println!("   Available: {}", catalog.tags().join(", "));
                return Ok(());
            };
            for line in &painting.lines {
                if painting.colored {
                    println!("{}", artbot_scheduler::colorize(line));
                } else {
                    println!("{line}");
                }
            }
        }

        Commands::Info => {
            println!("🎨 ArtBot v{}", env!("CARGO_PKG_VERSION"));
            println!("   Platform: {} / {}", std::env::consts::OS, std::env::consts::ARCH);
            let path = cli
                .config
                .map(std::path::PathBuf::from)
                .unwrap_or_else(ArtBotConfig::default_path);
            println!("   Config: {}", path.display());
        }
    }

    Ok(())
}
