//! Binary entrypoint for the Ascend CLI.
//!
//! Commands:
//! - `start [--bind <addr>]` - run the HTTP API over the configured game document
//! - `init` - create a starter `config.toml` and an initial game document
//! - `status` - print a one-screen summary of the player
//!
//! See the library crate docs for module-level details: `ascend::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::net::SocketAddr;

use ascend::config::Config;
use ascend::engine::daily::daily_view;
use ascend::server::{self, Clock, GameSession};
use ascend::storage::GameStore;

#[derive(Parser)]
#[command(name = "ascend")]
#[command(about = "A habit tracker that levels you up like an RPG hunter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Start {
        /// Address to listen on, overriding `server.bind`
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Write a default configuration and an initial game document
    Init,
    /// Show the player's progress
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Some(Config::load(&cli.config).await?),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Start { bind } => {
            let mut config = pre_config.ok_or_else(|| anyhow!("configuration not loaded"))?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate()?;
            let addr: SocketAddr = config.bind_addr()?;

            info!("Starting Ascend v{}", env!("CARGO_PKG_VERSION"));
            let session = open_session(&config).await?;
            server::run(session, addr).await?;
        }
        Commands::Init => {
            if std::path::Path::new(&cli.config).exists() {
                warn!("{} already exists, leaving it untouched", cli.config);
            } else {
                Config::create_default(&cli.config).await?;
                println!("Created default configuration at {}", cli.config);
            }
            let config = Config::load(&cli.config).await?;
            config.validate()?;
            let session = open_session(&config).await?;
            println!(
                "Game document ready at {}",
                session.store().path().display()
            );
        }
        Commands::Status => {
            let config = pre_config.ok_or_else(|| anyhow!("configuration not loaded"))?;
            config.validate()?;
            let session = open_session(&config).await?;
            print_status(&session);
        }
    }

    Ok(())
}

async fn open_session(config: &Config) -> Result<GameSession> {
    let store = GameStore::open(&config.storage.data_dir, &config.storage.state_file)
        .await
        .map_err(|e| anyhow!("Failed to open data directory {}: {}", config.storage.data_dir, e))?;
    GameSession::open(
        store,
        &config.game.player_name,
        config.game.settings(),
        Clock::Local,
    )
    .await
    .map_err(|e| anyhow!("Failed to load game document: {}", e))
}

fn print_status(session: &GameSession) {
    let doc = session.document();
    let player = &doc.player;
    println!("Ascend Status");
    println!("=============");
    println!("Hunter: {}", player.name);
    println!(
        "Level:  {} ({}/{} xp, {} total)",
        player.level, player.current_xp, player.xp_to_next_level, player.total_experience
    );
    println!("Class:  {}   Title: {}", player.class, player.title);
    match player.points_to_next_rank {
        Some(points) => println!(
            "Rank:   {} {} (score {}, {} to next)",
            player.rank.letter(),
            player.rank_name,
            player.rank_score,
            points
        ),
        None => println!(
            "Rank:   {} {} (score {})",
            player.rank.letter(),
            player.rank_name,
            player.rank_score
        ),
    }
    println!(
        "Streak: {} (best {})   Coins: {}   Points: {}",
        player.streak, player.max_streak, player.coins, player.available_points
    );
    let view = daily_view(doc);
    println!("Daily tasks (reset in {}):", view.timer);
    for (idx, task) in view.tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        println!("  [{}] {}. {} [{}/{}]", mark, idx, task.name, task.progress, task.max);
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only in the foreground
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
