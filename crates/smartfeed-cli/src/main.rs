//! smartfeed - terminal front end for the portal's smart homepage blocks.
//!
//! Shows the daily content and digest blocks the way the homepage does:
//! cached content first, then a single bounded refresh, falling back to the
//! last good copy or built-in defaults when the API is unreachable.

mod render;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smartfeed_core::{
    BlockKind, BlockPipeline, CacheStore, Config, FeedClient, Mount, PipelineSettings,
    RenderFrame, ThemeMode, ThemeStore, TimeSlot,
};

use render::{render_frame, Palette};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the frame channel.
/// Each block publishes at most four frames per run.
const FRAME_BUFFER_SIZE: usize = 16;

/// Log file name prefix when file logging is enabled
const LOG_FILE_PREFIX: &str = "smartfeed.log";

#[derive(Parser)]
#[command(name = "smartfeed")]
#[command(about = "Homepage content blocks in the terminal, with offline fallback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh and print homepage blocks
    Show {
        /// Which block to show
        #[arg(short, long, value_enum, default_value_t = BlockArg::All)]
        block: BlockArg,

        /// Force a time slot instead of deriving it from the clock
        #[arg(short, long)]
        slot: Option<TimeSlot>,

        /// Print the final display models as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show how old each cached block is
    Cache,
    /// Show or set the display theme
    Theme {
        /// light, dark or system
        mode: Option<ThemeMode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BlockArg {
    Content,
    Digest,
    All,
}

impl BlockArg {
    fn blocks(self, slot: TimeSlot) -> Vec<BlockKind> {
        match self {
            BlockArg::Content => vec![BlockKind::DailyContent(slot)],
            BlockArg::Digest => vec![BlockKind::Digest],
            BlockArg::All => vec![BlockKind::DailyContent(slot), BlockKind::Digest],
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr, filtered by RUST_LOG (default `warn`). When the config
/// names a log directory, a daily rolling file is written there as well; the
/// returned guard must be held until exit so it gets flushed.
fn init_tracing(log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The file decides where logs go, so it is read before tracing exists.
    // Anything worth warning about is reported once tracing is up.
    let loaded = Config::load_file();
    let log_dir = loaded.as_ref().ok().and_then(|c| c.log_dir.clone());
    let _log_guard = init_tracing(log_dir.as_ref());
    let config = resolve_config(loaded, |name| std::env::var(name).ok());
    info!(api = %config.api_base_url, "smartfeed starting");

    let theme = ThemeStore::new(config.theme);

    match cli.command.unwrap_or(Commands::Show {
        block: BlockArg::All,
        slot: None,
        json: false,
    }) {
        Commands::Show { block, slot, json } => {
            let slot = slot.unwrap_or_else(TimeSlot::current);
            show(&config, &theme, block.blocks(slot), json).await
        }
        Commands::Cache => cache_status(&config),
        Commands::Theme { mode } => set_theme(config, &theme, mode),
    }
}

/// Fall back to defaults on a bad config file, then apply environment
/// overrides either way.
fn resolve_config(loaded: Result<Config>, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let mut config = match loaded {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Failed to load config, using defaults");
            Config::default()
        }
    };
    config.apply_overrides(lookup);
    config
}

/// Run every block's pipeline concurrently and print frames as they arrive.
async fn show(config: &Config, theme: &ThemeStore, blocks: Vec<BlockKind>, json: bool) -> Result<()> {
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let cache = Arc::new(CacheStore::new(cache_dir));
    let client = FeedClient::new(config.api_base_url.clone()).context("Failed to create HTTP client")?;
    let pipeline = BlockPipeline::new(Arc::new(client), cache, PipelineSettings::from_config(config));

    let (tx, mut rx) = mpsc::channel::<RenderFrame>(FRAME_BUFFER_SIZE);
    let mount = Mount::new();

    // Palette follows the theme for as long as frames keep coming
    let theme_sub = theme.subscribe();
    let colored = io::stdout().is_terminal();
    let printer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if !json {
                let palette = if colored {
                    Palette::for_theme(theme_sub.current())
                } else {
                    Palette::plain()
                };
                println!("{}", render_frame(&frame, palette));
            }
        }
    });

    let runs = blocks.iter().map(|&block| {
        let pipeline = pipeline.clone();
        let mount = mount.clone();
        let tx = tx.clone();
        async move { pipeline.run(block, &mount, &tx).await }
    });
    let finals: Vec<RenderFrame> = join_all(runs).await.into_iter().flatten().collect();

    drop(tx);
    if let Err(e) = printer.await {
        warn!(error = %e, "Printer task failed");
    }

    if json {
        let views: Vec<_> = finals.iter().map(|f| &f.view).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
    }

    let failed = finals.iter().filter(|f| f.state.is_failure()).count();
    if failed > 0 {
        info!(failed, "Some blocks fell back to offline content");
    }
    Ok(())
}

fn cache_status(config: &Config) -> Result<()> {
    let cache_dir = config.cache_dir()?;
    let cache = CacheStore::new(cache_dir);

    let mut keys: Vec<String> = [TimeSlot::Morning, TimeSlot::Noon, TimeSlot::Evening, TimeSlot::Night]
        .into_iter()
        .map(|slot| BlockKind::DailyContent(slot).cache_key())
        .collect();
    keys.push(BlockKind::Digest.cache_key());

    println!("Cache: {}", cache.cache_dir().display());
    let now_ms = chrono::Utc::now().timestamp_millis();
    for (key, age) in cache.ages(&keys, now_ms) {
        println!("  {:<24} {}", key, age.unwrap_or_else(|| "never".to_string()));
    }
    Ok(())
}

fn set_theme(mut config: Config, theme: &ThemeStore, mode: Option<ThemeMode>) -> Result<()> {
    let Some(mode) = mode else {
        println!("{}", theme.get());
        return Ok(());
    };

    if theme.set(mode) {
        config.theme = mode;
        config.save().context("Failed to save config")?;
        info!(theme = %mode, "Theme saved");
    }
    println!("{}", theme.get());
    Ok(())
}
