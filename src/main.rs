use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pixie::core::config::{self, CliOverrides, PixieConfig};
use pixie::core::history;
use pixie::core::source;
use pixie::core::state::RetreatPolicy;
use pixie::media::DefaultResolver;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "pixie", about = "Terminal viewer for ephemeral stories")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a story file
    Play {
        /// JSON story file (`name` + `mediaItems`)
        story: PathBuf,
        /// Progress updates per second
        #[arg(long)]
        tick_rate: Option<u32>,
        /// Seconds each image stays on screen
        #[arg(long)]
        image_duration: Option<f64>,
        /// What going back on the first item does
        #[arg(long, value_enum)]
        retreat_at_start: Option<RetreatPolicy>,
        /// Keep items whose media fails to load instead of skipping them
        #[arg(long)]
        no_skip_failed: bool,
    },
    /// List recently viewed stories
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to pixie.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("pixie.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Pixie starting up");

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        eprintln!("warning: {e}; using defaults");
        PixieConfig::default()
    });

    match args.command {
        Command::Play {
            story,
            tick_rate,
            image_duration,
            retreat_at_start,
            no_skip_failed,
        } => {
            let cli = CliOverrides {
                tick_rate_hz: tick_rate,
                image_duration_secs: image_duration,
                retreat_at_start,
                skip_failed_media: no_skip_failed.then_some(false),
            };
            let resolved = config::resolve(&file_config, &cli);
            log::debug!("Resolved config: {:?}", resolved);

            // Load before the terminal switches modes so errors print normally
            let queue = source::load_story(&story, resolved.image_duration).map_err(|e| {
                log::warn!("Failed to load story {}: {}", story.display(), e);
                io::Error::other(e.to_string())
            })?;

            let base_dir = story.parent().unwrap_or(Path::new(".")).to_path_buf();
            let resolver = Arc::new(DefaultResolver::new(base_dir, resolved.http_timeout));
            pixie::tui::run(queue, &resolved, resolver)
        }
        Command::History { limit } => {
            let dir = history::history_dir()?;
            let view_history = history::load_history(&dir)?;
            if view_history.records.is_empty() {
                println!("No stories viewed yet.");
            }
            for record in history::recent(&view_history, limit) {
                println!("{}", history::format_record(record));
            }
            Ok(())
        }
    }
}
