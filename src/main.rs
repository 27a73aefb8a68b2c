//! Album Artist tagger CLI
//!
//! Scans a music tree and reports or fixes the Album Artist of each directory.

use clap::Parser;
use env_logger::Env;
use log::{error, warn};
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use album_artist_tagger::{FileTags, Mode, Reporter, TaggerConfig, DEFAULT_ALBUM_ARTIST};

const ABOUT: &str = r#"
Album Artist tagger - report or fix the Album Artist of every album directory

Examples:
  album_artist_tagger /music                          list directories not tagged "Various Artists"
  album_artist_tagger -u /music                       fill blank Album Artist with "Various Artists"
  album_artist_tagger /music/OST -f Soundtrack        set Album Artist on every file
  album_artist_tagger /music/Mixes -f -r compilation  "Various Artists" + Release Type
  album_artist_tagger -r live /music/Live             set Release Type only

Put the directory before a bare --force, otherwise it is taken as the value.
"#;

/// Album Artist scanner and updater
#[derive(Parser)]
#[command(name = "album_artist_tagger")]
#[command(author, version, about = ABOUT, long_about = None)]
struct Cli {
    /// Root directory to scan
    directory: PathBuf,

    /// Set Album Artist to "Various Artists" where it is missing
    #[arg(short = 'u', long, conflicts_with = "force")]
    update: bool,

    /// Set Album Artist on every file (default "Various Artists")
    #[arg(
        short = 'f',
        long,
        value_name = "VALUE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_ALBUM_ARTIST
    )]
    force: Option<String>,

    /// Set the Release Type field on every file
    #[arg(short = 'r', long = "release-type", value_name = "TYPE")]
    release_type: Option<String>,

    /// Print a JSON run summary after the report
    #[arg(long)]
    summary: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let mode = Mode::from_flags(cli.update, cli.force, cli.release_type);
    let config = TaggerConfig::builder()
        .root(cli.directory)
        .mode(mode)
        .build();

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), cli.summary);

    let summary = match album_artist_tagger::run(&config, FileTags::new(), &mut reporter, &interrupted)
    {
        Ok(summary) => summary,
        Err(e) if e.is_fatal() => {
            eprintln!("Error: {}", e.message);
            process::exit(1);
        }
        Err(e) => {
            error!("Error during scan: {}", e);
            process::exit(1);
        }
    };

    if summary.interrupted {
        if let Err(e) = reporter.notice("\nScan interrupted by user.") {
            error!("Failed to write interrupt notice: {}", e);
        }
        process::exit(0);
    }

    if let Err(e) = reporter.finish(&summary) {
        error!("Failed to write summary: {}", e);
        process::exit(1);
    }
}
