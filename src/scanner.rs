//! Scanner module - walks the tree and feeds directories to the policy engine

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use walkdir::WalkDir;

use crate::config::TaggerConfig;
use crate::error::TagError;
use crate::models::{AudioFile, RunSummary};
use crate::policy::PolicyEngine;
use crate::report::Reporter;
use crate::tags::TagAccess;

/// Walk `config.root` and apply `config.mode` to every directory holding audio.
///
/// Per-file problems are logged and counted in the returned summary. Only an
/// invalid root or a failure to write the report itself returns `Err`.
/// `interrupt` is polled between entries; once set the walk stops and the
/// summary comes back with `interrupted = true`.
pub fn run<T, W>(
    config: &TaggerConfig,
    tags: T,
    reporter: &mut Reporter<W>,
    interrupt: &AtomicBool,
) -> Result<RunSummary, TagError>
where
    T: TagAccess,
    W: Write,
{
    config.validate()?;

    let start = Instant::now();
    let mut engine = PolicyEngine::new(tags, config.mode.clone());
    let mut audio_files = 0u64;
    let mut walk_errors = 0u64;
    let mut interrupted = false;

    log::info!(
        "Walking {} ({} mode)",
        config.root.display(),
        engine.mode().as_str()
    );

    let mut walker = WalkDir::new(&config.root).follow_links(config.follow_links);
    if config.sort_entries {
        walker = walker.sort_by_file_name();
    }

    for entry in walker {
        if interrupt.load(Ordering::SeqCst) {
            interrupted = true;
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = TagError::from(e);
                log::warn!("Skipping {:?}: {}", err.path, err.message);
                walk_errors += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() || !config.is_audio_path(entry.path()) {
            continue;
        }
        let Some(file) = AudioFile::from_path(entry.path()) else {
            continue;
        };
        audio_files += 1;

        if let Some(report) = engine.handle_file(&file, |dir| list_group(dir, config)) {
            log::debug!("Reporting {}", report.dir_name());
            reporter.report(&report)?;
        }
    }

    let mut summary = engine.finish();
    summary.audio_files = audio_files;
    summary.walk_errors = walk_errors;
    summary.interrupted = interrupted;

    log::info!(
        "Done in {}ms: {} audio files, {} directories reported, {} errors",
        start.elapsed().as_millis(),
        summary.audio_files,
        summary.directories_reported,
        summary.error_count()
    );

    Ok(summary)
}

/// Audio files directly inside `dir`, in file name order
pub fn list_group(dir: &Path, config: &TaggerConfig) -> Vec<AudioFile> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && config.is_audio_path(entry.path()))
        .filter_map(|entry| AudioFile::from_path(entry.into_path()))
        .collect()
}
