//! Directory policy engine - decides what to read, write and report per directory

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_ALBUM_ARTIST;
use crate::models::{AudioFile, Mode, RunSummary};
use crate::report::{dir_name, Report};
use crate::tags::TagAccess;

/// Applies the active [`Mode`] to each directory at most once per run
pub struct PolicyEngine<T: TagAccess> {
    tags: T,
    mode: Mode,
    /// Directories already decided on
    visited: HashSet<PathBuf>,
    /// Every directory an audio file was seen in
    seen: HashSet<PathBuf>,
    summary: RunSummary,
}

impl<T: TagAccess> PolicyEngine<T> {
    pub fn new(tags: T, mode: Mode) -> Self {
        let summary = RunSummary::new(&mode);
        Self {
            tags,
            mode,
            visited: HashSet::new(),
            seen: HashSet::new(),
            summary,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_visited(&self, dir: &Path) -> bool {
        self.visited.contains(dir)
    }

    pub fn tags(&self) -> &T {
        &self.tags
    }

    /// Handle one audio file found by the walker.
    ///
    /// In scan mode only `file` itself is read and its directory is closed
    /// once it has been reported. The mutating modes close the directory on
    /// first sight and act on every file `list_group` returns for it.
    pub fn handle_file<F>(&mut self, file: &AudioFile, list_group: F) -> Option<Report>
    where
        F: FnOnce(&Path) -> Vec<AudioFile>,
    {
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        if !self.seen.contains(dir) {
            self.seen.insert(dir.to_path_buf());
        }
        if self.visited.contains(dir) {
            return None;
        }

        if !self.mode.is_mutating() {
            let report = self.scan_file(dir, file);
            if report.is_some() {
                self.visited.insert(dir.to_path_buf());
                self.summary.directories_reported += 1;
            }
            return report;
        }

        self.visited.insert(dir.to_path_buf());
        let group = list_group(dir);
        log::debug!("{}: {} audio file(s)", dir.display(), group.len());
        self.apply(dir, &group)
    }

    /// Apply the mutating mode to a whole directory group.
    ///
    /// Scan mode never touches a whole group and always returns `None`.
    pub fn apply(&mut self, dir: &Path, files: &[AudioFile]) -> Option<Report> {
        let dir_name = dir_name(dir);
        let report = match self.mode.clone() {
            Mode::Scan => None,
            Mode::Update => {
                (self.update_group(files) > 0).then_some(Report::Updated { dir_name })
            }
            Mode::Force {
                album_artist,
                release_type,
            } => (self.force_group(files, &album_artist, release_type.as_deref()) > 0)
                .then_some(Report::ForceUpdated { dir_name }),
            Mode::ReleaseTypeOnly { release_type } => {
                let written = files
                    .iter()
                    .filter(|f| self.write_release_type(f, &release_type))
                    .count();
                (written > 0).then_some(Report::ReleaseTypeUpdated { dir_name })
            }
        };

        if report.is_some() {
            self.summary.directories_reported += 1;
        }
        report
    }

    /// Consume the engine, returning its counters
    pub fn finish(mut self) -> RunSummary {
        self.summary.directories_visited = self.seen.len() as u64;
        self.summary
    }

    fn scan_file(&mut self, dir: &Path, file: &AudioFile) -> Option<Report> {
        let album_artist = self.read_album_artist(file);
        if album_artist.as_deref() == Some(DEFAULT_ALBUM_ARTIST) {
            return None;
        }
        Some(Report::Scanned {
            dir_name: dir_name(dir),
            album_artist,
        })
    }

    /// Fill blank Album Artist fields; returns the number of files written
    fn update_group(&mut self, files: &[AudioFile]) -> usize {
        let needs_update = files.iter().any(|f| self.read_album_artist(f).is_none());
        if !needs_update {
            return 0;
        }

        let mut updated = 0;
        for file in files {
            // Re-read: the first pass stopped at the first blank file.
            if self.read_album_artist(file).is_some() {
                continue;
            }
            if self.write_album_artist(file, DEFAULT_ALBUM_ARTIST) {
                updated += 1;
            }
        }
        updated
    }

    /// Overwrite Album Artist everywhere; returns the number of Album Artist writes
    fn force_group(
        &mut self,
        files: &[AudioFile],
        album_artist: &str,
        release_type: Option<&str>,
    ) -> usize {
        let mut updated = 0;
        for file in files {
            if self.write_album_artist(file, album_artist) {
                updated += 1;
            }
            if let Some(release_type) = release_type {
                self.write_release_type(file, release_type);
            }
        }
        updated
    }

    /// Read failures are logged and read as missing
    fn read_album_artist(&mut self, file: &AudioFile) -> Option<String> {
        match self.tags.album_artist(file) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Error reading {}: {}", file.path.display(), e.message);
                self.summary.read_errors += 1;
                None
            }
        }
    }

    fn write_album_artist(&mut self, file: &AudioFile, value: &str) -> bool {
        match self.tags.set_album_artist(file, value) {
            Ok(()) => {
                log::info!("Album Artist = {:?}: {}", value, file.path.display());
                self.summary.writes_succeeded += 1;
                true
            }
            Err(e) => {
                log::error!("Error updating {}: {}", file.path.display(), e.message);
                self.summary.writes_failed += 1;
                false
            }
        }
    }

    fn write_release_type(&mut self, file: &AudioFile, value: &str) -> bool {
        match self.tags.set_release_type(file, value) {
            Ok(()) => {
                log::info!("Release Type = {:?}: {}", value, file.path.display());
                self.summary.writes_succeeded += 1;
                true
            }
            Err(e) => {
                log::error!(
                    "Error setting release type on {}: {}",
                    file.path.display(),
                    e.message
                );
                self.summary.writes_failed += 1;
                false
            }
        }
    }
}
