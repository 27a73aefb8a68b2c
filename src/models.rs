//! Core data models for the tagger

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_ALBUM_ARTIST;

/// Audio container format, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Mp3,
    Flac,
    Ogg,
    M4a,
    Mp4,
    Wav,
    Wma,
    Aac,
}

impl ContainerFormat {
    /// Every supported format
    pub const ALL: [ContainerFormat; 8] = [
        ContainerFormat::Mp3,
        ContainerFormat::Flac,
        ContainerFormat::M4a,
        ContainerFormat::Mp4,
        ContainerFormat::Ogg,
        ContainerFormat::Wav,
        ContainerFormat::Wma,
        ContainerFormat::Aac,
    ];

    /// Infer the container format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(ContainerFormat::Mp3),
            "flac" => Some(ContainerFormat::Flac),
            "ogg" => Some(ContainerFormat::Ogg),
            "m4a" => Some(ContainerFormat::M4a),
            "mp4" => Some(ContainerFormat::Mp4),
            "wav" => Some(ContainerFormat::Wav),
            "wma" => Some(ContainerFormat::Wma),
            "aac" => Some(ContainerFormat::Aac),
            _ => None,
        }
    }

    /// Infer the container format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical lowercase extension
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::Mp3 => "mp3",
            ContainerFormat::Flac => "flac",
            ContainerFormat::Ogg => "ogg",
            ContainerFormat::M4a => "m4a",
            ContainerFormat::Mp4 => "mp4",
            ContainerFormat::Wav => "wav",
            ContainerFormat::Wma => "wma",
            ContainerFormat::Aac => "aac",
        }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A file with a recognized audio extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Container format derived from the extension
    pub format: ContainerFormat,
}

impl AudioFile {
    /// Classify a path, returning `None` for non-audio extensions
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = ContainerFormat::from_path(&path)?;
        Some(Self { path, format })
    }

    /// The directory this file belongs to
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// What the run does to each directory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// Report directories whose Album Artist is not "Various Artists"
    #[default]
    Scan,
    /// Fill blank Album Artist fields with "Various Artists"
    Update,
    /// Overwrite Album Artist on every file, optionally setting Release Type too
    Force {
        album_artist: String,
        release_type: Option<String>,
    },
    /// Set Release Type on every file, leaving Album Artist alone
    ReleaseTypeOnly { release_type: String },
}

impl Mode {
    /// Resolve the active mode from the raw CLI flags.
    ///
    /// Precedence is Force > Release-Type-Only > Update > Scan.
    pub fn from_flags(update: bool, force: Option<String>, release_type: Option<String>) -> Self {
        match (force, release_type) {
            (Some(album_artist), release_type) => Mode::Force {
                album_artist: if album_artist.is_empty() {
                    DEFAULT_ALBUM_ARTIST.to_string()
                } else {
                    album_artist
                },
                release_type,
            },
            (None, Some(release_type)) => Mode::ReleaseTypeOnly { release_type },
            (None, None) if update => Mode::Update,
            (None, None) => Mode::Scan,
        }
    }

    /// Whether this mode writes to files
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Mode::Scan)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Scan => "scan",
            Mode::Update => "update",
            Mode::Force { .. } => "force",
            Mode::ReleaseTypeOnly { .. } => "release_type",
        }
    }
}

/// Counters collected over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Active mode name
    pub mode: String,
    /// Audio files encountered by the walker
    pub audio_files: u64,
    /// Directories holding at least one audio file, reported or not
    pub directories_visited: u64,
    /// Directories that produced a report line
    pub directories_reported: u64,
    /// Successful tag writes
    pub writes_succeeded: u64,
    /// Failed tag writes
    pub writes_failed: u64,
    /// Files whose tags could not be read
    pub read_errors: u64,
    /// Walk entries skipped because of traversal errors
    pub walk_errors: u64,
    /// Whether the run was cut short by Ctrl-C
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub interrupted: bool,
}

impl RunSummary {
    pub fn new(mode: &Mode) -> Self {
        Self {
            mode: mode.as_str().to_string(),
            ..Default::default()
        }
    }

    /// Total number of per-file problems
    pub fn error_count(&self) -> u64 {
        self.writes_failed + self.read_errors + self.walk_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_container_format_from_extension() {
        assert_eq!(ContainerFormat::from_extension("mp3"), Some(ContainerFormat::Mp3));
        assert_eq!(ContainerFormat::from_extension("FLAC"), Some(ContainerFormat::Flac));
        assert_eq!(ContainerFormat::from_extension("M4a"), Some(ContainerFormat::M4a));
        assert_eq!(ContainerFormat::from_extension("wma"), Some(ContainerFormat::Wma));
        assert_eq!(ContainerFormat::from_extension("txt"), None);
        assert_eq!(ContainerFormat::from_extension("jpg"), None);
        assert_eq!(ContainerFormat::from_extension(""), None);
    }

    #[test]
    fn test_audio_file_from_path() {
        let file = AudioFile::from_path("/music/Compilation/a.MP3").unwrap();
        assert_eq!(file.format, ContainerFormat::Mp3);
        assert_eq!(file.parent(), Some(Path::new("/music/Compilation")));

        assert!(AudioFile::from_path("/music/cover.jpg").is_none());
        assert!(AudioFile::from_path("/music/README").is_none());
    }

    #[test]
    fn test_mode_precedence() {
        assert_eq!(Mode::from_flags(false, None, None), Mode::Scan);
        assert_eq!(Mode::from_flags(true, None, None), Mode::Update);
        assert_eq!(
            Mode::from_flags(true, None, Some("compilation".into())),
            Mode::ReleaseTypeOnly {
                release_type: "compilation".into()
            }
        );
        assert_eq!(
            Mode::from_flags(false, Some("Soundtrack".into()), Some("soundtrack".into())),
            Mode::Force {
                album_artist: "Soundtrack".into(),
                release_type: Some("soundtrack".into())
            }
        );
    }

    #[test]
    fn test_force_empty_value_uses_default() {
        assert_eq!(
            Mode::from_flags(false, Some(String::new()), None),
            Mode::Force {
                album_artist: DEFAULT_ALBUM_ARTIST.into(),
                release_type: None
            }
        );
    }

    #[test]
    fn test_summary_serialization_skips_interrupted_flag() {
        let summary = RunSummary::new(&Mode::Update);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"mode\":\"update\""));
        assert!(!json.contains("interrupted"));
    }

    proptest! {
        #[test]
        fn prop_extension_case_insensitive(idx in 0usize..8, upper in proptest::collection::vec(any::<bool>(), 4)) {
            let format = ContainerFormat::ALL[idx];
            let mixed: String = format
                .extension()
                .chars()
                .zip(upper.iter().cycle())
                .map(|(c, u)| if *u { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(ContainerFormat::from_extension(&mixed), Some(format));
        }

        #[test]
        fn prop_force_always_wins(update: bool, value in "[A-Za-z ]{1,20}", rt in proptest::option::of("[a-z]{1,10}")) {
            let mode = Mode::from_flags(update, Some(value.clone()), rt.clone());
            prop_assert_eq!(mode, Mode::Force { album_artist: value, release_type: rt });
        }
    }
}
