//! Recursive Album Artist / Release Type tagger for audio libraries
//!
//! Walks a directory tree, groups audio files by parent directory and applies
//! one of four per-directory policies: report, fill blanks, force a value, or
//! set the release type. Tag I/O is delegated to `id3` and `lofty`.

pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod report;
pub mod scanner;
pub mod tags;

pub use config::{TaggerConfig, DEFAULT_ALBUM_ARTIST};
pub use error::{TagError, TagErrorKind};
pub use models::{AudioFile, ContainerFormat, Mode, RunSummary};
pub use policy::PolicyEngine;
pub use report::{Report, Reporter};
pub use scanner::run;
pub use tags::{FileTags, TagAccess, TagFormat};
