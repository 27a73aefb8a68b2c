//! Error types for the tagger

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error kinds that can occur while walking or tagging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagErrorKind {
    /// Root path does not exist
    NotFound,
    /// Root path exists but is not a directory
    NotADirectory,
    /// Permission denied when accessing a file or directory
    PermissionDenied,
    /// Plain I/O error
    Io,
    /// Tag could not be read from a file
    Read,
    /// Tag could not be written or saved
    Write,
    /// The container format has no usable tag for the requested field
    Unsupported,
    /// Directory traversal failed for an entry
    Walk,
}

/// Represents an error that occurred while walking or tagging
#[derive(Debug, Error)]
#[error("{kind:?}: {message} (path: {path:?})")]
pub struct TagError {
    /// The kind of error
    pub kind: TagErrorKind,
    /// The path where the error occurred
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl TagError {
    /// Create a new tag error
    pub fn new(kind: TagErrorKind, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Root path does not exist
    pub fn not_found(path: &Path) -> Self {
        Self::new(
            TagErrorKind::NotFound,
            Some(path.to_path_buf()),
            format!("Directory '{}' does not exist.", path.display()),
        )
    }

    /// Root path is not a directory
    pub fn not_a_directory(path: &Path) -> Self {
        Self::new(
            TagErrorKind::NotADirectory,
            Some(path.to_path_buf()),
            format!("'{}' is not a directory.", path.display()),
        )
    }

    /// Tag read failure
    pub fn read(path: &Path, message: impl Into<String>) -> Self {
        Self::new(TagErrorKind::Read, Some(path.to_path_buf()), message)
    }

    /// Tag write failure
    pub fn write(path: &Path, message: impl Into<String>) -> Self {
        Self::new(TagErrorKind::Write, Some(path.to_path_buf()), message)
    }

    /// No tag of a usable type for this file
    pub fn unsupported(path: &Path, message: impl Into<String>) -> Self {
        Self::new(TagErrorKind::Unsupported, Some(path.to_path_buf()), message)
    }

    /// Attach a path to an error that was converted without one
    pub fn at(mut self, path: &Path) -> Self {
        if self.path.is_none() {
            self.path = Some(path.to_path_buf());
        }
        self
    }

    /// Whether this error should stop the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, TagErrorKind::NotFound | TagErrorKind::NotADirectory)
    }
}

impl From<std::io::Error> for TagError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => TagErrorKind::PermissionDenied,
            _ => TagErrorKind::Io,
        };
        Self::new(kind, None, err.to_string())
    }
}

impl From<id3::Error> for TagError {
    fn from(err: id3::Error) -> Self {
        Self::new(TagErrorKind::Read, None, err.to_string())
    }
}

impl From<lofty::error::LoftyError> for TagError {
    fn from(err: lofty::error::LoftyError) -> Self {
        Self::new(TagErrorKind::Read, None, err.to_string())
    }
}

impl From<walkdir::Error> for TagError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let kind = if err.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::PermissionDenied)
        {
            TagErrorKind::PermissionDenied
        } else {
            TagErrorKind::Walk
        };
        Self::new(kind, path, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_errors_are_fatal() {
        let path = Path::new("/no/such/dir");
        assert!(TagError::not_found(path).is_fatal());
        assert!(TagError::not_a_directory(path).is_fatal());
        assert!(!TagError::read(path, "bad header").is_fatal());
    }

    #[test]
    fn test_not_found_message() {
        let err = TagError::not_found(Path::new("/music"));
        assert_eq!(err.message, "Directory '/music' does not exist.");
        assert_eq!(err.path, Some(PathBuf::from("/music")));
    }

    #[test]
    fn test_at_keeps_existing_path() {
        let err = TagError::read(Path::new("/a.mp3"), "x").at(Path::new("/b.mp3"));
        assert_eq!(err.path, Some(PathBuf::from("/a.mp3")));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TagError::from(io).at(Path::new("/b.mp3"));
        assert_eq!(err.kind, TagErrorKind::PermissionDenied);
        assert_eq!(err.path, Some(PathBuf::from("/b.mp3")));
    }
}
