//! Report lines and the writer that emits them
//!
//! One line per affected directory goes to the output sink (stdout in the
//! binary). Diagnostics never go through here; they use the logger.

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use crate::config::NOT_SET;
use crate::models::RunSummary;

/// Outcome of the policy engine for one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// Scan mode: Album Artist differs from "Various Artists" or is missing
    Scanned {
        dir_name: String,
        album_artist: Option<String>,
    },
    /// Update mode: at least one blank Album Artist was filled
    Updated { dir_name: String },
    /// Force mode: Album Artist overwritten
    ForceUpdated { dir_name: String },
    /// Release-Type-Only mode: Release Type written
    ReleaseTypeUpdated { dir_name: String },
}

impl Report {
    pub fn dir_name(&self) -> &str {
        match self {
            Report::Scanned { dir_name, .. }
            | Report::Updated { dir_name }
            | Report::ForceUpdated { dir_name }
            | Report::ReleaseTypeUpdated { dir_name } => dir_name,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Scanned {
                dir_name,
                album_artist,
            } => write!(
                f,
                "{} - {}",
                dir_name,
                album_artist.as_deref().unwrap_or(NOT_SET)
            ),
            Report::Updated { dir_name } => write!(f, "Updated: {}", dir_name),
            Report::ForceUpdated { dir_name } => write!(f, "Force Updated: {}", dir_name),
            Report::ReleaseTypeUpdated { dir_name } => {
                write!(f, "Release Type Updated: {}", dir_name)
            }
        }
    }
}

/// Display name of a directory: its last component, or the whole path when
/// it has none (e.g. `/` or `..`)
pub fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Writes report lines to a sink, flushing after each one
pub struct Reporter<W: Write> {
    out: W,
    /// Whether to print a JSON summary when the run finishes
    summary: bool,
    lines: u64,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, summary: bool) -> Self {
        Self {
            out,
            summary,
            lines: 0,
        }
    }

    /// Emit one report line
    pub fn report(&mut self, report: &Report) -> io::Result<()> {
        writeln!(self.out, "{}", report)?;
        self.out.flush()?;
        self.lines += 1;
        Ok(())
    }

    /// Emit a free-form notice (e.g. interruption)
    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()
    }

    /// Print the JSON run summary if enabled
    pub fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        if !self.summary {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(summary)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.out, "{}", json)?;
        self.out.flush()
    }

    /// Number of report lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;

    #[test]
    fn test_report_lines() {
        let scanned = Report::Scanned {
            dir_name: "Compilation".into(),
            album_artist: Some("DJ Mix".into()),
        };
        assert_eq!(scanned.to_string(), "Compilation - DJ Mix");

        let unset = Report::Scanned {
            dir_name: "Compilation".into(),
            album_artist: None,
        };
        assert_eq!(unset.to_string(), "Compilation - (not set)");

        assert_eq!(
            Report::Updated { dir_name: "A".into() }.to_string(),
            "Updated: A"
        );
        assert_eq!(
            Report::ForceUpdated { dir_name: "A".into() }.to_string(),
            "Force Updated: A"
        );
        assert_eq!(
            Report::ReleaseTypeUpdated { dir_name: "A".into() }.to_string(),
            "Release Type Updated: A"
        );
    }

    #[test]
    fn test_dir_name() {
        assert_eq!(dir_name(Path::new("/music/Compilation")), "Compilation");
        assert_eq!(dir_name(Path::new("/")), "/");
    }

    #[test]
    fn test_reporter_writes_lines() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter
            .report(&Report::Updated { dir_name: "A".into() })
            .unwrap();
        reporter
            .report(&Report::Updated { dir_name: "B".into() })
            .unwrap();
        reporter.finish(&RunSummary::new(&Mode::Update)).unwrap();

        assert_eq!(reporter.lines(), 2);
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "Updated: A\nUpdated: B\n");
    }

    #[test]
    fn test_reporter_summary_json() {
        let mut reporter = Reporter::new(Vec::new(), true);
        let mut summary = RunSummary::new(&Mode::Scan);
        summary.directories_reported = 3;
        reporter.finish(&summary).unwrap();

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let parsed: RunSummary = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.directories_reported, 3);
        assert_eq!(parsed.mode, "scan");
    }
}
