use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DiffError;

/// Kind of a single diff line.
///
/// Context lines consume both the old and the new line counter, additions
/// consume only the new counter, deletions only the old one. The enum is
/// closed on purpose: every renderer and policy matches it exhaustively, so
/// adding a kind fails to compile until every branch is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Context,
    Addition,
    Deletion,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context => write!(f, "context"),
            Self::Addition => write!(f, "addition"),
            Self::Deletion => write!(f, "deletion"),
        }
    }
}

/// One raw line inside a hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    pub content: String,
}

impl Line {
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// A contiguous block of a diff sharing one old/new line-range header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<Line>,
}

impl Hunk {
    /// Replay the hunk's lines and verify they advance the old counter by
    /// exactly `old_count` and the new counter by exactly `new_count`.
    ///
    /// Any lawful hunk satisfies this; a mismatch means the hunk header and
    /// body disagree and downstream line numbering would be wrong.
    pub fn validate(&self, file: &str) -> Result<(), DiffError> {
        let mut old_seen = 0u32;
        let mut new_seen = 0u32;
        for line in &self.lines {
            match line.kind {
                LineKind::Context => {
                    old_seen += 1;
                    new_seen += 1;
                }
                LineKind::Addition => new_seen += 1,
                LineKind::Deletion => old_seen += 1,
            }
        }
        if old_seen != self.old_count || new_seen != self.new_count {
            return Err(DiffError::CounterMismatch {
                file: file.to_string(),
                old_seen,
                old_count: self.old_count,
                new_seen,
                new_count: self.new_count,
            });
        }
        Ok(())
    }

    pub fn additions(&self) -> u32 {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Addition)
            .count() as u32
    }

    pub fn deletions(&self) -> u32 {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Deletion)
            .count() as u32
    }
}

/// How a file changed between the base branch and the review branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Deleted,
    #[default]
    Modified,
    Renamed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Deleted => write!(f, "deleted"),
            Self::Modified => write!(f, "modified"),
            Self::Renamed => write!(f, "renamed"),
        }
    }
}

impl FromStr for FileStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" => Ok(Self::Added),
            "deleted" => Ok(Self::Deleted),
            "modified" => Ok(Self::Modified),
            "renamed" => Ok(Self::Renamed),
            other => Err(format!("unknown file status: {other}")),
        }
    }
}

/// Diff of a single file, immutable once attached to a review snapshot.
///
/// Re-diffing requires creating a new review; the hunks here are consumed
/// as computed by the change source, never recomputed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Relative path of the file in the new tree.
    pub path: String,
    /// Previous path when the file was renamed.
    #[serde(default)]
    pub old_path: Option<String>,
    #[serde(default)]
    pub status: FileStatus,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    pub fn additions(&self) -> u32 {
        self.hunks.iter().map(Hunk::additions).sum()
    }

    pub fn deletions(&self) -> u32 {
        self.hunks.iter().map(Hunk::deletions).sum()
    }

    /// Whether `line_number` exists as a new-file line (context or addition)
    /// somewhere in this file's hunks. Deletions have no new-file line and
    /// therefore never satisfy this.
    pub fn contains_new_line(&self, line_number: u32) -> bool {
        for hunk in &self.hunks {
            let mut new_line = hunk.new_start;
            for line in &hunk.lines {
                match line.kind {
                    LineKind::Context | LineKind::Addition => {
                        if new_line == line_number {
                            return true;
                        }
                        new_line += 1;
                    }
                    LineKind::Deletion => {}
                }
            }
        }
        false
    }
}

/// Aggregate stats over a review's file diffs.
///
/// Computed once at review creation and stored as plain fields. They are a
/// cache for list views; the authoritative source is always the `FileDiff`
/// list itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiffStats {
    pub files_changed: u32,
    pub additions: u32,
    pub deletions: u32,
}

impl DiffStats {
    pub fn from_files(files: &[FileDiff]) -> Self {
        Self {
            files_changed: files.len() as u32,
            additions: files.iter().map(FileDiff::additions).sum(),
            deletions: files.iter().map(FileDiff::deletions).sum(),
        }
    }
}
