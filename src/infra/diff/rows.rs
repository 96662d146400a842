//! Row projections for rendering a file diff.
//!
//! A `FileDiff` is projected into two navigable row streams: a unified
//! stream (one row per line, old/new numbers side by side) and a split
//! stream (old column / new column pairs for side-by-side display). Both
//! builders are pure functions of their input.
//!
//! The split pairing is deliberately positional: consecutive runs of
//! deletions and additions within a hunk are buffered separately, and a
//! context line or the end of the hunk flushes them as zipped pairs. This
//! gives the classic "change block" visual without running a line-level
//! similarity match. Pairs never span hunks or a flush boundary.

use crate::domain::{FileDiff, Hunk, LineKind};

/// Range header shared by both projections, one per hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

impl HunkHeader {
    fn of(hunk: &Hunk) -> Self {
        Self {
            old_start: hunk.old_start,
            old_count: hunk.old_count,
            new_start: hunk.new_start,
            new_count: hunk.new_count,
        }
    }

    /// Conventional `@@ -a,b +c,d @@` label for rendering.
    pub fn label(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

/// One row of the unified projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifiedRow {
    /// Marker row labelling the hunk's old/new ranges.
    Hunk(HunkHeader),
    /// One diff line, carrying whichever line numbers apply to its kind.
    Line {
        old_line: Option<u32>,
        new_line: Option<u32>,
        kind: LineKind,
        content: String,
    },
}

/// Content for one side of a split row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCell {
    pub line: u32,
    pub kind: LineKind,
    pub content: String,
}

/// One row of the split projection. A `None` half means the other side has
/// no counterpart at this position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRow {
    Hunk(HunkHeader),
    Line {
        old: Option<SplitCell>,
        new: Option<SplitCell>,
    },
}

/// Build the unified row stream for a file.
///
/// Walks hunks in order, emitting one marker row per hunk followed by one
/// row per line. Counters begin at the hunk's declared starts: context
/// lines consume both, additions only the new one, deletions only the old.
pub fn unified_rows(file: &FileDiff) -> Vec<UnifiedRow> {
    let mut rows = Vec::new();

    for hunk in &file.hunks {
        rows.push(UnifiedRow::Hunk(HunkHeader::of(hunk)));

        let mut old_line = hunk.old_start;
        let mut new_line = hunk.new_start;

        for line in &hunk.lines {
            let (old, new) = match line.kind {
                LineKind::Context => {
                    let pair = (Some(old_line), Some(new_line));
                    old_line += 1;
                    new_line += 1;
                    pair
                }
                LineKind::Addition => {
                    let pair = (None, Some(new_line));
                    new_line += 1;
                    pair
                }
                LineKind::Deletion => {
                    let pair = (Some(old_line), None);
                    old_line += 1;
                    pair
                }
            };
            rows.push(UnifiedRow::Line {
                old_line: old,
                new_line: new,
                kind: line.kind,
                content: line.content.clone(),
            });
        }
    }

    rows
}

/// Build the split (side-by-side) row stream for a file.
///
/// Context lines are emitted immediately with identical content on both
/// sides. Runs of deletions and additions are buffered separately; a
/// context line or the end of the hunk flushes the buffers, emitting
/// `max(deletions, additions)` rows zipped by position with a `None` half
/// where one side is shorter.
pub fn split_rows(file: &FileDiff) -> Vec<SplitRow> {
    let mut rows = Vec::new();

    for hunk in &file.hunks {
        rows.push(SplitRow::Hunk(HunkHeader::of(hunk)));

        let mut old_line = hunk.old_start;
        let mut new_line = hunk.new_start;
        let mut deletions: Vec<SplitCell> = Vec::new();
        let mut additions: Vec<SplitCell> = Vec::new();

        for line in &hunk.lines {
            match line.kind {
                LineKind::Context => {
                    flush(&mut rows, &mut deletions, &mut additions);
                    rows.push(SplitRow::Line {
                        old: Some(SplitCell {
                            line: old_line,
                            kind: LineKind::Context,
                            content: line.content.clone(),
                        }),
                        new: Some(SplitCell {
                            line: new_line,
                            kind: LineKind::Context,
                            content: line.content.clone(),
                        }),
                    });
                    old_line += 1;
                    new_line += 1;
                }
                LineKind::Deletion => {
                    deletions.push(SplitCell {
                        line: old_line,
                        kind: LineKind::Deletion,
                        content: line.content.clone(),
                    });
                    old_line += 1;
                }
                LineKind::Addition => {
                    additions.push(SplitCell {
                        line: new_line,
                        kind: LineKind::Addition,
                        content: line.content.clone(),
                    });
                    new_line += 1;
                }
            }
        }

        // End of hunk forces a flush; pairs never cross into the next hunk.
        flush(&mut rows, &mut deletions, &mut additions);
    }

    rows
}

fn flush(rows: &mut Vec<SplitRow>, deletions: &mut Vec<SplitCell>, additions: &mut Vec<SplitCell>) {
    if deletions.is_empty() && additions.is_empty() {
        return;
    }

    let count = deletions.len().max(additions.len());
    let mut old_iter = deletions.drain(..);
    let mut new_iter = additions.drain(..);
    for _ in 0..count {
        rows.push(SplitRow::Line {
            old: old_iter.next(),
            new: new_iter.next(),
        });
    }
}
