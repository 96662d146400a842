//! Parsing of raw `git diff` output into the domain diff model.
//!
//! The engine never computes diffs itself: the change source hands over
//! unified diff text and this module turns it into `FileDiff` snapshots,
//! validating the hunk counter invariant on the way in.

use anyhow::Result;
use unidiff::PatchSet;

use crate::domain::{DiffError, FileDiff, FileStatus, Hunk, Line, LineKind};

// Strip exactly one leading `a/` or `b/` component; a real path whose
// first component is `b/` must come through intact.
fn strip_git_prefix(path: &str) -> String {
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
        .to_string()
}

fn is_dev_null(path: &str) -> bool {
    path == "dev/null" || path == "/dev/null"
}

/// Parse unified diff text into per-file diffs.
///
/// Returns an empty list for empty input. Fails with
/// [`DiffError::CounterMismatch`] if any hunk's body disagrees with its
/// declared line counts.
pub fn parse_diff(diff_text: &str) -> Result<Vec<FileDiff>> {
    let trimmed = diff_text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut patch = PatchSet::new();
    patch
        .parse(trimmed)
        .map_err(|e| DiffError::InvalidFormat(e.to_string()))?;

    let mut files = Vec::new();

    for file in patch.files() {
        let source = strip_git_prefix(&file.source_file);
        let target = strip_git_prefix(&file.target_file);

        let (path, old_path, status) = if is_dev_null(&source) {
            (target.clone(), None, FileStatus::Added)
        } else if is_dev_null(&target) {
            (source.clone(), None, FileStatus::Deleted)
        } else if source != target {
            (target.clone(), Some(source.clone()), FileStatus::Renamed)
        } else {
            (target.clone(), None, FileStatus::Modified)
        };

        let mut hunks = Vec::new();
        for hunk in file.hunks() {
            let mut lines = Vec::new();
            for line in hunk.lines() {
                let kind = if line.is_added() {
                    LineKind::Addition
                } else if line.is_removed() {
                    LineKind::Deletion
                } else {
                    LineKind::Context
                };
                lines.push(Line::new(kind, line.value.as_str()));
            }

            let hunk = Hunk {
                old_start: hunk.source_start as u32,
                old_count: hunk.source_length as u32,
                new_start: hunk.target_start as u32,
                new_count: hunk.target_length as u32,
                lines,
            };
            hunk.validate(&path)?;
            hunks.push(hunk);
        }

        files.push(FileDiff {
            path,
            old_path,
            status,
            hunks,
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -10,3 +10,4 @@ fn demo() {
 a
-b
+c
+d
 e
";

    #[test]
    fn test_parse_modified_file() {
        let files = parse_diff(SAMPLE).unwrap();
        assert_eq!(files.len(), 1);
        let file = &files[0];
        assert_eq!(file.path, "src/lib.rs");
        assert_eq!(file.status, FileStatus::Modified);
        assert_eq!(file.hunks.len(), 1);

        let hunk = &file.hunks[0];
        assert_eq!(
            (hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count),
            (10, 3, 10, 4)
        );
        let kinds: Vec<LineKind> = hunk.lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Context,
                LineKind::Deletion,
                LineKind::Addition,
                LineKind::Addition,
                LineKind::Context,
            ]
        );
    }

    #[test]
    fn test_parse_added_file() {
        let diff = "\
diff --git a/new.txt b/new.txt
new file mode 100644
index 0000000..3333333
--- /dev/null
+++ b/new.txt
@@ -0,0 +1,2 @@
+hello
+world
";
        let files = parse_diff(diff).unwrap();
        assert_eq!(files[0].status, FileStatus::Added);
        assert_eq!(files[0].path, "new.txt");
        assert_eq!(files[0].additions(), 2);
        assert_eq!(files[0].deletions(), 0);
    }

    #[test]
    fn test_parse_keeps_path_with_leading_b_component() {
        let diff = "\
diff --git a/b/render.rs b/b/render.rs
index 1111111..2222222 100644
--- a/b/render.rs
+++ b/b/render.rs
@@ -1,1 +1,1 @@
-old
+new
";
        let files = parse_diff(diff).unwrap();
        assert_eq!(files[0].path, "b/render.rs");
        assert_eq!(files[0].status, FileStatus::Modified);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_diff("").unwrap().is_empty());
        assert!(parse_diff("   \n").unwrap().is_empty());
    }
}
