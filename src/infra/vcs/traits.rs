use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::{FileDiff, MergeStrategy};

/// Diff snapshot handed over by a change source: the parsed per-file model
/// plus the raw text it came from (kept for fingerprinting).
#[derive(Debug, Clone)]
pub struct DiffSnapshot {
    pub text: String,
    pub files: Vec<FileDiff>,
}

/// Result of asking the change source to integrate a branch.
///
/// A non-empty `conflict_files` list means the merge did not go through,
/// regardless of what `success` claims; the engine treats that as a
/// conflict, not as an error.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub success: bool,
    pub conflict_files: Vec<String>,
}

/// Seam to the external git-plumbing collaborator.
///
/// The engine consumes already-computed diffs and delegates branch
/// integration; it never runs a diff algorithm or merge machinery itself.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Diff of `branch` against `base_branch` for the given project.
    async fn diff(&self, project_path: &Path, branch: &str, base_branch: &str)
    -> Result<DiffSnapshot>;

    /// Branch names available in the project.
    async fn branches(&self, project_path: &Path) -> Result<Vec<String>>;

    /// Apply the merge strategy and report success or the conflicting files.
    async fn merge_execute(
        &self,
        project_path: &Path,
        branch: &str,
        base_branch: &str,
        strategy: MergeStrategy,
    ) -> Result<MergeOutcome>;
}
