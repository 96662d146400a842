//! Git-backed change source.
//!
//! Shells out to the `git` CLI for diffing, branch listing and branch
//! integration. A failed integration is inspected for unmerged paths and
//! aborted so the working tree is left clean; only a failure with no
//! conflicting files surfaces as a hard error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::traits::{ChangeSource, DiffSnapshot, MergeOutcome};
use crate::domain::MergeStrategy;
use crate::infra::diff::parser::parse_diff;

#[derive(Debug, Clone, Default)]
pub struct GitChangeSource;

impl GitChangeSource {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, repo: &Path, args: &[&str]) -> Result<std::process::Output> {
        Command::new("git")
            .args(["-C", &repo.to_string_lossy()])
            .args(args)
            .output()
            .await
            .with_context(|| format!("run git {}", args.join(" ")))
    }

    async fn run_checked(&self, repo: &Path, args: &[&str]) -> Result<String> {
        let output = self.run(repo, args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Paths git could not automatically integrate during the current
    /// merge/rebase attempt.
    async fn unmerged_paths(&self, repo: &Path) -> Result<Vec<String>> {
        let stdout = self
            .run_checked(repo, &["diff", "--name-only", "--diff-filter=U"])
            .await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    async fn abort_attempt(&self, repo: &Path, strategy: MergeStrategy) {
        let args: &[&str] = match strategy {
            MergeStrategy::Merge | MergeStrategy::Squash => &["merge", "--abort"],
            MergeStrategy::Rebase => &["rebase", "--abort"],
        };
        if let Err(err) = self.run(repo, args).await {
            log::warn!("failed to abort integration attempt: {err:#}");
        }
    }
}

/// Command argument lists, run in order, that integrate `branch` into the
/// currently checked out base branch under the given strategy.
pub(crate) fn integration_steps(strategy: MergeStrategy, branch: &str) -> Vec<Vec<String>> {
    let own = |args: &[&str]| args.iter().map(ToString::to_string).collect::<Vec<_>>();
    match strategy {
        MergeStrategy::Merge => vec![own(&["merge", "--no-ff", "--no-edit", branch])],
        MergeStrategy::Squash => vec![
            own(&["merge", "--squash", branch]),
            vec![
                "commit".into(),
                "-m".into(),
                format!("Squash merge of {branch}"),
            ],
        ],
        MergeStrategy::Rebase => vec![
            own(&["rebase", "HEAD", branch]),
            own(&["checkout", "-"]),
            own(&["merge", "--ff-only", branch]),
        ],
    }
}

#[async_trait]
impl ChangeSource for GitChangeSource {
    async fn diff(
        &self,
        project_path: &Path,
        branch: &str,
        base_branch: &str,
    ) -> Result<DiffSnapshot> {
        let range = format!("{base_branch}...{branch}");
        let text = self.run_checked(project_path, &["diff", &range]).await?;
        let files = parse_diff(&text)?;
        Ok(DiffSnapshot { text, files })
    }

    async fn branches(&self, project_path: &Path) -> Result<Vec<String>> {
        let stdout = self
            .run_checked(project_path, &["branch", "--format=%(refname:short)"])
            .await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    async fn merge_execute(
        &self,
        project_path: &Path,
        branch: &str,
        base_branch: &str,
        strategy: MergeStrategy,
    ) -> Result<MergeOutcome> {
        self.run_checked(project_path, &["checkout", base_branch])
            .await?;

        for step in integration_steps(strategy, branch) {
            let args: Vec<&str> = step.iter().map(String::as_str).collect();
            let output = self.run(project_path, &args).await?;
            if output.status.success() {
                continue;
            }

            let conflict_files = self.unmerged_paths(project_path).await.unwrap_or_default();
            self.abort_attempt(project_path, strategy).await;

            if conflict_files.is_empty() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(anyhow::anyhow!(
                    "git {} failed: {}",
                    args.join(" "),
                    stderr.trim()
                ));
            }

            log::info!(
                "merge of {branch} into {base_branch} hit {} conflicting file(s)",
                conflict_files.len()
            );
            return Ok(MergeOutcome {
                success: false,
                conflict_files,
            });
        }

        Ok(MergeOutcome {
            success: true,
            conflict_files: Vec::new(),
        })
    }
}
