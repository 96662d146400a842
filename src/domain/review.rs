use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::comment::ReviewComment;
use super::diff::{DiffStats, FileDiff};

/// Unique identifier for a review item.
pub type ReviewItemId = String;

/// Workflow position of a review.
///
/// Status is a separate axis from [`ReviewDecision`]: a decision records
/// reviewer intent, status records where the item sits in the workflow.
/// The lifecycle controller keeps them in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    InReview,
    Approved,
    Rejected,
    ChangesRequested,
    Merging,
    Merged,
    MergeConflict,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InReview => write!(f, "in_review"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::ChangesRequested => write!(f, "changes_requested"),
            Self::Merging => write!(f, "merging"),
            Self::Merged => write!(f, "merged"),
            Self::MergeConflict => write!(f, "merge_conflict"),
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_review" | "in-review" => Ok(Self::InReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "changes_requested" | "changes-requested" => Ok(Self::ChangesRequested),
            "merging" => Ok(Self::Merging),
            "merged" => Ok(Self::Merged),
            "merge_conflict" | "merge-conflict" => Ok(Self::MergeConflict),
            other => Err(format!("unknown review status: {other}")),
        }
    }
}

/// Reviewer's verdict on a review, distinct from workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    ChangesRequested,
}

impl ReviewDecision {
    /// The workflow status a freshly issued decision moves the review to.
    pub fn status(self) -> ReviewStatus {
        match self {
            Self::Approved => ReviewStatus::Approved,
            Self::Rejected => ReviewStatus::Rejected,
            Self::ChangesRequested => ReviewStatus::ChangesRequested,
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::ChangesRequested => write!(f, "changes_requested"),
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            "changes_requested" | "changes-requested" | "request_changes" => {
                Ok(Self::ChangesRequested)
            }
            other => Err(format!("unknown review decision: {other}")),
        }
    }
}

/// Policy for integrating a review branch into its base branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Direct merge commit.
    #[default]
    Merge,
    /// Squash the branch into one commit.
    Squash,
    /// Rebase onto the base and fast-forward.
    Rebase,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Squash => write!(f, "squash"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            other => Err(format!("unknown merge strategy: {other}")),
        }
    }
}

/// The aggregate root of the review workflow.
///
/// Created when a change-source snapshot is taken for a (branch, base)
/// pair; mutated by every status/decision/comment/strategy operation (each
/// bumps `updated_at`); never physically deleted by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Unique identifier for the review.
    pub id: ReviewItemId,
    /// Project the review belongs to (persistence key).
    pub project_path: String,
    /// Session that produced the branch under review.
    pub session_id: String,
    /// Source branch.
    pub branch: String,
    /// Branch the change is merged into.
    pub base_branch: String,
    /// Current workflow position.
    #[serde(default)]
    pub status: ReviewStatus,
    /// Latest reviewer verdict, if one has been issued.
    #[serde(default)]
    pub decision: Option<ReviewDecision>,
    /// Per-review override of the project-wide default strategy.
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    /// Cached aggregate stats over `files`.
    #[serde(default)]
    pub stats: DiffStats,
    /// Immutable diff snapshot taken at creation time.
    pub files: Vec<FileDiff>,
    /// Threaded review comments, ordered by creation time.
    #[serde(default)]
    pub comments: Vec<ReviewComment>,
    /// Paths the last merge attempt could not integrate; empty when none.
    #[serde(default)]
    pub conflict_files: Vec<String>,
    /// Fingerprint of the raw diff text this snapshot was built from.
    pub diff_hash: String,
    /// Creation timestamp in RFC3339 format.
    pub created_at: String,
    /// Update timestamp in RFC3339 format.
    pub updated_at: String,
}

impl ReviewItem {
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }

    pub fn file(&self, path: &str) -> Option<&FileDiff> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn comment(&self, comment_id: &str) -> Option<&ReviewComment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}
