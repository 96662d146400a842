use serde::{Deserialize, Serialize};

use super::review::ReviewItemId;

/// A review comment anchored to a (file, new-file line) coordinate.
///
/// The anchor always addresses the new side of the diff: deletions have no
/// new-file line and cannot carry a comment. Created by a reviewer action,
/// mutated only by resolve/reopen. Threads are derived, not stored: the
/// thread for an anchor is the time-ordered subsequence of a review's
/// comments sharing that (file, line) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Unique identifier for the comment.
    pub id: String,
    /// Parent review ID.
    pub review_id: ReviewItemId,
    /// Relative path of the commented file.
    pub file_path: String,
    /// New-file line number the comment is anchored to.
    pub line_number: u32,
    /// Body text of the comment (markdown).
    pub body: String,
    /// Author identifier.
    pub author: String,
    /// Whether the comment has been resolved.
    #[serde(default)]
    pub resolved: bool,
    /// Creation timestamp in RFC3339 format.
    pub created_at: String,
}

impl ReviewComment {
    /// The anchor key this comment threads under.
    pub fn anchor(&self) -> (&str, u32) {
        (self.file_path.as_str(), self.line_number)
    }
}
