//! Line anchor and comment policy.
//!
//! Comments attach to a stable (file path, new-file line number)
//! coordinate. Threads are derived, never stored: the thread for an anchor
//! is the time-ordered subsequence of the review's comments matching that
//! key. Unresolved counts are computed on demand; a linear scan is fine at
//! the multiplicities involved (tens of comments, not millions).

use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{ReviewComment, ReviewError, ReviewItem};

/// Create a comment anchored at (`file_path`, `line_number`).
///
/// Fails with [`ReviewError::InvalidAnchor`] unless the line number exists
/// as a new-file line (context or addition) in that file's diff; deletions
/// have no new-file line and cannot anchor a comment.
pub fn add_comment(
    item: &mut ReviewItem,
    file_path: &str,
    line_number: u32,
    body: &str,
    author: &str,
) -> Result<ReviewComment, ReviewError> {
    let anchored = item
        .file(file_path)
        .is_some_and(|file| file.contains_new_line(line_number));
    if !anchored {
        return Err(ReviewError::InvalidAnchor {
            file: file_path.to_string(),
            line: line_number,
        });
    }

    let comment = ReviewComment {
        id: Uuid::new_v4().to_string(),
        review_id: item.id.clone(),
        file_path: file_path.to_string(),
        line_number,
        body: body.to_string(),
        author: author.to_string(),
        resolved: false,
        created_at: Utc::now().to_rfc3339(),
    };
    item.comments.push(comment.clone());
    item.touch();
    Ok(comment)
}

/// Set the resolved flag of a comment. Idempotent: resolving then
/// reopening restores exactly the prior state, `created_at` untouched.
pub fn resolve_comment(
    item: &mut ReviewItem,
    comment_id: &str,
    resolved: bool,
) -> Result<ReviewComment, ReviewError> {
    let comment = item
        .comments
        .iter_mut()
        .find(|c| c.id == comment_id)
        .ok_or_else(|| ReviewError::NotFound(format!("comment {comment_id}")))?;

    comment.resolved = resolved;
    let snapshot = comment.clone();
    item.touch();
    Ok(snapshot)
}

/// The thread at an anchor: matching comments in `created_at` order.
pub fn thread<'a>(item: &'a ReviewItem, file_path: &str, line_number: u32) -> Vec<&'a ReviewComment> {
    let mut comments: Vec<&ReviewComment> = item
        .comments
        .iter()
        .filter(|c| c.anchor() == (file_path, line_number))
        .collect();
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    comments
}

/// Unresolved comments at a single anchor, for line badges.
pub fn unresolved_count(item: &ReviewItem, file_path: &str, line_number: u32) -> usize {
    item.comments
        .iter()
        .filter(|c| !c.resolved && c.anchor() == (file_path, line_number))
        .count()
}

/// Unresolved comment counts for every anchor in the review.
pub fn unresolved_counts(item: &ReviewItem) -> HashMap<(String, u32), usize> {
    let mut counts = HashMap::new();
    for comment in item.comments.iter().filter(|c| !c.resolved) {
        *counts
            .entry((comment.file_path.clone(), comment.line_number))
            .or_insert(0) += 1;
    }
    counts
}
