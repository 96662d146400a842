//! Merge executor adapter.
//!
//! Does not implement the merge itself; it owns the protocol around the
//! external call. The review is moved to `merging` and persisted before
//! the call goes out, so a crash mid-merge is observable as "stuck in
//! merging" rather than silently lost. An unsuccessful invocation is
//! distinct from an unsuccessful merge: the former rolls the review back
//! to `approved` so the action is retryable, the latter lands in
//! `merge_conflict` with the conflicting file list preserved.

use std::path::Path;

use super::lifecycle;
use crate::domain::{ReviewError, ReviewItem, ReviewStatus};
use crate::infra::db::repository::ReviewRepository;
use crate::infra::vcs::ChangeSource;

pub async fn run_merge(
    source: &dyn ChangeSource,
    reviews: &ReviewRepository,
    item: &mut ReviewItem,
) -> Result<(), ReviewError> {
    // Only an approved review may start merging; the merging guard inside
    // apply_status rejects a second attempt while one is in flight.
    lifecycle::apply_status(item, ReviewStatus::Merging)?;
    reviews.save(item)?;

    log::info!(
        "merging review {} ({} -> {}) with strategy {}",
        item.id,
        item.branch,
        item.base_branch,
        item.merge_strategy
    );

    let result = source
        .merge_execute(
            Path::new(&item.project_path),
            &item.branch,
            &item.base_branch,
            item.merge_strategy,
        )
        .await;

    match result {
        Err(err) => {
            // The external call itself failed; no merge was concluded.
            // Restore `approved` so the caller can retry.
            item.status = ReviewStatus::Approved;
            item.touch();
            reviews.save(item)?;
            log::warn!("merge invocation for review {} failed: {err:#}", item.id);
            Err(ReviewError::ExternalCallFailure(format!("{err:#}")))
        }
        Ok(outcome) => {
            if outcome.success && outcome.conflict_files.is_empty() {
                lifecycle::apply_status(item, ReviewStatus::Merged)?;
            } else if outcome.conflict_files.is_empty() {
                // Failure with no conflict details is an external fault,
                // not a merge conflict.
                item.status = ReviewStatus::Approved;
                item.touch();
                reviews.save(item)?;
                return Err(ReviewError::ExternalCallFailure(
                    "merge reported failure without conflicting files".to_string(),
                ));
            } else {
                // A conflict list wins even if the call claimed success.
                item.conflict_files = outcome.conflict_files;
                lifecycle::apply_status(item, ReviewStatus::MergeConflict)?;
            }
            reviews.save(item)?;
            Ok(())
        }
    }
}
