//! Review lifecycle controller.
//!
//! Single authority for whether a review is actionable right now. Status is
//! the primary axis; a reviewer decision is a separate axis that the
//! controller keeps in sync with status (issuing a decision moves status to
//! the matching value, but the two remain distinct fields).

use crate::domain::{MergeStrategy, ReviewDecision, ReviewError, ReviewItem, ReviewStatus};

fn invalid_transition(current: ReviewStatus, requested: impl ToString) -> ReviewError {
    ReviewError::InvalidTransition {
        current: current.to_string(),
        requested: requested.to_string(),
    }
}

fn conflicting(current: ReviewStatus, operation: impl Into<String>) -> ReviewError {
    ReviewError::ConflictingOperation {
        current: current.to_string(),
        operation: operation.into(),
    }
}

/// Whether `from -> to` is a legal edge of the status machine.
pub fn can_transition(from: ReviewStatus, to: ReviewStatus) -> bool {
    use ReviewStatus::*;
    match (from, to) {
        // Opening a review is an explicit reviewer action, never a side
        // effect of reading it.
        (Pending, InReview) => true,
        // Decision outcomes.
        (InReview, Approved | Rejected | ChangesRequested) => true,
        // A reviewer may reissue a decision after a verdict or a conflict.
        (
            Approved | Rejected | ChangesRequested | MergeConflict,
            InReview | Approved | Rejected | ChangesRequested,
        ) => true,
        // Merge protocol.
        (Approved, Merging) => true,
        (Merging, Merged | MergeConflict) => true,
        _ => false,
    }
}

/// Move the review to `to`, enforcing the transition table.
///
/// `merged` is terminal. While `merging`, everything except the merge
/// outcome itself is rejected; this is the guard that prevents two
/// concurrent merge attempts on the same review. Retrying the current
/// status is a no-op.
pub fn apply_status(item: &mut ReviewItem, to: ReviewStatus) -> Result<(), ReviewError> {
    if item.status == ReviewStatus::Merged {
        return Err(invalid_transition(item.status, to));
    }
    if item.status == ReviewStatus::Merging
        && !matches!(to, ReviewStatus::Merged | ReviewStatus::MergeConflict)
    {
        return Err(conflicting(item.status, format!("set status to {to}")));
    }
    if to == item.status {
        return Ok(());
    }
    // A conflict outcome always carries the conflicting paths; without
    // them `merge_conflict` would be unactionable.
    if to == ReviewStatus::MergeConflict && item.conflict_files.is_empty() {
        return Err(invalid_transition(item.status, to));
    }

    // Decision-valued statuses go through the decision path so the two
    // axes stay in sync.
    if let Some(decision) = match to {
        ReviewStatus::Approved => Some(ReviewDecision::Approved),
        ReviewStatus::Rejected => Some(ReviewDecision::Rejected),
        ReviewStatus::ChangesRequested => Some(ReviewDecision::ChangesRequested),
        _ => None,
    } {
        return apply_decision(item, decision);
    }

    if !can_transition(item.status, to) {
        return Err(invalid_transition(item.status, to));
    }

    log::info!("review {} status {} -> {}", item.id, item.status, to);
    item.status = to;
    if to == ReviewStatus::Merged {
        item.conflict_files.clear();
    }
    item.touch();
    Ok(())
}

/// Record a reviewer verdict and move status to match it.
pub fn apply_decision(item: &mut ReviewItem, decision: ReviewDecision) -> Result<(), ReviewError> {
    match item.status {
        ReviewStatus::Merged => Err(invalid_transition(item.status, decision)),
        ReviewStatus::Merging => Err(conflicting(item.status, format!("decide {decision}"))),
        // A pending review has not been opened; a decision on it would skip
        // the explicit "start review" step.
        ReviewStatus::Pending => Err(invalid_transition(item.status, decision)),
        _ => {
            log::info!("review {} decision {}", item.id, decision);
            item.decision = Some(decision);
            item.status = decision.status();
            item.touch();
            Ok(())
        }
    }
}

/// Override the merge strategy. Allowed at any status except while a merge
/// is in flight or after one has landed.
pub fn set_merge_strategy(
    item: &mut ReviewItem,
    strategy: MergeStrategy,
) -> Result<(), ReviewError> {
    match item.status {
        ReviewStatus::Merged => Err(invalid_transition(item.status, strategy)),
        ReviewStatus::Merging => Err(conflicting(item.status, format!("set strategy {strategy}"))),
        _ => {
            if item.merge_strategy != strategy {
                item.merge_strategy = strategy;
                item.touch();
            }
            Ok(())
        }
    }
}
