use crate::domain::{
    DiffStats, FileDiff, FileStatus, Hunk, Line, LineKind, MergeStrategy, ReviewComment,
    ReviewDecision, ReviewItem, ReviewStatus,
};
use crate::infra::db::Database;
use crate::infra::db::repository::*;

fn sample_files() -> Vec<FileDiff> {
    vec![FileDiff {
        path: "src/lib.rs".into(),
        old_path: None,
        status: FileStatus::Modified,
        hunks: vec![Hunk {
            old_start: 10,
            old_count: 3,
            new_start: 10,
            new_count: 4,
            lines: vec![
                Line::new(LineKind::Context, "a"),
                Line::new(LineKind::Deletion, "b"),
                Line::new(LineKind::Addition, "c"),
                Line::new(LineKind::Addition, "d"),
                Line::new(LineKind::Context, "e"),
            ],
        }],
    }]
}

fn sample_review(id: &str) -> ReviewItem {
    let files = sample_files();
    ReviewItem {
        id: id.to_string(),
        project_path: "/tmp/project".into(),
        session_id: "sess-1".into(),
        branch: "feature/x".into(),
        base_branch: "main".into(),
        status: ReviewStatus::Pending,
        decision: None,
        merge_strategy: MergeStrategy::Merge,
        stats: DiffStats::from_files(&files),
        files,
        comments: Vec::new(),
        conflict_files: Vec::new(),
        diff_hash: "deadbeefdeadbeef".into(),
        created_at: "2024-01-01T00:00:00Z".into(),
        updated_at: "2024-01-01T00:00:00Z".into(),
    }
}

#[test]
fn test_review_repository_roundtrip() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let repo = ReviewRepository::new(db.connection());

    let mut review = sample_review("rev-1");
    repo.save(&review)?;

    let loaded = repo.find_by_id(&"rev-1".to_string())?.unwrap();
    assert_eq!(loaded.branch, "feature/x");
    assert_eq!(loaded.status, ReviewStatus::Pending);
    assert_eq!(loaded.decision, None);
    assert_eq!(loaded.files, sample_files());
    assert_eq!(loaded.stats.additions, 2);
    assert_eq!(loaded.stats.deletions, 1);

    review.status = ReviewStatus::Approved;
    review.decision = Some(ReviewDecision::Approved);
    review.conflict_files = vec!["a.rs".into()];
    repo.save(&review)?;

    let loaded = repo.find_by_id(&"rev-1".to_string())?.unwrap();
    assert_eq!(loaded.status, ReviewStatus::Approved);
    assert_eq!(loaded.decision, Some(ReviewDecision::Approved));
    assert_eq!(loaded.conflict_files, vec!["a.rs".to_string()]);

    Ok(())
}

#[test]
fn test_review_repository_list_scoped_by_project() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let repo = ReviewRepository::new(db.connection());

    repo.save(&sample_review("rev-1"))?;
    let mut other = sample_review("rev-2");
    other.project_path = "/tmp/other".into();
    repo.save(&other)?;

    let listed = repo.list_for_project("/tmp/project")?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "rev-1");
    assert!(repo.list_for_project("/nowhere")?.is_empty());

    Ok(())
}

#[test]
fn test_comment_repository_roundtrip_and_resolve() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let reviews = ReviewRepository::new(db.connection());
    let comments = CommentRepository::new(db.connection());

    reviews.save(&sample_review("rev-1"))?;

    let comment = ReviewComment {
        id: "c-1".into(),
        review_id: "rev-1".into(),
        file_path: "src/lib.rs".into(),
        line_number: 11,
        body: "why this rename?".into(),
        author: "alice".into(),
        resolved: false,
        created_at: "2024-01-01T00:00:01Z".into(),
    };
    comments.save(&comment)?;

    let later = ReviewComment {
        id: "c-2".into(),
        created_at: "2024-01-01T00:00:02Z".into(),
        ..comment.clone()
    };
    comments.save(&later)?;

    let listed = comments.list_for_review("rev-1")?;
    assert_eq!(listed.len(), 2);
    // Ordered by created_at ascending.
    assert_eq!(listed[0].id, "c-1");
    assert_eq!(listed[1].id, "c-2");

    assert_eq!(comments.set_resolved("c-1", true)?, 1);
    let listed = comments.list_for_review("rev-1")?;
    assert!(listed[0].resolved);
    assert_eq!(listed[0].created_at, "2024-01-01T00:00:01Z");
    assert!(!listed[1].resolved);

    Ok(())
}
