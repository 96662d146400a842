//! Integration tests for the review workflow
//! These tests drive the public service API end to end: snapshot, open,
//! comment, decide, merge, conflict, retry.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use mergeflow::application::review::ReviewService;
use mergeflow::application::review::comments;
use mergeflow::domain::{
    FileDiff, MergeStrategy, ReviewDecision, ReviewError, ReviewStatus,
};
use mergeflow::infra::app_config::AppConfig;
use mergeflow::infra::db::Database;
use mergeflow::infra::diff::parser::parse_diff;
use mergeflow::infra::diff::rows::{SplitRow, UnifiedRow, split_rows, unified_rows};
use mergeflow::infra::vcs::{ChangeSource, DiffSnapshot, MergeOutcome};

const DIFF_TEXT: &str = "\
diff --git a/src/render.rs b/src/render.rs
index 1111111..2222222 100644
--- a/src/render.rs
+++ b/src/render.rs
@@ -10,3 +10,4 @@ fn render() {
 a
-b
+c
+d
 e
diff --git a/docs/notes.md b/docs/notes.md
new file mode 100644
index 0000000..3333333
--- /dev/null
+++ b/docs/notes.md
@@ -0,0 +1,1 @@
+notes
";

struct ScriptedSource {
    merges: Mutex<VecDeque<Result<MergeOutcome>>>,
}

#[async_trait]
impl ChangeSource for ScriptedSource {
    async fn diff(&self, _project: &Path, _branch: &str, _base: &str) -> Result<DiffSnapshot> {
        Ok(DiffSnapshot {
            text: DIFF_TEXT.to_string(),
            files: parse_diff(DIFF_TEXT)?,
        })
    }

    async fn branches(&self, _project: &Path) -> Result<Vec<String>> {
        Ok(vec!["main".into(), "feature/render".into()])
    }

    async fn merge_execute(
        &self,
        _project: &Path,
        _branch: &str,
        _base: &str,
        _strategy: MergeStrategy,
    ) -> Result<MergeOutcome> {
        self.merges
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected merge call")
    }
}

fn service(merges: Vec<Result<MergeOutcome>>) -> ReviewService {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Arc::new(Database::open_in_memory().unwrap());
    let source = Arc::new(ScriptedSource {
        merges: Mutex::new(merges.into()),
    });
    ReviewService::new(AppConfig::default(), db, source)
}

#[tokio::test]
async fn test_full_review_workflow() {
    let service = service(vec![
        Ok(MergeOutcome {
            success: false,
            conflict_files: vec!["src/render.rs".into()],
        }),
        Ok(MergeOutcome {
            success: true,
            conflict_files: Vec::new(),
        }),
    ]);

    // Snapshot taken for (branch, base); stats derived from the diff.
    let item = service
        .review_create("/tmp/project", "sess-1", "feature/render", "main")
        .await
        .unwrap();
    assert_eq!(item.status, ReviewStatus::Pending);
    assert_eq!(item.stats.files_changed, 2);
    assert_eq!(item.stats.additions, 3);
    assert_eq!(item.stats.deletions, 1);

    // Reviewer opens the review and comments on an addition line.
    let item = service
        .review_set_status(&item.id, ReviewStatus::InReview)
        .unwrap();
    let item = service
        .review_add_comment(&item.id, "src/render.rs", 11, "rename this", Some("alice"))
        .unwrap();
    assert_eq!(comments::unresolved_count(&item, "src/render.rs", 11), 1);

    // Verdict, merge, conflict.
    let item = service
        .review_set_decision(&item.id, ReviewDecision::Approved)
        .unwrap();
    assert_eq!(item.status, ReviewStatus::Approved);

    let item = service.review_merge(&item.id).await.unwrap();
    assert_eq!(item.status, ReviewStatus::MergeConflict);
    assert_eq!(item.conflict_files, vec!["src/render.rs".to_string()]);

    // Resolve the thread, re-approve, retry, land.
    let comment_id = item.comments[0].id.clone();
    let item = service
        .review_resolve_comment(&item.id, &comment_id, true)
        .unwrap();
    assert_eq!(comments::unresolved_count(&item, "src/render.rs", 11), 0);

    let item = service
        .review_set_decision(&item.id, ReviewDecision::Approved)
        .unwrap();
    let item = service.review_merge(&item.id).await.unwrap();
    assert_eq!(item.status, ReviewStatus::Merged);
    assert!(item.conflict_files.is_empty());

    // Merged is terminal.
    let err = service
        .review_set_decision(&item.id, ReviewDecision::Rejected)
        .unwrap_err();
    assert!(matches!(err, ReviewError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_row_projections_of_created_review() {
    let service = service(vec![]);
    let item = service
        .review_create("/tmp/project", "sess-1", "feature/render", "main")
        .await
        .unwrap();

    let file: &FileDiff = item.file("src/render.rs").unwrap();

    let unified = unified_rows(file);
    assert_eq!(unified.len(), 6);
    assert!(matches!(unified[0], UnifiedRow::Hunk(_)));
    assert!(matches!(
        unified[2],
        UnifiedRow::Line {
            old_line: Some(11),
            new_line: None,
            ..
        }
    ));

    let split = split_rows(file);
    // Marker + context + max(1 deletion, 2 additions) + context.
    assert_eq!(split.len(), 5);
    assert!(matches!(
        split[3],
        SplitRow::Line {
            old: None,
            new: Some(_)
        }
    ));

    // The added file projects with an empty old side throughout.
    let added = item.file("docs/notes.md").unwrap();
    for row in split_rows(added).iter().skip(1) {
        let SplitRow::Line { old, new } = row else {
            panic!("expected line row");
        };
        assert!(old.is_none());
        assert!(new.is_some());
    }
}
