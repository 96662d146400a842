use super::DbConn;
use crate::domain::{
    DiffStats, FileDiff, MergeStrategy, ReviewDecision, ReviewItem, ReviewItemId, ReviewStatus,
};
use anyhow::Result;
use rusqlite::Row;
use std::str::FromStr;

const REVIEW_COLUMNS: &str = "id, project_path, session_id, branch, base_branch, status, decision, \
     merge_strategy, files_changed, additions, deletions, files_json, conflict_files_json, \
     diff_hash, created_at, updated_at";

/// Repository for review rows.
///
/// Reviews are loaded in full and written back in full on each mutation;
/// comments live in their own table and are attached by the service layer.
pub struct ReviewRepository {
    conn: DbConn,
}

impl ReviewRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn save(&self, review: &ReviewItem) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let files_json = serde_json::to_string(&review.files)?;
        let conflict_files_json = serde_json::to_string(&review.conflict_files)?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO reviews (
                id, project_path, session_id, branch, base_branch, status, decision,
                merge_strategy, files_changed, additions, deletions, files_json,
                conflict_files_json, diff_hash, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            rusqlite::params![
                review.id,
                review.project_path,
                review.session_id,
                review.branch,
                review.base_branch,
                review.status.to_string(),
                review.decision.map(|d| d.to_string()),
                review.merge_strategy.to_string(),
                review.stats.files_changed,
                review.stats.additions,
                review.stats.deletions,
                files_json,
                conflict_files_json,
                review.diff_hash,
                review.created_at,
                review.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &ReviewItemId) -> Result<Option<ReviewItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1"
        ))?;
        let mut rows = stmt.query_map([id], Self::row_to_review)?;

        match rows.next() {
            Some(row) => row.map(Some).map_err(Into::into),
            None => Ok(None),
        }
    }

    pub fn list_for_project(&self, project_path: &str) -> Result<Vec<ReviewItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE project_path = ?1 ORDER BY updated_at DESC"
        ))?;

        let rows = stmt.query_map([project_path], Self::row_to_review)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn row_to_review(row: &Row) -> rusqlite::Result<ReviewItem> {
        let status: String = row.get(5)?;
        let decision: Option<String> = row.get(6)?;
        let merge_strategy: String = row.get(7)?;
        let files_json: String = row.get(11)?;
        let conflict_files_json: String = row.get(12)?;

        let files: Vec<FileDiff> = serde_json::from_str(&files_json).unwrap_or_default();
        let conflict_files: Vec<String> =
            serde_json::from_str(&conflict_files_json).unwrap_or_default();

        Ok(ReviewItem {
            id: row.get(0)?,
            project_path: row.get(1)?,
            session_id: row.get(2)?,
            branch: row.get(3)?,
            base_branch: row.get(4)?,
            status: ReviewStatus::from_str(&status).unwrap_or_default(),
            decision: decision
                .as_deref()
                .and_then(|d| ReviewDecision::from_str(d).ok()),
            merge_strategy: MergeStrategy::from_str(&merge_strategy).unwrap_or_default(),
            stats: DiffStats {
                files_changed: row.get(8)?,
                additions: row.get(9)?,
                deletions: row.get(10)?,
            },
            files,
            comments: Vec::new(),
            conflict_files,
            diff_hash: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }
}
