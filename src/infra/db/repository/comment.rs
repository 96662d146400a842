use super::DbConn;
use crate::domain::ReviewComment;
use anyhow::Result;
use rusqlite::Row;

pub struct CommentRepository {
    conn: DbConn,
}

impl CommentRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn save(&self, comment: &ReviewComment) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT OR REPLACE INTO comments (
                id, review_id, file_path, line_number, body, author, resolved, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            rusqlite::params![
                comment.id,
                comment.review_id,
                comment.file_path,
                comment.line_number,
                comment.body,
                comment.author,
                comment.resolved,
                comment.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn list_for_review(&self, review_id: &str) -> Result<Vec<ReviewComment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, review_id, file_path, line_number, body, author, resolved, created_at
            FROM comments
            WHERE review_id = ?1
            ORDER BY created_at
            "#,
        )?;

        let rows = stmt.query_map([review_id], Self::row_to_comment)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn set_resolved(&self, id: &str, resolved: bool) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE comments SET resolved = ?2 WHERE id = ?1",
            rusqlite::params![id, resolved],
        )?;
        Ok(updated)
    }

    fn row_to_comment(row: &Row) -> rusqlite::Result<ReviewComment> {
        Ok(ReviewComment {
            id: row.get(0)?,
            review_id: row.get(1)?,
            file_path: row.get(2)?,
            line_number: row.get(3)?,
            body: row.get(4)?,
            author: row.get(5)?,
            resolved: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}
