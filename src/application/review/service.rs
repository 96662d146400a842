//! Service façade over the review engine.
//!
//! Wires configuration, persistence and the change source together and
//! exposes the operations the rendering and session layers consume.
//! Reviews are loaded in full and written back in full on each mutation;
//! callers are expected to serialize operations per review id — the only
//! engine-enforced exclusion is the merging guard.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::{comments, lifecycle, merge};
use crate::domain::{
    DiffStats, MergeStrategy, ReviewDecision, ReviewError, ReviewItem, ReviewItemId, ReviewStatus,
};
use crate::infra::app_config::AppConfig;
use crate::infra::db::Database;
use crate::infra::hash;
use crate::infra::vcs::ChangeSource;

pub struct ReviewService {
    config: AppConfig,
    db: Arc<Database>,
    source: Arc<dyn ChangeSource>,
}

impl ReviewService {
    pub fn new(config: AppConfig, db: Arc<Database>, source: Arc<dyn ChangeSource>) -> Self {
        Self { config, db, source }
    }

    /// Take a change-source snapshot for (branch, base) and create the
    /// review aggregate. Stats are computed here, once; the diff list
    /// stays the authoritative source.
    pub async fn review_create(
        &self,
        project_path: &str,
        session_id: &str,
        branch: &str,
        base_branch: &str,
    ) -> Result<ReviewItem, ReviewError> {
        let snapshot = self
            .source
            .diff(Path::new(project_path), branch, base_branch)
            .await
            .map_err(|err| ReviewError::ExternalCallFailure(format!("{err:#}")))?;

        let now = Utc::now().to_rfc3339();
        let item = ReviewItem {
            id: Uuid::new_v4().to_string(),
            project_path: project_path.to_string(),
            session_id: session_id.to_string(),
            branch: branch.to_string(),
            base_branch: base_branch.to_string(),
            status: ReviewStatus::Pending,
            decision: None,
            merge_strategy: self.config.default_merge_strategy,
            stats: DiffStats::from_files(&snapshot.files),
            files: snapshot.files,
            comments: Vec::new(),
            conflict_files: Vec::new(),
            diff_hash: hash::diff_hash(&snapshot.text),
            created_at: now.clone(),
            updated_at: now,
        };
        self.db.review_repo().save(&item)?;
        log::info!(
            "created review {} for {branch} -> {base_branch} ({} files, +{} -{})",
            item.id,
            item.stats.files_changed,
            item.stats.additions,
            item.stats.deletions
        );
        Ok(item)
    }

    pub fn review_list(&self, project_path: &str) -> Result<Vec<ReviewItem>, ReviewError> {
        let comment_repo = self.db.comment_repo();
        let mut items = self.db.review_repo().list_for_project(project_path)?;
        for item in &mut items {
            item.comments = comment_repo.list_for_review(&item.id)?;
        }
        Ok(items)
    }

    pub fn review_get(
        &self,
        project_path: &str,
        id: &ReviewItemId,
    ) -> Result<ReviewItem, ReviewError> {
        let item = self.load(id)?;
        if item.project_path != project_path {
            return Err(ReviewError::NotFound(id.clone()));
        }
        Ok(item)
    }

    pub fn review_set_status(
        &self,
        id: &ReviewItemId,
        status: ReviewStatus,
    ) -> Result<ReviewItem, ReviewError> {
        let mut item = self.load(id)?;
        lifecycle::apply_status(&mut item, status)?;
        self.db.review_repo().save(&item)?;
        Ok(item)
    }

    pub fn review_set_decision(
        &self,
        id: &ReviewItemId,
        decision: ReviewDecision,
    ) -> Result<ReviewItem, ReviewError> {
        let mut item = self.load(id)?;
        lifecycle::apply_decision(&mut item, decision)?;
        self.db.review_repo().save(&item)?;
        Ok(item)
    }

    pub fn review_set_merge_strategy(
        &self,
        id: &ReviewItemId,
        strategy: MergeStrategy,
    ) -> Result<ReviewItem, ReviewError> {
        let mut item = self.load(id)?;
        lifecycle::set_merge_strategy(&mut item, strategy)?;
        self.db.review_repo().save(&item)?;
        Ok(item)
    }

    pub fn review_add_comment(
        &self,
        id: &ReviewItemId,
        file_path: &str,
        line_number: u32,
        body: &str,
        author: Option<&str>,
    ) -> Result<ReviewItem, ReviewError> {
        let mut item = self.load(id)?;
        let author = author.unwrap_or(&self.config.default_author);
        let comment = comments::add_comment(&mut item, file_path, line_number, body, author)?;
        self.db.comment_repo().save(&comment)?;
        self.db.review_repo().save(&item)?;
        Ok(item)
    }

    pub fn review_resolve_comment(
        &self,
        id: &ReviewItemId,
        comment_id: &str,
        resolved: bool,
    ) -> Result<ReviewItem, ReviewError> {
        let mut item = self.load(id)?;
        comments::resolve_comment(&mut item, comment_id, resolved)?;
        self.db.comment_repo().set_resolved(comment_id, resolved)?;
        self.db.review_repo().save(&item)?;
        Ok(item)
    }

    /// Drive an approved review through the merge protocol, ending in
    /// `merged` or `merge_conflict`.
    pub async fn review_merge(&self, id: &ReviewItemId) -> Result<ReviewItem, ReviewError> {
        let mut item = self.load(id)?;
        merge::run_merge(self.source.as_ref(), &self.db.review_repo(), &mut item).await?;
        Ok(item)
    }

    fn load(&self, id: &ReviewItemId) -> Result<ReviewItem, ReviewError> {
        let mut item = self
            .db
            .review_repo()
            .find_by_id(id)?
            .ok_or_else(|| ReviewError::NotFound(id.clone()))?;
        item.comments = self.db.comment_repo().list_for_review(id)?;
        Ok(item)
    }
}
