//! Vote endpoints

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, ApiRequest, Gateway};
use crate::models::{VoteCounts, VoteStatus};

/// Upvote/downvote mutations and per-user status checks.
///
/// Every mutation returns the server's authoritative counts for the item.
#[async_trait]
pub trait VoteApi: Send + Sync {
    async fn add_upvote(&self, id: &str) -> Result<VoteCounts, ApiError>;
    async fn undo_upvote(&self, id: &str) -> Result<VoteCounts, ApiError>;
    async fn add_downvote(&self, id: &str) -> Result<VoteCounts, ApiError>;
    async fn undo_downvote(&self, id: &str) -> Result<VoteCounts, ApiError>;

    /// Whether the current user has upvoted the item.
    async fn upvote_status(&self, id: &str) -> Result<VoteStatus, ApiError>;

    /// Whether the current user has downvoted the item.
    async fn downvote_status(&self, id: &str) -> Result<VoteStatus, ApiError>;
}

/// HTTP implementation of [`VoteApi`].
pub struct HttpVoteApi {
    gateway: Arc<Gateway>,
}

impl HttpVoteApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    async fn vote(&self, path: String) -> Result<VoteCounts, ApiError> {
        self.gateway
            .send_json(ApiRequest::post(path))
            .await
            .map_err(normalize_conflict)
    }
}

/// One backend generation reported duplicate votes as a plain 400 with an
/// "already ..." message instead of a 409. Fold that shape into
/// [`ApiError::Conflict`] so the reconciler sees one policy.
fn normalize_conflict(err: ApiError) -> ApiError {
    match err {
        ApiError::Status { status: 400, message }
            if message.to_lowercase().contains("already") =>
        {
            ApiError::Conflict(message)
        }
        other => other,
    }
}

#[async_trait]
impl VoteApi for HttpVoteApi {
    async fn add_upvote(&self, id: &str) -> Result<VoteCounts, ApiError> {
        self.vote(format!("/api/news/upvotes/{id}/upvote")).await
    }

    async fn undo_upvote(&self, id: &str) -> Result<VoteCounts, ApiError> {
        self.vote(format!("/api/news/upvotes/{id}/undo-upvote")).await
    }

    async fn add_downvote(&self, id: &str) -> Result<VoteCounts, ApiError> {
        self.vote(format!("/api/news/downvotes/{id}/downvote")).await
    }

    async fn undo_downvote(&self, id: &str) -> Result<VoteCounts, ApiError> {
        self.vote(format!("/api/news/downvotes/{id}/undo-downvote")).await
    }

    async fn upvote_status(&self, id: &str) -> Result<VoteStatus, ApiError> {
        self.gateway
            .send_json(ApiRequest::get(format!("/api/news/upvotes/{id}/upvotes")))
            .await
    }

    async fn downvote_status(&self, id: &str) -> Result<VoteStatus, ApiError> {
        self.gateway
            .send_json(ApiRequest::get(format!("/api/news/downvotes/{id}/downvotes")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_conflict_folds_legacy_400() {
        let err = normalize_conflict(ApiError::Status {
            status: 400,
            message: "Already upvoted".to_string(),
        });
        assert!(err.is_conflict());
    }

    #[test]
    fn test_normalize_conflict_leaves_other_errors() {
        let err = normalize_conflict(ApiError::Status {
            status: 400,
            message: "bad id".to_string(),
        });
        assert!(!err.is_conflict());
        let err = normalize_conflict(ApiError::Status {
            status: 500,
            message: "already broken".to_string(),
        });
        assert!(!err.is_conflict());
    }
}
