//! Comment service
//!
//! Thin logic over the comment endpoints: list newest first, append
//! locally on a successful post, and gate deletion on ownership. The
//! view models keep the displayed list; no refetch after mutations.

use std::sync::Arc;

use crate::api::ApiError;
use crate::models::{Comment, User};
use crate::remote::CommentApi;

/// Comment service
pub struct CommentService {
    api: Arc<dyn CommentApi>,
}

impl CommentService {
    pub fn new(api: Arc<dyn CommentApi>) -> Self {
        Self { api }
    }

    /// Comments for a news item, newest first.
    pub async fn list(&self, news_id: &str) -> Result<Vec<Comment>, ApiError> {
        let mut comments = self.api.list(news_id).await?;
        // The server already orders newest first; keep that guarantee
        // even for older backends that did not.
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    /// Post a comment, returning the created entry for local prepending.
    pub async fn post(&self, news_id: &str, content: &str) -> Result<Comment, ApiError> {
        self.api.post(news_id, content).await
    }

    /// Delete a comment.
    pub async fn delete(&self, comment_id: i64) -> Result<(), ApiError> {
        self.api.delete(comment_id).await
    }

    /// Whether deletion should be offered at all: only the comment's
    /// author may delete it.
    pub fn can_delete(comment: &Comment, user: Option<&User>) -> bool {
        match user {
            Some(user) => comment.is_authored_by(&user.id),
            None => false,
        }
    }
}
