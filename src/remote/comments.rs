//! Comment endpoints

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, ApiRequest, Gateway};
use crate::models::{Comment, CreateCommentInput};

/// Comment listing, posting, and deletion.
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// Comments for a news item, newest first.
    async fn list(&self, news_id: &str) -> Result<Vec<Comment>, ApiError>;

    /// Post a comment, returning the created entry.
    async fn post(&self, news_id: &str, content: &str) -> Result<Comment, ApiError>;

    /// Delete a comment by id.
    async fn delete(&self, comment_id: i64) -> Result<(), ApiError>;
}

/// HTTP implementation of [`CommentApi`].
pub struct HttpCommentApi {
    gateway: Arc<Gateway>,
}

impl HttpCommentApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CommentApi for HttpCommentApi {
    async fn list(&self, news_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.gateway
            .send_json(ApiRequest::get(format!("/api/news/{news_id}/comments")).no_auth())
            .await
    }

    async fn post(&self, news_id: &str, content: &str) -> Result<Comment, ApiError> {
        let body = Gateway::to_body(&CreateCommentInput { content: content.to_string() })?;
        self.gateway
            .send_json(ApiRequest::post(format!("/api/news/{news_id}/comments")).json(body))
            .await
    }

    async fn delete(&self, comment_id: i64) -> Result<(), ApiError> {
        self.gateway
            .send_unit(ApiRequest::delete(format!("/api/news/comments/{comment_id}")))
            .await
    }
}
