//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// Author info embedded in a comment, when the backend knows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAuthor {
    #[serde(deserialize_with = "wire::id_string")]
    pub id: String,
    pub name: String,
}

/// A comment on a news item.
///
/// Comments are server-owned and append-ordered newest first; the client
/// prepends locally on a successful post instead of refetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CommentAuthor>,
}

impl Comment {
    /// Whether the given user wrote this comment.
    ///
    /// Ids are compared as trimmed strings because comment authors and
    /// session users can carry ids of different JSON types.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.user
            .as_ref()
            .map(|author| wire::ids_match(&author.id, user_id))
            .unwrap_or(false)
    }
}

/// Input for posting a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentInput {
    pub content: String,
}
