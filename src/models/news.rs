//! News item model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire;

/// A news item as served by the backend.
///
/// The client holds a cached, possibly stale copy per view; the server
/// owns the record. Vote counts default to zero because early payloads
/// omitted them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(deserialize_with = "wire::id_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, deserialize_with = "wire::string_list")]
    pub category: Vec<String>,
    pub publisher: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
    #[serde(default)]
    pub comments_count: i64,
}

impl NewsItem {
    /// Case-insensitive title/category match used for local filtering.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&q)
            || self.category.iter().any(|c| c.to_lowercase().contains(&q))
    }
}

/// Authoritative vote counts returned by every vote endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
}

/// Per-item, per-user vote flags.
///
/// Mutually exclusive: a successful upvote implies `has_downvoted` is
/// false and vice versa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    #[serde(default)]
    pub has_upvoted: bool,
    #[serde(default)]
    pub has_downvoted: bool,
}

/// Input for submitting a new news item.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsInput {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub link: String,
    pub release_date: String,
    pub publisher: String,
    pub category: Vec<String>,
}

/// Input for updating an existing news item.
///
/// Only set fields are sent; the server keeps the rest.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
}

/// Response of the image upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}
