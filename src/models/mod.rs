//! Data models for The Dev Journal client
//!
//! These mirror the JSON shapes the backend produces. Field names are
//! camelCase on the wire; the flexible deserializers in [`wire`] absorb
//! the historical payload variants (numeric vs string ids, string vs
//! list categories).

pub mod comment;
pub mod news;
pub mod user;
pub(crate) mod wire;

pub use comment::{Comment, CommentAuthor, CreateCommentInput};
pub use news::{CreateNewsInput, NewsItem, UpdateNewsInput, UploadedImage, VoteCounts, VoteStatus};
pub use user::{AuthResponse, LoginInput, RegisterInput, User};
