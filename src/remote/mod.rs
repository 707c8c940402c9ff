//! Endpoint bindings for the backend REST API
//!
//! Each group of endpoints sits behind a trait so the state layer can be
//! exercised against in-memory fakes; the `Http*` types are the real
//! implementations over the [`Gateway`](crate::api::Gateway).

pub mod auth;
pub mod comments;
pub mod news;
pub mod votes;

pub use auth::{AuthApi, HttpAuthApi};
pub use comments::{CommentApi, HttpCommentApi};
pub use news::{HttpNewsApi, NewsApi};
pub use votes::{HttpVoteApi, VoteApi};
