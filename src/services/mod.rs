//! State synchronization services
//!
//! The logic that keeps local UI state consistent with the remote
//! backend: optimistic vote toggling, debounced search-to-URL binding,
//! and comment thread bookkeeping.

pub mod comments;
pub mod search;
pub mod votes;

pub use comments::CommentService;
pub use search::{Location, Navigator, SearchSync};
pub use votes::{VoteReconciler, VoteSnapshot};
