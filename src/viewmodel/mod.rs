//! Feed and detail view models
//!
//! Thin composition of the gateway, session store, reconciler, and
//! services into list and detail presentations. Rendering and routing
//! live elsewhere; these own the per-view state and the liveness rule
//! that keeps stale responses from mutating state after teardown.

pub mod detail;
pub mod feed;

pub use detail::DetailViewModel;
pub use feed::FeedViewModel;
