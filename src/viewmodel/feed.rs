//! Feed view model

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{NewsItem, VoteCounts, VoteStatus};
use crate::remote::NewsApi;
use crate::services::votes::VoteReconciler;
use crate::session::SessionStore;

/// List presentation: the feed, its per-item vote state, and an inline
/// error slot.
pub struct FeedViewModel {
    news: Arc<dyn NewsApi>,
    votes: Arc<VoteReconciler>,
    session: Arc<SessionStore>,
    alive: AtomicBool,
    items: RwLock<Vec<NewsItem>>,
    error: RwLock<Option<String>>,
}

impl FeedViewModel {
    pub fn new(news: Arc<dyn NewsApi>, votes: Arc<VoteReconciler>, session: Arc<SessionStore>) -> Self {
        Self {
            news,
            votes,
            session,
            alive: AtomicBool::new(true),
            items: RwLock::new(Vec::new()),
            error: RwLock::new(None),
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Stop applying responses. In-flight requests are not aborted at
    /// the transport level, merely ignored on completion.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Load the feed, optionally server-side filtered, and seed the
    /// reconciler. Vote flags are only fetched when logged in.
    pub async fn load(&self, query: Option<&str>) {
        let fetched = match self.news.list(query).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(%err, "feed load failed");
                if self.is_alive() {
                    *self.error.write().await = Some(err.user_message());
                }
                return;
            }
        };
        if !self.is_alive() {
            return;
        }

        for item in &fetched {
            self.votes
                .prime(&item.id, VoteCounts { upvotes: item.upvotes, downvotes: item.downvotes })
                .await;
        }
        if self.session.is_authenticated().await {
            let statuses = fetched.iter().map(|item| self.votes.load_status(&item.id));
            // Individual status failures leave that item's flags unset.
            let _ = futures::future::join_all(statuses).await;
        }
        if !self.is_alive() {
            return;
        }

        *self.items.write().await = fetched;
        *self.error.write().await = None;
    }

    /// Toggle an upvote. No-op while a call for the item is outstanding;
    /// the rendering layer also disables the control then.
    pub async fn upvote(&self, id: &str) {
        self.vote(id, true).await;
    }

    /// Toggle a downvote.
    pub async fn downvote(&self, id: &str) {
        self.vote(id, false).await;
    }

    async fn vote(&self, id: &str, up: bool) {
        if self.votes.is_in_flight(id).await {
            return;
        }
        let result = if up { self.votes.upvote(id).await } else { self.votes.downvote(id).await };
        match result {
            Ok(snapshot) => {
                if !self.is_alive() {
                    return;
                }
                let mut items = self.items.write().await;
                if let Some(item) = items.iter_mut().find(|item| item.id == id) {
                    item.upvotes = snapshot.counts.upvotes;
                    item.downvotes = snapshot.counts.downvotes;
                }
            }
            Err(err) => {
                tracing::warn!(id, %err, "vote failed");
                if self.is_alive() {
                    *self.error.write().await = Some(err.user_message());
                }
            }
        }
    }

    pub async fn items(&self) -> Vec<NewsItem> {
        self.items.read().await.clone()
    }

    /// Client-side guard filter on title and category, used by the
    /// manage view's local search box.
    pub async fn filter_local(&self, query: &str) -> Vec<NewsItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| item.matches_query(query))
            .cloned()
            .collect()
    }

    pub async fn vote_status(&self, id: &str) -> VoteStatus {
        self.votes.snapshot(id).await.status
    }

    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }
}
