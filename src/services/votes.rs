//! Vote state reconciler
//!
//! Per news item, tracks optimistic upvote/downvote flags and the last
//! server-confirmed counts. Each click is an asynchronous toggle: the
//! add or undo call is chosen from local state, and on success the local
//! flags and counts are replaced with the server's answer in one step so
//! the mutual-exclusion invariant is never left pending a second round
//! trip.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ApiError;
use crate::models::{VoteCounts, VoteStatus};
use crate::remote::VoteApi;

/// Local view of one item's vote state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteSnapshot {
    pub counts: VoteCounts,
    pub status: VoteStatus,
}

/// Which control was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoteKind {
    Up,
    Down,
}

/// Result of one vote command against the server.
enum VoteCommandResult {
    /// The server applied the change and returned authoritative counts.
    Applied(VoteCounts),
    /// The vote already existed (or was already undone); local state had
    /// drifted from server state, e.g. a duplicate click racing the
    /// first response.
    Conflict,
    Failed(ApiError),
}

#[derive(Debug, Default)]
struct ItemState {
    snapshot: VoteSnapshot,
    in_flight: bool,
}

/// The vote state reconciler.
pub struct VoteReconciler {
    api: Arc<dyn VoteApi>,
    items: Mutex<HashMap<String, ItemState>>,
}

impl VoteReconciler {
    pub fn new(api: Arc<dyn VoteApi>) -> Self {
        Self { api, items: Mutex::new(HashMap::new()) }
    }

    /// Seed an item's counts from a feed or detail payload.
    pub async fn prime(&self, id: &str, counts: VoteCounts) {
        let mut items = self.items.lock().await;
        items.entry(id.to_string()).or_default().snapshot.counts = counts;
    }

    /// Fetch and store the current user's vote flags for an item.
    pub async fn load_status(&self, id: &str) -> Result<VoteStatus, ApiError> {
        let (up, down) =
            tokio::join!(self.api.upvote_status(id), self.api.downvote_status(id));
        let status = VoteStatus {
            has_upvoted: up?.has_upvoted,
            has_downvoted: down?.has_downvoted,
        };
        let mut items = self.items.lock().await;
        items.entry(id.to_string()).or_default().snapshot.status = status;
        Ok(status)
    }

    /// Current local state for an item.
    pub async fn snapshot(&self, id: &str) -> VoteSnapshot {
        self.items.lock().await.get(id).map(|s| s.snapshot).unwrap_or_default()
    }

    /// Whether a vote call for this item is outstanding. Callers disable
    /// the triggering control while this is true.
    pub async fn is_in_flight(&self, id: &str) -> bool {
        self.items.lock().await.get(id).map(|s| s.in_flight).unwrap_or(false)
    }

    /// Toggle the current user's upvote on an item.
    pub async fn upvote(&self, id: &str) -> Result<VoteSnapshot, ApiError> {
        self.toggle(id, VoteKind::Up).await
    }

    /// Toggle the current user's downvote on an item.
    pub async fn downvote(&self, id: &str) -> Result<VoteSnapshot, ApiError> {
        self.toggle(id, VoteKind::Down).await
    }

    async fn toggle(&self, id: &str, kind: VoteKind) -> Result<VoteSnapshot, ApiError> {
        // Claim the item; a second click while a call is outstanding is
        // ignored rather than queued.
        let active = {
            let mut items = self.items.lock().await;
            let state = items.entry(id.to_string()).or_default();
            if state.in_flight {
                tracing::debug!(id, "vote ignored, request already in flight");
                return Ok(state.snapshot);
            }
            state.in_flight = true;
            match kind {
                VoteKind::Up => state.snapshot.status.has_upvoted,
                VoteKind::Down => state.snapshot.status.has_downvoted,
            }
        };

        let undo = active;
        let result = match (kind, undo) {
            (VoteKind::Up, false) => self.api.add_upvote(id).await,
            (VoteKind::Up, true) => self.api.undo_upvote(id).await,
            (VoteKind::Down, false) => self.api.add_downvote(id).await,
            (VoteKind::Down, true) => self.api.undo_downvote(id).await,
        };
        let command = match result {
            Ok(counts) => VoteCommandResult::Applied(counts),
            Err(err) if err.is_conflict() => VoteCommandResult::Conflict,
            Err(err) => VoteCommandResult::Failed(err),
        };

        self.reduce(id, kind, undo, command).await
    }

    /// Apply a settled command to local state under one lock acquisition.
    async fn reduce(
        &self,
        id: &str,
        kind: VoteKind,
        undo: bool,
        command: VoteCommandResult,
    ) -> Result<VoteSnapshot, ApiError> {
        let mut items = self.items.lock().await;
        let state = items.entry(id.to_string()).or_default();
        state.in_flight = false;

        match command {
            VoteCommandResult::Applied(counts) => {
                state.snapshot.counts = counts;
                Self::set_flags(&mut state.snapshot.status, kind, !undo);
                Ok(state.snapshot)
            }
            VoteCommandResult::Conflict => {
                // Already applied server-side; adopt the flag and keep
                // counts until the next prime or status load reconciles
                // them.
                tracing::debug!(id, "vote conflict absorbed");
                Self::set_flags(&mut state.snapshot.status, kind, !undo);
                Ok(state.snapshot)
            }
            VoteCommandResult::Failed(err) => Err(err),
        }
    }

    /// Set or clear the flag for `kind`, clearing the opposite flag on
    /// set. Upvoted and downvoted are never both true.
    fn set_flags(status: &mut VoteStatus, kind: VoteKind, active: bool) {
        match kind {
            VoteKind::Up => {
                status.has_upvoted = active;
                if active {
                    status.has_downvoted = false;
                }
            }
            VoteKind::Down => {
                status.has_downvoted = active;
                if active {
                    status.has_upvoted = false;
                }
            }
        }
    }
}
