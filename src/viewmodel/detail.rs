//! Detail view model

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Comment, NewsItem, VoteCounts, VoteStatus};
use crate::remote::NewsApi;
use crate::services::comments::CommentService;
use crate::services::votes::VoteReconciler;
use crate::session::SessionStore;

/// Detail presentation for one news item: the item, its comment thread,
/// vote flags, and an inline error slot.
pub struct DetailViewModel {
    news: Arc<dyn NewsApi>,
    comments: CommentService,
    votes: Arc<VoteReconciler>,
    session: Arc<SessionStore>,
    news_id: String,
    alive: AtomicBool,
    item: RwLock<Option<NewsItem>>,
    thread: RwLock<Vec<Comment>>,
    error: RwLock<Option<String>>,
}

impl DetailViewModel {
    pub fn new(
        news: Arc<dyn NewsApi>,
        comments: CommentService,
        votes: Arc<VoteReconciler>,
        session: Arc<SessionStore>,
        news_id: impl Into<String>,
    ) -> Self {
        Self {
            news,
            comments,
            votes,
            session,
            news_id: news_id.into(),
            alive: AtomicBool::new(true),
            item: RwLock::new(None),
            thread: RwLock::new(Vec::new()),
            error: RwLock::new(None),
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Fetch the item and its comments, then the current user's vote
    /// flags when logged in.
    pub async fn load(&self) {
        let (item, thread) = tokio::join!(
            self.news.get(&self.news_id),
            self.comments.list(&self.news_id),
        );
        if !self.is_alive() {
            return;
        }

        match item {
            Ok(item) => {
                self.votes
                    .prime(
                        &self.news_id,
                        VoteCounts { upvotes: item.upvotes, downvotes: item.downvotes },
                    )
                    .await;
                *self.item.write().await = Some(item);
            }
            Err(err) => {
                *self.error.write().await = Some(err.user_message());
                return;
            }
        }
        match thread {
            Ok(thread) => *self.thread.write().await = thread,
            Err(err) => {
                tracing::warn!(%err, "comment load failed");
                *self.error.write().await = Some(err.user_message());
            }
        }

        if self.session.is_authenticated().await {
            // Flag load failures just leave the controls unmarked.
            let _ = self.votes.load_status(&self.news_id).await;
        }
    }

    pub async fn upvote(&self) {
        self.vote(true).await;
    }

    pub async fn downvote(&self) {
        self.vote(false).await;
    }

    async fn vote(&self, up: bool) {
        if self.votes.is_in_flight(&self.news_id).await {
            return;
        }
        let result = if up {
            self.votes.upvote(&self.news_id).await
        } else {
            self.votes.downvote(&self.news_id).await
        };
        match result {
            Ok(snapshot) => {
                if !self.is_alive() {
                    return;
                }
                if let Some(item) = self.item.write().await.as_mut() {
                    item.upvotes = snapshot.counts.upvotes;
                    item.downvotes = snapshot.counts.downvotes;
                }
            }
            Err(err) => {
                if self.is_alive() {
                    *self.error.write().await = Some(err.user_message());
                }
            }
        }
    }

    /// Post a comment; on success the entry is prepended locally, no
    /// refetch. Blank input is ignored.
    pub async fn post_comment(&self, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        match self.comments.post(&self.news_id, content).await {
            Ok(comment) => {
                if !self.is_alive() {
                    return;
                }
                self.thread.write().await.insert(0, comment);
                *self.error.write().await = None;
            }
            Err(err) => {
                tracing::warn!(%err, "comment post failed");
                if self.is_alive() {
                    *self.error.write().await = Some(err.user_message());
                }
            }
        }
    }

    /// Delete a comment the current user authored; the entry is removed
    /// from the displayed list without a refetch. Returns false when the
    /// action is not available (not the author, unknown id).
    pub async fn delete_comment(&self, comment_id: i64) -> bool {
        let user = self.session.current_user().await;
        let owned = {
            let thread = self.thread.read().await;
            thread
                .iter()
                .find(|comment| comment.id == comment_id)
                .map(|comment| CommentService::can_delete(comment, user.as_ref()))
                .unwrap_or(false)
        };
        if !owned {
            return false;
        }

        match self.comments.delete(comment_id).await {
            Ok(()) => {
                if self.is_alive() {
                    self.thread.write().await.retain(|comment| comment.id != comment_id);
                }
                true
            }
            Err(err) => {
                tracing::warn!(comment_id, %err, "comment delete failed");
                if self.is_alive() {
                    *self.error.write().await = Some(err.user_message());
                }
                false
            }
        }
    }

    pub async fn item(&self) -> Option<NewsItem> {
        self.item.read().await.clone()
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.thread.read().await.clone()
    }

    pub async fn vote_status(&self) -> VoteStatus {
        self.votes.snapshot(&self.news_id).await.status
    }

    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{
        AuthResponse, CommentAuthor, CreateNewsInput, LoginInput, RegisterInput, UpdateNewsInput,
        UploadedImage, User,
    };
    use crate::remote::{AuthApi, CommentApi, VoteApi};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::broadcast;

    struct FakeNewsApi;

    #[async_trait]
    impl NewsApi for FakeNewsApi {
        async fn list(&self, _query: Option<&str>) -> Result<Vec<NewsItem>, ApiError> {
            unreachable!()
        }
        async fn get(&self, id: &str) -> Result<NewsItem, ApiError> {
            Ok(serde_json::from_value(serde_json::json!({
                "id": id,
                "title": "Story",
                "publisher": "p",
                "releaseDate": "2025-08-01",
                "upvotes": 5,
                "downvotes": 1
            }))
            .unwrap())
        }
        async fn create(&self, _input: &CreateNewsInput) -> Result<NewsItem, ApiError> {
            unreachable!()
        }
        async fn update(&self, _id: &str, _input: &UpdateNewsInput) -> Result<NewsItem, ApiError> {
            unreachable!()
        }
        async fn delete(&self, _id: &str) -> Result<(), ApiError> {
            unreachable!()
        }
        async fn my_news(&self) -> Result<Vec<NewsItem>, ApiError> {
            unreachable!()
        }
        async fn upload_image(
            &self,
            _filename: &str,
            _bytes: Vec<u8>,
        ) -> Result<UploadedImage, ApiError> {
            unreachable!()
        }
    }

    struct FakeCommentApi {
        thread: StdMutex<Vec<Comment>>,
        deletes: AtomicUsize,
        next_id: AtomicUsize,
    }

    impl FakeCommentApi {
        fn with_thread(thread: Vec<Comment>) -> Arc<Self> {
            Arc::new(Self {
                thread: StdMutex::new(thread),
                deletes: AtomicUsize::new(0),
                next_id: AtomicUsize::new(100),
            })
        }
    }

    #[async_trait]
    impl CommentApi for FakeCommentApi {
        async fn list(&self, _news_id: &str) -> Result<Vec<Comment>, ApiError> {
            Ok(self.thread.lock().unwrap().clone())
        }
        async fn post(&self, _news_id: &str, content: &str) -> Result<Comment, ApiError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
            Ok(Comment {
                id,
                content: content.to_string(),
                created_at: Utc::now(),
                user: Some(CommentAuthor { id: "9".into(), name: "alice".into() }),
            })
        }
        async fn delete(&self, comment_id: i64) -> Result<(), ApiError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.thread.lock().unwrap().retain(|c| c.id != comment_id);
            Ok(())
        }
    }

    struct ScriptedVotes;

    #[async_trait]
    impl VoteApi for ScriptedVotes {
        async fn add_upvote(&self, _id: &str) -> Result<VoteCounts, ApiError> {
            Ok(VoteCounts { upvotes: 6, downvotes: 1 })
        }
        async fn undo_upvote(&self, _id: &str) -> Result<VoteCounts, ApiError> {
            Ok(VoteCounts { upvotes: 5, downvotes: 1 })
        }
        async fn add_downvote(&self, _id: &str) -> Result<VoteCounts, ApiError> {
            Ok(VoteCounts { upvotes: 5, downvotes: 2 })
        }
        async fn undo_downvote(&self, _id: &str) -> Result<VoteCounts, ApiError> {
            Ok(VoteCounts { upvotes: 5, downvotes: 1 })
        }
        async fn upvote_status(&self, _id: &str) -> Result<VoteStatus, ApiError> {
            Ok(VoteStatus::default())
        }
        async fn downvote_status(&self, _id: &str) -> Result<VoteStatus, ApiError> {
            Ok(VoteStatus::default())
        }
    }

    struct StubAuth;

    #[async_trait]
    impl AuthApi for StubAuth {
        async fn login(&self, _input: &LoginInput) -> Result<AuthResponse, ApiError> {
            unreachable!()
        }
        async fn register(&self, _input: &RegisterInput) -> Result<AuthResponse, ApiError> {
            unreachable!()
        }
        async fn me(&self) -> Result<User, ApiError> {
            unreachable!()
        }
    }

    fn session() -> Arc<SessionStore> {
        let (events, _) = broadcast::channel(4);
        SessionStore::new(
            Arc::new(StubAuth),
            Arc::new(crate::session::MemoryCredentialStore::new()),
            events,
        )
    }

    fn comment(id: i64, author_id: &str) -> Comment {
        Comment {
            id,
            content: "text".to_string(),
            created_at: Utc::now(),
            user: Some(CommentAuthor { id: author_id.to_string(), name: "x".into() }),
        }
    }

    fn detail(
        comments: Arc<FakeCommentApi>,
        session: Arc<SessionStore>,
    ) -> DetailViewModel {
        DetailViewModel::new(
            Arc::new(FakeNewsApi),
            CommentService::new(comments),
            Arc::new(VoteReconciler::new(Arc::new(ScriptedVotes))),
            session,
            "42",
        )
    }

    async fn logged_in(session: &SessionStore, id: &str) {
        session
            .set_authenticated(
                User { id: id.into(), name: "alice".into(), email: String::new() },
                "tok",
            )
            .await;
    }

    #[tokio::test]
    async fn test_delete_own_comment_removes_locally() {
        let api = FakeCommentApi::with_thread(vec![comment(1, "9"), comment(2, "7")]);
        let session = session();
        logged_in(&session, "9").await;
        let vm = detail(api.clone(), session);
        vm.load().await;

        assert!(vm.delete_comment(1).await);
        let ids: Vec<i64> = vm.comments().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(api.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deleting_foreign_comment_is_not_offered() {
        let api = FakeCommentApi::with_thread(vec![comment(2, "7")]);
        let session = session();
        logged_in(&session, "9").await;
        let vm = detail(api.clone(), session);
        vm.load().await;

        assert!(!vm.delete_comment(2).await);
        assert_eq!(vm.comments().await.len(), 1);
        assert_eq!(api.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_post_comment_prepends() {
        let api = FakeCommentApi::with_thread(vec![comment(1, "9")]);
        let vm = detail(api, session());
        vm.load().await;

        vm.post_comment("  great article  ").await;
        let thread = vm.comments().await;
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].content, "great article");
    }

    #[tokio::test]
    async fn test_blank_comment_is_ignored() {
        let api = FakeCommentApi::with_thread(Vec::new());
        let vm = detail(api, session());
        vm.load().await;

        vm.post_comment("   ").await;
        assert!(vm.comments().await.is_empty());
    }

    #[tokio::test]
    async fn test_upvote_updates_displayed_counts() {
        let api = FakeCommentApi::with_thread(Vec::new());
        let vm = detail(api, session());
        vm.load().await;

        vm.upvote().await;
        let item = vm.item().await.unwrap();
        assert_eq!(item.upvotes, 6);
        assert!(vm.vote_status().await.has_upvoted);
    }

    #[tokio::test]
    async fn test_teardown_ignores_late_load() {
        let api = FakeCommentApi::with_thread(vec![comment(1, "9")]);
        let vm = detail(api, session());
        vm.teardown();
        vm.load().await;
        assert!(vm.item().await.is_none());
        assert!(vm.comments().await.is_empty());
    }
}
