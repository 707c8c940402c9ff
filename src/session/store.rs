//! Session store
//!
//! Holds the current user and drives the Unauthenticated → Hydrating →
//! Authenticated lifecycle. A logout broadcast from the gateway (a 401
//! on any request) invalidates the session asynchronously.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::api::{ApiError, SessionEvent};
use crate::models::{LoginInput, RegisterInput, User};
use crate::remote::AuthApi;
use crate::session::credential::CredentialStore;

/// Lifecycle of the process-wide session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No user. Absence of a stored credential, an expired credential,
    /// or an explicit logout all land here; consumers treat them alike.
    #[default]
    Unauthenticated,
    /// A stored credential exists and a "who am I" request is in flight.
    Hydrating,
    /// The credential was accepted and this is its user.
    Authenticated(User),
}

/// The process-wide session store.
pub struct SessionStore {
    state: RwLock<SessionState>,
    auth: Arc<dyn AuthApi>,
    credentials: Arc<dyn CredentialStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// `events` is the gateway's session event channel; the store both
    /// listens on it (see [`spawn_logout_listener`](Self::spawn_logout_listener))
    /// and broadcasts explicit logouts through it.
    pub fn new(
        auth: Arc<dyn AuthApi>,
        credentials: Arc<dyn CredentialStore>,
        events: broadcast::Sender<SessionEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(SessionState::Unauthenticated),
            auth,
            credentials,
            events,
        })
    }

    /// The current user, or `None` when not authenticated.
    pub async fn current_user(&self) -> Option<User> {
        match &*self.state.read().await {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(&*self.state.read().await, SessionState::Authenticated(_))
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Validate a persisted credential on startup.
    ///
    /// With no stored credential this is a no-op; otherwise the store
    /// enters Hydrating and asks the backend who the credential belongs
    /// to. An expired credential has already been erased by the
    /// gateway's 401 handling by the time the error reaches us; a
    /// transport failure keeps the credential for the next launch but
    /// still leaves the session unauthenticated.
    pub async fn hydrate(&self) -> Option<User> {
        if self.credentials.load().is_none() {
            *self.state.write().await = SessionState::Unauthenticated;
            return None;
        }

        *self.state.write().await = SessionState::Hydrating;
        match self.auth.me().await {
            Ok(user) => {
                tracing::info!(user = %user.name, "session hydrated");
                *self.state.write().await = SessionState::Authenticated(user.clone());
                Some(user)
            }
            Err(err) => {
                tracing::info!(%err, "session hydration failed");
                if matches!(err, ApiError::Status { status: 400..=499, .. }) {
                    // Rejected for a reason other than 401; the token is
                    // no good, drop it.
                    self.credentials.clear();
                }
                *self.state.write().await = SessionState::Unauthenticated;
                None
            }
        }
    }

    /// Log in, storing the returned credential and user directly; no
    /// hydration round trip.
    pub async fn login(&self, input: &LoginInput) -> Result<User, ApiError> {
        let resp = self.auth.login(input).await?;
        self.set_authenticated(resp.user.clone(), &resp.token).await;
        Ok(resp.user)
    }

    /// Register a new account; the backend logs the user straight in.
    pub async fn register(&self, input: &RegisterInput) -> Result<User, ApiError> {
        let resp = self.auth.register(input).await?;
        self.set_authenticated(resp.user.clone(), &resp.token).await;
        Ok(resp.user)
    }

    /// Setter used by the login/registration flows.
    pub async fn set_authenticated(&self, user: User, token: &str) {
        self.credentials.store(token);
        *self.state.write().await = SessionState::Authenticated(user);
    }

    /// Explicit logout: clear credential, clear user, broadcast.
    pub async fn logout(&self) {
        tracing::info!("logging out");
        self.credentials.clear();
        *self.state.write().await = SessionState::Unauthenticated;
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    /// React to a logout broadcast from the gateway. The credential is
    /// already gone; only the in-memory user needs dropping.
    async fn apply_remote_logout(&self) {
        let mut state = self.state.write().await;
        if !matches!(&*state, SessionState::Unauthenticated) {
            tracing::info!("session invalidated by server");
            *state = SessionState::Unauthenticated;
        }
    }

    /// Spawn the background task that applies logout broadcasts.
    pub fn spawn_logout_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut rx = store.events.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionEvent::LoggedOut) => store.apply_remote_logout().await,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
