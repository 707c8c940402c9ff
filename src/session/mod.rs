//! Session state: persisted credential and the process-wide user
//!
//! The credential and the current user are singletons. Only the gateway
//! (on a 401) and the [`SessionStore`] (on login/logout) may mutate them;
//! everything else reads.

pub mod credential;
pub mod store;

pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use store::{SessionState, SessionStore};
