//! devjournal - client and state layer for The Dev Journal
//!
//! This library keeps browser-style UI state consistent with the remote
//! news backend: an authenticated request gateway, a persisted session,
//! optimistic vote reconciliation, and debounced search-to-URL binding.

pub mod api;
pub mod config;
pub mod models;
pub mod remote;
pub mod services;
pub mod session;
pub mod viewmodel;
