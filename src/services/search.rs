//! Search query synchronizer
//!
//! Two coupled one-way bindings between the search input and the URL's
//! `q` parameter, with a debounce boundary in the input → URL direction:
//!
//! 1. On navigation, the input is set from the URL, synchronously and
//!    unconditionally.
//! 2. On typing, the trimmed value is written back into the URL after
//!    250ms of quiescence, replacing history, and only if the resulting
//!    location actually differs, so the echo from (1) never re-triggers
//!    a navigation loop.
//!
//! Each keystroke aborts the previously scheduled commit task and
//! schedules a new one carrying its own value.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Name of the search query parameter.
const QUERY_PARAM: &str = "q";

/// A navigable location: path plus raw query string (without the `?`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), query: None }
    }

    /// Decoded value of a query parameter.
    pub fn param(&self, name: &str) -> Option<String> {
        parse_query(self.query.as_deref()?)
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// A copy with one parameter set or removed, other parameters kept
    /// in order. `None` removes the parameter entirely rather than
    /// leaving it empty.
    pub fn with_param(&self, name: &str, value: Option<&str>) -> Self {
        let mut pairs: Vec<(String, String)> = self
            .query
            .as_deref()
            .map(parse_query)
            .unwrap_or_default()
            .into_iter()
            .filter(|(key, _)| key != name)
            .collect();
        if let Some(value) = value {
            pairs.push((name.to_string(), value.to_string()));
        }
        Self { path: self.path.clone(), query: build_query(&pairs) }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => write!(f, "{}", self.path),
        }
    }
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn build_query(pairs: &[(String, String)]) -> Option<String> {
    if pairs.is_empty() {
        return None;
    }
    Some(
        pairs
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&"),
    )
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string())
}

/// The navigable URL the synchronizer reads and writes.
pub trait Navigator: Send + Sync {
    fn current(&self) -> Location;

    /// Navigate, replacing history rather than pushing a new entry.
    fn replace(&self, location: Location);
}

/// The search query synchronizer.
pub struct SearchSync {
    navigator: Arc<dyn Navigator>,
    input: Mutex<String>,
    pending: Mutex<Option<JoinHandle<()>>>,
    debounce: Duration,
}

impl SearchSync {
    pub fn new(navigator: Arc<dyn Navigator>, debounce: Duration) -> Self {
        Self { navigator, input: Mutex::new(String::new()), pending: Mutex::new(None), debounce }
    }

    /// The visible input value.
    pub fn input(&self) -> String {
        self.input.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Binding (1): set the input from the current location. Called on
    /// every navigation, including the initial load.
    pub fn sync_from_location(&self) {
        let value = self.navigator.current().param(QUERY_PARAM).unwrap_or_default();
        *self.input.lock().unwrap_or_else(|e| e.into_inner()) = value;
    }

    /// Binding (2): record a keystroke and schedule the URL commit after
    /// the quiescence period. A newer keystroke cancels the pending
    /// commit, so only the final value is committed.
    pub fn set_input(&self, text: &str) {
        *self.input.lock().unwrap_or_else(|e| e.into_inner()) = text.to_string();

        let navigator = Arc::clone(&self.navigator);
        let value = text.trim().to_string();
        let debounce = self.debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            commit(navigator.as_ref(), &value);
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Cancel any pending commit, e.g. on teardown.
    pub fn cancel_pending(&self) {
        if let Some(task) = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take() {
            task.abort();
        }
    }
}

impl Drop for SearchSync {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Write the trimmed value into the URL, omitting the parameter when
/// empty, and skip navigation when the target equals the current
/// location.
fn commit(navigator: &dyn Navigator, value: &str) {
    let current = navigator.current();
    let target = current.with_param(QUERY_PARAM, Some(value).filter(|v| !v.is_empty()));
    if target == current {
        return;
    }
    tracing::debug!(target = %target, "committing search query to URL");
    navigator.replace(target);
}
