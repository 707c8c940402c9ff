//! devjournal - demo CLI for the client layer
//!
//! Hydrates the session from the persisted credential, loads the feed
//! (optionally filtered by a query argument), and prints a summary line
//! per item.

use anyhow::Result;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devjournal::{
    api::Gateway,
    config::Config,
    remote::{HttpAuthApi, HttpNewsApi, HttpVoteApi},
    services::votes::VoteReconciler,
    services::{Location, Navigator, SearchSync},
    session::{FileCredentialStore, SessionStore},
    viewmodel::FeedViewModel,
};

/// In-process stand-in for the browser URL bar: the CLI argument becomes
/// the `q` parameter of the starting location.
struct CliNavigator {
    location: Mutex<Location>,
}

impl CliNavigator {
    fn at(location: Location) -> Arc<Self> {
        Arc::new(Self { location: Mutex::new(location) })
    }
}

impl Navigator for CliNavigator {
    fn current(&self) -> Location {
        self.location.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn replace(&self, location: Location) {
        *self.location.lock().unwrap_or_else(|e| e.into_inner()) = location;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devjournal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load(Path::new("config.toml"))?;
    tracing::info!(base_url = %config.api.base_url, "configuration loaded");

    // Wire the shared state layer
    let credentials = Arc::new(FileCredentialStore::new(config.credential_path()));
    let gateway = Arc::new(Gateway::new(&config.api, credentials.clone())?);
    let auth = Arc::new(HttpAuthApi::new(gateway.clone()));
    let session = SessionStore::new(auth, credentials, gateway.events());
    session.spawn_logout_listener();

    match session.hydrate().await {
        Some(user) => tracing::info!(user = %user.name, "logged in"),
        None => tracing::info!("browsing anonymously"),
    }

    // The URL is the source of truth for the search query; the argument
    // seeds it and the synchronizer feeds the input value to the feed.
    let location = match std::env::args().nth(1) {
        Some(q) => Location::new("/").with_param("q", Some(q.as_str())),
        None => Location::new("/"),
    };
    let navigator = CliNavigator::at(location);
    let search = SearchSync::new(navigator, config.search.debounce());
    search.sync_from_location();
    let query = Some(search.input()).filter(|q| !q.is_empty());

    // Load and print the feed
    let votes = Arc::new(VoteReconciler::new(Arc::new(HttpVoteApi::new(gateway.clone()))));
    let feed = FeedViewModel::new(Arc::new(HttpNewsApi::new(gateway)), votes, session);

    feed.load(query.as_deref()).await;
    if let Some(err) = feed.error().await {
        println!("Error: {err}");
        return Ok(());
    }

    let items = feed.items().await;
    if items.is_empty() {
        println!("No news found{}", query.map(|q| format!(" for \"{q}\"")).unwrap_or_default());
        return Ok(());
    }
    for item in items {
        let status = feed.vote_status(&item.id).await;
        let marker = if status.has_upvoted {
            "^"
        } else if status.has_downvoted {
            "v"
        } else {
            " "
        };
        println!(
            "{} [{}] {} by {} ({}) +{} -{} ({} comments)",
            marker,
            item.id,
            item.title,
            item.publisher,
            item.release_date,
            item.upvotes,
            item.downvotes,
            item.comments_count
        );
    }

    Ok(())
}
