//! Live recipe feed with search and category filtering.
//!
//! A background task mirrors the `recipes` collection into `all`; `visible`
//! is recomputed from `all`, the query and the category whenever any of the
//! three changes. The task is aborted when the holder is dropped.

use std::sync::{Arc, Mutex, PoisonError};

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::ports::RepositoryError;
use crate::domain::{CategoryFilter, Recipe, RecipeFilter};

use super::{AppContext, Observable};

/// Health of the live subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// No snapshot has arrived yet.
    Connecting,
    /// The latest snapshot is current.
    Live,
    /// The listener reported an error; the last good snapshot stays visible.
    Stale {
        /// Listener error text.
        message: String,
    },
}

#[derive(Debug)]
struct Feed {
    all: Observable<Vec<Recipe>>,
    filter: Observable<RecipeFilter>,
    visible: Observable<Vec<Recipe>>,
    status: Observable<FeedStatus>,
    // Keeps `visible` consistent with the inputs it was derived from.
    recompute: Mutex<()>,
}

impl Feed {
    fn update(&self, edit: impl FnOnce(&Self)) {
        let _lock = self.recompute.lock().unwrap_or_else(PoisonError::into_inner);
        edit(self);
        let visible = self.filter.get().apply(&self.all.get());
        self.visible.set(visible);
    }

    fn snapshot(&self, recipes: Vec<Recipe>) {
        debug!(count = recipes.len(), "recipe snapshot");
        self.update(|feed| feed.all.set(recipes));
        self.status.set(FeedStatus::Live);
    }

    fn stale(&self, err: &RepositoryError) {
        warn!(error = %err, "recipe feed is stale");
        self.status.set(FeedStatus::Stale {
            message: err.to_string(),
        });
    }
}

/// State holder behind the home feed.
pub struct RecipeListState {
    feed: Arc<Feed>,
    listener: JoinHandle<()>,
}

impl RecipeListState {
    /// Subscribe to the recipe collection. Must run inside a Tokio runtime.
    pub fn new(ctx: &AppContext) -> Self {
        let feed = Arc::new(Feed {
            all: Observable::default(),
            filter: Observable::default(),
            visible: Observable::default(),
            status: Observable::new(FeedStatus::Connecting),
            recompute: Mutex::new(()),
        });
        let mut snapshots = ctx.recipes.watch_all();
        let sink = Arc::clone(&feed);
        let listener = tokio::spawn(async move {
            while let Some(snapshot) = snapshots.next().await {
                match snapshot {
                    Ok(recipes) => sink.snapshot(recipes),
                    Err(err) => sink.stale(&err),
                }
            }
            debug!("recipe feed closed");
        });
        Self { feed, listener }
    }

    /// Every recipe in the latest snapshot.
    pub fn all(&self) -> Vec<Recipe> {
        self.feed.all.get()
    }

    /// Recipes matching the current query and category.
    pub fn visible(&self) -> Vec<Recipe> {
        self.feed.visible.get()
    }

    /// Observable behind [`Self::visible`].
    pub fn observe_visible(&self) -> &Observable<Vec<Recipe>> {
        &self.feed.visible
    }

    /// Subscription health.
    pub fn status(&self) -> FeedStatus {
        self.feed.status.get()
    }

    /// Observable behind [`Self::status`].
    pub fn observe_status(&self) -> &Observable<FeedStatus> {
        &self.feed.status
    }

    /// Current search text.
    pub fn query(&self) -> String {
        self.feed.filter.get().query
    }

    /// Current category selection.
    pub fn category(&self) -> CategoryFilter {
        self.feed.filter.get().category
    }

    /// Update the search text.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.feed
            .update(|feed| feed.filter.modify(|filter| filter.query = query));
    }

    /// Select a category by label; `All` clears the filter.
    pub fn set_category(&self, label: impl Into<String>) {
        let category = CategoryFilter::from_label(label);
        self.feed
            .update(|feed| feed.filter.modify(|filter| filter.category = category));
    }

    /// Wait until the first snapshot (or listener error) has arrived.
    pub async fn ready(&self) -> FeedStatus {
        self.feed
            .status
            .wait_for(|status| *status != FeedStatus::Connecting)
            .await
    }
}

impl Drop for RecipeListState {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
