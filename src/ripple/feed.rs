//! Global reaction-timeline feed with windowed retention.
//!
//! The feed accumulates pages of reaction events newest-first. Forward
//! loading is monotonic: each request asks for `current_page + 1` and the
//! counter never regresses without an explicit reset. When the in-memory
//! window grows past the retention limit the oldest-fetched half is dropped
//! and the corresponding pages leave the loaded set, so scrolling back re-
//! fetches them through `load_previous_feed_page`.

use std::collections::HashSet;

use crate::api::{ReactionEventDto, TimelinePage};
use crate::ripple::error::Result;
use crate::ripple::{Ripple, RippleError};

/// In-memory state of the global reactions feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionsFeedState {
    pub items: Vec<ReactionEventDto>,
    /// Highest page requested so far, 0 before the first load.
    pub current_page: u32,
    pub has_more_data: bool,
    pub is_loading: bool,
    /// Pages whose items are currently held in `items`.
    pub loaded_pages: HashSet<u32>,
    /// Scroll position to restore when the feed view reopens.
    pub last_viewed_index: Option<usize>,
}

impl Default for ReactionsFeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            has_more_data: true,
            is_loading: false,
            loaded_pages: HashSet::new(),
            last_viewed_index: None,
        }
    }
}

impl ReactionsFeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a freshly fetched forward page, dropping events already held.
    fn append_page(&mut self, page: u32, events: Vec<ReactionEventDto>, page_size: u32) {
        let fetched = events.len() as u32;
        self.merge(events, false);
        self.current_page = page;
        self.loaded_pages.insert(page);
        self.has_more_data = fetched == page_size;
        self.is_loading = false;
    }

    /// Re-inserts an earlier page at the front after it was trimmed away.
    fn prepend_page(&mut self, page: u32, events: Vec<ReactionEventDto>) {
        self.merge(events, true);
        self.loaded_pages.insert(page);
        self.is_loading = false;
    }

    fn merge(&mut self, events: Vec<ReactionEventDto>, front: bool) {
        let known: HashSet<i64> = self.items.iter().map(|e| e.id).collect();
        let mut fresh: Vec<ReactionEventDto> = events
            .into_iter()
            .filter(|e| !known.contains(&e.id))
            .collect();
        if front {
            let offset = fresh.len();
            fresh.append(&mut self.items);
            self.items = fresh;
            if let Some(index) = self.last_viewed_index {
                self.last_viewed_index = Some(index + offset);
            }
        } else {
            self.items.extend(fresh);
        }
    }

    /// Drops the oldest-fetched half once the window exceeds `limit`.
    fn trim(&mut self, limit: usize, page_size: u32) {
        if self.items.len() <= limit {
            return;
        }
        let excess = self.items.len() - limit / 2;
        self.items.drain(..excess);
        let dropped_pages = (excess as u32).div_ceil(page_size);
        if let Some(min) = self.loaded_pages.iter().copied().min() {
            for page in min..min + dropped_pages {
                self.loaded_pages.remove(&page);
            }
        }
        self.last_viewed_index = self
            .last_viewed_index
            .and_then(|index| index.checked_sub(excess));
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Ripple {
    /// Returns a copy of the current feed state.
    pub async fn feed(&self) -> ReactionsFeedState {
        self.state.lock().await.feed.clone()
    }

    /// Loads the next page of the global reaction timeline.
    ///
    /// A no-op while a load is in flight or once the server reported the end
    /// of the timeline. Failures after exhausting the retry budget leave the
    /// previously loaded items untouched.
    pub async fn load_next_feed_page(&self) -> Result<()> {
        let token = self.auth_token()?;

        let (page, generation) = {
            let mut state = self.state.lock().await;
            if state.feed.is_loading || !state.feed.has_more_data {
                return Ok(());
            }
            state.feed.is_loading = true;
            (state.feed.current_page + 1, state.generation)
        };

        match self.fetch_timeline_page(&token, page).await {
            Ok(fetched) => {
                let mut state = self.state.lock().await;
                if state.generation != generation {
                    tracing::debug!(
                        target: "ripple::feed",
                        "Discarding feed page {} fetched before logout",
                        page
                    );
                    return Ok(());
                }
                state.feed.append_page(page, fetched.list, self.config.page_size);
                state
                    .feed
                    .trim(self.config.feed_retention_limit, self.config.page_size);
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.lock().await;
                if state.generation == generation {
                    state.feed.is_loading = false;
                }
                Err(e)
            }
        }
    }

    /// Re-loads a page that retention trimmed out of the window.
    ///
    /// Ignored while a load is in flight, when the page is still held, or
    /// before forward paging has moved past page 1; never advances
    /// `current_page`.
    pub async fn load_previous_feed_page(&self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(RippleError::Validation(
                "feed pages start at 1".to_string(),
            ));
        }
        let token = self.auth_token()?;

        let generation = {
            let mut state = self.state.lock().await;
            if state.feed.is_loading
                || state.feed.current_page <= 1
                || state.feed.loaded_pages.contains(&page)
            {
                return Ok(());
            }
            state.feed.is_loading = true;
            state.generation
        };

        match self.fetch_timeline_page(&token, page).await {
            Ok(fetched) => {
                let mut state = self.state.lock().await;
                if state.generation != generation {
                    return Ok(());
                }
                state.feed.prepend_page(page, fetched.list);
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.lock().await;
                if state.generation == generation {
                    state.feed.is_loading = false;
                }
                Err(e)
            }
        }
    }

    /// Clears the feed so the next load starts over from page 1.
    pub async fn reset_feed(&self) {
        self.state.lock().await.feed.reset();
    }

    /// Records the scroll position to restore when the feed view reopens.
    pub async fn set_feed_last_viewed(&self, index: usize) {
        self.state.lock().await.feed.last_viewed_index = Some(index);
    }

    async fn fetch_timeline_page(&self, token: &str, page: u32) -> Result<TimelinePage> {
        let mut last_error = None;
        for attempt in 0..self.config.max_page_retries {
            if attempt > 0 {
                let backoff = std::time::Duration::from_secs(1u64 << (attempt - 1));
                tokio::time::sleep(backoff).await;
            }
            match self
                .api
                .global_timeline(token, page, self.config.page_size)
                .await
            {
                Ok(fetched) => return Ok(fetched),
                Err(e) => {
                    tracing::warn!(
                        target: "ripple::feed",
                        "Loading feed page {} failed (attempt {}): {}",
                        page,
                        attempt + 1,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            RippleError::Configuration("max_page_retries must be at least 1".to_string())
        }))
    }
}
