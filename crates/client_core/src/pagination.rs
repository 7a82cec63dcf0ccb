//! One-page-at-a-time browsing of the remote character list.

use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use shared::domain::Character;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{api::CharacterApi, error::PageError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub page_number: u32,
    pub items: Vec<Character>,
    pub total_pages: Option<NonZeroU32>,
    pub is_loading: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_number: 1,
            items: Vec::new(),
            total_pages: None,
            is_loading: false,
        }
    }
}

/// A fetch issued while another is in flight fails with [`PageError::Busy`].
pub struct PageController {
    api: Arc<dyn CharacterApi>,
    state: Mutex<PageState>,
    loading: AtomicBool,
    initial_requested: AtomicBool,
}

/// Clears the loading flag when dropped, including when the fetch future is
/// cancelled mid-request.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PageController {
    pub fn new(api: Arc<dyn CharacterApi>) -> Self {
        Self {
            api,
            state: Mutex::new(PageState::default()),
            loading: AtomicBool::new(false),
            initial_requested: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> PageState {
        let mut snapshot = self.state.lock().await.clone();
        snapshot.is_loading = self.loading.load(Ordering::SeqCst);
        snapshot
    }

    /// Fetches page 1 the first time it is called; afterwards returns the
    /// current state without touching the network. A call rejected as busy
    /// does not count as the initial load.
    pub async fn load_initial(&self) -> Result<PageState, PageError> {
        if self.initial_requested.load(Ordering::SeqCst) {
            return Ok(self.state().await);
        }
        let in_flight = self.begin_fetch(1)?;
        if self.initial_requested.swap(true, Ordering::SeqCst) {
            drop(in_flight);
            return Ok(self.state().await);
        }
        self.complete_fetch(1, in_flight).await
    }

    pub async fn fetch_page(&self, page_number: u32) -> Result<PageState, PageError> {
        if page_number == 0 {
            return Err(PageError::invalid(page_number, "pages are numbered from 1"));
        }
        let in_flight = self.begin_fetch(page_number)?;
        self.complete_fetch(page_number, in_flight).await
    }

    fn begin_fetch(&self, page_number: u32) -> Result<InFlight<'_>, PageError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(page = page_number, "fetch rejected: another fetch is in flight");
            return Err(PageError::Busy { page: page_number });
        }
        Ok(InFlight(&self.loading))
    }

    async fn complete_fetch(
        &self,
        page_number: u32,
        in_flight: InFlight<'_>,
    ) -> Result<PageState, PageError> {
        let result = self.api.fetch_page(page_number).await;

        let mut guard = self.state.lock().await;
        drop(in_flight);
        match result {
            Ok(page) => {
                guard.page_number = page_number;
                guard.items = page.results;
                guard.total_pages = NonZeroU32::new(page.info.pages);
                info!(
                    page = page_number,
                    total_pages = page.info.pages,
                    items = guard.items.len(),
                    "page loaded"
                );
                Ok(guard.clone())
            }
            Err(source) => {
                warn!(page = page_number, error = %format!("{source:#}"), "page fetch failed");
                Err(PageError::FetchFailed {
                    page: page_number,
                    source,
                })
            }
        }
    }

    /// Validates `requested` against the last-seen page count, then fetches.
    pub async fn go_to_page(&self, requested: i64) -> Result<PageState, PageError> {
        let page = self.validate(requested).await?;
        self.fetch_page(page).await
    }

    /// Same as [`Self::go_to_page`] for raw text input.
    pub async fn go_to_page_input(&self, raw: &str) -> Result<PageState, PageError> {
        let trimmed = raw.trim();
        let requested = trimmed
            .parse::<i64>()
            .map_err(|_| PageError::invalid(trimmed, "not an integer"))?;
        self.go_to_page(requested).await
    }

    async fn validate(&self, requested: i64) -> Result<u32, PageError> {
        if requested < 1 {
            return Err(PageError::invalid(requested, "pages are numbered from 1"));
        }
        let page = u32::try_from(requested)
            .map_err(|_| PageError::invalid(requested, "page number too large"))?;

        if let Some(total) = self.state.lock().await.total_pages {
            if page > total.get() {
                return Err(PageError::invalid(
                    requested,
                    format!("only {total} pages available"),
                ));
            }
        }
        Ok(page)
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
