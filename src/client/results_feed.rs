use std::time::Duration;

use super::rate_limit::Throttle;
use super::toast::ToastService;
use crate::filters::FilterState;
use crate::http_client::ApiError;
use crate::media_api::PageSource;
use crate::media_types::{MediaRecord, SearchPage};

/// Minimum spacing between scroll-triggered page fetches.
pub const SCROLL_THROTTLE: Duration = Duration::from_secs(2);
/// Fraction of the sentinel that must be visible to count as reached.
pub const SENTINEL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub initial: bool,
    pub append: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedErrors {
    pub initial: Option<String>,
    pub append: Option<String>,
}

/// What the results area should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedView {
    InitialLoading,
    InitialError,
    Empty,
    Results,
}

/// A fresh first-page fetch issued by a filter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTicket {
    generation: u64,
    pub query: String,
    pub filters: FilterState,
}

/// A next-page fetch issued by the scroll sentinel or a manual retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendTicket {
    generation: u64,
    pub cursor: String,
}

/// Accumulated results for one query with infinite-scroll paging.
///
/// Fetching happens outside: each trigger hands out a ticket, and its result
/// is only applied if no newer reset happened in the meantime.
pub struct ResultsFeed<T: MediaRecord> {
    query: String,
    filters: FilterState,
    items: Vec<T>,
    total_results: u64,
    next_page: Option<String>,
    loading: LoadingState,
    errors: FeedErrors,
    generation: u64,
    throttle: Throttle,
    toasts: Option<ToastService>,
}

impl<T: MediaRecord> ResultsFeed<T> {
    pub fn new(query: impl Into<String>, filters: FilterState, initial: SearchPage<T>) -> Self {
        Self {
            query: query.into(),
            filters,
            items: initial.items,
            total_results: initial.total_results,
            next_page: initial.next_page,
            loading: LoadingState::default(),
            errors: FeedErrors::default(),
            generation: 0,
            throttle: Throttle::new(SCROLL_THROTTLE),
            toasts: None,
        }
    }

    pub fn with_toasts(mut self, toasts: ToastService) -> Self {
        self.toasts = Some(toasts);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn loading(&self) -> LoadingState {
        self.loading
    }

    pub fn errors(&self) -> &FeedErrors {
        &self.errors
    }

    /// "Load more" is offered once a scroll fetch has failed.
    pub fn can_retry(&self) -> bool {
        self.errors.append.is_some() && self.next_page.is_some() && !self.loading.append
    }

    pub fn view(&self) -> FeedView {
        if self.loading.initial {
            FeedView::InitialLoading
        } else if !self.items.is_empty() {
            FeedView::Results
        } else if self.errors.initial.is_some() {
            FeedView::InitialError
        } else {
            FeedView::Empty
        }
    }

    fn noun(&self) -> &'static str {
        T::KIND.plural()
    }

    fn report(&self, message: &str) {
        if let Some(toasts) = &self.toasts {
            toasts.error(message);
        }
    }

    /// Starts a reload for new filters. Unchanged filters issue nothing
    /// unless the last reload for them failed.
    pub fn begin_reset(&mut self, filters: FilterState) -> Option<ResetTicket> {
        if filters == self.filters && self.errors.initial.is_none() {
            return None;
        }
        self.filters = filters;
        Some(self.issue_reset())
    }

    /// Manual "Try again" after a failed reload of the current filters.
    pub fn retry_reset(&mut self) -> Option<ResetTicket> {
        if self.errors.initial.is_none() || self.loading.initial {
            return None;
        }
        Some(self.issue_reset())
    }

    fn issue_reset(&mut self) -> ResetTicket {
        self.generation += 1;
        self.loading = LoadingState {
            initial: true,
            append: false,
        };
        self.errors = FeedErrors::default();

        ResetTicket {
            generation: self.generation,
            query: self.query.clone(),
            filters: self.filters.clone(),
        }
    }

    /// Returns `false` when the ticket was superseded and the result dropped.
    pub fn complete_reset(
        &mut self,
        ticket: ResetTicket,
        result: Result<SearchPage<T>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Dropping superseded reset for {:?}", ticket.query);
            return false;
        }

        self.loading.initial = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total_results = page.total_results;
                self.next_page = page.next_page;
                self.throttle.reset();
            }
            Err(e) => {
                log::error!("Failed to load {} for {:?}: {}", self.noun(), self.query, e);
                let message = format!("Failed to load {}. Please try again.", self.noun());
                self.report(&message);
                self.errors.initial = Some(message);
                // The cursor belongs to the previous filters.
                self.next_page = None;
            }
        }
        true
    }

    fn begin_append(&mut self) -> Option<AppendTicket> {
        let cursor = self.next_page.clone()?;
        if self.loading.append || self.loading.initial {
            return None;
        }

        self.loading.append = true;
        self.errors.append = None;
        Some(AppendTicket {
            generation: self.generation,
            cursor,
        })
    }

    /// Scroll sentinel visibility changed. Issues a fetch only when the
    /// sentinel is visible enough, a next page exists, nothing is in flight
    /// and the throttle admits it.
    pub fn on_sentinel(&mut self, visible_ratio: f64) -> Option<AppendTicket> {
        if visible_ratio < SENTINEL_THRESHOLD {
            return None;
        }
        if self.next_page.is_none() || self.loading.append || self.loading.initial {
            return None;
        }
        if !self.throttle.try_acquire() {
            log::debug!("Scroll fetch throttled");
            return None;
        }
        self.begin_append()
    }

    /// Manual "Load more" after a failed scroll fetch; not throttled.
    pub fn retry_append(&mut self) -> Option<AppendTicket> {
        self.begin_append()
    }

    /// Returns `false` when a reset superseded the append and the result was dropped.
    pub fn complete_append(
        &mut self,
        ticket: AppendTicket,
        result: Result<SearchPage<T>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Dropping stale page {}", ticket.cursor);
            return false;
        }

        self.loading.append = false;
        match result {
            Ok(page) => {
                self.items.extend(page.items);
                self.total_results = page.total_results;
                self.next_page = page.next_page;
            }
            Err(e) => {
                log::error!("Failed to load more {}: {}", self.noun(), e);
                self.report(&format!("Failed to load more {}. Please try again.", self.noun()));
                self.errors.append =
                    Some(format!("Failed to load more {}. Please try again.", self.noun()));
            }
        }
        true
    }

    pub async fn apply_filters<S>(&mut self, source: &S, filters: FilterState) -> bool
    where
        S: PageSource<T> + ?Sized,
    {
        let Some(ticket) = self.begin_reset(filters) else {
            return false;
        };
        let result = source.first_page(&ticket.query, &ticket.filters).await;
        self.complete_reset(ticket, result)
    }

    pub async fn load_more<S>(&mut self, source: &S, visible_ratio: f64) -> bool
    where
        S: PageSource<T> + ?Sized,
    {
        let Some(ticket) = self.on_sentinel(visible_ratio) else {
            return false;
        };
        let result = source.page_at(&ticket.cursor).await;
        self.complete_append(ticket, result)
    }
}
