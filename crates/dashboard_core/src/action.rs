//! Intents that move a collection view from one state to the next.

use shared::protocol::CollectionPage;

use crate::{error::ErrorInfo, query::QueryModel};

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAction<R> {
    /// Issue a fetch for `query`, superseding anything in flight.
    Request(QueryModel),
    Success {
        seq: u64,
        payload: CollectionPage<R>,
    },
    Error {
        seq: u64,
        error: ErrorInfo,
    },
    ToggleSort(String),
    AddFilter {
        key: String,
        value: String,
    },
    RemoveFilter {
        key: String,
        value: String,
    },
    ClearFilters,
    Search(String),
    ClearSearch,
    ShowFilters,
    HideFilters,
    /// Negative offsets clamp to zero.
    SetPage(i64),
    /// One-based; zero clamps to the first page.
    GoToPage(u64),
    SetLimit(u32),
    Refresh,
    /// Periodic refresh; skipped while a request is already in flight.
    Poll,
    Restore(QueryModel),
}

impl<R> CollectionAction<R> {
    pub fn add_filter(key: impl Into<String>, value: impl Into<String>) -> Self {
        CollectionAction::AddFilter {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove_filter(key: impl Into<String>, value: impl Into<String>) -> Self {
        CollectionAction::RemoveFilter {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn toggle_sort(field: impl Into<String>) -> Self {
        CollectionAction::ToggleSort(field.into())
    }

    pub fn search(term: impl Into<String>) -> Self {
        CollectionAction::Search(term.into())
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollectionAction::Request(_) => "request",
            CollectionAction::Success { .. } => "success",
            CollectionAction::Error { .. } => "error",
            CollectionAction::ToggleSort(_) => "toggle_sort",
            CollectionAction::AddFilter { .. } => "add_filter",
            CollectionAction::RemoveFilter { .. } => "remove_filter",
            CollectionAction::ClearFilters => "clear_filters",
            CollectionAction::Search(_) => "search",
            CollectionAction::ClearSearch => "clear_search",
            CollectionAction::ShowFilters => "show_filters",
            CollectionAction::HideFilters => "hide_filters",
            CollectionAction::SetPage(_) => "set_page",
            CollectionAction::GoToPage(_) => "go_to_page",
            CollectionAction::SetLimit(_) => "set_limit",
            CollectionAction::Refresh => "refresh",
            CollectionAction::Poll => "poll",
            CollectionAction::Restore(_) => "restore",
        }
    }
}
