//! The collection state machine: `(state, action) -> state`.
//!
//! Every write to a [`CollectionState`] goes through [`reduce`]. Predicate
//! changes (sort, filters, search, page size) go back to the first page and
//! re-enter as a `Request`; fetch outcomes are applied only when their
//! sequence number matches the latest issued request.

use shared::protocol::CollectionPage;
use tracing::{debug, warn};

use crate::{
    action::CollectionAction,
    error::ErrorInfo,
    query::{FilterKeys, QueryModel, Sort, SortDirection},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionMeta {
    pub loading: bool,
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<R> {
    pub(crate) data: CollectionPage<R>,
    pub(crate) meta: CollectionMeta,
    pub(crate) query: QueryModel,
    pub(crate) request_seq: u64,
    pub(crate) filter_keys: FilterKeys,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self::new(QueryModel::default(), FilterKeys::Any)
    }
}

impl<R> CollectionState<R> {
    pub fn new(query: QueryModel, filter_keys: FilterKeys) -> Self {
        Self {
            data: CollectionPage::default(),
            meta: CollectionMeta::default(),
            query,
            request_seq: 0,
            filter_keys,
        }
    }

    pub fn data(&self) -> &CollectionPage<R> {
        &self.data
    }

    pub fn items(&self) -> &[R] {
        &self.data.items
    }

    pub fn meta(&self) -> &CollectionMeta {
        &self.meta
    }

    pub fn is_loading(&self) -> bool {
        self.meta.loading
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.meta.error.as_ref()
    }

    pub fn query(&self) -> &QueryModel {
        &self.query
    }

    pub fn request_seq(&self) -> u64 {
        self.request_seq
    }

    pub fn filter_keys(&self) -> &FilterKeys {
        &self.filter_keys
    }
}

/// A fetch the coordinator must issue, tagged with the sequence number it answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: QueryModel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Unchanged,
    /// State changed and no fetch is needed.
    Updated,
    /// A fetch outcome arrived for a superseded or already settled request.
    Discarded { seq: u64 },
    Issue(FetchTicket),
}

pub fn reduce<R>(state: &mut CollectionState<R>, action: CollectionAction<R>) -> Transition {
    match action {
        CollectionAction::Request(query) => {
            state.request_seq += 1;
            state.query = admit(&state.filter_keys, query);
            state.meta = CollectionMeta {
                loading: true,
                error: None,
            };
            Transition::Issue(FetchTicket {
                seq: state.request_seq,
                query: state.query.clone(),
            })
        }
        CollectionAction::Success { seq, payload } => {
            if !is_current(state, seq) {
                return Transition::Discarded { seq };
            }
            state.data = payload;
            state.meta = CollectionMeta::default();
            Transition::Updated
        }
        CollectionAction::Error { seq, error } => {
            if !is_current(state, seq) {
                return Transition::Discarded { seq };
            }
            state.meta = CollectionMeta {
                loading: false,
                error: Some(error),
            };
            Transition::Updated
        }
        CollectionAction::ToggleSort(field) => {
            if field.is_empty() {
                warn!("ignoring sort toggle with an empty field");
                return Transition::Unchanged;
            }
            let mut next = state.query.clone().first_page();
            next.sort = Some(match next.sort.take() {
                Some(current) if current.field == field => Sort {
                    field,
                    direction: current.direction.flipped(),
                },
                _ => Sort {
                    field,
                    direction: SortDirection::Asc,
                },
            });
            request(state, next)
        }
        CollectionAction::AddFilter { key, value } => {
            if !state.filter_keys.accepts(&key) {
                warn!(key = %key, "ignoring filter on a key this collection does not accept");
                return Transition::Unchanged;
            }
            let mut next = state.query.clone();
            if !next.insert_filter(&key, &value) {
                debug!(key = %key, value = %value, "filter already active");
                return Transition::Unchanged;
            }
            request(state, next.first_page())
        }
        CollectionAction::RemoveFilter { key, value } => {
            let mut next = state.query.clone();
            if !next.remove_filter(&key, &value) {
                return Transition::Unchanged;
            }
            request(state, next.first_page())
        }
        CollectionAction::ClearFilters => {
            if state.query.filters.is_empty() {
                return Transition::Unchanged;
            }
            let mut next = state.query.clone().first_page();
            next.filters.clear();
            request(state, next)
        }
        CollectionAction::Search(term) => {
            let mut next = state.query.clone().first_page();
            next.search = term;
            request(state, next)
        }
        CollectionAction::ClearSearch => {
            if state.query.search.is_empty() {
                return Transition::Unchanged;
            }
            let mut next = state.query.clone().first_page();
            next.search.clear();
            request(state, next)
        }
        CollectionAction::ShowFilters => set_filters_visible(state, true),
        CollectionAction::HideFilters => set_filters_visible(state, false),
        CollectionAction::SetPage(offset) => {
            let mut next = state.query.clone();
            next.pagination.offset = u64::try_from(offset).unwrap_or(0);
            request(state, next)
        }
        CollectionAction::GoToPage(page) => {
            let mut next = state.query.clone();
            next.pagination.offset =
                page.max(1).saturating_sub(1).saturating_mul(u64::from(next.pagination.limit));
            request(state, next)
        }
        CollectionAction::SetLimit(limit) => {
            let mut next = state.query.clone().first_page();
            next.pagination.limit = limit;
            request(state, next)
        }
        CollectionAction::Refresh => {
            let next = state.query.clone();
            request(state, next)
        }
        CollectionAction::Poll => {
            if state.meta.loading {
                return Transition::Unchanged;
            }
            let next = state.query.clone();
            request(state, next)
        }
        CollectionAction::Restore(mut query) => {
            query.filters_visible = state.query.filters_visible;
            request(state, query)
        }
    }
}

/// Drops an empty sort and any filter `filter_keys` rejects, keeping one copy of each pair.
fn admit(filter_keys: &FilterKeys, mut query: QueryModel) -> QueryModel {
    query.sort = query.sort.filter(|sort| !sort.field.is_empty());
    for pair in std::mem::take(&mut query.filters) {
        if filter_keys.accepts(&pair.key) {
            query.insert_filter(&pair.key, &pair.value);
        }
    }
    query
}

fn is_current<R>(state: &CollectionState<R>, seq: u64) -> bool {
    state.meta.loading && seq == state.request_seq
}

fn request<R>(state: &mut CollectionState<R>, query: QueryModel) -> Transition {
    reduce(state, CollectionAction::Request(query))
}

fn set_filters_visible<R>(state: &mut CollectionState<R>, visible: bool) -> Transition {
    if state.query.filters_visible == visible {
        return Transition::Unchanged;
    }
    state.query.filters_visible = visible;
    Transition::Updated
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
