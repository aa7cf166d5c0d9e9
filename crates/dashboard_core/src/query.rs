//! Client-held description of the requested slice of a collection.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use shared::domain::ResourceKind;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Descriptor keys owned by pagination, sort and search. Filters may not use them.
pub const RESERVED_KEYS: [&str; 5] = ["limit", "offset", "sort", "direction", "search"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterPair {
    pub key: String,
    pub value: String,
}

impl FilterPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Which filter keys a collection accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterKeys {
    /// Every non-reserved, non-empty key.
    #[default]
    Any,
    Only(BTreeSet<String>),
}

impl FilterKeys {
    pub fn only<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterKeys::Only(keys.into_iter().map(Into::into).collect())
    }

    pub fn for_resource(resource: ResourceKind) -> Self {
        Self::only(resource.filter_keys().iter().copied())
    }

    pub fn accepts(&self, key: &str) -> bool {
        if key.is_empty() || RESERVED_KEYS.contains(&key) {
            return false;
        }
        match self {
            FilterKeys::Any => true,
            FilterKeys::Only(keys) => keys.contains(key),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryModel {
    pub pagination: Pagination,
    pub sort: Option<Sort>,
    pub filters: Vec<FilterPair>,
    pub search: String,
    /// UI-only; never encoded.
    #[serde(default)]
    pub filters_visible: bool,
}

impl QueryModel {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            pagination: Pagination { limit, offset: 0 },
            ..Self::default()
        }
    }

    pub fn has_filter(&self, key: &str, value: &str) -> bool {
        self.filters
            .iter()
            .any(|pair| pair.key == key && pair.value == value)
    }

    /// Values of every filter pair with `key`, in insertion order.
    pub fn filter_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.filters
            .iter()
            .filter(move |pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// Appends the pair unless it is already present. Returns whether it was inserted.
    pub fn insert_filter(&mut self, key: &str, value: &str) -> bool {
        if self.has_filter(key, value) {
            return false;
        }
        self.filters.push(FilterPair::new(key, value));
        true
    }

    /// Removes the pair if present. Returns whether anything was removed.
    pub fn remove_filter(&mut self, key: &str, value: &str) -> bool {
        let before = self.filters.len();
        self.filters
            .retain(|pair| !(pair.key == key && pair.value == value));
        self.filters.len() != before
    }

    /// Same view with everything the codec drops cleared.
    pub fn without_ui_state(&self) -> Self {
        Self {
            filters_visible: false,
            ..self.clone()
        }
    }

    pub fn first_page(mut self) -> Self {
        self.pagination.offset = 0;
        self
    }
}
