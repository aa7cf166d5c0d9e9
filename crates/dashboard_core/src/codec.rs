//! Translation between [`QueryModel`] and the transport-level descriptor.

use url::form_urlencoded;

use crate::{
    error::QueryError,
    query::{FilterKeys, Pagination, QueryModel, Sort, SortDirection},
};

/// Ordered string pairs sent to the remote API. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    pairs: Vec<(String, String)>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.get_all(key).next()
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `application/x-www-form-urlencoded` form, pairs in order.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Accepts an optional leading `?`.
    pub fn parse_query_string(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Descriptor
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub fn encode(query: &QueryModel) -> Descriptor {
    let mut descriptor = Descriptor::new();
    descriptor.push("limit", query.pagination.limit.to_string());
    descriptor.push("offset", query.pagination.offset.to_string());
    if let Some(sort) = &query.sort {
        descriptor.push("sort", sort.field.clone());
        descriptor.push("direction", sort.direction.as_str());
    }
    for pair in &query.filters {
        descriptor.push(pair.key.clone(), pair.value.clone());
    }
    if !query.search.is_empty() {
        descriptor.push("search", query.search.clone());
    }
    descriptor
}

/// Inverse of [`encode`]. Keys `filter_keys` rejects are ignored.
pub fn decode(
    descriptor: &Descriptor,
    filter_keys: &FilterKeys,
) -> Result<QueryModel, QueryError> {
    let defaults = Pagination::default();
    let limit = single(descriptor, "limit")?
        .map(|raw| parse_number::<u32>("limit", raw))
        .transpose()?
        .unwrap_or(defaults.limit);
    let offset = single(descriptor, "offset")?
        .map(|raw| parse_number::<u64>("offset", raw))
        .transpose()?
        .unwrap_or(defaults.offset);

    let direction = single(descriptor, "direction")?
        .map(|raw| {
            SortDirection::parse(raw).ok_or_else(|| QueryError::InvalidDirection(raw.to_string()))
        })
        .transpose()?;
    let sort = single(descriptor, "sort")?
        .filter(|field| !field.is_empty())
        .map(|field| Sort {
            field: field.to_string(),
            direction: direction.unwrap_or(SortDirection::Asc),
        });

    let search = single(descriptor, "search")?.unwrap_or_default().to_string();

    let mut query = QueryModel {
        pagination: Pagination { limit, offset },
        sort,
        filters: Vec::new(),
        search,
        filters_visible: false,
    };
    for (key, value) in descriptor.pairs() {
        if filter_keys.accepts(key) {
            query.insert_filter(key, value);
        }
    }
    Ok(query)
}

fn single<'a>(
    descriptor: &'a Descriptor,
    key: &'static str,
) -> Result<Option<&'a str>, QueryError> {
    let mut values = descriptor.get_all(key);
    let first = values.next();
    if values.next().is_some() {
        return Err(QueryError::DuplicateKey(key));
    }
    Ok(first)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, QueryError> {
    // `u32::from_str` accepts a leading '+'; the wire form never carries one.
    if raw.starts_with('+') {
        return Err(QueryError::InvalidNumber {
            key,
            value: raw.to_string(),
        });
    }
    raw.parse::<T>().map_err(|_| QueryError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
