//! Bookmarkable form of a collection view: `deployments?limit=20&offset=0&team=payments`.

use std::{fmt, str::FromStr};

use shared::domain::ResourceKind;
use tracing::warn;

use crate::{
    codec::{self, Descriptor},
    error::QueryError,
    query::{FilterKeys, QueryModel},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLocator {
    pub resource: ResourceKind,
    pub query: QueryModel,
}

impl ViewLocator {
    pub fn new(resource: ResourceKind, query: QueryModel) -> Self {
        Self { resource, query }
    }

    pub fn restore(raw: &str) -> Option<Self> {
        match raw.parse::<ViewLocator>() {
            Ok(locator) => Some(locator),
            Err(err) => {
                warn!(locator = raw, error = %err, "ignoring malformed view locator");
                None
            }
        }
    }
}

impl fmt::Display for ViewLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}?{}",
            self.resource.path(),
            codec::encode(&self.query).to_query_string()
        )
    }
}

impl FromStr for ViewLocator {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim().trim_start_matches('/');
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let resource = path
            .parse::<ResourceKind>()
            .map_err(|err| QueryError::MalformedLocator(err.to_string()))?;
        let descriptor = Descriptor::parse_query_string(query);
        let query = codec::decode(&descriptor, &FilterKeys::for_resource(resource))?;
        Ok(Self { resource, query })
    }
}

#[cfg(test)]
#[path = "tests/locator_tests.rs"]
mod tests;
