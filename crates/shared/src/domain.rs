use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(AccountId);
id_newtype!(TeamId);
id_newtype!(ClusterId);
id_newtype!(DeploymentId);
id_newtype!(ReleaseId);

/// The resource collections the dashboard can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Accounts,
    Teams,
    Clusters,
    Deployments,
    Releases,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Accounts,
        ResourceKind::Teams,
        ResourceKind::Clusters,
        ResourceKind::Deployments,
        ResourceKind::Releases,
    ];

    /// Path segment of the collection endpoint, relative to `/api/`.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Accounts => "accounts",
            ResourceKind::Teams => "teams",
            ResourceKind::Clusters => "clusters",
            ResourceKind::Deployments => "deployments",
            ResourceKind::Releases => "releases",
        }
    }

    /// Keys the remote API accepts as list filters for this collection.
    pub fn filter_keys(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Accounts => &["team", "role", "email"],
            ResourceKind::Teams => &["member", "name"],
            ResourceKind::Clusters => &["provider", "region", "team"],
            ResourceKind::Deployments => &["team", "cluster", "status", "release"],
            ResourceKind::Releases => &["deployment", "team", "channel"],
        }
    }

    /// Deployments are the only collection that refreshes while mounted.
    pub fn polls_while_mounted(self) -> bool {
        matches!(self, ResourceKind::Deployments)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource kind '{0}'")]
pub struct UnknownResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.path() == lower || kind.path().trim_end_matches('s') == lower)
            .ok_or_else(|| UnknownResourceKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Pending,
    Rolling,
    Healthy,
    Degraded,
    Failed,
}
