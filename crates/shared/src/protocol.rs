use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountId, ClusterId, DeploymentId, DeploymentStatus, ReleaseId, Role, TeamId,
};

/// One page of a remote collection, as returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPage<T> {
    pub items: Vec<T>,
    pub limit: u32,
    pub offset: u64,
    pub count: u64,
    pub pages: u64,
    pub page: u64,
}

impl<T> Default for CollectionPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            limit: 0,
            offset: 0,
            count: 0,
            pages: 0,
            page: 0,
        }
    }
}

impl<T> CollectionPage<T> {
    /// Builds a page, deriving `pages` and `page` from `count`, `limit` and `offset`.
    pub fn from_parts(items: Vec<T>, limit: u32, offset: u64, count: u64) -> Self {
        Self {
            items,
            limit,
            offset,
            count,
            pages: page_count(count, limit),
            page: page_number(offset, limit),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// `ceil(count / limit)`, or 0 when `limit` is 0.
pub fn page_count(count: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    count.div_ceil(u64::from(limit))
}

/// `floor(offset / limit) + 1`, or 0 when `limit` is 0.
pub fn page_number(offset: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    offset / u64::from(limit) + 1
}

/// Stable identity of a listed record, used to key rendered rows.
pub trait RecordId {
    fn record_id(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team_id: TeamId,
    pub name: String,
    pub member_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: ClusterId,
    pub name: String,
    pub provider: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    pub node_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub deployment_id: DeploymentId,
    pub name: String,
    pub cluster_id: ClusterId,
    pub team_id: TeamId,
    pub status: DeploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_id: Option<ReleaseId>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    pub release_id: ReleaseId,
    pub deployment_id: DeploymentId,
    pub version: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RecordId for AccountSummary {
    fn record_id(&self) -> i64 {
        self.account_id.0
    }
}

impl RecordId for TeamSummary {
    fn record_id(&self) -> i64 {
        self.team_id.0
    }
}

impl RecordId for ClusterSummary {
    fn record_id(&self) -> i64 {
        self.cluster_id.0
    }
}

impl RecordId for DeploymentSummary {
    fn record_id(&self) -> i64 {
        self.deployment_id.0
    }
}

impl RecordId for ReleaseSummary {
    fn record_id(&self) -> i64 {
        self.release_id.0
    }
}
