//! Plain-text rendering of a collection view.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use dashboard_core::CollectionState;
use shared::protocol::{
    AccountSummary, ClusterSummary, DeploymentSummary, RecordId, ReleaseSummary, TeamSummary,
};

pub trait TableRow: RecordId {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn optional_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
}

impl TableRow for AccountSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "EMAIL", "ROLE", "TEAM", "CREATED"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.record_id().to_string(),
            self.name.clone(),
            self.email.clone(),
            format!("{:?}", self.role).to_ascii_lowercase(),
            optional_id(self.team_id.map(|id| id.0)),
            timestamp(&self.created_at),
        ]
    }
}

impl TableRow for TeamSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "MEMBERS", "CREATED"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.record_id().to_string(),
            self.name.clone(),
            self.member_count.to_string(),
            timestamp(&self.created_at),
        ]
    }
}

impl TableRow for ClusterSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "PROVIDER", "REGION", "TEAM", "NODES"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.record_id().to_string(),
            self.name.clone(),
            self.provider.clone(),
            self.region.clone(),
            optional_id(self.team_id.map(|id| id.0)),
            self.node_count.to_string(),
        ]
    }
}

impl TableRow for DeploymentSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "STATUS", "CLUSTER", "TEAM", "RELEASE", "UPDATED"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.record_id().to_string(),
            self.name.clone(),
            format!("{:?}", self.status).to_ascii_lowercase(),
            self.cluster_id.0.to_string(),
            self.team_id.0.to_string(),
            optional_id(self.release_id.map(|id| id.0)),
            timestamp(&self.updated_at),
        ]
    }
}

impl TableRow for ReleaseSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "VERSION", "CHANNEL", "DEPLOYMENT", "CREATED"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.record_id().to_string(),
            self.version.clone(),
            self.channel.clone(),
            self.deployment_id.0.to_string(),
            timestamp(&self.created_at),
        ]
    }
}

/// Writes the filter panel (if open), the rows, the pager line, and any error banner.
pub fn render_state<R: TableRow>(state: &CollectionState<R>, out: &mut impl Write) -> io::Result<()> {
    let query = state.query();
    if query.filters_visible {
        if query.filters.is_empty() {
            writeln!(out, "filters: none")?;
        } else {
            let active: Vec<String> = query
                .filters
                .iter()
                .map(|pair| format!("{}={}", pair.key, pair.value))
                .collect();
            writeln!(out, "filters: {}", active.join(", "))?;
        }
        if !query.search.is_empty() {
            writeln!(out, "search: {}", query.search)?;
        }
    }

    let headers = R::headers();
    let rows: Vec<Vec<String>> = state.items().iter().map(|row| row.cells()).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, headers.iter().map(|h| h.to_string()), &widths)?;
    for row in rows {
        write_row(out, row.into_iter(), &widths)?;
    }

    let data = state.data();
    if data.items.is_empty() && !state.is_loading() {
        writeln!(out, "(no results)")?;
    }
    let mut pager = format!("page {}/{} ({} total)", data.page, data.pages, data.count);
    if data.has_previous() {
        pager.push_str(&format!(", prev: --page {}", data.page - 1));
    }
    if data.has_next() {
        pager.push_str(&format!(", next: --page {}", data.page + 1));
    }
    writeln!(out, "{pager}")?;

    if state.is_loading() {
        writeln!(out, "loading...")?;
    }
    if let Some(error) = state.error() {
        writeln!(out, "error: {error}")?;
    }
    Ok(())
}

fn write_row(
    out: &mut impl Write,
    cells: impl Iterator<Item = String>,
    widths: &[usize],
) -> io::Result<()> {
    let line: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
