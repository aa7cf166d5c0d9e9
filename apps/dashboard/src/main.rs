use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dashboard_core::{
    reduce, spawn_poller, CollectionAction, CollectionState, CollectionTransport, CollectionView,
    FilterKeys, HttpCollectionTransport, HttpTransportOptions, QueryModel, SortDirection,
    Transition, ViewLocator,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::ResourceKind,
    protocol::{AccountSummary, ClusterSummary, DeploymentSummary, ReleaseSummary, TeamSummary},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings};
use render::{render_state, TableRow};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "List platform resources from the operations API")]
struct Cli {
    /// Path to a TOML config file (defaults to ./dashboard.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and render one page of a collection.
    List(ViewArgs),
    /// Print the bookmarkable locator for a view without fetching it.
    Locator(ViewArgs),
}

#[derive(Args, Debug)]
struct ViewArgs {
    resource: ResourceKind,
    /// Restore a view from a locator such as `deployments?team=payments`.
    #[arg(long)]
    from: Option<String>,
    /// `key=value`; repeat for several values.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, requires = "sort")]
    desc: bool,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    /// One-based page number.
    #[arg(long)]
    page: Option<u64>,
    #[arg(long)]
    show_filters: bool,
    /// Keep refreshing (deployments only) until interrupted.
    #[arg(long)]
    watch: bool,
    /// Print items as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

impl ViewArgs {
    /// Flags expressed as the actions a user would have dispatched, in order.
    fn actions<R>(&self, settings: &Settings) -> Vec<CollectionAction<R>> {
        let mut actions = Vec::new();
        let mut restored_sort = None;
        if let Some(raw) = &self.from {
            let query = ViewLocator::restore(raw)
                .filter(|locator| {
                    let matches = locator.resource == self.resource;
                    if !matches {
                        warn!(
                            locator = %raw,
                            resource = %self.resource,
                            "locator is for another resource"
                        );
                    }
                    matches
                })
                .map(|locator| locator.query)
                .unwrap_or_else(|| QueryModel::with_limit(settings.page_size));
            restored_sort = query.sort.clone();
            actions.push(CollectionAction::Restore(query));
        } else {
            actions.push(CollectionAction::SetLimit(settings.page_size));
        }
        if let Some(limit) = self.limit {
            actions.push(CollectionAction::SetLimit(limit));
        }
        for (key, value) in &self.filters {
            actions.push(CollectionAction::add_filter(key.clone(), value.clone()));
        }
        if let Some(field) = &self.sort {
            // `--sort`/`--desc` name the final order; a toggle flips a matching sort
            // and starts any other field ascending.
            let wanted = if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let after_toggle = match &restored_sort {
                Some(sort) if &sort.field == field => sort.direction.flipped(),
                _ => SortDirection::Asc,
            };
            actions.push(CollectionAction::toggle_sort(field.clone()));
            if after_toggle != wanted {
                actions.push(CollectionAction::toggle_sort(field.clone()));
            }
        }
        if let Some(term) = &self.search {
            actions.push(CollectionAction::search(term.clone()));
        }
        if let Some(page) = self.page {
            actions.push(CollectionAction::GoToPage(page));
        }
        if self.show_filters {
            actions.push(CollectionAction::ShowFilters);
        }
        actions
    }

    /// Applies the flag actions to a detached state and returns the resulting query.
    fn initial_query<R>(&self, settings: &Settings) -> QueryModel {
        let mut draft: CollectionState<R> =
            CollectionState::new(QueryModel::default(), FilterKeys::for_resource(self.resource));
        for action in self.actions(settings) {
            reduce(&mut draft, action);
        }
        draft.query().clone()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(token) = cli.token {
        settings.api_token = Some(token);
    }

    match cli.command {
        Command::Locator(args) => {
            let query = args.initial_query::<()>(&settings);
            println!("{}", ViewLocator::new(args.resource, query));
            Ok(())
        }
        Command::List(args) => {
            let transport = Arc::new(
                HttpCollectionTransport::new(HttpTransportOptions {
                    base_url: settings.api_url.clone(),
                    bearer_token: settings.api_token.clone(),
                    request_timeout: settings.request_timeout(),
                })
                .context("failed to set up api transport")?,
            );
            match args.resource {
                ResourceKind::Accounts => run_list::<AccountSummary>(&args, &settings, transport).await,
                ResourceKind::Teams => run_list::<TeamSummary>(&args, &settings, transport).await,
                ResourceKind::Clusters => run_list::<ClusterSummary>(&args, &settings, transport).await,
                ResourceKind::Deployments => {
                    run_list::<DeploymentSummary>(&args, &settings, transport).await
                }
                ResourceKind::Releases => run_list::<ReleaseSummary>(&args, &settings, transport).await,
            }
        }
    }
}

async fn run_list<R>(
    args: &ViewArgs,
    settings: &Settings,
    transport: Arc<HttpCollectionTransport>,
) -> Result<()>
where
    R: TableRow + Serialize + DeserializeOwned + Send + 'static,
{
    let transport: Arc<dyn CollectionTransport<R>> = transport;
    let query = args.initial_query::<R>(settings);
    let mut view = CollectionView::with_query(args.resource, transport, query);
    view.load();
    view.settle().await;
    print_view(&view, args.json)?;

    if args.watch {
        if !args.resource.polls_while_mounted() {
            warn!(resource = %args.resource, "this collection does not refresh while mounted");
        } else {
            info!(resource = %args.resource, every = ?settings.poll_interval(), "watching; ctrl-c to stop");
            let poller = spawn_poller(view.handle(), settings.poll_interval());
            loop {
                tokio::select! {
                    transition = view.step() => {
                        if transition == Transition::Updated {
                            print_view(&view, args.json)?;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            poller.abort();
        }
    }

    if let Some(error) = view.state().error() {
        if error.requires_reauth() {
            bail!("{error} (check the api token)");
        }
        bail!("{error}");
    }
    Ok(())
}

fn print_view<R: TableRow + Serialize>(view: &CollectionView<R>, json: bool) -> Result<()> {
    let state = view.state();
    if json {
        println!("{}", serde_json::to_string_pretty(state.data())?);
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    render_state(state, &mut stdout)?;
    writeln!(
        stdout,
        "view: {}",
        ViewLocator::new(view.resource(), state.query().clone())
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
