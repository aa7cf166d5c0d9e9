//! Bridges reducer `Request` transitions to the transport and feeds outcomes back.

use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;

use shared::domain::ResourceKind;
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    action::CollectionAction,
    codec,
    error::{ErrorInfo, ErrorKind},
    query::{FilterKeys, QueryModel},
    reducer::{reduce, CollectionState, FetchTicket, Transition},
    transport::CollectionTransport,
};

/// Issues one remote call per ticket and reports exactly one terminal action for it.
pub struct FetchCoordinator<R> {
    resource: ResourceKind,
    transport: Arc<dyn CollectionTransport<R>>,
    outcomes: mpsc::UnboundedSender<CollectionAction<R>>,
}

impl<R: Send + 'static> FetchCoordinator<R> {
    pub fn new(
        resource: ResourceKind,
        transport: Arc<dyn CollectionTransport<R>>,
        outcomes: mpsc::UnboundedSender<CollectionAction<R>>,
    ) -> Self {
        Self {
            resource,
            transport,
            outcomes,
        }
    }

    pub fn issue(&self, ticket: FetchTicket) -> JoinHandle<()> {
        let descriptor = codec::encode(&ticket.query);
        let transport = Arc::clone(&self.transport);
        let outcomes = self.outcomes.clone();
        let resource = self.resource;
        let seq = ticket.seq;
        debug!(%resource, seq, query = %descriptor.to_query_string(), "issuing fetch");

        tokio::spawn(async move {
            let fetch = AssertUnwindSafe(transport.fetch_collection(resource, &descriptor))
                .catch_unwind()
                .await;
            let action = match fetch {
                Ok(Ok(payload)) => CollectionAction::Success { seq, payload },
                Ok(Err(err)) => {
                    warn!(%resource, seq, error = %err, "fetch failed");
                    CollectionAction::Error {
                        seq,
                        error: err.into(),
                    }
                }
                // A panicking transport still has to settle the request.
                Err(_) => {
                    warn!(%resource, seq, "fetch panicked");
                    CollectionAction::Error {
                        seq,
                        error: ErrorInfo::new(ErrorKind::Network, "fetch task panicked"),
                    }
                }
            };
            if outcomes.send(action).is_err() {
                debug!(%resource, seq, "view closed before fetch settled");
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Requested { seq: u64 },
    Applied { seq: u64, count: u64 },
    Failed { seq: u64, error: ErrorInfo },
    Discarded { seq: u64 },
    /// UI-only state changed (filter panel visibility).
    Updated,
}

#[derive(Debug, Error)]
#[error("collection view is closed")]
pub struct ViewClosed;

/// Cloneable sender into a view's inbox, for tasks that do not own the view.
pub struct ViewHandle<R> {
    tx: mpsc::UnboundedSender<CollectionAction<R>>,
}

impl<R> Clone for ViewHandle<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<R> ViewHandle<R> {
    pub fn dispatch(&self, action: CollectionAction<R>) -> Result<(), ViewClosed> {
        self.tx.send(action).map_err(|_| ViewClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// One mounted collection: its state, its coordinator, and its inbox.
///
/// Actions are applied one at a time in arrival order, whether they come from
/// [`CollectionView::dispatch`], a [`ViewHandle`], or a settled fetch.
pub struct CollectionView<R> {
    resource: ResourceKind,
    state: CollectionState<R>,
    coordinator: FetchCoordinator<R>,
    inbox: mpsc::UnboundedReceiver<CollectionAction<R>>,
    handle: ViewHandle<R>,
    events: broadcast::Sender<ViewEvent>,
}

impl<R> CollectionView<R> {
    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    pub fn state(&self) -> &CollectionState<R> {
        &self.state
    }

    pub fn handle(&self) -> ViewHandle<R> {
        self.handle.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }
}

impl<R: Send + 'static> CollectionView<R> {
    pub fn new(resource: ResourceKind, transport: Arc<dyn CollectionTransport<R>>) -> Self {
        Self::with_query(resource, transport, QueryModel::default())
    }

    pub fn with_query(
        resource: ResourceKind,
        transport: Arc<dyn CollectionTransport<R>>,
        query: QueryModel,
    ) -> Self {
        Self::with_filter_keys(resource, transport, query, FilterKeys::for_resource(resource))
    }

    pub fn with_filter_keys(
        resource: ResourceKind,
        transport: Arc<dyn CollectionTransport<R>>,
        query: QueryModel,
        filter_keys: FilterKeys,
    ) -> Self {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(256);
        Self {
            resource,
            state: CollectionState::new(query, filter_keys),
            coordinator: FetchCoordinator::new(resource, transport, tx.clone()),
            inbox,
            handle: ViewHandle { tx },
            events,
        }
    }

    /// Issues a fetch for the current query, e.g. when the view is first mounted.
    pub fn load(&mut self) -> Transition {
        self.dispatch(CollectionAction::Refresh)
    }

    pub fn dispatch(&mut self, action: CollectionAction<R>) -> Transition {
        let name = action.name();
        let outcome_seq = match &action {
            CollectionAction::Success { seq, .. } | CollectionAction::Error { seq, .. } => {
                Some(*seq)
            }
            _ => None,
        };

        let transition = reduce(&mut self.state, action);
        match &transition {
            Transition::Issue(ticket) => {
                self.emit(ViewEvent::Requested { seq: ticket.seq });
                // Effects are observed through the inbox; the handle is not kept.
                drop(self.coordinator.issue(ticket.clone()));
            }
            Transition::Updated => match (outcome_seq, self.state.error()) {
                (Some(seq), Some(error)) => {
                    let error = error.clone();
                    self.emit(ViewEvent::Failed { seq, error });
                }
                (Some(seq), None) => {
                    let count = self.state.data().count;
                    info!(resource = %self.resource, seq, count, "applied collection page");
                    self.emit(ViewEvent::Applied { seq, count });
                }
                (None, _) => self.emit(ViewEvent::Updated),
            },
            Transition::Discarded { seq } => {
                debug!(
                    resource = %self.resource,
                    seq,
                    current = self.state.request_seq(),
                    "discarded stale fetch outcome"
                );
                self.emit(ViewEvent::Discarded { seq: *seq });
            }
            Transition::Unchanged => {
                debug!(resource = %self.resource, action = name, "action left view unchanged");
            }
        }
        transition
    }

    /// Waits for the next queued action and applies it.
    pub async fn step(&mut self) -> Transition {
        match self.inbox.recv().await {
            Some(action) => self.dispatch(action),
            None => Transition::Unchanged,
        }
    }

    /// Applies queued actions until the latest request has settled.
    pub async fn settle(&mut self) -> &CollectionState<R> {
        while self.state.is_loading() {
            self.step().await;
        }
        &self.state
    }

    /// Applies everything already queued without waiting. Returns how many actions ran.
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.inbox.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    fn emit(&self, event: ViewEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
