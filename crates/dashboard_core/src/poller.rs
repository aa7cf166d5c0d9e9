//! Periodic refresh for views that stay live while mounted.

use std::time::Duration;

use futures::StreamExt;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_stream::wrappers::IntervalStream;
use tracing::debug;

use crate::{action::CollectionAction, coordinator::ViewHandle};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Dispatches `Poll` into the view every `every`, starting one period from now.
///
/// Polls go through the same request sequencing as user actions. The task
/// ends once the view is dropped.
pub fn spawn_poller<R: Send + 'static>(handle: ViewHandle<R>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + every, every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = IntervalStream::new(interval);

        while ticks.next().await.is_some() {
            if handle.dispatch(CollectionAction::Poll).is_err() {
                debug!("view closed; stopping poller");
                break;
            }
        }
    })
}

#[cfg(test)]
#[path = "tests/poller_tests.rs"]
mod tests;
