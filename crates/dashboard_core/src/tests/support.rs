//! Scripted transport for driving views deterministically in tests.

use async_trait::async_trait;
use shared::{domain::ResourceKind, protocol::CollectionPage};
use tokio::sync::{mpsc, oneshot};

use crate::{codec::Descriptor, error::FetchError, transport::CollectionTransport};

pub type Reply = oneshot::Sender<Result<CollectionPage<String>, FetchError>>;

pub struct PendingCall {
    pub resource: ResourceKind,
    pub descriptor: Descriptor,
    pub reply: Reply,
}

impl PendingCall {
    pub fn succeed(self, items: &[&str], count: u64) {
        let page = CollectionPage::from_parts(
            items.iter().map(|item| item.to_string()).collect(),
            20,
            0,
            count,
        );
        let _ = self.reply.send(Ok(page));
    }

    pub fn fail(self, error: FetchError) {
        let _ = self.reply.send(Err(error));
    }
}

/// Parks every fetch until the test answers it through [`PendingCall`].
pub struct ScriptedTransport {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl ScriptedTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Self { calls }, rx)
    }
}

#[async_trait]
impl CollectionTransport<String> for ScriptedTransport {
    async fn fetch_collection(
        &self,
        resource: ResourceKind,
        descriptor: &Descriptor,
    ) -> Result<CollectionPage<String>, FetchError> {
        let (reply, rx) = oneshot::channel();
        let call = PendingCall {
            resource,
            descriptor: descriptor.clone(),
            reply,
        };
        if self.calls.send(call).is_err() {
            return Err(FetchError::Network("test script closed".into()));
        }
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("reply dropped".into())))
    }
}
