use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::domain::{SessionId, SessionSnapshot};
use crate::realtime::hub::SessionHub;

/// Live feed of committed snapshots for one session.
///
/// The first item is the snapshot current at subscription time; every later
/// item is a newer commit, in version order. The stream ends once the
/// subscription is cancelled or dropped.
pub struct Subscription {
    stream: UnboundedReceiverStream<Arc<SessionSnapshot>>,
    handle: SubscriptionHandle,
}

impl Subscription {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Arc<SessionSnapshot>>,
        handle: SubscriptionHandle,
    ) -> Self {
        Self {
            stream: UnboundedReceiverStream::new(rx),
            handle,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.handle.session_id
    }

    /// Unregisters from the hub. Snapshots already queued are still yielded.
    pub fn cancel(&mut self) {
        self.handle.cancel();
        self.stream.close();
    }

    /// Splits off the handle so the stream can move into a task while the
    /// caller keeps the means to cancel it.
    pub fn into_parts(
        self,
    ) -> (
        UnboundedReceiverStream<Arc<SessionSnapshot>>,
        SubscriptionHandle,
    ) {
        (self.stream, self.handle)
    }
}

impl Stream for Subscription {
    type Item = Arc<SessionSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.stream).poll_next(cx)
    }
}

/// Removes the subscriber from the hub on `cancel` or drop.
pub struct SubscriptionHandle {
    hub: Arc<SessionHub>,
    session_id: SessionId,
    token: Option<Uuid>,
}

impl SubscriptionHandle {
    pub(crate) fn new(hub: Arc<SessionHub>, session_id: SessionId, token: Uuid) -> Self {
        Self {
            hub,
            session_id,
            token: Some(token),
        }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            self.hub.unregister(&self.session_id, token);
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
