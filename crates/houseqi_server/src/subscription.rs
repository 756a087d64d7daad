//! The subscriber side of snapshot fan-out.

use crate::actor::{Snapshot, SubscriberId};
use futures::Stream;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// A registered stream of snapshots.
///
/// Dropping a subscription unregisters it, so a relay that is cancelled
/// mid-stream still detaches from the actor. Unregistering more than once
/// is harmless.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    snapshots: mpsc::Receiver<Snapshot>,
    unregistrations: mpsc::UnboundedSender<SubscriberId>,
    registered: bool,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        snapshots: mpsc::Receiver<Snapshot>,
        unregistrations: mpsc::UnboundedSender<SubscriberId>,
    ) -> Self {
        Self {
            id,
            snapshots,
            unregistrations,
            registered: true,
        }
    }

    /// This subscriber's id.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the actor has stopped delivering to this
    /// subscriber, either because it was evicted or the actor shut down.
    #[instrument(level = "debug", skip(self), fields(subscriber = %self.id))]
    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.snapshots.recv().await
    }

    /// Takes a queued snapshot without waiting.
    pub fn try_recv(&mut self) -> Option<Snapshot> {
        self.snapshots.try_recv().ok()
    }

    /// Detaches from the actor. Queued snapshots stay readable.
    #[instrument(level = "debug", skip(self), fields(subscriber = %self.id))]
    pub fn unregister(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;
        debug!(subscriber = %self.id, "Unregistering");
        // Fails only when the actor is gone, which detaches everyone anyway.
        let _ = self.unregistrations.send(self.id);
    }

    /// Turns the subscription into a stream that unregisters when dropped.
    pub fn into_stream(self) -> impl Stream<Item = Snapshot> + Send + 'static {
        futures::stream::unfold(self, |mut subscription| async move {
            let snapshot = subscription.recv().await?;
            Some((snapshot, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unregister();
    }
}
