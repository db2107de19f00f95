use tokio::sync::broadcast;

use super::Collection;

const FEED_CAPACITY: usize = 64;

/// Fan-out of "collection changed" notifications to live subscribers.
///
/// Notifications carry no payload: a subscriber re-reads the full snapshot.
#[derive(Clone)]
pub struct LiveFeed {
    tx: broadcast::Sender<Collection>,
}

impl LiveFeed {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, collection: Collection) {
        // No receivers is fine: nobody has the dashboard open.
        let receivers = self.tx.send(collection).unwrap_or(0);
        tracing::debug!("Published change to {} ({} subscribers)", collection, receivers);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Collection> {
        self.tx.subscribe()
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait until one of the `watched` collections changes. Returns false once
/// the feed is closed.
///
/// A lagged receiver has missed notifications and counts as changed.
pub async fn changed(rx: &mut broadcast::Receiver<Collection>, watched: &[Collection]) -> bool {
    loop {
        match rx.recv().await {
            Ok(c) if watched.contains(&c) => return true,
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!("Live subscriber lagged by {} notifications", skipped);
                return true;
            }
            Err(broadcast::error::RecvError::Closed) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_sees_matching_collection() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe();
        feed.publish(Collection::Menu);
        feed.publish(Collection::Orders);
        assert!(changed(&mut rx, &[Collection::Orders]).await);
    }

    #[tokio::test]
    async fn any_watched_collection_wakes_the_subscriber() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe();
        feed.publish(Collection::Gallery);
        feed.publish(Collection::Inquiries);
        assert!(changed(&mut rx, &[Collection::Orders, Collection::Inquiries]).await);
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let feed = LiveFeed::new();
        feed.publish(Collection::Gallery);
    }

    #[tokio::test]
    async fn lagged_subscriber_counts_as_changed() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe();
        for _ in 0..(FEED_CAPACITY + 10) {
            feed.publish(Collection::Menu);
        }
        assert!(changed(&mut rx, &[Collection::Inquiries]).await);
    }

    #[tokio::test]
    async fn closed_feed_ends_wait() {
        let feed = LiveFeed::new();
        let mut rx = feed.subscribe();
        drop(feed);
        assert!(!changed(&mut rx, &[Collection::Menu]).await);
    }
}
