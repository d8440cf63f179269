// SPDX-License-Identifier: GPL-3.0-only
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::catalog::store::CatalogStore;
use crate::collection::traits::CollectionService;

/// Keeps the local catalog mirror current.
///
/// One standing subscription feeds one store: each notification payload
/// replaces the snapshot wholesale. Notifications are applied in arrival
/// order with no deduplication or reordering; every payload is treated as
/// authoritative for its instant, so a late-arriving stale payload causes a
/// transient reversion rather than any error.
pub struct CatalogSynchronizer {
    store: Arc<CatalogStore>,
    collection: Arc<dyn CollectionService>,
}

/// Owner of the subscription task returned by [`CatalogSynchronizer::start`].
///
/// Call [`SyncHandle::stop`] exactly once, on daemon teardown. Dropping the
/// handle without stopping detaches the task, which then holds the
/// subscription for the remainder of the process lifetime.
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn stop(self) {
        self.task.abort();
        info!("Catalog synchronizer stopped");
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl CatalogSynchronizer {
    pub fn new(store: Arc<CatalogStore>, collection: Arc<dyn CollectionService>) -> Self {
        Self { store, collection }
    }

    /// Establish the subscription and start applying snapshot notifications
    /// to the store. The first notification (the initial load) clears the
    /// store's loading flag.
    pub async fn start(&self) -> anyhow::Result<SyncHandle> {
        let mut notifications = self.collection.subscribe().await?;
        let store = Arc::clone(&self.store);

        let task = tokio::spawn(async move {
            info!("Catalog synchronizer started");
            while let Some(snapshot) = notifications.recv().await {
                store.replace(snapshot).await;
            }
            info!("Snapshot subscription channel closed");
        });

        Ok(SyncHandle { task })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc::{self, Receiver, Sender};
    use tokio::sync::watch;

    use crate::catalog::models::Listing;
    use crate::collection::traits::{CollectionService, ConnectionState, ListingDraft};
    use crate::test_helpers::sample_listing;

    /// Hand-driven collection fake: tests push snapshots through `notify`
    struct FakeCollectionService {
        rx: Mutex<Option<Receiver<Vec<Listing>>>>,
        state_tx: watch::Sender<ConnectionState>,
    }

    impl FakeCollectionService {
        fn new() -> (Arc<Self>, Sender<Vec<Listing>>) {
            let (tx, rx) = mpsc::channel(16);
            let (state_tx, _) = watch::channel(ConnectionState::Live);
            let fake = Arc::new(Self {
                rx: Mutex::new(Some(rx)),
                state_tx,
            });
            (fake, tx)
        }
    }

    #[async_trait]
    impl CollectionService for FakeCollectionService {
        async fn subscribe(&self) -> anyhow::Result<Receiver<Vec<Listing>>> {
            self.rx
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| anyhow::anyhow!("Already subscribed"))
        }

        async fn insert(&self, _draft: &ListingDraft) -> anyhow::Result<String> {
            Ok(uuid::Uuid::new_v4().to_string())
        }

        fn connection_state(&self) -> watch::Receiver<ConnectionState> {
            self.state_tx.subscribe()
        }
    }

    async fn wait_until<F>(mut condition: F)
    where
        F: AsyncFnMut() -> bool,
    {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition().await {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("Condition not reached in time");
    }

    #[tokio::test]
    async fn test_notifications_replace_snapshot() {
        let store = Arc::new(CatalogStore::new());
        let (collection, notify) = FakeCollectionService::new();
        let synchronizer = CatalogSynchronizer::new(Arc::clone(&store), collection);

        let handle = synchronizer.start().await.unwrap();
        assert!(store.is_loading().await);

        notify
            .send(vec![sample_listing("a"), sample_listing("b")])
            .await
            .unwrap();
        wait_until(async || !store.is_loading().await).await;
        assert_eq!(store.snapshot().await.len(), 2);

        // Second notification is a total replacement, not a merge
        notify.send(vec![sample_listing("c")]).await.unwrap();
        wait_until(async || store.snapshot().await.len() == 1).await;
        assert_eq!(store.snapshot().await[0].id, "c");

        handle.stop();
    }

    #[tokio::test]
    async fn test_empty_initial_load_clears_loading() {
        let store = Arc::new(CatalogStore::new());
        let (collection, notify) = FakeCollectionService::new();
        let synchronizer = CatalogSynchronizer::new(Arc::clone(&store), collection);

        let handle = synchronizer.start().await.unwrap();
        notify.send(Vec::new()).await.unwrap();

        wait_until(async || !store.is_loading().await).await;
        assert!(store.snapshot().await.is_empty());

        handle.stop();
    }

    #[tokio::test]
    async fn test_task_exits_when_subscription_closes() {
        let store = Arc::new(CatalogStore::new());
        let (collection, notify) = FakeCollectionService::new();
        let synchronizer = CatalogSynchronizer::new(Arc::clone(&store), collection);

        let handle = synchronizer.start().await.unwrap();
        drop(notify);

        wait_until(async || handle.is_finished()).await;
    }

    #[tokio::test]
    async fn test_stop_terminates_task() {
        let store = Arc::new(CatalogStore::new());
        let (collection, notify) = FakeCollectionService::new();
        let synchronizer = CatalogSynchronizer::new(Arc::clone(&store), collection);

        let handle = synchronizer.start().await.unwrap();
        handle.stop();

        // The channel stays open, but nothing applies snapshots any more
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = notify.send(vec![sample_listing("a")]).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.snapshot().await.is_empty());
    }
}
