// SPDX-License-Identifier: GPL-3.0-only
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::catalog::models::Listing;

struct CatalogState {
    listings: Vec<Listing>,
    loading: bool,
}

/// In-memory mirror of the remote listing collection.
///
/// Exactly one writer exists (the synchronizer task); read paths take cheap
/// snapshot copies and recompute derived views from scratch, so no further
/// coordination is needed. Nothing here is persisted: the remote store owns
/// all durable state.
pub struct CatalogStore {
    state: RwLock<CatalogState>,
    // Bumped on every replacement so push consumers can follow along
    generation: watch::Sender<u64>,
}

impl CatalogStore {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            state: RwLock::new(CatalogState {
                listings: Vec::new(),
                loading: true,
            }),
            generation,
        }
    }

    /// Replace the entire snapshot atomically. Deltas are never merged;
    /// every notification payload is authoritative for that instant.
    ///
    /// The loading flag clears on the first replacement and stays cleared:
    /// later reconnects must not flip an already-populated view back into a
    /// loading state.
    pub async fn replace(&self, listings: Vec<Listing>) {
        {
            let mut state = self.state.write().await;
            debug!(count = listings.len(), "Replacing catalog snapshot");
            state.listings = listings;
            state.loading = false;
        }
        self.generation.send_modify(|generation| *generation += 1);
    }

    /// Copy of the current ordered snapshot
    pub async fn snapshot(&self) -> Vec<Listing> {
        self.state.read().await.listings.clone()
    }

    /// Look up one listing by its remote-assigned id
    pub async fn get(&self, id: &str) -> Option<Listing> {
        self.state
            .read()
            .await
            .listings
            .iter()
            .find(|listing| listing.id == id)
            .cloned()
    }

    /// True until the first snapshot notification has been applied
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Subscribe to replacement notifications. The value is a generation
    /// counter; receivers re-read the snapshot when it changes.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
