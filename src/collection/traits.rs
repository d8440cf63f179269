// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Receiver;
use tokio::sync::watch;

use crate::catalog::models::Listing;

/// Draft document for a new listing. The remote store assigns `id` and
/// `createdAt` on insert; everything else is written verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub name: String,
    pub developer: String,
    pub description: String,
    pub category: String,
    pub icon_url: String,
    pub apk_url: String,
    pub size: String,
    pub rating: f64,
    pub downloads: String,
    #[serde(rename = "isFeatured")]
    pub featured: bool,
}

/// Phase of the standing snapshot subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Live,
}

#[async_trait]
pub trait CollectionService: Send + Sync {
    /// Open the standing subscription to the listing collection, ordered by
    /// creation time descending.
    ///
    /// Every received value is a full ordered snapshot of the collection,
    /// never a delta; the initial load arrives as the first value. The
    /// subscription ends when the receiver is dropped.
    async fn subscribe(&self) -> anyhow::Result<Receiver<Vec<Listing>>>;

    /// Insert one new document. Returns the remote-assigned identity.
    ///
    /// Fire-and-forget from the catalog's point of view: a successful write
    /// shows up in a later snapshot notification by the remote store's own
    /// consistency guarantee, which this client does not verify.
    async fn insert(&self, draft: &ListingDraft) -> anyhow::Result<String>;

    /// Observe subscription state transitions
    fn connection_state(&self) -> watch::Receiver<ConnectionState>;
}
