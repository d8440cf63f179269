// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::catalog::models::Category;
use crate::collection::traits::{CollectionService, ListingDraft};
use crate::utils::validate_asset_url;

/// Download counter every listing starts with
const INITIAL_DOWNLOADS: &str = "0+";

/// Publish form payload, as submitted by the display layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub name: String,
    pub developer: String,
    pub description: String,
    pub category: String,
    pub icon_url: String,
    pub apk_url: String,
    pub size: String,
}

/// Publish workflow: validate a draft, fill the store-side defaults, and
/// issue a single fire-and-forget insert against the remote collection.
///
/// There is no optimistic local insertion and no retry: a successful write
/// reaches the catalog through the next snapshot notification, and a failed
/// write surfaces as an error while the submitted form data stays with the
/// caller for a manual retry.
pub struct PublishService {
    collection: Arc<dyn CollectionService>,
}

impl PublishService {
    pub fn new(collection: Arc<dyn CollectionService>) -> Self {
        Self { collection }
    }

    /// Publish one listing. Returns the remote-assigned document id.
    pub async fn publish(&self, request: PublishRequest) -> anyhow::Result<String> {
        validate(&request)?;

        let draft = ListingDraft {
            name: request.name,
            developer: request.developer,
            description: request.description,
            category: request.category,
            icon_url: request.icon_url,
            apk_url: request.apk_url,
            size: request.size,
            rating: initial_rating(),
            downloads: INITIAL_DOWNLOADS.to_string(),
            featured: false,
        };

        let id = self.collection.insert(&draft).await?;
        info!(id = %id, name = %draft.name, "Listing published");

        Ok(id)
    }
}

fn validate(request: &PublishRequest) -> anyhow::Result<()> {
    for (field, value) in [
        ("name", &request.name),
        ("developer", &request.developer),
        ("description", &request.description),
        ("size", &request.size),
    ] {
        if value.trim().is_empty() {
            anyhow::bail!("Missing required field: {}", field);
        }
    }

    // Publishing only accepts the closed category set, even though reads
    // pass unrecognized remote values through
    request
        .category
        .parse::<Category>()
        .context("Unsupported category")?;

    validate_asset_url(&request.icon_url).context("Invalid icon URL")?;
    validate_asset_url(&request.apk_url).context("Invalid APK URL")?;

    Ok(())
}

/// Initial rating: uniformly random in [3.0, 5.0], one decimal place
fn initial_rating() -> f64 {
    let raw: f64 = rand::thread_rng().gen_range(3.0..=5.0);
    (raw * 10.0).round() / 10.0
}
