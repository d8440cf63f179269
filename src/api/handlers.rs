// SPDX-License-Identifier: GPL-3.0-only
use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::models::{Category, CategoryFilter, Listing};
use crate::catalog::store::CatalogStore;
use crate::catalog::views::{featured_listings, filter_listings};
use crate::collection::traits::{CollectionService, ConnectionState};
use crate::generation::enrich::{enhance_description, insight_summary};
use crate::generation::traits::GenerationService;
use crate::publish::service::{PublishRequest, PublishService};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingsResponse {
    pub loading: bool,
    pub listings: Vec<Listing>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnhanceRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnhanceResponse {
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub connection: ConnectionState,
    pub loading: bool,
    pub listings: usize,
    pub categories: Vec<&'static str>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

pub struct ApiHandlers {
    store: Arc<CatalogStore>,
    publisher: Arc<PublishService>,
    generation: Arc<dyn GenerationService>,
    collection: Arc<dyn CollectionService>,
}

impl ApiHandlers {
    pub fn new(
        store: Arc<CatalogStore>,
        publisher: Arc<PublishService>,
        generation: Arc<dyn GenerationService>,
        collection: Arc<dyn CollectionService>,
    ) -> Self {
        Self {
            store,
            publisher,
            generation,
            collection,
        }
    }

    pub async fn health(&self) -> Json<ApiResponse<HealthResponse>> {
        let connection = *self.collection.connection_state().borrow();
        Json(ApiResponse::success(HealthResponse {
            connection,
            loading: self.store.is_loading().await,
            listings: self.store.snapshot().await.len(),
            categories: Category::ALL.iter().map(|c| c.as_str()).collect(),
        }))
    }

    /// Filtered catalog view. Absent parameters select the full snapshot.
    pub async fn list_listings(
        &self,
        query: ListQuery,
    ) -> Result<Json<ApiResponse<ListingsResponse>>, StatusCode> {
        let filter = CategoryFilter::parse(query.category.as_deref().unwrap_or(""));
        let search = query.q.unwrap_or_default();

        let snapshot = self.store.snapshot().await;
        let listings = filter_listings(&snapshot, &filter, &search);

        Ok(Json(ApiResponse::success(ListingsResponse {
            loading: self.store.is_loading().await,
            listings,
        })))
    }

    /// Featured strip: the newest listings, positionally. Whether to show it
    /// while a filter or search is active is the display layer's decision.
    pub async fn featured(&self) -> Result<Json<ApiResponse<Vec<Listing>>>, StatusCode> {
        let snapshot = self.store.snapshot().await;
        Ok(Json(ApiResponse::success(featured_listings(&snapshot))))
    }

    pub async fn get_listing(
        &self,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<Listing>>, StatusCode> {
        match self.store.get(&id).await {
            Some(listing) => Ok(Json(ApiResponse::success(listing))),
            None => Err(StatusCode::NOT_FOUND),
        }
    }

    /// Publish workflow. A failed write leaves the local snapshot untouched
    /// and the submitted form data with the client; no retry happens here.
    pub async fn publish(
        &self,
        Json(request): Json<PublishRequest>,
    ) -> Result<Json<ApiResponse<String>>, StatusCode> {
        info!(name = %request.name, "Publish request received");

        match self.publisher.publish(request).await {
            Ok(id) => Ok(Json(ApiResponse::success(id))),
            Err(e) => {
                error!(error = %e, "Failed to publish listing");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// AI description enhancement. Never fails outward: generation errors
    /// fall back to the submitted text.
    pub async fn enhance(
        &self,
        Json(request): Json<EnhanceRequest>,
    ) -> Json<ApiResponse<EnhanceResponse>> {
        let description =
            enhance_description(self.generation.as_ref(), &request.name, &request.description)
                .await;

        Json(ApiResponse::success(EnhanceResponse { description }))
    }

    /// AI insight for one listing's detail view. Generation errors fall back
    /// to a generic sentence; only a missing listing is an error.
    pub async fn insight(
        &self,
        Path(id): Path<String>,
    ) -> Result<Json<ApiResponse<InsightResponse>>, StatusCode> {
        let listing = self.store.get(&id).await.ok_or(StatusCode::NOT_FOUND)?;

        let insight =
            insight_summary(self.generation.as_ref(), &listing.name, &listing.description).await;

        Ok(Json(ApiResponse::success(InsightResponse { insight })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::mpsc::Receiver;
    use tokio::sync::watch;

    use crate::collection::traits::ListingDraft;
    use crate::generation::traits::GenerationError;
    use crate::test_helpers::{sample_listing, sample_publish_request};

    struct StubCollection {
        fail_insert: bool,
    }

    #[async_trait]
    impl CollectionService for StubCollection {
        async fn subscribe(&self) -> anyhow::Result<Receiver<Vec<Listing>>> {
            anyhow::bail!("Not used in handler tests")
        }

        async fn insert(&self, _draft: &ListingDraft) -> anyhow::Result<String> {
            if self.fail_insert {
                anyhow::bail!("Remote write rejected");
            }
            Ok("new-id".to_string())
        }

        fn connection_state(&self) -> watch::Receiver<ConnectionState> {
            watch::channel(ConnectionState::Live).1
        }
    }

    struct StubGeneration {
        fail: bool,
    }

    #[async_trait]
    impl GenerationService for StubGeneration {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            if self.fail {
                Err(GenerationError::EmptyResponse)
            } else {
                Ok("Generated text.".to_string())
            }
        }
    }

    async fn handlers_with(
        fail_insert: bool,
        fail_generation: bool,
    ) -> (ApiHandlers, Arc<CatalogStore>) {
        let store = Arc::new(CatalogStore::new());
        let collection: Arc<dyn CollectionService> = Arc::new(StubCollection { fail_insert });
        let handlers = ApiHandlers::new(
            Arc::clone(&store),
            Arc::new(PublishService::new(Arc::clone(&collection))),
            Arc::new(StubGeneration {
                fail: fail_generation,
            }),
            collection,
        );
        (handlers, store)
    }

    fn catalog() -> Vec<Listing> {
        let mut games = sample_listing("a");
        games.name = "Pixel Quest".to_string();
        games.category = "Games".to_string();

        let mut tools = sample_listing("b");
        tools.name = "Wrench Kit".to_string();
        tools.developer = "Toolsmith".to_string();
        tools.category = "Tools".to_string();

        let mut social = sample_listing("c");
        social.name = "Chatter".to_string();
        social.category = "Social".to_string();

        let mut education = sample_listing("d");
        education.name = "Flash Cards".to_string();
        education.category = "Education".to_string();

        vec![games, tools, social, education]
    }

    #[tokio::test]
    async fn test_list_reports_loading_until_first_snapshot() {
        let (handlers, store) = handlers_with(false, false).await;

        let response = handlers.list_listings(ListQuery::default()).await.unwrap();
        assert!(response.0.data.as_ref().unwrap().loading);

        store.replace(catalog()).await;
        let response = handlers.list_listings(ListQuery::default()).await.unwrap();
        let data = response.0.data.unwrap();
        assert!(!data.loading);
        assert_eq!(data.listings.len(), 4);
    }

    #[tokio::test]
    async fn test_list_applies_category_and_search() {
        let (handlers, store) = handlers_with(false, false).await;
        store.replace(catalog()).await;

        let response = handlers
            .list_listings(ListQuery {
                category: Some("Tools".to_string()),
                q: None,
            })
            .await
            .unwrap();
        let listings = response.0.data.unwrap().listings;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "b");

        let response = handlers
            .list_listings(ListQuery {
                category: None,
                q: Some("toolsmith".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(response.0.data.unwrap().listings[0].id, "b");
    }

    #[tokio::test]
    async fn test_featured_returns_first_three() {
        let (handlers, store) = handlers_with(false, false).await;
        store.replace(catalog()).await;

        let response = handlers.featured().await.unwrap();
        let listings = response.0.data.unwrap();
        assert_eq!(
            listings.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[tokio::test]
    async fn test_get_listing_found_and_missing() {
        let (handlers, store) = handlers_with(false, false).await;
        store.replace(catalog()).await;

        let response = handlers.get_listing(Path("c".to_string())).await.unwrap();
        assert_eq!(response.0.data.unwrap().id, "c");

        let status = handlers
            .get_listing(Path("missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_publish_returns_assigned_id() {
        let (handlers, _store) = handlers_with(false, false).await;

        let response = handlers
            .publish(Json(sample_publish_request()))
            .await
            .unwrap();
        assert_eq!(response.0.data.unwrap(), "new-id");
    }

    #[tokio::test]
    async fn test_failed_publish_leaves_snapshot_untouched() {
        let (handlers, store) = handlers_with(true, false).await;
        store.replace(catalog()).await;

        let status = handlers
            .publish(Json(sample_publish_request()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        // No optimistic insertion on failure
        assert_eq!(store.snapshot().await.len(), 4);
    }

    #[tokio::test]
    async fn test_enhance_succeeds_and_degrades() {
        let (handlers, _) = handlers_with(false, false).await;
        let response = handlers
            .enhance(Json(EnhanceRequest {
                name: "Pixel Quest".to_string(),
                description: "raw text".to_string(),
            }))
            .await;
        assert_eq!(response.0.data.unwrap().description, "Generated text.");

        // Generation failure returns the original text, not an error
        let (handlers, _) = handlers_with(false, true).await;
        let response = handlers
            .enhance(Json(EnhanceRequest {
                name: "Pixel Quest".to_string(),
                description: "raw text".to_string(),
            }))
            .await;
        assert_eq!(response.0.data.unwrap().description, "raw text");
    }

    #[tokio::test]
    async fn test_insight_missing_listing_is_not_found() {
        let (handlers, _) = handlers_with(false, false).await;
        let status = handlers
            .insight(Path("missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_insight_degrades_to_generic_sentence() {
        let (handlers, store) = handlers_with(false, true).await;
        store.replace(catalog()).await;

        let response = handlers.insight(Path("a".to_string())).await.unwrap();
        assert_eq!(
            response.0.data.unwrap().insight,
            "This app offers unique features for its category."
        );
    }

    #[tokio::test]
    async fn test_health_reports_connection_and_counts() {
        let (handlers, store) = handlers_with(false, false).await;
        store.replace(catalog()).await;

        let response = handlers.health().await;
        let data = response.0.data.unwrap();
        assert_eq!(data.connection, ConnectionState::Live);
        assert!(!data.loading);
        assert_eq!(data.listings, 4);
        assert_eq!(data.categories.len(), 6);
    }
}
