// SPDX-License-Identifier: GPL-3.0-only
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::api::handlers::{
    ApiHandlers, ApiResponse, EnhanceRequest, EnhanceResponse, HealthResponse, InsightResponse,
    ListQuery, ListingsResponse,
};
use crate::api::websocket;
use crate::catalog::models::Listing;
use crate::catalog::store::CatalogStore;
use crate::collection::traits::CollectionService;
use crate::generation::traits::GenerationService;
use crate::publish::service::{PublishRequest, PublishService};

pub struct HttpServer {
    handlers: ApiHandlers,
    store: Arc<CatalogStore>,
    addr: SocketAddr,
}

impl HttpServer {
    pub fn new(
        store: Arc<CatalogStore>,
        publisher: Arc<PublishService>,
        generation: Arc<dyn GenerationService>,
        collection: Arc<dyn CollectionService>,
        addr: SocketAddr,
    ) -> Self {
        Self {
            handlers: ApiHandlers::new(Arc::clone(&store), publisher, generation, collection),
            store,
            addr,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let handlers = Arc::new(self.handlers);

        let app = Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/listings", get(list_listings_handler).post(publish_handler))
            .route("/api/listings/featured", get(featured_handler))
            .route("/api/listings/:id", get(get_listing_handler))
            .route("/api/listings/:id/insight", get(insight_handler))
            .route("/api/generation/enhance", post(enhance_handler))
            .with_state(handlers)
            .merge(websocket::router(self.store));

        info!(addr = %self.addr, "Starting local API server");

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn health_handler(
    State(handlers): State<Arc<ApiHandlers>>,
) -> Json<ApiResponse<HealthResponse>> {
    handlers.health().await
}

async fn list_listings_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<ListingsResponse>>, StatusCode> {
    handlers.list_listings(query).await
}

async fn featured_handler(
    State(handlers): State<Arc<ApiHandlers>>,
) -> Result<Json<ApiResponse<Vec<Listing>>>, StatusCode> {
    handlers.featured().await
}

async fn get_listing_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Listing>>, StatusCode> {
    handlers.get_listing(Path(id)).await
}

async fn publish_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    handlers.publish(Json(request)).await
}

async fn insight_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<InsightResponse>>, StatusCode> {
    handlers.insight(Path(id)).await
}

async fn enhance_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Json(request): Json<EnhanceRequest>,
) -> Json<ApiResponse<EnhanceResponse>> {
    handlers.enhance(Json(request)).await
}
