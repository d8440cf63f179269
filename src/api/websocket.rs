// SPDX-License-Identifier: GPL-3.0-only
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::models::Listing;
use crate::catalog::store::CatalogStore;

/// Frame pushed to display-layer clients: the full current snapshot. Total
/// replacement on every change, mirroring what the daemon itself receives
/// from the remote collection.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PushFrame {
    Snapshot {
        loading: bool,
        listings: Vec<Listing>,
    },
}

pub fn router(store: Arc<CatalogStore>) -> Router {
    Router::new().route(
        "/ws",
        get(move |ws: WebSocketUpgrade| async move {
            ws.on_upgrade(move |socket| push_snapshots(socket, store))
        }),
    )
}

/// Send the current snapshot on connect, then one frame per store
/// replacement until the client goes away.
async fn push_snapshots(socket: WebSocket, store: Arc<CatalogStore>) {
    let (mut sender, mut receiver) = socket.split();
    let mut changes = store.subscribe_changes();

    debug!("Display-layer client connected");

    'session: loop {
        let frame = PushFrame::Snapshot {
            loading: store.is_loading().await,
            listings: store.snapshot().await,
        };

        let text = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode snapshot frame");
                break;
            }
        };

        if sender.send(Message::Text(text)).await.is_err() {
            break;
        }

        // Wait for the next replacement; clients only listen on this channel
        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        // Store dropped: the daemon is shutting down
                        break 'session;
                    }
                    break;
                }
                message = receiver.next() => {
                    match message {
                        Some(Ok(Message::Close(_))) | None => break 'session,
                        Some(Err(e)) => {
                            warn!(error = %e, "Display-layer socket error");
                            break 'session;
                        }
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    }

    debug!("Display-layer client disconnected");
}
