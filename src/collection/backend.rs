// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};

use crate::catalog::models::Listing;
use crate::collection::traits::{CollectionService, ConnectionState, ListingDraft};
use crate::config::Config;

const USER_AGENT: &str = "SalimzStoreDaemon/0.0.1";

/// Capacity of the snapshot channel. Snapshots are total replacements, so a
/// small buffer is enough; if the consumer lags, older payloads are simply
/// superseded by the ones behind them.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Remote collection service client.
///
/// The subscription side speaks the backend's document watch channel over a
/// WebSocket: the server pushes one tagged frame per change, each carrying
/// the full ordered document sequence. The write side is a plain HTTP insert.
#[derive(Debug, Clone)]
pub struct BackendCollectionService {
    client: Client,
    base_url: String,
    ws_url: String,
    collection: String,
    api_key: Option<String>,
    reconnect_base_delay_secs: u64,
    reconnect_max_delay_secs: u64,
    state_tx: watch::Sender<ConnectionState>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WatchFrame {
    Snapshot { documents: Vec<Listing> },
}

#[derive(Deserialize)]
struct InsertResponse {
    id: String,
}

impl BackendCollectionService {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);

        Ok(Self {
            client,
            base_url: config.backend_api_url.clone(),
            ws_url: config.backend_ws_url.clone(),
            collection: config.collection_name.clone(),
            api_key: config.backend_api_key.clone(),
            reconnect_base_delay_secs: config.reconnect_base_delay_secs,
            reconnect_max_delay_secs: config.reconnect_max_delay_secs,
            state_tx,
        })
    }

    fn watch_url(&self) -> String {
        format!(
            "{}/collections/{}/watch?orderBy=createdAt&direction=desc",
            self.ws_url.trim_end_matches('/'),
            self.collection
        )
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.collection
        )
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_if_modified(|current| {
            if *current != state {
                info!(?state, "Watch channel state changed");
                *current = state;
                true
            } else {
                false
            }
        });
    }

    async fn connect(&self) -> anyhow::Result<WsStream> {
        let mut request = self.watch_url().into_client_request()?;

        if let Some(ref key) = self.api_key {
            request.headers_mut().insert(
                "Authorization",
                format!("Bearer {}", key).parse()?,
            );
        }

        let (stream, _) = connect_async(request).await?;
        Ok(stream)
    }

    /// Standing subscription loop: Connecting -> Live, and back through
    /// Disconnected with bounded exponential backoff on any failure. Exits
    /// only when the snapshot receiver has been dropped.
    async fn run_subscription(self, tx: Sender<Vec<Listing>>) {
        let mut attempt: u32 = 0;

        loop {
            if tx.is_closed() {
                break;
            }

            self.set_state(ConnectionState::Connecting);

            match self.connect().await {
                Ok(stream) => {
                    attempt = 0;
                    self.set_state(ConnectionState::Live);
                    if self.read_frames(stream, &tx).await.is_err() {
                        // Receiver gone: the subscription was released
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, url = %self.watch_url(), "Failed to connect watch channel");
                }
            }

            self.set_state(ConnectionState::Disconnected);

            let delay = backoff_delay(
                attempt,
                self.reconnect_base_delay_secs,
                self.reconnect_max_delay_secs,
            );
            attempt = attempt.saturating_add(1);
            info!(delay_secs = delay.as_secs(), attempt, "Retrying watch channel");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = tx.closed() => break,
            }
        }

        self.set_state(ConnectionState::Disconnected);
        info!("Snapshot subscription released");
    }

    /// Forward decoded snapshot frames until the connection drops. Returns
    /// Err only when the receiver side is gone.
    async fn read_frames(&self, mut stream: WsStream, tx: &Sender<Vec<Listing>>) -> Result<(), ()> {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if let Some(documents) = decode_frame(&text) {
                        info!(count = documents.len(), "Received snapshot notification");
                        if tx.send(documents).await.is_err() {
                            return Err(());
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("Watch channel closed by server");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Watch channel read error");
                    break;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionService for BackendCollectionService {
    async fn subscribe(&self) -> anyhow::Result<Receiver<Vec<Listing>>> {
        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);

        let service = self.clone();
        tokio::spawn(async move {
            service.run_subscription(tx).await;
        });

        Ok(rx)
    }

    async fn insert(&self, draft: &ListingDraft) -> anyhow::Result<String> {
        info!(name = %draft.name, category = %draft.category, "Inserting listing document");

        let mut request = self.client.post(self.documents_url()).json(draft);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Listing insert failed");
            return Err(anyhow::anyhow!("Listing insert failed: {} - {}", status, body));
        }

        let inserted: InsertResponse = response.json().await?;
        info!(id = %inserted.id, "Listing document inserted");

        Ok(inserted.id)
    }

    fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }
}

fn decode_frame(text: &str) -> Option<Vec<Listing>> {
    match serde_json::from_str::<WatchFrame>(text) {
        Ok(WatchFrame::Snapshot { documents }) => Some(documents),
        Err(e) => {
            warn!(error = %e, "Ignoring undecodable watch frame");
            None
        }
    }
}

/// Bounded exponential backoff: base * 2^attempt, capped at the configured
/// maximum and never below one second.
fn backoff_delay(attempt: u32, base_secs: u64, max_secs: u64) -> Duration {
    let factor = 1_u64.checked_shl(attempt.min(16)).unwrap_or(u64::MAX);
    let secs = base_secs.saturating_mul(factor).min(max_secs);
    Duration::from_secs(secs.max(1))
}
