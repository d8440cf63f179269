// SPDX-License-Identifier: GPL-3.0-only
use chrono::Utc;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::catalog::models::Listing;
use crate::collection::traits::ListingDraft;
use crate::config::Config;
use crate::publish::service::PublishRequest;

/// Create a test configuration pointing at nothing in particular; tests that
/// need a live endpoint swap in a mock server URL.
pub fn create_test_config() -> Config {
    Config {
        backend_api_url: "http://localhost:3000".to_string(),
        backend_ws_url: "ws://localhost:3000".to_string(),
        backend_api_key: None,
        collection_name: "apps".to_string(),
        generation_api_url: "http://localhost:3001".to_string(),
        generation_api_key: None,
        generation_model: "test-model".to_string(),
        local_api_bind: SocketAddr::from_str("127.0.0.1:0").unwrap(), // Use port 0 to auto-assign
        reconnect_base_delay_secs: 1,
        reconnect_max_delay_secs: 5,
        request_timeout_secs: 5,
        log_level: "error".to_string(), // Reduce log noise in tests
        log_json: false,
    }
}

pub fn sample_listing(id: &str) -> Listing {
    Listing {
        id: id.to_string(),
        name: format!("App {}", id),
        developer: "Acme".to_string(),
        description: "A sample listing".to_string(),
        category: "Tools".to_string(),
        icon_url: "https://cdn.example.com/icon.png".to_string(),
        apk_url: "https://cdn.example.com/app.apk".to_string(),
        size: "12 MB".to_string(),
        rating: 4.1,
        downloads: "100+".to_string(),
        created_at: Utc::now(),
        featured: false,
    }
}

pub fn sample_draft() -> ListingDraft {
    ListingDraft {
        name: "Pixel Quest".to_string(),
        developer: "Acme".to_string(),
        description: "A retro platformer".to_string(),
        category: "Games".to_string(),
        icon_url: "https://cdn.example.com/pq.png".to_string(),
        apk_url: "https://cdn.example.com/pq.apk".to_string(),
        size: "80 MB".to_string(),
        rating: 4.0,
        downloads: "0+".to_string(),
        featured: false,
    }
}

pub fn sample_publish_request() -> PublishRequest {
    PublishRequest {
        name: "Pixel Quest".to_string(),
        developer: "Acme".to_string(),
        description: "A retro platformer".to_string(),
        category: "Games".to_string(),
        icon_url: "https://cdn.example.com/pq.png".to_string(),
        apk_url: "https://cdn.example.com/pq.apk".to_string(),
        size: "80 MB".to_string(),
    }
}
