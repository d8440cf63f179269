// SPDX-License-Identifier: GPL-3.0-only
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured
/// level; `json` switches to machine-readable log lines for collection.
pub fn setup_logging(log_level: &str, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()?;
    } else {
        registry
            .with(fmt::layer().with_ansi(true).with_target(true))
            .try_init()?;
    }

    Ok(())
}
