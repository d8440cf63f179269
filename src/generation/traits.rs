// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;

#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Generation response contained no text")]
    EmptyResponse,
}

/// Single-shot text generation: plain prompt in, plain text out. No
/// streaming, no conversation state.
///
/// Failures stay explicit in the return type; fallback behavior belongs to
/// the call sites in [`crate::generation::enrich`], never inside the client.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
