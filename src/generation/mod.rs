// SPDX-License-Identifier: GPL-3.0-only
pub mod enrich;
pub mod gemini;
pub mod traits;

pub use enrich::{enhance_description, insight_summary};
pub use gemini::GeminiClient;
pub use traits::{GenerationError, GenerationService};
