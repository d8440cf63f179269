// SPDX-License-Identifier: GPL-3.0-only
use tracing::warn;

use crate::generation::traits::GenerationService;

/// Shown in place of an insight when the generation service is unavailable
const INSIGHT_FALLBACK: &str = "This app offers unique features for its category.";

fn enhance_prompt(name: &str, raw_description: &str) -> String {
    format!(
        "You are a professional App Store copywriter. Take this app name: \"{}\" and this raw description: \"{}\". \
         Write a highly engaging, professional, and SEO-friendly description for an app store page. \
         Use bullet points for key features. Keep it structured and appealing for potential users.",
        name, raw_description
    )
}

fn insight_prompt(name: &str, description: &str) -> String {
    format!(
        "Based on this app description for \"{}\": \"{}\", generate a short \"AI Insight\" \
         (max 2 sentences) about why users should download it.",
        name, description
    )
}

/// Rewrite a raw listing description into store copy.
///
/// Degrades gracefully: on any generation failure the original text comes
/// back unchanged. Enrichment is decorative, never load-bearing, so the
/// failure is logged but not surfaced to the user.
pub async fn enhance_description(
    service: &dyn GenerationService,
    name: &str,
    raw_description: &str,
) -> String {
    match service.generate(&enhance_prompt(name, raw_description)).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!(name = %name, "Enhancement produced no text, keeping original description");
            raw_description.to_string()
        }
        Err(e) => {
            warn!(name = %name, error = %e, "Description enhancement failed, keeping original description");
            raw_description.to_string()
        }
    }
}

/// Produce the short "why download this" blurb for a listing's detail view.
/// Falls back to a fixed generic sentence on any failure.
pub async fn insight_summary(
    service: &dyn GenerationService,
    name: &str,
    description: &str,
) -> String {
    match service.generate(&insight_prompt(name, description)).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => INSIGHT_FALLBACK.to_string(),
        Err(e) => {
            warn!(name = %name, error = %e, "Insight generation failed, using fallback");
            INSIGHT_FALLBACK.to_string()
        }
    }
}
