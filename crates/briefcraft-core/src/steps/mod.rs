//! Pipeline steps.
//!
//! Each step implements [`Step`] and is driven by [`run_step`], which owns
//! timing and error isolation so individual steps only express their domain
//! logic. A failed step marks the state but never unwinds the pipeline.

use std::sync::OnceLock;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use crate::completion::TextCompletion;
use crate::error::StepError;
use crate::state::BriefState;

mod brand_voice;
mod caption_creator;
mod contextual_awareness;
mod fact_grounding;
mod post_classifier;
mod prompt_analyzer;
mod reasoning;
mod result_optimizer;
mod text_generator;
mod video_scripter;
mod visual_concept;
mod visual_format;

pub use brand_voice::BrandVoiceAgent;
pub use caption_creator::CaptionCreator;
pub use contextual_awareness::ContextualAwareness;
pub use fact_grounding::FactGrounding;
pub use post_classifier::PostClassifier;
pub use prompt_analyzer::PromptAnalyzer;
pub use reasoning::ReasoningModule;
pub use result_optimizer::ResultOptimizer;
pub use text_generator::TextGenerator;
pub use video_scripter::VideoScripter;
pub use visual_concept::VisualConcept as VisualConceptStep;
pub use visual_format::VisualFormatRecommender;

/// A single unit of pipeline work.
#[async_trait]
pub trait Step: Send + Sync {
    /// Stable identifier used for timing and error attribution.
    fn id(&self) -> &'static str;

    /// Label appended to `completed_steps` on success.
    fn label(&self) -> &'static str;

    /// Identifier of the step that follows this one.
    fn next(&self) -> &'static str;

    /// Run the step against the shared state.
    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError>;
}

/// Run one step: time it, record success or error, never propagate.
pub async fn run_step(step: &dyn Step, state: &mut BriefState, completion: &dyn TextCompletion) {
    let start = Instant::now();
    tracing::info!("[{}] Starting", step.id());

    match step.apply(state, completion).await {
        Ok(()) => {
            state.record_completion(step.label(), step.next());
            tracing::info!("[{}] Completed", step.id());
        }
        Err(e) => {
            tracing::warn!("[{}] Failed: {}", step.id(), e);
            state.record_error(step.id(), &e.to_string());
        }
    }

    state.record_timing(step.id(), start.elapsed().as_secs_f64());
}

/// Read a string field from a JSON object, falling back to `default` when the
/// field is missing, null, or empty.
pub(crate) fn json_str(value: &Value, key: &str, default: &str) -> String {
    match value.get(key).and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Read a string-array field from a JSON object. Non-string entries are
/// skipped; an absent or empty result yields `defaults`.
pub(crate) fn json_str_vec(value: &Value, key: &str, defaults: &[&str]) -> Vec<String> {
    let items: Vec<String> = value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|x| x.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}

/// Clean model-generated body text into plain platform-ready copy.
///
/// Strips markdown artifacts, collapses blank runs, drops list prefixes, and
/// truncates to 2000 characters. Text under 50 characters after cleaning is
/// rejected as too short to publish.
pub(crate) fn clean_generated_text(raw: &str) -> Result<String, StepError> {
    let mut text = raw
        .replace("```", "")
        .replace("**", "")
        .replace('*', "");

    static BLANK_RUNS: OnceLock<regex::Regex> = OnceLock::new();
    static LIST_PREFIX: OnceLock<regex::Regex> = OnceLock::new();
    let blank_runs =
        BLANK_RUNS.get_or_init(|| regex::Regex::new(r"\n\s*\n").expect("valid regex"));
    let list_prefix =
        LIST_PREFIX.get_or_init(|| regex::Regex::new(r"^[\d\-\.\s]+").expect("valid regex"));

    text = blank_runs.replace_all(&text, "\n\n").to_string();
    text = list_prefix.replace(text.trim(), "").trim().to_string();

    if text.chars().count() > 2000 {
        text = text.chars().take(2000).collect::<String>() + "...";
    }

    if text.chars().count() < 50 {
        return Err(StepError::Validation(format!(
            "Generated text too short ({} chars)",
            text.chars().count()
        )));
    }

    Ok(text)
}
