//! The single state record threaded through one pipeline run.
//!
//! `BriefState` is owned exclusively by the sequencer's call stack from
//! creation to return: no sharing, no locks. Steps receive `&mut BriefState`,
//! fill in their output field, and the runner records bookkeeping around
//! them. Output fields are write-once (each step owns exactly one).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::{detect_language, Language, LanguageConfig};
use crate::models::{
    BrandVoice, ContentBrief, EngagementElements, FactualGrounding, PostType, PromptAnalysis,
    Reasoning, VisualConcept,
};

/// State of one content-brief pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefState {
    /// Unique id for this run.
    pub run_id: Uuid,

    /// The user's free-text prompt. Immutable once set.
    pub input_prompt: String,

    /// Response language, detected from the prompt or overridden by the caller.
    pub language: LanguageConfig,

    // ── Accumulated step outputs ─────────────────────────────────────────
    pub prompt_analysis: Option<PromptAnalysis>,
    pub post_type: Option<PostType>,
    pub post_justification: Option<String>,
    pub brand_voice: Option<BrandVoice>,
    pub factual_grounding: Option<FactualGrounding>,
    pub core_content: Option<String>,
    pub engagement_elements: Option<EngagementElements>,
    pub visual_concept: Option<VisualConcept>,
    pub reasoning: Option<Reasoning>,

    /// Enrichment blobs — opaque JSON from the optional steps.
    pub visual_format_recommendation: Option<serde_json::Value>,
    pub video_script: Option<serde_json::Value>,
    pub result_optimizations: Option<serde_json::Value>,
    pub contextual_awareness: Option<serde_json::Value>,

    /// Assembled only when all seven core components are present at finalize.
    pub final_brief: Option<ContentBrief>,

    // ── Control and bookkeeping ──────────────────────────────────────────
    /// Name of the step about to run, or "error" / "complete".
    pub current_step: String,
    /// Append-only log of successfully completed steps, in execution order.
    pub completed_steps: Vec<String>,
    /// Elapsed seconds per step, recorded on success and failure alike.
    pub agent_timings: HashMap<String, f64>,
    /// Error log; each entry is prefixed with "[step_id]: ".
    pub errors: Vec<String>,
    pub warnings: Vec<String>,

    pub is_complete: bool,
    /// Sticky: once set by any step failure it is never cleared.
    pub is_error: bool,
    pub processing_start: DateTime<Utc>,
    pub processing_end: Option<DateTime<Utc>>,
}

impl BriefState {
    /// Create the initial state for a run, detecting the prompt language
    /// unless an override is supplied.
    pub fn new(input_prompt: impl Into<String>, language_override: Option<LanguageConfig>) -> Self {
        let input_prompt = input_prompt.into();
        let language = language_override
            .unwrap_or_else(|| LanguageConfig::new(detect_language(&input_prompt)));

        Self {
            run_id: Uuid::new_v4(),
            input_prompt,
            language,
            prompt_analysis: None,
            post_type: None,
            post_justification: None,
            brand_voice: None,
            factual_grounding: None,
            core_content: None,
            engagement_elements: None,
            visual_concept: None,
            reasoning: None,
            visual_format_recommendation: None,
            video_script: None,
            result_optimizations: None,
            contextual_awareness: None,
            final_brief: None,
            current_step: "initialize".to_string(),
            completed_steps: Vec::new(),
            agent_timings: HashMap::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            is_complete: false,
            is_error: false,
            processing_start: Utc::now(),
            processing_end: None,
        }
    }

    pub fn language(&self) -> Language {
        self.language.language
    }

    /// Record a step failure: error entry, sticky error flag, current step
    /// parked at "error".
    pub fn record_error(&mut self, step_id: &str, message: &str) {
        self.errors.push(format!("[{}]: {}", step_id, message));
        self.current_step = "error".to_string();
        self.is_error = true;
    }

    pub fn record_warning(&mut self, step_id: &str, message: &str) {
        self.warnings.push(format!("[{}]: {}", step_id, message));
    }

    /// Record a successful step: completion log entry plus the next step name.
    pub fn record_completion(&mut self, label: &str, next_step: &str) {
        self.completed_steps.push(label.to_string());
        self.current_step = next_step.to_string();
    }

    pub fn record_timing(&mut self, step_id: &str, seconds: f64) {
        self.agent_timings.insert(step_id.to_string(), seconds);
    }

    /// Total wall-clock time of the run, available once finalized.
    pub fn processing_time_seconds(&self) -> Option<f64> {
        self.processing_end.map(|end| {
            (end - self.processing_start)
                .to_std()
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0)
        })
    }
}
