//! Pipeline orchestration: runs the twelve steps in order, then assembles the
//! final content brief.
//!
//! Error isolation is the core property here. A failed step marks the state
//! and the run continues, so one bad model response costs a single component
//! rather than the whole run. `halt_on_error` opts into fail-fast instead.

use chrono::Utc;

use crate::completion::TextCompletion;
use crate::language::LanguageConfig;
use crate::models::{ContentBrief, ProcessingMetadata};
use crate::state::BriefState;
use crate::steps::{
    self, BrandVoiceAgent, CaptionCreator, ContextualAwareness, FactGrounding, PostClassifier,
    PromptAnalyzer, ReasoningModule, ResultOptimizer, Step, TextGenerator, VideoScripter,
    VisualConceptStep, VisualFormatRecommender,
};

/// Version stamped into every assembled brief's metadata.
const BRIEF_VERSION: &str = "1.0.0";

/// Pipeline behavior knobs.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Stop at the first failed step instead of running to completion.
    pub halt_on_error: bool,
}

/// The content-brief pipeline.
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            steps: default_steps(),
            config,
        }
    }

    /// Number of steps in the pipeline, excluding final assembly.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the full pipeline for one prompt and return the finished state.
    pub async fn run(
        &self,
        input_prompt: &str,
        language_override: Option<LanguageConfig>,
        completion: &dyn TextCompletion,
    ) -> BriefState {
        let mut state = BriefState::new(input_prompt, language_override);
        tracing::info!(
            "[Pipeline] Starting run {} ({} steps, language: {})",
            state.run_id,
            self.steps.len(),
            state.language().code()
        );

        for step in &self.steps {
            if self.config.halt_on_error && state.is_error {
                tracing::warn!("[Pipeline] Halting before {}: earlier step failed", step.id());
                break;
            }
            steps::run_step(step.as_ref(), &mut state, completion).await;
        }

        finalize(&mut state, completion.model_name());
        state
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

fn default_steps() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(PromptAnalyzer),
        Box::new(PostClassifier),
        Box::new(BrandVoiceAgent),
        Box::new(FactGrounding),
        Box::new(TextGenerator),
        Box::new(CaptionCreator),
        Box::new(VisualConceptStep),
        Box::new(ReasoningModule),
        Box::new(VisualFormatRecommender),
        Box::new(VideoScripter),
        Box::new(ResultOptimizer),
        Box::new(ContextualAwareness),
    ]
}

/// Close out the run: stamp the end time, mark it complete, and assemble the
/// brief when every core component is present.
///
/// A run that cannot produce a brief still finishes as complete; the missing
/// components are reported through the error list.
pub fn finalize(state: &mut BriefState, model_name: &str) {
    state.processing_end = Some(Utc::now());
    state.current_step = "complete".to_string();
    state.is_complete = true;

    let missing = missing_components(state);
    if !missing.is_empty() {
        let message = format!(
            "Cannot build final brief. Missing components: {}",
            missing.join(", ")
        );
        tracing::warn!("[Finalizer] {}", message);
        state.errors.push(format!("[finalizer]: {}", message));
        return;
    }

    state.final_brief = Some(assemble_brief(state, model_name));
    tracing::info!(
        "[Finalizer] Brief assembled for run {} in {:.2}s",
        state.run_id,
        state.processing_time_seconds().unwrap_or_default()
    );
}

fn missing_components(state: &BriefState) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if state.post_type.is_none() {
        missing.push("post_type");
    }
    if state.core_content.is_none() {
        missing.push("core_content");
    }
    if state.engagement_elements.is_none() {
        missing.push("engagement_elements");
    }
    if state.visual_concept.is_none() {
        missing.push("visual_concept");
    }
    if state.brand_voice.is_none() {
        missing.push("brand_voice");
    }
    if state.factual_grounding.is_none() {
        missing.push("factual_grounding");
    }
    if state.reasoning.is_none() {
        missing.push("reasoning");
    }
    missing
}

/// Only called when [`missing_components`] is empty.
fn assemble_brief(state: &BriefState, model_name: &str) -> ContentBrief {
    ContentBrief {
        post_type: state.post_type.expect("checked by missing_components"),
        core_content: state.core_content.clone().expect("checked by missing_components"),
        engagement_elements: state
            .engagement_elements
            .clone()
            .expect("checked by missing_components"),
        visual_concept: state
            .visual_concept
            .clone()
            .expect("checked by missing_components"),
        brand_voice: state.brand_voice.clone().expect("checked by missing_components"),
        factual_grounding: state
            .factual_grounding
            .clone()
            .expect("checked by missing_components"),
        reasoning: state.reasoning.clone().expect("checked by missing_components"),
        metadata: ProcessingMetadata {
            processing_time_seconds: state.processing_time_seconds().unwrap_or_default(),
            agent_timings: state.agent_timings.clone(),
            model_used: model_name.to_string(),
            timestamp: Utc::now(),
            version: BRIEF_VERSION.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BrandVoice, EngagementElements, FactualGrounding, PostType, Reasoning, VisualConcept,
    };

    fn populated_state() -> BriefState {
        let mut state = BriefState::new("Launch our new app", None);
        state.post_type = Some(PostType::Launch);
        state.core_content = Some("Body text".to_string());
        state.engagement_elements = Some(EngagementElements::default());
        state.visual_concept = Some(VisualConcept::default());
        state.brand_voice = Some(BrandVoice::default());
        state.factual_grounding = Some(FactualGrounding::default());
        state.reasoning = Some(Reasoning::default());
        state
    }

    #[test]
    fn test_finalize_assembles_brief_when_complete() {
        let mut state = populated_state();
        finalize(&mut state, "test-model");

        assert!(state.is_complete);
        assert_eq!(state.current_step, "complete");
        assert!(state.processing_end.is_some());

        let brief = state.final_brief.expect("brief assembled");
        assert_eq!(brief.post_type, PostType::Launch);
        assert_eq!(brief.metadata.model_used, "test-model");
    }

    #[test]
    fn test_finalize_reports_missing_components() {
        let mut state = populated_state();
        state.core_content = None;
        state.reasoning = None;
        finalize(&mut state, "test-model");

        assert!(state.final_brief.is_none());
        assert!(state.is_complete);
        assert!(!state.is_error);
        let last = state.errors.last().expect("error recorded");
        assert!(last.contains("Cannot build final brief. Missing components: core_content, reasoning"));
    }

    #[test]
    fn test_default_pipeline_has_twelve_steps() {
        assert_eq!(Pipeline::default().len(), 12);
    }

    #[test]
    fn test_step_chain_is_contiguous() {
        let steps = default_steps();
        for pair in steps.windows(2) {
            let next_label = pair[1].label();
            assert_eq!(
                pair[0].next(),
                next_label,
                "{} should point at {}",
                pair[0].id(),
                next_label
            );
        }
        assert_eq!(steps.last().unwrap().next(), "final_assembly");
    }
}
