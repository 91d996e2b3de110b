//! First pipeline step: turn the raw user prompt into a structured analysis.

use async_trait::async_trait;
use serde_json::Value;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::PromptAnalysis;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, json_str_vec, Step};

const FORMAT_HINT: &str = r#"{"objective": "...", "audience": "...", "brand_cues": ["..."], "key_facts": ["..."], "urgency": "low|medium|high", "platform": "...", "tone_indicators": ["..."], "content_goals": ["..."]}"#;

pub struct PromptAnalyzer;

/// Build a [`PromptAnalysis`] from model output, filling every gap with a
/// usable default so downstream steps never see an empty field. Returns the
/// names of the fields that were defaulted, for the warning log.
fn analysis_from_json(value: &Value) -> (PromptAnalysis, Vec<&'static str>) {
    let mut filled = Vec::new();

    let mut field = |key: &'static str, default: &str| {
        let text = json_str(value, key, "");
        if text.is_empty() {
            filled.push(key);
            default.to_string()
        } else {
            text
        }
    };
    let objective = field("objective", "Increase brand awareness and engagement");
    let audience = field("audience", "General target audience");
    let urgency = field("urgency", "medium").to_lowercase();
    let platform = field("platform", "social_media");

    let urgency = if matches!(urgency.as_str(), "low" | "medium" | "high") {
        urgency
    } else {
        filled.push("urgency");
        "medium".to_string()
    };

    let mut list = |key: &'static str, defaults: &[&str]| {
        let items = json_str_vec(value, key, &[]);
        if items.is_empty() {
            filled.push(key);
            defaults.iter().map(|s| s.to_string()).collect()
        } else {
            items
        }
    };
    let brand_cues = list("brand_cues", &["professional", "innovative"]);
    let key_facts = list("key_facts", &["New product launch"]);
    let tone_indicators = list("tone_indicators", &["engaging", "informative"]);
    let content_goals = list("content_goals", &["awareness", "engagement"]);

    let analysis = PromptAnalysis {
        objective,
        audience,
        brand_cues,
        key_facts,
        urgency: Some(urgency),
        platform: Some(platform),
        tone_indicators,
        content_goals,
    };
    (analysis, filled)
}

#[async_trait]
impl Step for PromptAnalyzer {
    fn id(&self) -> &'static str {
        "prompt_analyzer"
    }

    fn label(&self) -> &'static str {
        "prompt_analysis"
    }

    fn next(&self) -> &'static str {
        "post_classification"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        let prompt = prompts::render(
            prompts::prompt_analyzer(state.language()),
            &[("input_prompt", &state.input_prompt)],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        let (analysis, filled) = analysis_from_json(&value);
        for field in filled {
            state.record_warning(self.id(), &format!("defaulted missing field '{}'", field));
        }
        state.prompt_analysis = Some(analysis);
        Ok(())
    }
}
