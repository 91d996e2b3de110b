//! Captures the strategic reasoning behind the content plan.

use async_trait::async_trait;
use serde_json::Value;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::Reasoning;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, json_str_vec, Step};

const FORMAT_HINT: &str = r#"{"strategic_decisions": ["..."], "audience_considerations": "...", "platform_optimization": "...", "competitive_analysis": "...", "risk_assessment": "..."}"#;

const FALLBACK_DECISIONS: [&str; 3] = [
    "Chose clear messaging to maximize comprehension",
    "Aligned tone with audience expectations",
    "Prioritized platform-native formatting",
];

pub struct ReasoningModule;

/// Replace narrative fields that are too short to be meaningful.
fn meaningful(value: &Value, key: &str, fallback: &str) -> String {
    let text = json_str(value, key, "");
    if text.chars().count() < 10 {
        fallback.to_string()
    } else {
        text
    }
}

fn reasoning_from_json(value: &Value) -> Reasoning {
    let mut strategic_decisions = json_str_vec(value, "strategic_decisions", &[]);
    if strategic_decisions.is_empty() {
        strategic_decisions = FALLBACK_DECISIONS.iter().map(|s| s.to_string()).collect();
    }

    Reasoning {
        strategic_decisions,
        audience_considerations: meaningful(
            value,
            "audience_considerations",
            "Tailored to the identified target audience",
        ),
        platform_optimization: meaningful(
            value,
            "platform_optimization",
            "Optimized for the target platform",
        ),
        competitive_analysis: meaningful(
            value,
            "competitive_analysis",
            "Differentiates through authentic brand voice",
        ),
        risk_assessment: meaningful(
            value,
            "risk_assessment",
            "Low risk; claims grounded in verified facts",
        ),
    }
}

#[async_trait]
impl Step for ReasoningModule {
    fn id(&self) -> &'static str {
        "reasoning_module"
    }

    fn label(&self) -> &'static str {
        "reasoning"
    }

    fn next(&self) -> &'static str {
        "visual_format_recommendation"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        if state.engagement_elements.is_none() {
            return Err(StepError::MissingField("engagement_elements"));
        }
        if state.visual_concept.is_none() {
            return Err(StepError::MissingField("visual_concept"));
        }
        let post_type = state
            .post_type
            .ok_or(StepError::MissingField("post_type"))?;
        let core_content = state
            .core_content
            .as_ref()
            .ok_or(StepError::MissingField("core_content"))?;
        let objective = state
            .prompt_analysis
            .as_ref()
            .ok_or(StepError::MissingField("prompt_analysis"))?
            .objective
            .clone();
        let tone = state
            .brand_voice
            .as_ref()
            .ok_or(StepError::MissingField("brand_voice"))?
            .tone
            .clone();

        let prompt = prompts::render(
            prompts::reasoning(state.language()),
            &[
                ("objective", &objective),
                ("post_type", post_type.as_str()),
                ("tone", &tone),
                ("generated_text", core_content),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        state.reasoning = Some(reasoning_from_json(&value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_reasoning_gets_fallbacks() {
        let reasoning = reasoning_from_json(&json!({}));
        assert_eq!(reasoning.strategic_decisions.len(), 3);
        assert_eq!(
            reasoning.audience_considerations,
            "Tailored to the identified target audience"
        );
    }

    #[test]
    fn test_short_fields_replaced() {
        let reasoning = reasoning_from_json(&json!({
            "risk_assessment": "ok",
            "platform_optimization": "Optimized for Instagram Reels with vertical framing"
        }));
        assert_eq!(
            reasoning.risk_assessment,
            "Low risk; claims grounded in verified facts"
        );
        assert!(reasoning.platform_optimization.contains("Instagram"));
    }
}
