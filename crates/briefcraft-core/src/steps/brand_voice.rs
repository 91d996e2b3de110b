//! Defines the brand voice the rest of the pipeline writes in.

use async_trait::async_trait;
use serde_json::Value;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::BrandVoice;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, json_str_vec, Step};

const FORMAT_HINT: &str = r#"{"tone": "...", "personality": "...", "style": "...", "values": ["..."], "language_level": "..."}"#;

pub struct BrandVoiceAgent;

/// Tone and personality are hard requirements. A voice without them is
/// unusable by every downstream step, so an absent one fails the step
/// instead of being papered over with a default.
fn voice_from_json(value: &Value) -> Result<BrandVoice, StepError> {
    let tone = json_str(value, "tone", "");
    if tone.is_empty() {
        return Err(StepError::Validation("Brand voice missing tone".to_string()));
    }
    let personality = json_str(value, "personality", "");
    if personality.is_empty() {
        return Err(StepError::Validation(
            "Brand voice missing personality".to_string(),
        ));
    }

    Ok(BrandVoice {
        tone,
        personality,
        style: json_str(value, "style", "clear and engaging"),
        values: json_str_vec(value, "values", &["quality", "innovation"]),
        language_level: json_str(value, "language_level", "accessible"),
    })
}

#[async_trait]
impl Step for BrandVoiceAgent {
    fn id(&self) -> &'static str {
        "brand_voice_agent"
    }

    fn label(&self) -> &'static str {
        "brand_voice"
    }

    fn next(&self) -> &'static str {
        "fact_grounding"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        let analysis = state
            .prompt_analysis
            .as_ref()
            .ok_or(StepError::MissingField("prompt_analysis"))?;
        let post_type = state
            .post_type
            .ok_or(StepError::MissingField("post_type"))?;

        let prompt = prompts::render(
            prompts::brand_voice(state.language()),
            &[
                ("objective", &analysis.objective),
                ("audience", &analysis.audience),
                ("brand_cues", &analysis.brand_cues.join(", ")),
                ("post_type", post_type.as_str()),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        state.brand_voice = Some(voice_from_json(&value)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_tone_is_a_failure() {
        let err = voice_from_json(&json!({"personality": "warm"})).unwrap_err();
        assert!(err.to_string().contains("missing tone"));
    }

    #[test]
    fn test_missing_personality_is_a_failure() {
        let err = voice_from_json(&json!({"tone": "bold"})).unwrap_err();
        assert!(err.to_string().contains("missing personality"));
    }

    #[test]
    fn test_soft_fields_get_defaults() {
        let voice = voice_from_json(&json!({
            "tone": "playful",
            "personality": "warm"
        }))
        .unwrap();
        assert_eq!(voice.style, "clear and engaging");
        assert_eq!(voice.values, vec!["quality", "innovation"]);
        assert_eq!(voice.language_level, "accessible");
    }
}
