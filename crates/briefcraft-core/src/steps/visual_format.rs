//! Recommends the visual format the post should ship in.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, Step};

const FORMAT_HINT: &str = r#"{"format": "Image|Video|Carousel|Infographic", "rationale": "..."}"#;

const VALID_FORMATS: [&str; 4] = ["Image", "Video", "Carousel", "Infographic"];

pub struct VisualFormatRecommender;

/// Validate the recommended format; anything unrecognized becomes "Video",
/// the safest default for reach.
fn normalize_format(raw: &str) -> String {
    VALID_FORMATS
        .iter()
        .find(|f| f.eq_ignore_ascii_case(raw.trim()))
        .map(|f| f.to_string())
        .unwrap_or_else(|| "Video".to_string())
}

/// Confidence is heuristic: a flat base, with a bump for video because short
/// video consistently outperforms static formats. Capped at 0.95 so the
/// recommendation never reads as certain.
fn confidence_for(format: &str) -> f64 {
    let base: f64 = 0.7;
    let score = if format == "Video" { base + 0.2 } else { base };
    score.min(0.95)
}

#[async_trait]
impl Step for VisualFormatRecommender {
    fn id(&self) -> &'static str {
        "visual_format_recommender"
    }

    fn label(&self) -> &'static str {
        "visual_format_recommendation"
    }

    fn next(&self) -> &'static str {
        "video_script"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        if state.brand_voice.is_none() {
            return Err(StepError::MissingField("brand_voice"));
        }
        let post_type = state
            .post_type
            .ok_or(StepError::MissingField("post_type"))?;
        let analysis = state
            .prompt_analysis
            .as_ref()
            .ok_or(StepError::MissingField("prompt_analysis"))?;

        let objective = analysis.objective.clone();
        let platform = analysis
            .platform
            .clone()
            .unwrap_or_else(|| "social_media".to_string());

        let prompt = prompts::render(
            prompts::visual_format(state.language()),
            &[
                ("post_type", post_type.as_str()),
                ("platform", &platform),
                ("objective", &objective),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        let format = normalize_format(&json_str(&value, "format", ""));
        let rationale = json_str(&value, "rationale", "Best fit for the post type and platform");

        state.visual_format_recommendation = Some(recommendation(&format, &rationale));
        Ok(())
    }
}

fn recommendation(format: &str, rationale: &str) -> Value {
    json!({
        "format": format,
        "confidence": confidence_for(format),
        "rationale": rationale,
    })
}
