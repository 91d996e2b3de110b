//! Designs the visual concept: mood, palette, imagery, layout.

use async_trait::async_trait;
use serde_json::Value;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::VisualConcept as VisualConceptModel;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, json_str_vec, Step};

const FORMAT_HINT: &str = r##"{"mood": "...", "color_palette": ["#RRGGBB"], "imagery_type": "...", "layout_style": "...", "visual_elements": ["..."], "design_notes": "..."}"##;

const DEFAULT_PALETTE: [&str; 4] = ["#2E86AB", "#A23B72", "#F18F01", "#C73E1D"];
const MIN_COLORS: usize = 3;
const MAX_COLORS: usize = 6;

pub struct VisualConcept;

/// Keep only entries that look like colors (hex or rgb), then pad from the
/// default palette up to the minimum and cap at the maximum.
fn normalize_palette(raw: Vec<String>) -> Vec<String> {
    let mut palette: Vec<String> = raw
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| c.starts_with('#') || c.to_lowercase().starts_with("rgb"))
        .collect();

    for default in DEFAULT_PALETTE {
        if palette.len() >= MIN_COLORS {
            break;
        }
        if !palette.iter().any(|c| c.eq_ignore_ascii_case(default)) {
            palette.push(default.to_string());
        }
    }

    palette.truncate(MAX_COLORS);
    palette
}

/// Fields shorter than `min` characters fall back to `default`.
fn at_least(value: &Value, key: &str, min: usize, default: &str) -> String {
    let text = json_str(value, key, "");
    if text.chars().count() < min {
        default.to_string()
    } else {
        text
    }
}

fn concept_from_json(value: &Value) -> VisualConceptModel {
    VisualConceptModel {
        mood: at_least(value, "mood", 3, "modern and professional"),
        color_palette: normalize_palette(json_str_vec(value, "color_palette", &[])),
        imagery_type: at_least(value, "imagery_type", 3, "photography"),
        layout_style: at_least(value, "layout_style", 3, "clean and balanced"),
        visual_elements: json_str_vec(
            value,
            "visual_elements",
            &["brand colors", "clear typography", "product focus"],
        ),
        design_notes: at_least(value, "design_notes", 10, "Clean composition with a strong focal point"),
    }
}

#[async_trait]
impl Step for VisualConcept {
    fn id(&self) -> &'static str {
        "visual_concept"
    }

    fn label(&self) -> &'static str {
        "visual_concept"
    }

    fn next(&self) -> &'static str {
        "reasoning"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        if state.prompt_analysis.is_none() {
            return Err(StepError::MissingField("prompt_analysis"));
        }
        let core_content = state
            .core_content
            .as_ref()
            .ok_or(StepError::MissingField("core_content"))?;
        let post_type = state
            .post_type
            .ok_or(StepError::MissingField("post_type"))?;
        let tone = state
            .brand_voice
            .as_ref()
            .ok_or(StepError::MissingField("brand_voice"))?
            .tone
            .clone();

        let prompt = prompts::render(
            prompts::visual_concept(state.language()),
            &[
                ("generated_text", core_content),
                ("post_type", post_type.as_str()),
                ("tone", &tone),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        state.visual_concept = Some(concept_from_json(&value));
        Ok(())
    }
}
