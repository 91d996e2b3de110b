//! Builds the engagement layer: caption, call to action, hashtags, hooks.

use async_trait::async_trait;
use serde_json::Value;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::EngagementElements;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, json_str_vec, Step};

const FORMAT_HINT: &str = r##"{"caption": "...", "call_to_action": "...", "hashtags": ["#..."], "engagement_hooks": ["..."], "questions": ["..."]}"##;

const FALLBACK_CAPTION: &str = "Discover more about this amazing content";
const FALLBACK_HASHTAGS: [&str; 3] = ["#marketing", "#socialmedia", "#content"];
const MAX_HASHTAGS: usize = 10;

pub struct CaptionCreator;

/// Normalize hashtags: ensure the '#' prefix, drop empties, cap the count.
fn normalize_hashtags(raw: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = raw
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && t != "#")
        .map(|t| {
            if t.starts_with('#') {
                t
            } else {
                format!("#{}", t)
            }
        })
        .collect();

    if tags.is_empty() {
        tags = FALLBACK_HASHTAGS.iter().map(|t| t.to_string()).collect();
    }
    tags.truncate(MAX_HASHTAGS);
    tags
}

/// Assemble engagement elements, repairing anything too short or absent so the
/// brief always ships a usable caption block.
fn elements_from_json(value: &Value) -> EngagementElements {
    let mut caption = json_str(value, "caption", "");
    if caption.chars().count() < 10 {
        caption = FALLBACK_CAPTION.to_string();
    }

    let mut call_to_action = json_str(value, "call_to_action", "");
    if call_to_action.chars().count() < 5 {
        call_to_action = "Learn more today!".to_string();
    }

    let hashtags = normalize_hashtags(json_str_vec(value, "hashtags", &[]));

    let mut engagement_hooks = json_str_vec(value, "engagement_hooks", &[]);
    if engagement_hooks.is_empty() {
        engagement_hooks.push("Did you know?".to_string());
    }

    let mut questions = json_str_vec(value, "questions", &[]);
    if questions.is_empty() {
        questions.push("What do you think?".to_string());
    }

    EngagementElements {
        caption,
        call_to_action,
        hashtags,
        engagement_hooks,
        questions,
    }
}

#[async_trait]
impl Step for CaptionCreator {
    fn id(&self) -> &'static str {
        "caption_creator"
    }

    fn label(&self) -> &'static str {
        "caption_creation"
    }

    fn next(&self) -> &'static str {
        "visual_concept"
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
            .clone()
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
            prompts::caption_creator(state.language()),
            &[
                ("generated_text", &core_content),
                ("post_type", post_type.as_str()),
                ("tone", &tone),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        state.engagement_elements = Some(elements_from_json(&value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_hint_is_valid_json() {
        let parsed: Value = serde_json::from_str(FORMAT_HINT).unwrap();
        assert_eq!(parsed["hashtags"][0], "#...");
    }

    #[test]
    fn test_short_caption_gets_fixed_fallback() {
        let elements = elements_from_json(&json!({"caption": "hi"}));
        assert_eq!(elements.caption, FALLBACK_CAPTION);
    }

    #[test]
    fn test_caption_fallback_ignores_generated_content() {
        let a = elements_from_json(&json!({"caption": ""}));
        let b = elements_from_json(&json!({"caption": "short"}));
        assert_eq!(a.caption, b.caption);
        assert_eq!(a.caption, "Discover more about this amazing content");
    }

    #[test]
    fn test_short_cta_replaced() {
        let elements = elements_from_json(&json!({"call_to_action": "go"}));
        assert_eq!(elements.call_to_action, "Learn more today!");
    }

    #[test]
    fn test_hashtags_prefixed_and_capped() {
        let tags: Vec<String> = (0..15).map(|i| format!("tag{}", i)).collect();
        let normalized = normalize_hashtags(tags);
        assert_eq!(normalized.len(), MAX_HASHTAGS);
        assert!(normalized.iter().all(|t| t.starts_with('#')));
    }

    #[test]
    fn test_empty_hashtags_get_fallbacks() {
        let elements = elements_from_json(&json!({}));
        assert_eq!(
            elements.hashtags,
            vec!["#marketing", "#socialmedia", "#content"]
        );
        assert_eq!(elements.engagement_hooks, vec!["Did you know?"]);
        assert_eq!(elements.questions, vec!["What do you think?"]);
    }

    #[test]
    fn test_good_values_pass_through() {
        let elements = elements_from_json(
            &json!({
                "caption": "Real-time insights, finally.",
                "call_to_action": "Try it free for 30 days",
                "hashtags": ["#analytics", "data"]
            }),
        );
        assert_eq!(elements.caption, "Real-time insights, finally.");
        assert_eq!(elements.hashtags, vec!["#analytics", "#data"]);
    }
}
