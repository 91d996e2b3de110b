//! Writes a short-form video script, or a minimal skeleton for non-video
//! formats so downstream consumers always have segments to work with.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, Step};

const FORMAT_HINT: &str = r#"{"segments": [{"start": 0, "end": 3, "on_screen_text": "...", "voiceover": "..."}], "total_duration": 30, "production_notes": "..."}"#;

pub struct VideoScripter;

/// Target duration and platform-native hashtags per publishing platform.
fn platform_profile(platform: &str) -> (u32, &'static [&'static str]) {
    match platform.to_lowercase().as_str() {
        "tiktok" => (30, &["#fyp", "#tiktok"]),
        "instagram" => (30, &["#reels"]),
        "youtube" | "youtube_shorts" => (60, &["#shorts"]),
        "linkedin" => (45, &["#linkedin"]),
        _ => (30, &[]),
    }
}

/// Three-segment skeleton used when the recommended format is not video.
/// No model call is made for these.
fn basic_script(core_content: &str, hook: &str, cta: &str, duration: u32) -> Value {
    let body: String = core_content.chars().take(200).collect();
    let cta_start = duration.saturating_sub(5);
    json!({
        "segments": [
            { "start": 0, "end": 3, "on_screen_text": hook, "voiceover": hook },
            { "start": 3, "end": cta_start, "on_screen_text": body, "voiceover": body },
            { "start": cta_start, "end": duration, "on_screen_text": cta, "voiceover": cta },
        ],
        "total_duration": duration,
        "production_notes": "Skeleton script; recommended format is not video",
    })
}

/// Guard the model's script shape: a response without segments gets a single
/// hook segment so the script is still usable, and the platform hashtags are
/// appended either way.
fn heal_script(mut value: Value, hook: &str, duration: u32, hashtags: &[&str]) -> Value {
    let empty = value
        .get("segments")
        .and_then(|s| s.as_array())
        .map(|arr| arr.is_empty())
        .unwrap_or(true);

    if empty {
        value["segments"] = json!([
            { "start": 0, "end": 3, "on_screen_text": hook, "voiceover": hook }
        ]);
    }
    if value.get("total_duration").and_then(|d| d.as_u64()).is_none() {
        value["total_duration"] = json!(duration);
    }
    value["platform_hashtags"] = json!(hashtags);
    value
}

#[async_trait]
impl Step for VideoScripter {
    fn id(&self) -> &'static str {
        "video_scripter"
    }

    fn label(&self) -> &'static str {
        "video_script"
    }

    fn next(&self) -> &'static str {
        "result_optimization"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        let core_content = state
            .core_content
            .clone()
            .ok_or(StepError::MissingField("core_content"))?;

        let format = state
            .visual_format_recommendation
            .as_ref()
            .map(|r| json_str(r, "format", "Video"))
            .ok_or(StepError::MissingField("visual_format_recommendation"))?;

        let platform = state
            .prompt_analysis
            .as_ref()
            .and_then(|a| a.platform.clone())
            .unwrap_or_else(|| "social_media".to_string());
        let (duration, hashtags) = platform_profile(&platform);

        let (hook, cta) = state
            .engagement_elements
            .as_ref()
            .map(|e| {
                (
                    e.engagement_hooks
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "Did you know?".to_string()),
                    e.call_to_action.clone(),
                )
            })
            .unwrap_or_else(|| ("Did you know?".to_string(), "Learn more today!".to_string()));

        if format != "Video" {
            state.video_script = Some(basic_script(&core_content, &hook, &cta, duration));
            return Ok(());
        }

        let prompt = prompts::render(
            prompts::video_scripter(state.language()),
            &[
                ("generated_text", &core_content),
                ("hook", &hook),
                ("cta", &cta),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        state.video_script = Some(heal_script(value, &hook, duration, hashtags));
        Ok(())
    }
}
