//! Derives seasonal context for the post and proposes an adapted variant of
//! the body text. The variant lands in the context record; the body text
//! itself stays as generated.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::json;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{clean_generated_text, Step};

pub struct ContextualAwareness;

/// Seasonal trend keywords keyed by calendar month.
fn trends_for_month(month: u32) -> &'static [&'static str] {
    match month {
        1 => &["new year resolutions", "fresh starts", "goal setting"],
        2 => &["valentine's day", "self-care"],
        3 => &["spring renewal", "women's history month"],
        4 => &["spring cleaning", "earth day"],
        5 => &["outdoor season", "mother's day"],
        6 => &["summer kickoff", "pride month", "father's day"],
        7 => &["summer peak", "vacation season"],
        8 => &["back to school", "late summer"],
        9 => &["fall transition", "productivity reset"],
        10 => &["halloween", "autumn cozy"],
        11 => &["black friday", "gratitude", "holiday prep"],
        12 => &["holidays", "year in review", "gifting"],
        _ => &[],
    }
}

/// Seasonal hashtags matching the month's trends.
fn hashtags_for_month(month: u32) -> &'static [&'static str] {
    match month {
        1 => &["#newyear", "#freshstart"],
        2 => &["#valentines"],
        3 | 4 | 5 => &["#spring"],
        6 | 7 | 8 => &["#summer"],
        9 | 10 => &["#fall"],
        11 => &["#blackfriday", "#gratitude"],
        12 => &["#holidays"],
        _ => &[],
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[async_trait]
impl Step for ContextualAwareness {
    fn id(&self) -> &'static str {
        "contextual_awareness"
    }

    fn label(&self) -> &'static str {
        "contextual_awareness"
    }

    fn next(&self) -> &'static str {
        "final_assembly"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        let core_content = state.core_content.clone().unwrap_or_default();

        let month = Utc::now().month();
        let trends = trends_for_month(month);
        let trends_text = trends.join(", ");

        let prompt = prompts::render(
            prompts::contextual_awareness(state.language()),
            &[
                ("generated_text", &core_content),
                ("month", month_name(month)),
                ("trends", &trends_text),
            ],
        );

        let options = GenerateOptions {
            temperature: Some(0.5),
            max_tokens: Some(1024),
        };
        let result = completion.generate(&prompt, &options).await?;
        let adapted = clean_generated_text(&result.content)?;

        state.contextual_awareness = Some(json!({
            "month": month_name(month),
            "trends": trends,
            "seasonal_hashtags": hashtags_for_month(month),
            "recommendations": [
                "Publish while the seasonal window is active",
                "Pair the post with the seasonal hashtags",
            ],
            "context_applied": true,
            "adapted_content": adapted,
        }));
        Ok(())
    }
}
