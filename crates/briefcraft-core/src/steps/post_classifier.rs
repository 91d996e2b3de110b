//! Classifies the request into one of the five supported post types.

use async_trait::async_trait;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::PostType;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, Step};

const FORMAT_HINT: &str = r#"{"post_type": "Launch|Educational|Promotional|Storytelling|Engagement", "justification": "..."}"#;

pub struct PostClassifier;

/// Parse the classifier's answer. Anything outside the five supported types
/// is an error; the pipeline does not guess a post type.
fn classify(raw: &str) -> Result<PostType, StepError> {
    PostType::parse(raw.trim())
        .ok_or_else(|| StepError::Validation(format!("Invalid post type: {}", raw.trim())))
}

#[async_trait]
impl Step for PostClassifier {
    fn id(&self) -> &'static str {
        "post_classifier"
    }

    fn label(&self) -> &'static str {
        "post_classification"
    }

    fn next(&self) -> &'static str {
        "brand_voice"
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

        let prompt = prompts::render(
            prompts::post_classifier(state.language()),
            &[
                ("objective", &analysis.objective),
                ("audience", &analysis.audience),
                ("goals", &analysis.content_goals.join(", ")),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        let post_type = classify(&json_str(&value, "post_type", ""))?;
        let justification = json_str(
            &value,
            "justification",
            "Best fit for the stated objective and audience",
        );

        state.post_type = Some(post_type);
        state.post_justification = Some(justification);
        Ok(())
    }
}
