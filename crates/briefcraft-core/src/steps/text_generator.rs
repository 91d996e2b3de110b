//! Generates the main body text of the post.

use async_trait::async_trait;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{clean_generated_text, Step};

pub struct TextGenerator;

#[async_trait]
impl Step for TextGenerator {
    fn id(&self) -> &'static str {
        "text_generator"
    }

    fn label(&self) -> &'static str {
        "text_generation"
    }

    fn next(&self) -> &'static str {
        "caption_creation"
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
        let voice = state
            .brand_voice
            .as_ref()
            .ok_or(StepError::MissingField("brand_voice"))?;

        let facts = state
            .factual_grounding
            .as_ref()
            .ok_or(StepError::MissingField("factual_grounding"))?
            .key_facts
            .join("; ");

        let prompt = prompts::render(
            prompts::text_generator(state.language()),
            &[
                ("post_type", post_type.as_str()),
                ("objective", &analysis.objective),
                ("audience", &analysis.audience),
                ("tone", &voice.tone),
                ("facts", &facts),
            ],
        );

        let options = GenerateOptions {
            temperature: Some(0.7),
            max_tokens: Some(1024),
        };
        let result = completion.generate(&prompt, &options).await?;

        state.core_content = Some(clean_generated_text(&result.content)?);
        Ok(())
    }
}
