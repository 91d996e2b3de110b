//! Grounds the content in verifiable facts before any text is written.

use async_trait::async_trait;
use serde_json::Value;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::FactualGrounding;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{json_str, json_str_vec, Step};

const FORMAT_HINT: &str = r#"{"key_facts": ["..."], "data_sources": ["..."], "verification_status": "verified|partial|unverified"}"#;

pub struct FactGrounding;

/// Model facts win; when the model returns none, fall back to the facts the
/// analyzer already extracted from the prompt. A grounding with no facts at
/// all gets a placeholder and is marked pending rather than verified.
fn grounding_from_json(value: &Value, analysis_facts: &[String]) -> FactualGrounding {
    let mut key_facts = json_str_vec(value, "key_facts", &[]);
    if key_facts.is_empty() {
        key_facts = analysis_facts.to_vec();
    }

    let mut verification_status = json_str(value, "verification_status", "verified");
    if key_facts.is_empty() {
        key_facts.push("Product information to be verified".to_string());
        verification_status = "pending".to_string();
    }

    FactualGrounding {
        key_facts,
        data_sources: json_str_vec(value, "data_sources", &["brand guidelines", "product documentation"]),
        verification_status,
    }
}

#[async_trait]
impl Step for FactGrounding {
    fn id(&self) -> &'static str {
        "fact_grounding"
    }

    fn label(&self) -> &'static str {
        "fact_grounding"
    }

    fn next(&self) -> &'static str {
        "text_generation"
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

        let analysis_facts = analysis.key_facts.clone();
        let prompt = prompts::render(
            prompts::fact_grounding(state.language()),
            &[
                ("key_facts", &analysis_facts.join("; ")),
                ("objective", &analysis.objective),
            ],
        );

        let value = completion
            .generate_structured(&prompt, FORMAT_HINT, &GenerateOptions::default())
            .await?;

        state.factual_grounding = Some(grounding_from_json(&value, &analysis_facts));
        Ok(())
    }
}
