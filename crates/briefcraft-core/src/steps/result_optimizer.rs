//! Proposes an optimized rewrite of the body text from simulated historical
//! performance patterns. The rewrite lands in the optimizations record; the
//! body text itself stays as generated.
//!
//! The performance store is an in-memory table keyed by post type and
//! industry. A real deployment would back this with an analytics warehouse;
//! the interface stays the same.

use async_trait::async_trait;
use serde_json::json;

use crate::completion::{GenerateOptions, TextCompletion};
use crate::error::StepError;
use crate::models::PostType;
use crate::prompts;
use crate::state::BriefState;
use crate::steps::{clean_generated_text, Step};

pub struct ResultOptimizer;

/// Industry detected from prompt keywords; "general" when nothing matches.
fn detect_industry(prompt: &str) -> &'static str {
    let lower = prompt.to_lowercase();
    const TABLE: [(&str, &[&str]); 6] = [
        ("technology", &["software", "app", "tech", "ai", "saas", "platform"]),
        ("fashion", &["fashion", "clothing", "apparel", "style", "wear"]),
        ("food", &["food", "restaurant", "recipe", "meal", "drink"]),
        ("fitness", &["fitness", "workout", "gym", "health", "wellness"]),
        ("finance", &["finance", "bank", "invest", "crypto", "insurance"]),
        ("travel", &["travel", "hotel", "flight", "destination", "tour"]),
    ];

    for (industry, keywords) in TABLE {
        if keywords.iter().any(|k| lower.contains(k)) {
            return industry;
        }
    }
    "general"
}

/// Insights when the post type never got classified.
const GENERAL_INSIGHTS: &[&str] = &[
    "Posts with a single clear message outperform multi-topic posts",
    "A strong opening line is the biggest driver of read-through",
];

/// Simulated performance insights per post type.
fn insights_for(post_type: PostType) -> &'static [&'static str] {
    match post_type {
        PostType::Launch => &[
            "Posts with a concrete availability date see 30% more saves",
            "Leading with the product benefit outperforms leading with the name",
        ],
        PostType::Educational => &[
            "Content opening with a surprising stat holds attention longest",
            "One takeaway per post outperforms multi-point threads",
        ],
        PostType::Promotional => &[
            "Urgency framing lifts click-through when paired with a clear deadline",
            "Price anchoring increases conversion on discount posts",
        ],
        PostType::Storytelling => &[
            "First-person narratives earn 2x the comments of brand-voice posts",
            "A mid-story turning point keeps completion rates high",
        ],
        PostType::Engagement => &[
            "Direct questions in the first line double reply rates",
            "Polarizing-but-safe prompts drive the most shares",
        ],
    }
}

#[async_trait]
impl Step for ResultOptimizer {
    fn id(&self) -> &'static str {
        "result_optimizer"
    }

    fn label(&self) -> &'static str {
        "result_optimization"
    }

    fn next(&self) -> &'static str {
        "contextual_awareness"
    }

    async fn apply(
        &self,
        state: &mut BriefState,
        completion: &dyn TextCompletion,
    ) -> Result<(), StepError> {
        let core_content = state.core_content.clone().unwrap_or_default();
        let post_type = state.post_type;

        let industry = detect_industry(&state.input_prompt);
        let platform = state
            .prompt_analysis
            .as_ref()
            .and_then(|a| a.platform.clone())
            .unwrap_or_else(|| "social_media".to_string());
        let format = state
            .visual_format_recommendation
            .as_ref()
            .map(|r| crate::steps::json_str(r, "format", "Image"))
            .unwrap_or_else(|| "Image".to_string());

        let mut insights: Vec<&str> = post_type
            .map(insights_for)
            .unwrap_or(GENERAL_INSIGHTS)
            .to_vec();
        if format == "Video" {
            insights.push("Videos under 30 seconds retain the most viewers");
        }
        let insights_text = insights.join("; ");

        let prompt = prompts::render(
            prompts::result_optimizer(state.language()),
            &[
                ("generated_text", &core_content),
                ("post_type", post_type.map(|p| p.as_str()).unwrap_or("general")),
                ("insights", &insights_text),
            ],
        );

        let options = GenerateOptions {
            temperature: Some(0.5),
            max_tokens: Some(1024),
        };
        let result = completion.generate(&prompt, &options).await?;
        let optimized = clean_generated_text(&result.content)?;

        state.result_optimizations = Some(json!({
            "industry": industry,
            "platform": platform,
            "visual_format": format,
            "insights_applied": insights,
            "confidence": 0.75,
            "data_source": "Simulated historical performance database",
            "original_length": core_content.chars().count(),
            "optimized_length": optimized.chars().count(),
            "optimized_content": optimized,
        }));
        Ok(())
    }
}
