//! Typed output records produced by the pipeline steps.
//!
//! Each record is constructed once from a structured completion response
//! (missing fields tolerated via `#[serde(default)]`, then healed by the
//! owning step's default-filling) and never mutated afterwards.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of social post types the classifier may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostType {
    Launch,
    Educational,
    Promotional,
    Storytelling,
    Engagement,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Launch => "Launch",
            PostType::Educational => "Educational",
            PostType::Promotional => "Promotional",
            PostType::Storytelling => "Storytelling",
            PostType::Engagement => "Engagement",
        }
    }

    /// Parse the classifier's string output. Anything outside the closed set
    /// is a classification failure, not a default-fill.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "launch" => Some(PostType::Launch),
            "educational" => Some(PostType::Educational),
            "promotional" => Some(PostType::Promotional),
            "storytelling" => Some(PostType::Storytelling),
            "engagement" => Some(PostType::Engagement),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reading of the user's marketing prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptAnalysis {
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub brand_cues: Vec<String>,
    #[serde(default)]
    pub key_facts: Vec<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub tone_indicators: Vec<String>,
    #[serde(default)]
    pub content_goals: Vec<String>,
}

/// Brand voice and style guidelines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandVoice {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub language_level: String,
}

/// Factual basis the content must stay grounded in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactualGrounding {
    #[serde(default)]
    pub key_facts: Vec<String>,
    #[serde(default)]
    pub data_sources: Vec<String>,
    #[serde(default)]
    pub verification_status: String,
}

/// Caption, CTA, hashtags and hooks for the post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementElements {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub call_to_action: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub engagement_hooks: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// Designer-facing visual direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualConcept {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub imagery_type: String,
    #[serde(default)]
    pub layout_style: String,
    #[serde(default)]
    pub visual_elements: Vec<String>,
    #[serde(default)]
    pub design_notes: String,
}

/// Strategic reasoning behind the content decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reasoning {
    #[serde(default)]
    pub strategic_decisions: Vec<String>,
    #[serde(default)]
    pub audience_considerations: String,
    #[serde(default)]
    pub platform_optimization: String,
    #[serde(default)]
    pub competitive_analysis: String,
    #[serde(default)]
    pub risk_assessment: String,
}

/// Run metadata attached to the assembled brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub processing_time_seconds: f64,
    pub agent_timings: HashMap<String, f64>,
    pub model_used: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// The composite output: assembled once, at finalize time, only when every
/// core component is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBrief {
    pub post_type: PostType,
    pub core_content: String,
    pub engagement_elements: EngagementElements,
    pub visual_concept: VisualConcept,
    pub brand_voice: BrandVoice,
    pub factual_grounding: FactualGrounding,
    pub reasoning: Reasoning,
    pub metadata: ProcessingMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_type_parse_valid() {
        assert_eq!(PostType::parse("Launch"), Some(PostType::Launch));
        assert_eq!(PostType::parse(" Educational "), Some(PostType::Educational));
    }

    #[test]
    fn test_post_type_parse_rejects_unknown() {
        assert_eq!(PostType::parse("Viral"), None);
        assert_eq!(PostType::parse(""), None);
    }

    #[test]
    fn test_post_type_parse_is_case_insensitive() {
        assert_eq!(PostType::parse("launch"), Some(PostType::Launch));
        assert_eq!(PostType::parse("ENGAGEMENT"), Some(PostType::Engagement));
    }

    #[test]
    fn test_records_tolerate_missing_fields() {
        let analysis: PromptAnalysis = serde_json::from_value(serde_json::json!({
            "objective": "Sell more"
        }))
        .unwrap();
        assert_eq!(analysis.objective, "Sell more");
        assert!(analysis.audience.is_empty());
        assert!(analysis.brand_cues.is_empty());
    }

    #[test]
    fn test_post_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&PostType::Storytelling).unwrap();
        assert_eq!(json, "\"Storytelling\"");
    }
}
