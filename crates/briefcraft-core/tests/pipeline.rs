//! End-to-end pipeline tests against a scripted completion backend.

use async_trait::async_trait;
use serde_json::{json, Value};

use briefcraft_core::completion::{Completion, GenerateOptions, TextCompletion};
use briefcraft_core::error::CompletionError;
use briefcraft_core::models::PostType;
use briefcraft_core::pipeline::{Pipeline, PipelineConfig};
use briefcraft_core::Language;

const BODY_TEXT: &str = "Our revolutionary analytics platform launches today, bringing real-time insights to every marketing team around the world.";

/// Scripted backend: routes on prompt content, with per-scenario overrides.
#[derive(Default)]
struct MockCompletion {
    /// What the classifier answers with ("Launch" when empty).
    classify_as: Option<String>,
    /// What the format recommender answers with ("Image" when empty).
    format_as: Option<String>,
    /// Simulate a provider failure for the body-text generation call.
    fail_text_generation: bool,
    /// Return minimal caption output to exercise the fallbacks.
    sparse_captions: bool,
}

impl MockCompletion {
    fn route_structured(&self, prompt: &str) -> Result<Value, CompletionError> {
        if prompt.contains("extract structured information")
            || prompt.contains("extrae informacion estructurada")
        {
            return Ok(json!({
                "objective": "Announce the product launch",
                "audience": "Marketing managers",
                "brand_cues": ["innovative"],
                "key_facts": ["Launches today", "Real-time insights"],
                "urgency": "high",
                "platform": "instagram",
                "tone_indicators": ["confident"],
                "content_goals": ["awareness"]
            }));
        }
        if prompt.contains("exactly one post type") || prompt.contains("exactamente un tipo") {
            let post_type = self.classify_as.clone().unwrap_or_else(|| "Launch".to_string());
            return Ok(json!({ "post_type": post_type, "justification": "New product announcement" }));
        }
        if prompt.contains("Define the brand voice") || prompt.contains("Define la voz de marca") {
            return Ok(json!({
                "tone": "bold and confident",
                "personality": "expert",
                "style": "direct",
                "values": ["innovation"],
                "language_level": "professional"
            }));
        }
        if prompt.contains("verifiable facts") || prompt.contains("hechos verificables") {
            return Ok(json!({
                "key_facts": ["Launches today", "Processes data in real time"],
                "data_sources": ["product documentation"],
                "verification_status": "verified"
            }));
        }
        if prompt.contains("engagement elements") || prompt.contains("elementos de engagement") {
            if self.sparse_captions {
                return Ok(json!({ "caption": "hi" }));
            }
            return Ok(json!({
                "caption": "Real-time insights are finally here.",
                "call_to_action": "Start your free trial today",
                "hashtags": ["#analytics", "#launch"],
                "engagement_hooks": ["The wait is over."],
                "questions": ["What would you measure first?"]
            }));
        }
        if prompt.contains("visual concept") || prompt.contains("concepto visual") {
            return Ok(json!({
                "mood": "energetic",
                "color_palette": ["#112233", "#445566", "#778899"],
                "imagery_type": "product shots",
                "layout_style": "hero-first",
                "visual_elements": ["dashboard screenshot"],
                "design_notes": "Keep the logo small"
            }));
        }
        if prompt.contains("strategic reasoning") || prompt.contains("razonamiento estrategico") {
            return Ok(json!({
                "strategic_decisions": ["Lead with the benefit"],
                "audience_considerations": "Managers want proof of ROI quickly",
                "platform_optimization": "Square crop for the Instagram feed",
                "competitive_analysis": "Few competitors offer real-time data",
                "risk_assessment": "Low risk, claims are verifiable"
            }));
        }
        if prompt.contains("best visual format") || prompt.contains("mejor formato visual") {
            let format = self.format_as.clone().unwrap_or_else(|| "Image".to_string());
            return Ok(json!({ "format": format, "rationale": "Fits the platform" }));
        }
        if prompt.contains("video script") || prompt.contains("guion de video") {
            return Ok(json!({
                "segments": [
                    { "start": 0, "end": 5, "on_screen_text": "The wait is over.", "voiceover": "The wait is over." },
                    { "start": 5, "end": 30, "on_screen_text": "Real-time insights", "voiceover": BODY_TEXT }
                ],
                "total_duration": 30,
                "production_notes": "Fast cuts"
            }));
        }
        Err(CompletionError::Parse(format!(
            "unrouted structured prompt: {}",
            prompt.chars().take(60).collect::<String>()
        )))
    }
}

#[async_trait]
impl TextCompletion for MockCompletion {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerateOptions,
    ) -> Result<Completion, CompletionError> {
        if (prompt.contains("main body text") || prompt.contains("texto principal para"))
            && self.fail_text_generation
        {
            return Err(CompletionError::Provider {
                status: 500,
                body: "upstream overloaded".to_string(),
            });
        }
        Ok(Completion {
            content: BODY_TEXT.to_string(),
            model: "mock-model".to_string(),
        })
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _format_hint: &str,
        _options: &GenerateOptions,
    ) -> Result<Value, CompletionError> {
        self.route_structured(prompt)
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Backend that fails every call.
struct FailingCompletion;

#[async_trait]
impl TextCompletion for FailingCompletion {
    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerateOptions,
    ) -> Result<Completion, CompletionError> {
        Err(CompletionError::Transport("connection refused".to_string()))
    }

    async fn generate_structured(
        &self,
        _prompt: &str,
        _format_hint: &str,
        _options: &GenerateOptions,
    ) -> Result<Value, CompletionError> {
        Err(CompletionError::Transport("connection refused".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing-model"
    }
}

#[tokio::test]
async fn test_full_run_produces_brief() {
    let mock = MockCompletion::default();
    let pipeline = Pipeline::default();

    let state = pipeline
        .run("Launch our new analytics app on Instagram", None, &mock)
        .await;

    assert!(state.is_complete);
    assert!(!state.is_error);
    assert!(state.errors.is_empty());
    assert_eq!(state.current_step, "complete");
    assert_eq!(state.completed_steps.len(), 12);
    assert_eq!(state.agent_timings.len(), 12);
    assert!(state.processing_end.is_some());

    let brief = state.final_brief.expect("brief assembled");
    assert_eq!(brief.post_type, PostType::Launch);
    assert!(brief.core_content.contains("analytics"));
    assert_eq!(brief.engagement_elements.hashtags, vec!["#analytics", "#launch"]);
    assert_eq!(brief.metadata.model_used, "mock-model");
    assert_eq!(brief.metadata.agent_timings.len(), 12);
}

#[tokio::test]
async fn test_failed_step_does_not_stop_the_run() {
    let mock = MockCompletion {
        fail_text_generation: true,
        ..Default::default()
    };
    let pipeline = Pipeline::default();

    let state = pipeline.run("Launch our new analytics app", None, &mock).await;

    // Every step still ran and was timed, including the ones that then
    // failed on the missing body text.
    assert_eq!(state.agent_timings.len(), 12);
    assert!(state.is_error);
    assert!(state.errors.iter().any(|e| e.starts_with("[text_generator]:")));

    // Steps independent of the body text still completed, including the
    // enrichment steps, which read whatever exists instead of requiring it.
    assert!(state.completed_steps.contains(&"visual_format_recommendation".to_string()));
    assert!(state.completed_steps.contains(&"brand_voice".to_string()));
    assert!(state.completed_steps.contains(&"result_optimization".to_string()));
    assert!(state.completed_steps.contains(&"contextual_awareness".to_string()));
    assert!(!state.completed_steps.contains(&"caption_creation".to_string()));

    // No brief, and the finalizer names what is missing.
    assert!(state.final_brief.is_none());
    assert!(state.is_complete);
    let finalizer_error = state
        .errors
        .iter()
        .find(|e| e.starts_with("[finalizer]:"))
        .expect("finalizer error recorded");
    assert!(finalizer_error.contains("core_content"));
    assert!(finalizer_error.contains("engagement_elements"));
}

#[tokio::test]
async fn test_dead_backend_never_escapes_the_pipeline() {
    let pipeline = Pipeline::default();

    let state = pipeline
        .run("Launch our new analytics app", None, &FailingCompletion)
        .await;

    assert!(state.is_error);
    assert!(state.is_complete);
    assert!(state.errors[0].starts_with("[prompt_analyzer]:"));
    assert!(state.completed_steps.is_empty());
    assert_eq!(state.agent_timings.len(), 12);
    assert!(state.final_brief.is_none());
}

#[tokio::test]
async fn test_halt_on_error_stops_after_first_failure() {
    let mock = MockCompletion {
        fail_text_generation: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(PipelineConfig { halt_on_error: true });

    let state = pipeline.run("Launch our new analytics app", None, &mock).await;

    // Four steps succeeded, the fifth failed, nothing after it ran.
    assert_eq!(state.completed_steps.len(), 4);
    assert_eq!(state.agent_timings.len(), 5);
    assert!(state.is_error);
    assert!(state.final_brief.is_none());
}

#[tokio::test]
async fn test_sparse_captions_are_repaired() {
    let mock = MockCompletion {
        sparse_captions: true,
        ..Default::default()
    };
    let pipeline = Pipeline::default();

    let state = pipeline.run("Launch our new analytics app", None, &mock).await;

    let brief = state.final_brief.expect("brief assembled");
    let elements = &brief.engagement_elements;
    assert_eq!(elements.caption, "Discover more about this amazing content");
    assert_eq!(elements.call_to_action, "Learn more today!");
    assert_eq!(elements.hashtags, vec!["#marketing", "#socialmedia", "#content"]);
    assert_eq!(elements.engagement_hooks, vec!["Did you know?"]);
}

#[tokio::test]
async fn test_enrichment_records_leave_body_text_untouched() {
    let mock = MockCompletion::default();
    let pipeline = Pipeline::default();

    let state = pipeline.run("Launch our new analytics app", None, &mock).await;

    // The body text is written once by the generator; the enrichment steps
    // record their rewrites in their own output instead of replacing it.
    assert_eq!(state.core_content.as_deref(), Some(BODY_TEXT));

    let optimizations = state.result_optimizations.expect("optimizations present");
    assert_eq!(optimizations["optimized_content"], BODY_TEXT);
    assert_eq!(optimizations["industry"], "technology");

    let context = state.contextual_awareness.expect("context present");
    assert_eq!(context["adapted_content"], BODY_TEXT);
    assert_eq!(context["context_applied"], true);
}

#[tokio::test]
async fn test_unknown_post_type_is_rejected() {
    let mock = MockCompletion {
        classify_as: Some("Viral".to_string()),
        ..Default::default()
    };
    let pipeline = Pipeline::default();

    let state = pipeline.run("Make us go viral", None, &mock).await;

    assert!(state.is_error);
    assert!(state
        .errors
        .iter()
        .any(|e| e.contains("Invalid post type: Viral")));
    assert!(state.post_type.is_none());
    assert!(state.final_brief.is_none());
}

#[tokio::test]
async fn test_video_format_gets_model_script() {
    let mock = MockCompletion {
        format_as: Some("Video".to_string()),
        ..Default::default()
    };
    let pipeline = Pipeline::default();

    let state = pipeline.run("Launch our new analytics app", None, &mock).await;

    let script = state.video_script.expect("script present");
    let segments = script["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(script["production_notes"], "Fast cuts");

    let rec = state.visual_format_recommendation.expect("recommendation present");
    assert_eq!(rec["format"], "Video");
    assert!(rec["confidence"].as_f64().unwrap() > 0.8);
}

#[tokio::test]
async fn test_non_video_format_gets_skeleton_script() {
    let mock = MockCompletion::default();
    let pipeline = Pipeline::default();

    let state = pipeline.run("Launch our new analytics app", None, &mock).await;

    let script = state.video_script.expect("script present");
    let segments = script["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(script["total_duration"], 30);
}

#[tokio::test]
async fn test_spanish_prompt_is_detected() {
    let mock = MockCompletion::default();
    let pipeline = Pipeline::default();

    let state = pipeline
        .run(
            "Crea una publicacion para el lanzamiento de nuestra nueva app de analitica para redes sociales",
            None,
            &mock,
        )
        .await;

    assert_eq!(state.language(), Language::Es);
    assert!(state.final_brief.is_some());
}
