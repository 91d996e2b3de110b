//! briefcraft-core: a content-brief generation pipeline for marketing posts.
//!
//! Twelve specialized steps run in a fixed order over a shared [`BriefState`],
//! each consuming upstream components and producing its own. A finalizer
//! assembles the [`ContentBrief`] once every core component is present. The
//! only external dependency is a [`TextCompletion`] implementation; everything
//! else is deterministic and testable offline.

pub mod completion;
pub mod error;
pub mod language;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod state;
pub mod steps;

pub use completion::{
    Backend, Completion, CompletionConfig, GenerateOptions, HttpCompletionClient, TextCompletion,
};
pub use error::{CompletionError, StepError};
pub use language::{detect_language, Language, LanguageConfig};
pub use models::{
    BrandVoice, ContentBrief, EngagementElements, FactualGrounding, PostType, ProcessingMetadata,
    PromptAnalysis, Reasoning, VisualConcept,
};
pub use pipeline::{Pipeline, PipelineConfig};
pub use state::BriefState;
