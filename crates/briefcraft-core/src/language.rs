//! Prompt language detection.
//!
//! The pipeline answers in the language of the user's prompt. Detection is a
//! keyword count over two fixed lists: Spanish-majority prompts get Spanish,
//! everything else (ties included) defaults to English.

use serde::{Deserialize, Serialize};

/// Supported response languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Language configuration attached to a pipeline run before step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LanguageConfig {
    pub language: Language,
}

impl LanguageConfig {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

const SPANISH_KEYWORDS: &[&str] = &[
    "crear", "generar", "escribir", "hacer", "desarrollar", "construir", "diseñar",
    "campaña", "contenido", "redes", "sociales", "marca", "producto", "servicio",
    "empresa", "negocio", "cliente", "audiencia", "estrategia", "promoción",
    "publicidad", "para", "con", "una", "del", "las", "los", "que", "como",
];

const ENGLISH_KEYWORDS: &[&str] = &[
    "create", "generate", "write", "make", "develop", "build", "design",
    "marketing", "campaign", "post", "content", "social", "media",
    "brand", "product", "service", "company", "business", "customer",
    "audience", "engagement", "strategy", "promotion", "advertisement",
    "for", "with", "the", "and", "our", "new", "launch", "targeting",
];

/// Detect the prompt language by counting keyword hits in the lower-cased
/// prompt. Spanish wins only on a strict majority.
pub fn detect_language(prompt: &str) -> Language {
    let lower = prompt.to_lowercase();
    let spanish = SPANISH_KEYWORDS.iter().filter(|w| lower.contains(**w)).count();
    let english = ENGLISH_KEYWORDS.iter().filter(|w| lower.contains(**w)).count();

    if spanish > english {
        Language::Es
    } else {
        Language::En
    }
}
