//! Text-completion capability — the pipeline's only external collaborator.
//!
//! Steps call exactly one of `generate` / `generate_structured` per run.
//! `HttpCompletionClient` talks to an Anthropic-compatible Messages API or an
//! OpenAI-compatible chat API over HTTP. Textual recovery of malformed
//! structured output (regex JSON extraction) lives here, never in step logic.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CompletionError;

/// Per-call generation options.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// A plain-text completion.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
}

/// The completion capability every pipeline step consumes.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Generate free text from a prompt.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Completion, CompletionError>;

    /// Generate structured output. `format_hint` describes the expected shape
    /// and is appended to the prompt; the result is parsed JSON.
    async fn generate_structured(
        &self,
        prompt: &str,
        format_hint: &str,
        options: &GenerateOptions,
    ) -> Result<Value, CompletionError>;

    /// Name of the backing model/implementation, recorded in brief metadata.
    fn model_name(&self) -> &str;
}

/// Which wire protocol the HTTP client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Anthropic-compatible `POST {base_url}/v1/messages`.
    Anthropic,
    /// OpenAI-compatible `POST {base_url}/chat/completions`.
    OpenAi,
}

/// Configuration for the HTTP completion client.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub backend: Backend,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl CompletionConfig {
    /// Build a config from environment variables:
    /// `BRIEFCRAFT_BACKEND` (anthropic|openai), `BRIEFCRAFT_BASE_URL`,
    /// `BRIEFCRAFT_API_KEY` (falls back to `ANTHROPIC_API_KEY` /
    /// `OPENAI_API_KEY`), `BRIEFCRAFT_MODEL`.
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::resolve(None, None, None, None)
    }

    /// Build a config from explicit overrides, falling back to the
    /// environment for anything not supplied. This is the single place that
    /// decides precedence: override, then env var, then built-in default.
    pub fn resolve(
        backend: Option<Backend>,
        base_url: Option<String>,
        model: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, CompletionError> {
        let backend = backend.unwrap_or_else(|| {
            match std::env::var("BRIEFCRAFT_BACKEND").as_deref() {
                Ok("openai") => Backend::OpenAi,
                _ => Backend::Anthropic,
            }
        });

        let base_url = base_url.unwrap_or_else(|| match backend {
            Backend::Anthropic => {
                resolve_env_vars("${BRIEFCRAFT_BASE_URL:-https://api.anthropic.com}")
            }
            Backend::OpenAi => {
                resolve_env_vars("${BRIEFCRAFT_BASE_URL:-https://api.openai.com/v1}")
            }
        });

        let api_key = api_key
            .or_else(|| std::env::var("BRIEFCRAFT_API_KEY").ok())
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                CompletionError::Config(
                    "No API key found. Set BRIEFCRAFT_API_KEY, ANTHROPIC_API_KEY, or OPENAI_API_KEY"
                        .to_string(),
                )
            })?;

        let model = model
            .unwrap_or_else(|| resolve_env_vars("${BRIEFCRAFT_MODEL:-claude-sonnet-4-20250514}"));

        Ok(Self {
            backend,
            base_url,
            api_key,
            model,
        })
    }
}

/// HTTP implementation of [`TextCompletion`].
pub struct HttpCompletionClient {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl HttpCompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    pub fn from_env() -> Result<Self, CompletionError> {
        Ok(Self::new(CompletionConfig::from_env()?))
    }

    async fn call_anthropic(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Completion, CompletionError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));

        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": options.max_tokens.unwrap_or(4096),
            "messages": [{ "role": "user", "content": prompt }]
        });
        if let Some(temp) = options.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        tracing::debug!(
            "[Completion] Calling Anthropic API: {} (model: {})",
            url,
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content = json
            .get("content")
            .and_then(|c| c.as_array())
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|b| {
                        (b.get("type").and_then(|t| t.as_str()) == Some("text"))
                            .then(|| b.get("text").and_then(|t| t.as_str()))
                            .flatten()
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        let model = json
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or(&self.config.model)
            .to_string();

        Ok(Completion { content, model })
    }

    async fn call_openai(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Completion, CompletionError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }]
        });
        if let Some(temp) = options.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = options.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }

        tracing::debug!(
            "[Completion] Calling OpenAI-compatible API: {} (model: {})",
            url,
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.pointer("/message/content"))
            .and_then(|c| c.as_str())
            .unwrap_or("")
            .to_string();

        let model = json
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or(&self.config.model)
            .to_string();

        Ok(Completion { content, model })
    }
}

#[async_trait]
impl TextCompletion for HttpCompletionClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Completion, CompletionError> {
        match self.config.backend {
            Backend::Anthropic => self.call_anthropic(prompt, options).await,
            Backend::OpenAi => self.call_openai(prompt, options).await,
        }
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        format_hint: &str,
        options: &GenerateOptions,
    ) -> Result<Value, CompletionError> {
        let full_prompt = format!(
            "{}\n\nRespond ONLY with valid JSON. Expected format: {}",
            prompt, format_hint
        );
        let completion = self.generate(&full_prompt, options).await?;
        parse_structured(&completion.content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Parse a model response into JSON, falling back to extracting the first
/// brace-delimited block when the response wraps the JSON in prose or fences.
pub(crate) fn parse_structured(content: &str) -> Result<Value, CompletionError> {
    let trimmed = content.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    // Strip markdown code fences if present.
    let unfenced = trimmed
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    if let Ok(value) = serde_json::from_str::<Value>(unfenced) {
        return Ok(value);
    }

    // Last resort: first {...} block in the text.
    static BRACE_BLOCK: OnceLock<regex::Regex> = OnceLock::new();
    let re = BRACE_BLOCK.get_or_init(|| regex::Regex::new(r"(?s)\{.*\}").expect("valid regex"));
    if let Some(m) = re.find(content) {
        if let Ok(value) = serde_json::from_str::<Value>(m.as_str()) {
            return Ok(value);
        }
    }

    let preview: String = content.chars().take(120).collect();
    Err(CompletionError::Parse(format!(
        "response is not valid JSON: {}",
        preview
    )))
}

/// Resolve environment variable references in a string.
/// Supports `${ENV_VAR}` and `${ENV_VAR:-default}` syntax.
pub fn resolve_env_vars(input: &str) -> String {
    static ENV_REF: OnceLock<regex::Regex> = OnceLock::new();
    let re = ENV_REF.get_or_init(|| regex::Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));
    re.replace_all(input, |caps: &regex::Captures| {
        let var_expr = &caps[1];
        if let Some(idx) = var_expr.find(":-") {
            let var_name = &var_expr[..idx];
            let default_val = &var_expr[idx + 2..];
            std::env::var(var_name).unwrap_or_else(|_| default_val.to_string())
        } else {
            std::env::var(var_expr).unwrap_or_else(|_| format!("${{{}}}", var_expr))
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_plain_json() {
        let value = parse_structured(r#"{"tone": "confident"}"#).unwrap();
        assert_eq!(value["tone"], "confident");
    }

    #[test]
    fn test_parse_structured_fenced_json() {
        let value = parse_structured("```json\n{\"tone\": \"warm\"}\n```").unwrap();
        assert_eq!(value["tone"], "warm");
    }

    #[test]
    fn test_parse_structured_embedded_json() {
        let value =
            parse_structured("Here is your result:\n{\"caption\": \"hi\"}\nHope that helps!")
                .unwrap();
        assert_eq!(value["caption"], "hi");
    }

    #[test]
    fn test_parse_structured_garbage_fails() {
        assert!(parse_structured("no json here at all").is_err());
    }

    #[test]
    fn test_resolve_prefers_overrides_over_env() {
        std::env::set_var("BRIEFCRAFT_MODEL", "env-model");
        let config = CompletionConfig::resolve(
            Some(Backend::OpenAi),
            Some("http://localhost:8080/v1".to_string()),
            Some("flag-model".to_string()),
            Some("test-key".to_string()),
        )
        .unwrap();
        assert_eq!(config.backend, Backend::OpenAi);
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "flag-model");
        assert_eq!(config.api_key, "test-key");
        std::env::remove_var("BRIEFCRAFT_MODEL");
    }

    #[test]
    fn test_resolve_env_vars() {
        std::env::set_var("BRIEFCRAFT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${BRIEFCRAFT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix-${BRIEFCRAFT_TEST_VAR}-suffix"),
            "prefix-hello-suffix"
        );
        assert_eq!(resolve_env_vars("${BRIEFCRAFT_NO_VAR:-fallback}"), "fallback");
        std::env::remove_var("BRIEFCRAFT_TEST_VAR");
    }
}
