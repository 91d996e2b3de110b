//! Error types for the briefcraft pipeline.
//!
//! `CompletionError` covers failures of the external completion backend
//! (transport, provider, structured-output parsing). `StepError` covers
//! failures of a single pipeline step; the step runner folds it into the
//! state and never re-raises, so neither type crosses the `Pipeline::run`
//! boundary.

/// Failure of the external text-completion service.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Failed to parse structured response: {0}")]
    Parse(String),

    #[error("No completion backend configured: {0}")]
    Config(String),
}

/// Failure of one pipeline step. Always converted into a state error entry
/// by the step runner; never propagated to the sequencer.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// A required upstream state field is absent.
    #[error("Required element unavailable: {0}")]
    MissingField(&'static str),

    /// The completion backend failed.
    #[error("{0}")]
    Completion(#[from] CompletionError),

    /// A step-specific semantic check failed.
    #[error("{0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = StepError::MissingField("prompt_analysis");
        assert_eq!(
            err.to_string(),
            "Required element unavailable: prompt_analysis"
        );
    }

    #[test]
    fn test_completion_error_wraps() {
        let err: StepError = CompletionError::Transport("connection refused".into()).into();
        assert!(err.to_string().contains("connection refused"));
    }
}
