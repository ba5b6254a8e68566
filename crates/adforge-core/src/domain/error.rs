//! Domain-level error taxonomy for the generation loop.
//!
//! Two fatal scopes exist: errors that abort the current attempt's
//! aggregation ([`FailureScope::Attempt`]) and errors that abort the whole
//! run ([`FailureScope::Run`]). Both propagate unmodified to the caller; the
//! loop never retries a provider error or substitutes a default score.
//! Falling short of the score threshold is a modeled outcome, not an error.

use serde::{Deserialize, Serialize};

/// Whether a fatal error ends the current attempt or the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureScope {
    /// The current attempt is abandoned; no attempt record is written.
    Attempt,
    /// The run stops; no further iterations execute.
    Run,
}

/// Adforge domain errors.
#[derive(Debug, thiserror::Error)]
pub enum AdforgeError {
    #[error("provider rejected credentials: {0}")]
    ProviderAuth(String),

    #[error("provider quota exhausted: {0}")]
    ProviderQuota(String),

    #[error("provider request failed: {0}")]
    ProviderRequest(String),

    #[error("generation operation {operation} completed without a usable video payload")]
    MissingVideoPayload { operation: String },

    #[error("malformed response from evaluator {evaluator}: {reason}")]
    EvaluatorResponse { evaluator: String, reason: String },

    #[error("frame extraction failed for {video}: {reason}")]
    FrameExtraction { video: String, reason: String },

    #[error("invalid brand kit: {0}")]
    InvalidBrandKit(String),

    #[error("invalid campaign brief: {0}")]
    InvalidCampaignBrief(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("evaluator task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AdforgeError {
    /// Classify this error into the attempt/run failure taxonomy.
    ///
    /// Attempt-scoped: malformed evaluator output, missing video payload,
    /// unreadable video during frame extraction. Everything else (auth,
    /// quota, transport, storage, configuration) is run-scoped.
    pub fn scope(&self) -> FailureScope {
        match self {
            Self::MissingVideoPayload { .. }
            | Self::EvaluatorResponse { .. }
            | Self::FrameExtraction { .. } => FailureScope::Attempt,
            _ => FailureScope::Run,
        }
    }
}

/// Result type for Adforge domain operations.
pub type Result<T> = std::result::Result<T, AdforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdforgeError::ProviderAuth("api key invalid".to_string());
        assert!(err.to_string().contains("rejected credentials"));

        let err = AdforgeError::MissingVideoPayload {
            operation: "operations/abc".to_string(),
        };
        assert!(err.to_string().contains("operations/abc"));

        let err = AdforgeError::EvaluatorResponse {
            evaluator: "gemini-2.5-flash".to_string(),
            reason: "not valid JSON".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("gemini-2.5-flash"));
        assert!(msg.contains("not valid JSON"));
    }

    #[test]
    fn test_attempt_scoped_errors() {
        let errs = [
            AdforgeError::MissingVideoPayload {
                operation: "op".to_string(),
            },
            AdforgeError::EvaluatorResponse {
                evaluator: "e".to_string(),
                reason: "r".to_string(),
            },
            AdforgeError::FrameExtraction {
                video: "v.mp4".to_string(),
                reason: "unreadable".to_string(),
            },
        ];
        for err in errs {
            assert_eq!(err.scope(), FailureScope::Attempt);
        }
    }

    #[test]
    fn test_run_scoped_errors() {
        let errs = [
            AdforgeError::ProviderAuth("bad key".to_string()),
            AdforgeError::ProviderQuota("rate limited".to_string()),
            AdforgeError::Storage("disk full".to_string()),
            AdforgeError::Config("regen limit must be positive".to_string()),
        ];
        for err in errs {
            assert_eq!(err.scope(), FailureScope::Run);
        }
    }

    #[test]
    fn test_digest_mismatch_error() {
        let err = AdforgeError::DigestMismatch {
            expected: "abc123".to_string(),
            actual: "def456".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("def456"));
    }
}
