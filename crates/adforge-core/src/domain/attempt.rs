//! Generation attempts and run outcomes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::scorecard::Scorecard;

/// One full generate-then-evaluate pass within the bounded retry loop.
///
/// Created by the iteration controller at the start of a pass; immutable
/// once aggregation returns. The ordered list of attempts for a run is the
/// audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationAttempt {
    /// 1-based attempt counter.
    pub iteration: u32,

    /// Reference to the generated video asset.
    pub video_ref: String,

    /// Provider-side long-running operation id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_operation_id: Option<String>,

    /// Aggregated critique result. Absent in generate-only mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<Scorecard>,

    /// Whether this attempt cleared the threshold. Always `false` when no
    /// critique ran (pass/fail is undefined, not asserted).
    pub passed: bool,
}

/// Terminal state of a critique loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopVerdict {
    /// An attempt cleared every dimension before the budget ran out.
    Passed,
    /// The regeneration limit was reached without a passing attempt. Not an
    /// error; the last attempt is returned as the best effort.
    Exhausted,
}

/// Result of a full loop run: the final attempt plus the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Identifier for this run.
    pub run_id: Uuid,

    /// How the loop terminated.
    pub verdict: LoopVerdict,

    /// The passing attempt, or the last attempt when exhausted.
    #[serde(rename = "final")]
    pub final_attempt: GenerationAttempt,

    /// Every attempt in order. `final_attempt` is always the last entry.
    pub history: Vec<GenerationAttempt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialized_snake_case() {
        let json = serde_json::to_string(&LoopVerdict::Exhausted).expect("serialize");
        assert_eq!(json, r#""exhausted""#);
    }

    #[test]
    fn test_outcome_renames_final_field() {
        let attempt = GenerationAttempt {
            iteration: 1,
            video_ref: "a.mp4".to_string(),
            provider_operation_id: None,
            scorecard: None,
            passed: false,
        };
        let outcome = RunOutcome {
            run_id: Uuid::new_v4(),
            verdict: LoopVerdict::Exhausted,
            final_attempt: attempt.clone(),
            history: vec![attempt],
        };
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert!(json.get("final").is_some());
        assert!(json.get("final_attempt").is_none());
    }

    #[test]
    fn test_attempt_omits_absent_scorecard() {
        let attempt = GenerationAttempt {
            iteration: 1,
            video_ref: "a.mp4".to_string(),
            provider_operation_id: None,
            scorecard: None,
            passed: false,
        };
        let json = serde_json::to_value(&attempt).expect("serialize");
        assert!(json.get("scorecard").is_none());
        assert!(json.get("provider_operation_id").is_none());
    }
}
