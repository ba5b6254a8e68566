//! Scorecards, agent scores, and critique dimensions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{AdforgeError, Result};

/// One independent quality axis evaluated by a specialist critic.
///
/// Serialized names match the JSON the evaluators are instructed to return
/// (`"BrandFit"`, `"VisualQuality"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    BrandFit,
    VisualQuality,
    Safety,
    Clarity,
    TextAccuracy,
    ProductPresence,
}

impl Dimension {
    /// The serialized name, as it appears in evaluator JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrandFit => "BrandFit",
            Self::VisualQuality => "VisualQuality",
            Self::Safety => "Safety",
            Self::Clarity => "Clarity",
            Self::TextAccuracy => "TextAccuracy",
            Self::ProductPresence => "ProductPresence",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail status for a single dimension or a whole scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Pass,
    Fail,
}

impl AgentStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Human-readable rationale backing a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvidence {
    /// One-sentence summary of concrete findings.
    pub summary: String,

    /// Optional references to specific frames or copy snippets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
}

/// A single evaluator's verdict on one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentScore {
    /// Which quality axis this score covers.
    pub dimension: Dimension,

    /// Score in 0.0–1.0.
    pub score: f64,

    /// Pass/fail status. Evaluators self-report this, but the aggregator
    /// recomputes it from the score and the run threshold.
    pub status: AgentStatus,

    /// Concrete findings backing the score.
    pub evidence: AgentEvidence,

    /// Open key/value map; the aggregator records the originating evaluator
    /// here under the `evaluator` key.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl AgentScore {
    /// Check shape invariants: score in range, non-empty evidence summary.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.score) {
            return Err(AdforgeError::EvaluatorResponse {
                evaluator: self.dimension.to_string(),
                reason: format!("score {} outside 0.0–1.0", self.score),
            });
        }
        if self.evidence.summary.trim().is_empty() {
            return Err(AdforgeError::EvaluatorResponse {
                evaluator: self.dimension.to_string(),
                reason: "evidence summary is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Aggregated, threshold-reconciled result for one generated asset.
///
/// # Invariants
///
/// `overall_status` is `Pass` iff every entry in `scores` has status `Pass`.
/// `scores` is ordered by evaluator configuration order, one entry per
/// configured dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Reference to the evaluated video asset.
    pub asset_ref: String,

    /// 1-based iteration this scorecard belongs to.
    pub iteration: u32,

    /// Per-dimension reconciled scores.
    pub scores: Vec<AgentScore>,

    /// Pass iff every dimension passed.
    pub overall_status: AgentStatus,

    /// When aggregation completed.
    pub created_at: DateTime<Utc>,
}

impl Scorecard {
    /// Whether every dimension cleared the threshold.
    pub fn passed(&self) -> bool {
        self.overall_status.is_pass()
    }

    /// Scores that failed reconciliation, in configuration order.
    pub fn failing(&self) -> Vec<&AgentScore> {
        self.scores.iter().filter(|s| !s.status.is_pass()).collect()
    }

    /// Scores that passed reconciliation, in configuration order.
    pub fn passing(&self) -> Vec<&AgentScore> {
        self.scores.iter().filter(|s| s.status.is_pass()).collect()
    }
}
