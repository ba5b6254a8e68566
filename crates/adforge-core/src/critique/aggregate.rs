//! Score aggregation: schema validation, threshold reconciliation, and the
//! overall verdict.

use chrono::Utc;
use tracing::debug;

use crate::critique::pool::EvaluatorOutput;
use crate::domain::error::{AdforgeError, Result};
use crate::domain::scorecard::{AgentScore, AgentStatus, Scorecard};

/// Aggregation parameters for one attempt.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Reference to the evaluated asset.
    pub asset_ref: String,

    /// 1-based attempt number.
    pub iteration: u32,

    /// The single authoritative pass/fail boundary for every dimension.
    pub threshold: f64,
}

/// Validate raw evaluator outputs and build the canonical scorecard.
///
/// Each evaluator's self-reported `status` is discarded and recomputed as
/// `score >= threshold`, so the boundary is consistent across dimensions and
/// configurable per run without touching evaluator prompts. Any
/// schema-invalid output fails the whole aggregation; there are no partial
/// scorecards.
pub fn aggregate(outputs: Vec<EvaluatorOutput>, options: &AggregateOptions) -> Result<Scorecard> {
    if outputs.is_empty() {
        return Err(AdforgeError::Config(
            "no evaluator outputs to aggregate".to_string(),
        ));
    }

    let mut scores: Vec<AgentScore> = Vec::with_capacity(outputs.len());
    for EvaluatorOutput {
        evaluator,
        dimension,
        output,
    } in outputs
    {
        let mut score: AgentScore =
            serde_json::from_value(output).map_err(|err| AdforgeError::EvaluatorResponse {
                evaluator: evaluator.clone(),
                reason: format!("schema-invalid output for {dimension}: {err}"),
            })?;
        score.validate()?;

        let reconciled = if score.score >= options.threshold {
            AgentStatus::Pass
        } else {
            AgentStatus::Fail
        };
        if reconciled != score.status {
            debug!(
                dimension = %score.dimension,
                claimed = ?score.status,
                reconciled = ?reconciled,
                "overriding evaluator self-reported status"
            );
        }
        score.status = reconciled;
        score.metadata.insert(
            "evaluator".to_string(),
            serde_json::Value::String(evaluator),
        );
        scores.push(score);
    }

    let overall_status = if scores.iter().all(|s| s.status.is_pass()) {
        AgentStatus::Pass
    } else {
        AgentStatus::Fail
    };

    Ok(Scorecard {
        asset_ref: options.asset_ref.clone(),
        iteration: options.iteration,
        scores,
        overall_status,
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scorecard::Dimension;
    use serde_json::json;

    fn output(dimension: Dimension, score: f64, claimed: &str) -> EvaluatorOutput {
        EvaluatorOutput {
            evaluator: "gemini-2.5-flash".to_string(),
            dimension,
            output: json!({
                "dimension": dimension.as_str(),
                "score": score,
                "status": claimed,
                "evidence": { "summary": format!("{dimension} score {score}") }
            }),
        }
    }

    fn options(threshold: f64) -> AggregateOptions {
        AggregateOptions {
            asset_ref: "storage/generated/test.mp4".to_string(),
            iteration: 1,
            threshold,
        }
    }

    #[test]
    fn test_overall_pass_when_every_dimension_clears_threshold() {
        let card = aggregate(
            vec![
                output(Dimension::BrandFit, 0.9, "pass"),
                output(Dimension::VisualQuality, 0.85, "pass"),
                output(Dimension::Safety, 0.82, "pass"),
                output(Dimension::Clarity, 0.88, "pass"),
            ],
            &options(0.8),
        )
        .expect("aggregate");

        assert_eq!(card.overall_status, AgentStatus::Pass);
        assert!(card.scores.iter().all(|s| s.status.is_pass()));
    }

    #[test]
    fn test_one_failing_score_fails_overall() {
        let card = aggregate(
            vec![
                output(Dimension::BrandFit, 0.95, "pass"),
                output(Dimension::VisualQuality, 0.79, "pass"),
                output(Dimension::Safety, 0.9, "pass"),
            ],
            &options(0.8),
        )
        .expect("aggregate");

        let failing = card
            .scores
            .iter()
            .find(|s| s.dimension == Dimension::VisualQuality)
            .expect("visual quality score");
        assert_eq!(failing.status, AgentStatus::Fail);
        assert_eq!(card.overall_status, AgentStatus::Fail);
    }

    #[test]
    fn test_reconciliation_ignores_claimed_status() {
        // Grid over (score, threshold, claimed): the claimed status never
        // survives; the reconciled status is exactly score >= threshold.
        let scores = [0.0, 0.25, 0.5, 0.79, 0.8, 0.81, 1.0];
        let thresholds = [0.0, 0.5, 0.8, 0.95, 1.0];
        for &s in &scores {
            for &t in &thresholds {
                for claimed in ["pass", "fail"] {
                    let card = aggregate(
                        vec![output(Dimension::BrandFit, s, claimed)],
                        &options(t),
                    )
                    .expect("aggregate");
                    let expected = if s >= t {
                        AgentStatus::Pass
                    } else {
                        AgentStatus::Fail
                    };
                    assert_eq!(
                        card.scores[0].status, expected,
                        "score {s} threshold {t} claimed {claimed}"
                    );
                    assert_eq!(card.overall_status, expected);
                }
            }
        }
    }

    #[test]
    fn test_evaluator_recorded_in_metadata() {
        let card = aggregate(vec![output(Dimension::Safety, 0.9, "pass")], &options(0.8))
            .expect("aggregate");
        assert_eq!(
            card.scores[0].metadata.get("evaluator"),
            Some(&serde_json::Value::String("gemini-2.5-flash".to_string()))
        );
        // Evidence content is untouched.
        assert_eq!(card.scores[0].evidence.summary, "Safety score 0.9");
    }

    #[test]
    fn test_schema_invalid_output_fails_whole_aggregation() {
        let good = output(Dimension::BrandFit, 0.9, "pass");
        let bad = EvaluatorOutput {
            evaluator: "gemini-2.5-flash".to_string(),
            dimension: Dimension::Safety,
            output: json!({ "score": "very good" }),
        };
        let err = aggregate(vec![good, bad], &options(0.8)).expect_err("must fail");
        match err {
            AdforgeError::EvaluatorResponse { reason, .. } => {
                assert!(reason.contains("Safety"));
            }
            other => panic!("expected EvaluatorResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let err = aggregate(
            vec![output(Dimension::BrandFit, 1.5, "pass")],
            &options(0.8),
        )
        .expect_err("must fail");
        assert!(matches!(err, AdforgeError::EvaluatorResponse { .. }));
    }

    #[test]
    fn test_empty_outputs_rejected() {
        assert!(aggregate(Vec::new(), &options(0.8)).is_err());
    }

    #[test]
    fn test_preserves_configuration_order() {
        let card = aggregate(
            vec![
                output(Dimension::Clarity, 0.9, "pass"),
                output(Dimension::BrandFit, 0.9, "pass"),
            ],
            &options(0.8),
        )
        .expect("aggregate");
        assert_eq!(card.scores[0].dimension, Dimension::Clarity);
        assert_eq!(card.scores[1].dimension, Dimension::BrandFit);
    }
}
