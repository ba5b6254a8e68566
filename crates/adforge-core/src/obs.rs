//! Structured observability hooks for loop lifecycle events.
//!
//! [`run_span`] builds the run-scoped span (attach it with
//! `tracing::Instrument` in async code); the emit functions mark the state
//! transitions of the iteration controller.

use tracing::{info, Span};
use uuid::Uuid;

/// Build a tracing span tagged with the run id.
pub fn run_span(run_id: Uuid) -> Span {
    tracing::info_span!("adforge.run", run_id = %run_id)
}

/// Emit event: run started for a brand/campaign pair.
pub fn emit_run_started(run_id: Uuid, brand: &str, campaign_id: Uuid, regen_limit: u32) {
    info!(
        event = "run.started",
        run_id = %run_id,
        brand = %brand,
        campaign_id = %campaign_id,
        regen_limit = regen_limit,
    );
}

/// Emit event: one attempt entered the generate phase.
pub fn emit_attempt_started(run_id: Uuid, iteration: u32) {
    info!(event = "attempt.started", run_id = %run_id, iteration = iteration);
}

/// Emit event: an attempt's scorecard is known.
pub fn emit_attempt_evaluated(run_id: Uuid, iteration: u32, passed: bool, failing: usize) {
    info!(
        event = "attempt.evaluated",
        run_id = %run_id,
        iteration = iteration,
        passed = passed,
        failing_dimensions = failing,
    );
}

/// Emit event: the attempt record is durable.
pub fn emit_attempt_persisted(run_id: Uuid, iteration: u32, path: &std::path::Path) {
    info!(
        event = "attempt.persisted",
        run_id = %run_id,
        iteration = iteration,
        path = %path.display(),
    );
}

/// Emit event: the run reached a terminal state.
pub fn emit_run_finished(run_id: Uuid, verdict: &str, attempts: usize) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        verdict = %verdict,
        attempts = attempts,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_and_emits_do_not_panic() {
        let span = run_span(Uuid::new_v4());
        let _entered = span.enter();
        emit_attempt_started(Uuid::new_v4(), 1);
        emit_run_finished(Uuid::new_v4(), "passed", 1);
    }
}
