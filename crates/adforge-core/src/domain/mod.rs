//! Domain models for Adforge.
//!
//! Canonical definitions for the core entities:
//! - `BrandKit`: Immutable brand identity, palette, and guardrail phrases
//! - `CampaignBrief`: One campaign's creative brief and retry budget
//! - `Scorecard` / `AgentScore`: Threshold-reconciled critique results
//! - `GenerationAttempt` / `RunOutcome`: The loop's audit trail

pub mod attempt;
pub mod brand;
pub mod campaign;
pub mod digest;
pub mod error;
pub mod scorecard;

// Re-export main types and errors
pub use attempt::{GenerationAttempt, LoopVerdict, RunOutcome};
pub use brand::{normalize_color, normalize_palette, BrandKit};
pub use campaign::CampaignBrief;
pub use digest::digest_bytes;
pub use error::{AdforgeError, FailureScope, Result};
pub use scorecard::{AgentEvidence, AgentScore, AgentStatus, Dimension, Scorecard};
