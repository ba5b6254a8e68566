//! The critique stage: specialist configuration, the concurrent evaluator
//! pool, and score aggregation.

pub mod aggregate;
pub mod pool;
pub mod specialists;

pub use aggregate::{aggregate, AggregateOptions};
pub use pool::{evaluate, CritiqueModel, EvaluatorOutput};
pub use specialists::{default_specialists, extended_specialists, SpecialistConfig};
