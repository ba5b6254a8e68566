//! Prompt builders for the generation and critique providers.
//!
//! Both builders are pure functions of their inputs; no timestamps or other
//! non-deterministic content is ever embedded.

pub mod critique;
pub mod generation;

pub use critique::{build_agent_prompt, CritiqueContext};
pub use generation::{compose, GenerationContext};
