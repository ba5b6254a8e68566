//! Adforge Core Library
//!
//! The generation-critique feedback loop: compose a brand-aware prompt,
//! generate a video through a long-running provider operation, sample
//! frames, score them concurrently across independent quality dimensions,
//! reconcile against one authoritative threshold, and repeat with the
//! failure evidence folded into the next prompt until the asset passes or
//! the regeneration budget runs out.

pub mod config;
pub mod critique;
pub mod domain;
pub mod frames;
pub mod obs;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod store;
pub mod telemetry;

pub use config::{GoogleAiConfig, LoopSettings, DEFAULT_REGEN_LIMIT, DEFAULT_SCORE_THRESHOLD};

pub use critique::{
    aggregate, default_specialists, evaluate, extended_specialists, AggregateOptions,
    CritiqueModel, EvaluatorOutput, SpecialistConfig,
};

pub use domain::{
    normalize_color, normalize_palette, AdforgeError, AgentEvidence, AgentScore, AgentStatus,
    BrandKit, CampaignBrief, Dimension, FailureScope, GenerationAttempt, LoopVerdict, Result,
    RunOutcome, Scorecard,
};

pub use frames::{FfmpegSampler, FrameImage, FrameSampler};

pub use orchestrator::{GenerationOrchestrator, RunRequest};

pub use prompt::{build_agent_prompt, compose, CritiqueContext, GenerationContext};

pub use provider::{
    generate_video, GeminiCritic, GeneratedVideo, GenerationRequest, GoogleVideoClient,
    OperationHandle, OperationStatus, VideoGenerator,
};

pub use store::{AttemptRecord, AttemptStore};

pub use obs::run_span;
pub use telemetry::init_tracing;

/// Adforge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
