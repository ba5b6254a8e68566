//! The iteration controller: drives generate → sample → evaluate →
//! aggregate, persisting one record per attempt, until an attempt passes or
//! the regeneration budget is exhausted.
//!
//! States per run: `Attempting(n)` → `Evaluated(n)` → `Passed` (terminal),
//! `Attempting(n+1)`, or `Exhausted` (terminal, `n == regen_limit`).
//! Iterations are strictly sequential: attempt n+1's prompt depends on
//! attempt n's scorecard. Exhaustion is a modeled outcome, never an error;
//! fatal provider/storage/evaluator conditions propagate unmodified with no
//! retry and no attempt record for the failed pass.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::LoopSettings;
use crate::critique::aggregate::{aggregate, AggregateOptions};
use crate::critique::pool::{evaluate, CritiqueModel};
use crate::critique::specialists::{default_specialists, SpecialistConfig};
use crate::domain::attempt::{GenerationAttempt, LoopVerdict, RunOutcome};
use crate::domain::brand::BrandKit;
use crate::domain::campaign::CampaignBrief;
use crate::domain::error::{AdforgeError, Result};
use crate::domain::scorecard::Scorecard;
use crate::frames::FrameSampler;
use crate::obs;
use crate::prompt::critique::CritiqueContext;
use crate::prompt::generation::{compose, GenerationContext};
use crate::provider::video::{generate_video, GenerationRequest, VideoGenerator};
use crate::store::{AttemptRecord, AttemptStore};

/// Caller-facing inputs for one loop run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Brand identity, read-only for the loop.
    pub brand: BrandKit,

    /// Campaign brief, read-only for the loop.
    pub campaign: CampaignBrief,

    /// Optional user creative direction.
    pub caption: Option<String>,

    /// Call-level regeneration limit; overrides the campaign value.
    pub regen_limit: Option<u32>,

    /// Call-level score threshold; overrides the process default.
    pub score_threshold: Option<f64>,

    /// Continuation mode: a stored scorecard that seeds the first prompt's
    /// feedback section. Iteration numbering still starts at 1.
    pub previous_scorecard: Option<Scorecard>,

    /// Evaluator configuration; `None` runs the default four dimensions.
    pub specialists: Option<Vec<SpecialistConfig>>,
}

impl RunRequest {
    /// A run with no overrides.
    pub fn new(brand: BrandKit, campaign: CampaignBrief) -> Self {
        Self {
            brand,
            campaign,
            caption: None,
            regen_limit: None,
            score_threshold: None,
            previous_scorecard: None,
            specialists: None,
        }
    }
}

/// Drives the generation-critique loop against injected providers.
pub struct GenerationOrchestrator {
    generator: Arc<dyn VideoGenerator>,
    critic: Arc<dyn CritiqueModel>,
    sampler: Arc<dyn FrameSampler>,
    store: AttemptStore,
    settings: LoopSettings,
}

impl GenerationOrchestrator {
    /// Build an orchestrator from providers and validated settings.
    pub fn new(
        generator: Arc<dyn VideoGenerator>,
        critic: Arc<dyn CritiqueModel>,
        sampler: Arc<dyn FrameSampler>,
        settings: LoopSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let store = AttemptStore::new(&settings.storage_root);
        Ok(Self {
            generator,
            critic,
            sampler,
            store,
            settings,
        })
    }

    /// The attempt store backing this orchestrator.
    pub fn store(&self) -> &AttemptStore {
        &self.store
    }

    /// Call-level threshold wins; otherwise the process default applies.
    fn resolve_threshold(&self, request: &RunRequest) -> Result<f64> {
        let threshold = request
            .score_threshold
            .unwrap_or(self.settings.score_threshold);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AdforgeError::Config(format!(
                "score threshold {threshold} outside 0.0–1.0"
            )));
        }
        Ok(threshold)
    }

    /// Call-level limit wins; otherwise the campaign's own budget applies.
    fn resolve_regen_limit(&self, request: &RunRequest) -> Result<u32> {
        match request.regen_limit {
            Some(0) => Err(AdforgeError::Config(
                "regen limit must be a positive integer".to_string(),
            )),
            Some(limit) => Ok(limit),
            None => Ok(request.campaign.regen_limit),
        }
    }

    fn reference_assets(brand: &BrandKit, campaign: &CampaignBrief) -> Vec<String> {
        let mut assets = Vec::new();
        if let Some(logo) = &brand.logo_asset_ref {
            assets.push(logo.clone());
        }
        assets.push(campaign.product_image_ref.clone());
        assets.extend(campaign.additional_asset_refs.iter().cloned());
        assets
    }

    /// Run the full feedback loop.
    ///
    /// Returns after the first passing attempt, or after `regen_limit`
    /// attempts with the last one as the best effort.
    pub async fn run(&self, request: RunRequest) -> Result<RunOutcome> {
        request.brand.validate()?;
        request.campaign.validate()?;
        let threshold = self.resolve_threshold(&request)?;
        let regen_limit = self.resolve_regen_limit(&request)?;
        let specialists = request
            .specialists
            .clone()
            .unwrap_or_else(default_specialists);

        let run_id = Uuid::new_v4();
        let span = obs::run_span(run_id);

        async move {
            obs::emit_run_started(run_id, &request.brand.name, request.campaign.id, regen_limit);

            let mut history: Vec<GenerationAttempt> = Vec::new();
            let mut previous = request.previous_scorecard.clone();
            let mut last_attempt: Option<GenerationAttempt> = None;

            for iteration in 1..=regen_limit {
                obs::emit_attempt_started(run_id, iteration);
                let attempt = self
                    .run_attempt(
                        run_id,
                        &request,
                        &specialists,
                        iteration,
                        previous.as_ref(),
                        threshold,
                    )
                    .await?;

                previous = attempt.scorecard.clone();
                history.push(attempt.clone());

                if attempt.passed {
                    obs::emit_run_finished(run_id, "passed", history.len());
                    return Ok(RunOutcome {
                        run_id,
                        verdict: LoopVerdict::Passed,
                        final_attempt: attempt,
                        history,
                    });
                }
                last_attempt = Some(attempt);
            }

            obs::emit_run_finished(run_id, "exhausted", history.len());
            match last_attempt {
                Some(final_attempt) => Ok(RunOutcome {
                    run_id,
                    verdict: LoopVerdict::Exhausted,
                    final_attempt,
                    history,
                }),
                // Unreachable with a validated positive limit.
                None => Err(AdforgeError::Config(
                    "regen limit must be a positive integer".to_string(),
                )),
            }
        }
        .instrument(span)
        .await
    }

    /// One `Attempting(n)` → `Evaluated(n)` transition: compose, generate,
    /// sample, evaluate, aggregate, persist.
    async fn run_attempt(
        &self,
        run_id: Uuid,
        request: &RunRequest,
        specialists: &[SpecialistConfig],
        iteration: u32,
        previous: Option<&Scorecard>,
        threshold: f64,
    ) -> Result<GenerationAttempt> {
        let prompt = compose(&GenerationContext {
            brand: &request.brand,
            campaign: &request.campaign,
            iteration,
            previous_scorecard: previous,
            caption: request.caption.as_deref(),
        });

        let generation_request = GenerationRequest {
            prompt,
            reference_assets: Self::reference_assets(&request.brand, &request.campaign),
        };
        let video = generate_video(
            self.generator.as_ref(),
            &generation_request,
            &self.settings.video_dir,
            self.settings.poll_interval,
        )
        .await?;

        let frames = self
            .sampler
            .extract_frames(&video.video_path, self.settings.frame_sample_count)
            .await?;
        let context = CritiqueContext::from_brief(
            &request.brand,
            &request.campaign,
            threshold,
            request.caption.as_deref(),
        )
        .with_frame_count(frames.len());

        let outputs = evaluate(
            Arc::clone(&self.critic),
            specialists,
            Arc::new(frames),
            &context,
        )
        .await?;

        let asset_ref = video.video_path.display().to_string();
        let scorecard = aggregate(
            outputs,
            &AggregateOptions {
                asset_ref: asset_ref.clone(),
                iteration,
                threshold,
            },
        )?;
        let passed = scorecard.passed();
        obs::emit_attempt_evaluated(run_id, iteration, passed, scorecard.failing().len());

        let record = AttemptRecord {
            run_id,
            brand_kit_id: request.brand.id,
            campaign_id: request.campaign.id,
            iteration,
            video_ref: asset_ref.clone(),
            provider_operation_id: Some(video.operation_id.clone()),
            caption: request.caption.clone(),
            overall_status: scorecard.overall_status,
            scorecard: scorecard.clone(),
            created_at: Utc::now(),
        };
        let path = self.store.write_attempt(&record)?;
        obs::emit_attempt_persisted(run_id, iteration, &path);

        Ok(GenerationAttempt {
            iteration,
            video_ref: asset_ref,
            provider_operation_id: Some(video.operation_id),
            scorecard: Some(scorecard),
            passed,
        })
    }

    /// Degenerate one-shot path: compose and generate, no critique.
    ///
    /// The attempt's `passed` is `false` by convention (no evaluation ran,
    /// so pass/fail is undefined) and nothing is persisted.
    pub async fn generate_only(
        &self,
        brand: &BrandKit,
        campaign: &CampaignBrief,
        caption: Option<&str>,
    ) -> Result<GenerationAttempt> {
        brand.validate()?;
        campaign.validate()?;

        let prompt = compose(&GenerationContext {
            brand,
            campaign,
            iteration: 1,
            previous_scorecard: None,
            caption,
        });
        let video = generate_video(
            self.generator.as_ref(),
            &GenerationRequest {
                prompt,
                reference_assets: Self::reference_assets(brand, campaign),
            },
            &self.settings.video_dir,
            self.settings.poll_interval,
        )
        .await?;

        Ok(GenerationAttempt {
            iteration: 1,
            video_ref: video.video_path.display().to_string(),
            provider_operation_id: Some(video.operation_id),
            scorecard: None,
            passed: false,
        })
    }

    /// Score an existing video without generating: sample, evaluate,
    /// aggregate. Nothing is persisted.
    pub async fn critique_only(
        &self,
        video_path: &Path,
        brand: &BrandKit,
        campaign: &CampaignBrief,
        caption: Option<&str>,
        score_threshold: Option<f64>,
        specialists: Option<Vec<SpecialistConfig>>,
    ) -> Result<Scorecard> {
        brand.validate()?;
        campaign.validate()?;
        let threshold = score_threshold.unwrap_or(self.settings.score_threshold);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AdforgeError::Config(format!(
                "score threshold {threshold} outside 0.0–1.0"
            )));
        }
        let specialists = specialists.unwrap_or_else(default_specialists);

        let frames = self
            .sampler
            .extract_frames(video_path, self.settings.frame_sample_count)
            .await?;
        let context = CritiqueContext::from_brief(brand, campaign, threshold, caption)
            .with_frame_count(frames.len());

        let outputs = evaluate(
            Arc::clone(&self.critic),
            &specialists,
            Arc::new(frames),
            &context,
        )
        .await?;

        aggregate(
            outputs,
            &AggregateOptions {
                asset_ref: video_path.display().to_string(),
                iteration: 1,
                threshold,
            },
        )
    }
}
