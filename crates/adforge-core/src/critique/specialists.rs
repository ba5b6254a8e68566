//! Specialist evaluator configuration.
//!
//! Which dimensions run, and with what instructions, is data: an ordered
//! list of configs passed into the pool. Tests swap in reduced sets; callers
//! needing stricter text checks opt into the extended list.

use serde::{Deserialize, Serialize};

use crate::domain::scorecard::Dimension;

/// One specialist evaluator: a dimension plus its system instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistConfig {
    pub dimension: Dimension,
    pub instruction: String,
}

impl SpecialistConfig {
    pub fn new(dimension: Dimension, instruction: impl Into<String>) -> Self {
        Self {
            dimension,
            instruction: instruction.into(),
        }
    }
}

const SCORING_GUIDELINES: &str = "\
Scoring:
- 1.0 = flawless; 0.8 = acceptable; <0.8 = failing.
- Use the full range when warranted.
- Set \"status\" to \"pass\" only when score >= threshold and no material violations exist.
- Provide one sentence summary with concrete evidence (palette colors, frame numbers, specific phrases).
- Include \"citations\" array when you can reference frames or copy snippets.";

const BRAND_FIT_FOCUS: &str = "\
Focus on:
- CRITICAL: Brand name spelling - verify the exact brand name appears correctly in ALL text overlays, logos, and captions. Even one letter wrong is a FAIL.
- Logo or brand asset correctness (no distortions, correct usage, spelling accuracy).
- Palette adherence: highlight matches/mismatches to provided HEX list or inferred colors.
- Tone alignment with brand voice and target audience.
- Check prohibited phrases are absent.
If brand name is misspelled anywhere (including in logo text), immediately set status to \"fail\" and score < 0.5.
If assets are missing, reason about likelihood of on-brand representation and penalize uncertainty.";

const VISUAL_QUALITY_FOCUS: &str = "\
Focus on:
- Sharpness, lighting, composition, absence of glitches/watermarks.
- Consistency of logo/product visibility across frames.
- Text readability, if any.
- Production polish vs obvious artifacts.
Discount minor issues but flag severe distortions immediately.";

const SAFETY_FOCUS: &str = "\
Focus ONLY on safety concerns:
- Harmful, violent, or adult content.
- Bias, stereotypes, offensive gestures, unsafe scenes.
- Misleading claims or medical/financial promises.
- Copyright concerns (non-brand logos, known celebrities, watermarks).
DO NOT evaluate brand name spelling, product visibility, or brand adherence - those are handled by other agents.
Err on caution: if unsure, lower the score and document the risk.";

const CLARITY_FOCUS: &str = "\
Focus on:
- Does the viewer understand the product, benefit, and CTA quickly?
- Alignment between visuals, caption, and brand positioning.
- CRITICAL: Verify brand name spelling in ALL visible text (logos, overlays, captions, CTAs). Compare letter-by-letter against the provided brand name.
- Detect hallucinated text discrepancies (e.g., wrong tagline, misspelled brand name).
- Ensure CTA is actionable and precise.
Penalize confusion, mixed messaging, missing CTA, or any brand name misspelling (immediate fail if detected).";

const TEXT_ACCURACY_FOCUS: &str = "\
Focus ONLY on rendered text fidelity:
- Transcribe every piece of on-screen text you can read, frame by frame.
- Compare the brand name letter-by-letter against the provided spelling; any deviation is an automatic fail with score < 0.5.
- Flag garbled, truncated, or hallucinated words even when they are not brand terms.
- Verify the CTA text matches the provided call to action.
DO NOT judge composition, color, or safety - those are handled by other agents.";

const PRODUCT_PRESENCE_FOCUS: &str = "\
Focus ONLY on product visibility:
- The advertised product must be physically visible and recognizable, not abstract or implied.
- Check the product appears early and remains identifiable across frames.
- Flag frames where the product is occluded, distorted, or replaced by a lookalike.
If the product never appears clearly, set status to \"fail\" with score < 0.5.
DO NOT judge text spelling or safety - those are handled by other agents.";

fn with_guidelines(focus: &str) -> String {
    format!("{SCORING_GUIDELINES}\n{focus}")
}

/// The default evaluator set, in execution/report order.
pub fn default_specialists() -> Vec<SpecialistConfig> {
    vec![
        SpecialistConfig::new(Dimension::BrandFit, with_guidelines(BRAND_FIT_FOCUS)),
        SpecialistConfig::new(Dimension::VisualQuality, with_guidelines(VISUAL_QUALITY_FOCUS)),
        SpecialistConfig::new(Dimension::Safety, with_guidelines(SAFETY_FOCUS)),
        SpecialistConfig::new(Dimension::Clarity, with_guidelines(CLARITY_FOCUS)),
    ]
}

/// Default set plus the single-purpose text and product checks, for
/// campaigns where brand-name or product-visibility correctness is critical.
pub fn extended_specialists() -> Vec<SpecialistConfig> {
    let mut specialists = default_specialists();
    specialists.push(SpecialistConfig::new(
        Dimension::TextAccuracy,
        with_guidelines(TEXT_ACCURACY_FOCUS),
    ));
    specialists.push(SpecialistConfig::new(
        Dimension::ProductPresence,
        with_guidelines(PRODUCT_PRESENCE_FOCUS),
    ));
    specialists
}
