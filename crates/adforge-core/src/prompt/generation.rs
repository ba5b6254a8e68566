//! Prompt composition for video generation requests.
//!
//! [`compose`] is a pure function: no I/O, no clock, no randomness. Two
//! calls with identical inputs produce identical strings.

use crate::domain::brand::BrandKit;
use crate::domain::campaign::CampaignBrief;
use crate::domain::scorecard::Scorecard;

/// Inputs for one generation prompt.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub brand: &'a BrandKit,
    pub campaign: &'a CampaignBrief,
    /// 1-based attempt number.
    pub iteration: u32,
    /// Scorecard from the previous attempt, when refining.
    pub previous_scorecard: Option<&'a Scorecard>,
    /// User-supplied creative direction.
    pub caption: Option<&'a str>,
}

/// Build the full instruction text sent to the video generation provider.
///
/// The brand-name spelling block is the single highest-priority instruction:
/// downstream evaluators treat any misspelling as an automatic failure.
pub fn compose(context: &GenerationContext<'_>) -> String {
    let brand = context.brand;
    let campaign = context.campaign;

    let palette = if brand.derived_palette_hex.is_empty() {
        "Color palette: use brand-appropriate, modern tones.".to_string()
    } else {
        format!("Color palette: {}", brand.derived_palette_hex.join(", "))
    };

    let tone = brand
        .tone_description
        .as_deref()
        .unwrap_or("Maintain confident, upbeat tone consistent with the brand.");

    let prohibited = if brand.prohibited_phrases.is_empty() {
        "Avoid offensive or misleading language.".to_string()
    } else {
        format!("Avoid phrases: {}", brand.prohibited_phrases.join(", "))
    };

    let tone_keywords = if campaign.tone_keywords.is_empty() {
        "energetic, trustworthy".to_string()
    } else {
        campaign.tone_keywords.join(", ")
    };

    let user_guidance = match context.caption {
        Some(caption) => format!(
            "\nUSER'S CREATIVE DIRECTION:\n{caption}\n\n\
             Follow this creative direction closely while adhering to the brand requirements below.",
        ),
        None => String::new(),
    };

    let feedback = render_feedback(context.previous_scorecard);

    let iteration_label = if context.iteration == 1 {
        "Initial concept".to_string()
    } else {
        format!("Refinement pass #{}", context.iteration)
    };

    format!(
        "You are generating a {iteration_label} for {brand_name}.{user_guidance}\n\
         \n\
         CRITICAL - BRAND NAME ACCURACY:\n\
         The brand name is \"{brand_name}\" - spell it EXACTLY as shown.\n\
         Do NOT misspell, modify, or alter the brand name in any way.\n\
         If showing the brand name in text overlays, double-check the spelling matches \"{brand_name}\" precisely.\n\
         \n\
         Brand voice: {tone}\n\
         Target audience: {audience}\n\
         Product focus: {product}\n\
         Call to action: {cta}\n\
         Tone keywords: {tone_keywords}\n\
         {palette}\n\
         {prohibited}\n\
         {feedback}\n\
         \n\
         Requirements:\n\
         - CRITICAL #1: The PRODUCT ({product}) MUST be physically visible in the video. If the product is not shown, this is an automatic FAIL.\n\
         - CRITICAL #2: The brand name \"{brand_name}\" must be spelled EXACTLY correctly in any text overlays or voice-over. Any typo or misspelling is an automatic FAIL.\n\
         - Showcase the product clearly and prominently within the first second.\n\
         - Keep video between 5-10 seconds.\n\
         - Highlight CTA on screen text near the end.\n\
         - Ensure logo appears cleanly in final frame.\n\
         - Avoid hallucinated text or incorrect brand references.\n\
         - The product must be recognizable and clearly visible (not abstract, not implied).\n\
         \n\
         Produce cinematic camera motion, crisp lighting, and social-ready composition.",
        brand_name = brand.name,
        audience = campaign.audience,
        product = campaign.product_description,
        cta = campaign.call_to_action,
    )
}

/// Render the feedback carry-forward section: one fix bullet per failing
/// dimension, and a preserve section iff any dimension passed.
fn render_feedback(previous: Option<&Scorecard>) -> String {
    let Some(scorecard) = previous else {
        return "No previous critique feedback; this is the first attempt.".to_string();
    };

    let mut section = String::from(
        "Previous video attempt had issues - PLEASE FIX THESE IN THIS GENERATION:\n",
    );
    for score in scorecard.failing() {
        section.push_str(&format!(
            "- {}: {}\n",
            score.dimension, score.evidence.summary
        ));
    }

    let passing = scorecard.passing();
    if !passing.is_empty() {
        section.push_str("\nKeep these aspects from previous attempt:\n");
        for score in passing {
            section.push_str(&format!(
                "- {}: {}\n",
                score.dimension, score.evidence.summary
            ));
        }
    }

    section.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brand::BrandKit;
    use crate::domain::scorecard::{AgentEvidence, AgentScore, AgentStatus, Dimension};
    use chrono::Utc;
    use uuid::Uuid;

    fn brand() -> BrandKit {
        BrandKit::new("user-1", "Nimbus")
            .with_tone("Confident, forward-looking")
            .with_prohibited_phrases(["cheap"])
            .with_palette(["#123456", "#ABCDEF"])
    }

    fn campaign() -> CampaignBrief {
        CampaignBrief::new(
            Uuid::new_v4(),
            "Nimbus Control Plane",
            "Enterprise platform teams",
            "Start your free migration",
            "uploads/product.png",
            5,
        )
        .with_tone_keywords(["innovative", "secure"])
    }

    fn score(dimension: Dimension, value: f64, status: AgentStatus, summary: &str) -> AgentScore {
        AgentScore {
            dimension,
            score: value,
            status,
            evidence: AgentEvidence {
                summary: summary.to_string(),
                citations: None,
            },
            metadata: serde_json::Map::new(),
        }
    }

    fn failing_scorecard() -> Scorecard {
        Scorecard {
            asset_ref: "a.mp4".to_string(),
            iteration: 1,
            scores: vec![
                score(
                    Dimension::Clarity,
                    0.6,
                    AgentStatus::Fail,
                    "CTA text unreadable",
                ),
                score(
                    Dimension::BrandFit,
                    0.9,
                    AgentStatus::Pass,
                    "Palette matches brand hex list",
                ),
                score(
                    Dimension::VisualQuality,
                    0.5,
                    AgentStatus::Fail,
                    "Visible compression artifacts",
                ),
            ],
            overall_status: AgentStatus::Fail,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_compose_contains_brand_and_campaign_facts() {
        let brand = brand();
        let campaign = campaign();
        let prompt = compose(&GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 2,
            previous_scorecard: None,
            caption: None,
        });

        assert!(prompt.contains("Refinement pass #2"));
        assert!(prompt.contains("Nimbus"));
        assert!(prompt.contains("Nimbus Control Plane"));
        assert!(prompt.contains("Start your free migration"));
        assert!(prompt.contains("#123456"));
        assert!(prompt.contains("Avoid phrases: cheap"));
        assert!(prompt.contains("innovative, secure"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let brand = brand();
        let campaign = campaign();
        let context = GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 1,
            previous_scorecard: None,
            caption: Some("Open on a rooftop at dusk"),
        };
        assert_eq!(compose(&context), compose(&context));
    }

    #[test]
    fn test_first_attempt_label_and_no_feedback() {
        let brand = brand();
        let campaign = campaign();
        let prompt = compose(&GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 1,
            previous_scorecard: None,
            caption: None,
        });
        assert!(prompt.contains("Initial concept"));
        assert!(prompt.contains("No previous critique feedback; this is the first attempt."));
    }

    #[test]
    fn test_feedback_partitions_fix_and_preserve() {
        let brand = brand();
        let campaign = campaign();
        let card = failing_scorecard();
        let prompt = compose(&GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 2,
            previous_scorecard: Some(&card),
            caption: None,
        });

        assert!(prompt.contains("- Clarity: CTA text unreadable"));
        assert!(prompt.contains("- VisualQuality: Visible compression artifacts"));
        assert!(prompt.contains("Keep these aspects from previous attempt:"));
        assert!(prompt.contains("- BrandFit: Palette matches brand hex list"));

        // Exactly two fix bullets, one preserve bullet.
        let fix_section = prompt
            .split("PLEASE FIX THESE IN THIS GENERATION:")
            .nth(1)
            .expect("fix section")
            .split("Keep these aspects")
            .next()
            .expect("before preserve");
        assert_eq!(fix_section.matches("\n- ").count(), 2);
    }

    #[test]
    fn test_feedback_omits_preserve_when_nothing_passed() {
        let brand = brand();
        let campaign = campaign();
        let mut card = failing_scorecard();
        card.scores.retain(|s| !s.status.is_pass());
        let prompt = compose(&GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 3,
            previous_scorecard: Some(&card),
            caption: None,
        });
        assert!(!prompt.contains("Keep these aspects"));
    }

    #[test]
    fn test_caption_renders_creative_direction_block() {
        let brand = brand();
        let campaign = campaign();
        let prompt = compose(&GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 1,
            previous_scorecard: None,
            caption: Some("Open on a rooftop at dusk"),
        });
        assert!(prompt.contains("USER'S CREATIVE DIRECTION:"));
        assert!(prompt.contains("Open on a rooftop at dusk"));
    }

    #[test]
    fn test_palette_and_prohibited_fallbacks() {
        let brand = BrandKit::new("user-1", "Nimbus");
        let campaign = campaign();
        let prompt = compose(&GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 1,
            previous_scorecard: None,
            caption: None,
        });
        assert!(prompt.contains("use brand-appropriate, modern tones"));
        assert!(prompt.contains("Avoid offensive or misleading language."));
        assert!(prompt.contains("Maintain confident, upbeat tone"));
    }

    #[test]
    fn test_empty_tone_keywords_fall_back() {
        let brand = brand();
        let mut campaign = campaign();
        campaign.tone_keywords.clear();
        let prompt = compose(&GenerationContext {
            brand: &brand,
            campaign: &campaign,
            iteration: 1,
            previous_scorecard: None,
            caption: None,
        });
        assert!(prompt.contains("energetic, trustworthy"));
    }
}
