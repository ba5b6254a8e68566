//! Prompt composition for specialist critique requests.

use crate::domain::brand::BrandKit;
use crate::domain::campaign::CampaignBrief;
use crate::critique::specialists::SpecialistConfig;

/// Shared context rendered into every specialist prompt for one attempt.
#[derive(Debug, Clone)]
pub struct CritiqueContext {
    pub brand_name: String,
    pub brand_tone: Option<String>,
    pub target_audience: Option<String>,
    pub call_to_action: Option<String>,
    pub prohibited_phrases: Vec<String>,
    pub palette_hex: Vec<String>,
    /// The authoritative pass threshold, restated to the evaluator.
    pub score_threshold: f64,
    /// User-supplied caption/transcript, if any.
    pub caption: Option<String>,
    /// One label per extracted frame, timestamp order.
    pub frame_labels: Vec<String>,
}

impl CritiqueContext {
    /// Build the context from brand and campaign facts.
    pub fn from_brief(
        brand: &BrandKit,
        campaign: &CampaignBrief,
        score_threshold: f64,
        caption: Option<&str>,
    ) -> Self {
        Self {
            brand_name: brand.name.clone(),
            brand_tone: brand.tone_description.clone(),
            target_audience: Some(campaign.audience.clone()),
            call_to_action: Some(campaign.call_to_action.clone()),
            prohibited_phrases: brand.prohibited_phrases.clone(),
            palette_hex: brand.derived_palette_hex.clone(),
            score_threshold,
            caption: caption.map(str::to_string),
            frame_labels: Vec::new(),
        }
    }

    /// Attach frame labels for the current attempt.
    pub fn with_frame_count(mut self, count: usize) -> Self {
        self.frame_labels = (1..=count).map(|i| format!("Extracted frame {i}")).collect();
        self
    }
}

/// Build one specialist's full prompt: context block, frame manifest, the
/// required JSON schema, then the dimension-specific instruction.
pub fn build_agent_prompt(context: &CritiqueContext, config: &SpecialistConfig) -> String {
    let palette_section = if context.palette_hex.is_empty() {
        "Brand palette not provided; use brand assets to infer.".to_string()
    } else {
        format!("Brand palette HEX: {}", context.palette_hex.join(", "))
    };

    let prohibited_section = if context.prohibited_phrases.is_empty() {
        "Prohibited phrases: none provided.".to_string()
    } else {
        format!(
            "Prohibited phrases: {}",
            context.prohibited_phrases.join(", ")
        )
    };

    let frame_overview = if context.frame_labels.is_empty() {
        "No frames were extracted; rely on textual context only.".to_string()
    } else {
        format!(
            "You are provided with {} chronological frame image(s) from the candidate ad.",
            context.frame_labels.len()
        )
    };

    let frames_section = if context.frame_labels.is_empty() {
        "N/A".to_string()
    } else {
        context
            .frame_labels
            .iter()
            .enumerate()
            .map(|(index, label)| format!("Frame {}: {}", index + 1, label))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are a specialist agent focused on {dimension}.\n\
         Brand: {brand}\n\
         Tone guidance: {tone}\n\
         Target audience: {audience}\n\
         Call to action: {cta}\n\
         {palette_section}\n\
         {prohibited_section}\n\
         Score threshold for passing: {threshold}\n\
         Caption/transcript: {caption}\n\
         \n\
         {frame_overview}\n\
         Frames for review:\n\
         {frames_section}\n\
         \n\
         Return JSON strictly matching this schema:\n\
         {{\n\
         \x20 \"dimension\": \"{dimension}\",\n\
         \x20 \"score\": number between 0 and 1,\n\
         \x20 \"status\": \"pass\" | \"fail\",\n\
         \x20 \"evidence\": {{\n\
         \x20   \"summary\": string,\n\
         \x20   \"citations\"?: string[]\n\
         \x20 }}\n\
         }}\n\
         {instruction}",
        dimension = config.dimension,
        brand = context.brand_name,
        tone = context.brand_tone.as_deref().unwrap_or("None provided"),
        audience = context.target_audience.as_deref().unwrap_or("General"),
        cta = context.call_to_action.as_deref().unwrap_or("None provided"),
        threshold = context.score_threshold,
        caption = context.caption.as_deref().unwrap_or("N/A"),
        instruction = config.instruction,
    )
}
