//! Campaign briefs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{AdforgeError, Result};

/// One campaign's creative brief, owned by a brand kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignBrief {
    /// Unique identifier.
    pub id: Uuid,

    /// Owning brand kit.
    pub brand_kit_id: Uuid,

    /// What is being advertised. Must describe something physically showable.
    pub product_description: String,

    /// Audience this campaign targets.
    pub audience: String,

    /// Call to action rendered near the end of the clip.
    pub call_to_action: String,

    /// Ordered tone keywords for the creative direction.
    #[serde(default)]
    pub tone_keywords: Vec<String>,

    /// Reference to the product hero image.
    pub product_image_ref: String,

    /// Additional reference assets (lifestyle shots, packaging, ...).
    #[serde(default)]
    pub additional_asset_refs: Vec<String>,

    /// Maximum generate-critique attempts for this campaign.
    pub regen_limit: u32,

    /// When the brief was created.
    pub created_at: DateTime<Utc>,
}

impl CampaignBrief {
    /// Create a brief with required fields and the given regeneration limit.
    pub fn new(
        brand_kit_id: Uuid,
        product_description: impl Into<String>,
        audience: impl Into<String>,
        call_to_action: impl Into<String>,
        product_image_ref: impl Into<String>,
        regen_limit: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            brand_kit_id,
            product_description: product_description.into(),
            audience: audience.into(),
            call_to_action: call_to_action.into(),
            tone_keywords: Vec::new(),
            product_image_ref: product_image_ref.into(),
            additional_asset_refs: Vec::new(),
            regen_limit,
            created_at: Utc::now(),
        }
    }

    /// Set tone keywords.
    pub fn with_tone_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tone_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Add an additional reference asset.
    pub fn with_asset(mut self, asset_ref: impl Into<String>) -> Self {
        self.additional_asset_refs.push(asset_ref.into());
        self
    }

    /// Check required fields and that the regeneration limit is positive.
    pub fn validate(&self) -> Result<()> {
        if self.product_description.trim().is_empty() {
            return Err(AdforgeError::InvalidCampaignBrief(
                "product description is required".to_string(),
            ));
        }
        if self.audience.trim().is_empty() {
            return Err(AdforgeError::InvalidCampaignBrief(
                "audience is required".to_string(),
            ));
        }
        if self.call_to_action.trim().is_empty() {
            return Err(AdforgeError::InvalidCampaignBrief(
                "call to action is required".to_string(),
            ));
        }
        if self.regen_limit == 0 {
            return Err(AdforgeError::InvalidCampaignBrief(
                "regen limit must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> CampaignBrief {
        CampaignBrief::new(
            Uuid::new_v4(),
            "Nimbus Control Plane",
            "Enterprise platform teams",
            "Start your free migration",
            "uploads/product.png",
            5,
        )
    }

    #[test]
    fn test_valid_brief() {
        assert!(brief().validate().is_ok());
    }

    #[test]
    fn test_zero_regen_limit_rejected() {
        let mut b = brief();
        b.regen_limit = 0;
        let err = b.validate().expect_err("zero limit must fail");
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_empty_cta_rejected() {
        let mut b = brief();
        b.call_to_action = String::new();
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let b = brief()
            .with_tone_keywords(["innovative", "secure"])
            .with_asset("uploads/lifestyle.png");
        assert_eq!(b.tone_keywords.len(), 2);
        assert_eq!(b.additional_asset_refs, vec!["uploads/lifestyle.png"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let b = brief();
        let json = serde_json::to_string(&b).expect("serialize");
        let back: CampaignBrief = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(b, back);
    }
}
