//! Brand kits and palette normalization.
//!
//! Palette inputs arrive as free-form text (hex with or without `#`,
//! shorthand hex, CSS color names). Normalization produces uppercase
//! `#RRGGBB` values, deduplicated in first-seen order; entries that parse
//! as neither hex nor a known color name are dropped silently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{AdforgeError, Result};

/// Immutable-per-version brand identity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandKit {
    /// Unique identifier for this brand kit version.
    pub id: Uuid,

    /// Owning user or tenant.
    pub owner_id: String,

    /// Brand name, spelled exactly as it must appear on screen.
    pub name: String,

    /// Voice/tone guidance for generated copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_description: Option<String>,

    /// Default audience when a campaign does not narrow it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,

    /// Brand-level default call to action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_call_to_action: Option<String>,

    /// Phrases that must never appear in generated assets.
    #[serde(default)]
    pub prohibited_phrases: Vec<String>,

    /// Normalized `#RRGGBB` palette, first-seen order, no duplicates.
    #[serde(default)]
    pub derived_palette_hex: Vec<String>,

    /// Reference to the brand logo asset, if uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_asset_ref: Option<String>,

    /// Reference to the palette source image, if uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_asset_ref: Option<String>,

    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

impl BrandKit {
    /// Create a brand kit with the required identity fields.
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            name: name.into(),
            tone_description: None,
            target_audience: None,
            primary_call_to_action: None,
            prohibited_phrases: Vec::new(),
            derived_palette_hex: Vec::new(),
            logo_asset_ref: None,
            palette_asset_ref: None,
            created_at: Utc::now(),
        }
    }

    /// Set tone guidance.
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone_description = Some(tone.into());
        self
    }

    /// Set prohibited phrases, deduplicated in first-seen order.
    pub fn with_prohibited_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = std::collections::HashSet::new();
        self.prohibited_phrases = phrases
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.trim().is_empty())
            .filter(|p| seen.insert(p.clone()))
            .collect();
        self
    }

    /// Set the palette from raw user-supplied color values.
    pub fn with_palette<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.derived_palette_hex = normalize_palette(values);
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AdforgeError::InvalidBrandKit(
                "brand name is required".to_string(),
            ));
        }
        if self.owner_id.trim().is_empty() {
            return Err(AdforgeError::InvalidBrandKit(
                "owner id is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Normalize a list of raw color values into deduplicated `#RRGGBB` strings.
///
/// Order of first appearance is preserved; unparseable values are dropped.
pub fn normalize_palette<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter_map(|raw| normalize_color(raw.as_ref()))
        .filter(|hex| seen.insert(hex.clone()))
        .collect()
}

/// Normalize one raw color value into `#RRGGBB`, or `None` if unparseable.
///
/// Accepts `#RGB`, `RGB`, `#RRGGBB`, `RRGGBB`, `#RRGGBBAA` (alpha stripped),
/// and CSS color names (case-insensitive).
pub fn normalize_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return match digits.len() {
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                Some(format!("#{}", expanded.to_ascii_uppercase()))
            }
            6 | 8 => Some(format!("#{}", digits[..6].to_ascii_uppercase())),
            _ => None,
        };
    }

    let lowered = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, [r, g, b])| format!("#{r:02X}{g:02X}{b:02X}"))
}

/// CSS3 extended color keywords.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_color_full_hex() {
        assert_eq!(normalize_color("#12ab56"), Some("#12AB56".to_string()));
        assert_eq!(normalize_color("12ab56"), Some("#12AB56".to_string()));
    }

    #[test]
    fn test_normalize_color_shorthand_expands() {
        assert_eq!(normalize_color("#abc"), Some("#AABBCC".to_string()));
        assert_eq!(normalize_color("f0c"), Some("#FF00CC".to_string()));
    }

    #[test]
    fn test_normalize_color_strips_alpha() {
        assert_eq!(normalize_color("#12345678"), Some("#123456".to_string()));
    }

    #[test]
    fn test_normalize_color_names() {
        assert_eq!(normalize_color("rebeccapurple"), Some("#663399".to_string()));
        assert_eq!(normalize_color("Tomato"), Some("#FF6347".to_string()));
        assert_eq!(normalize_color("  navy "), Some("#000080".to_string()));
    }

    #[test]
    fn test_normalize_color_drops_garbage() {
        assert_eq!(normalize_color("not-a-color"), None);
        assert_eq!(normalize_color("#12"), None);
        assert_eq!(normalize_color("#12345"), None);
        assert_eq!(normalize_color(""), None);
    }

    #[test]
    fn test_normalize_palette_dedupes_in_order() {
        let palette = normalize_palette(["#abc", "red", "#AABBCC", "bogus", "RED"]);
        assert_eq!(palette, vec!["#AABBCC", "#FF0000"]);
    }

    #[test]
    fn test_brand_kit_builder() {
        let kit = BrandKit::new("user-1", "Nimbus")
            .with_tone("Confident, forward-looking")
            .with_prohibited_phrases(["cheap", "cheap", "free money"])
            .with_palette(["#123456", "abcdef"]);

        assert!(kit.validate().is_ok());
        assert_eq!(kit.prohibited_phrases, vec!["cheap", "free money"]);
        assert_eq!(kit.derived_palette_hex, vec!["#123456", "#ABCDEF"]);
    }

    #[test]
    fn test_brand_kit_requires_name() {
        let kit = BrandKit::new("user-1", "  ");
        assert!(kit.validate().is_err());
    }

    #[test]
    fn test_brand_kit_serde_roundtrip() {
        let kit = BrandKit::new("user-1", "Nimbus").with_palette(["#FF0000"]);
        let json = serde_json::to_string(&kit).expect("serialize");
        let back: BrandKit = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(kit, back);
    }
}
