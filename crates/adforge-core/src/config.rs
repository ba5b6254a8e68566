//! Process configuration for the generation loop.
//!
//! Settings are explicit values injected at construction, never read ad hoc
//! from the environment inside the loop. The `from_env` constructors exist
//! for binaries that want the conventional variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::{AdforgeError, Result};

/// Default score threshold when neither the request nor the process
/// configuration overrides it.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.8;

/// Default regeneration limit.
pub const DEFAULT_REGEN_LIMIT: u32 = 5;

/// Default number of frames sampled per critique.
pub const DEFAULT_FRAME_SAMPLE_COUNT: usize = 6;

/// Default poll interval for long-running generation operations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Tunables for the iteration controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopSettings {
    /// Regeneration limit used when neither request nor campaign sets one.
    pub default_regen_limit: u32,

    /// Score threshold used when the request does not override it.
    pub score_threshold: f64,

    /// Frames sampled from each generated video for critique.
    pub frame_sample_count: usize,

    /// Fixed interval between generation status polls. No timeout is applied
    /// at this level; callers needing a wall-clock bound wrap the run.
    pub poll_interval: Duration,

    /// Directory where generated videos are materialized.
    pub video_dir: PathBuf,

    /// Root directory for persisted attempt records.
    pub storage_root: PathBuf,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            default_regen_limit: DEFAULT_REGEN_LIMIT,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            frame_sample_count: DEFAULT_FRAME_SAMPLE_COUNT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            video_dir: PathBuf::from("storage/generated"),
            storage_root: PathBuf::from("storage/attempts"),
        }
    }
}

impl LoopSettings {
    /// Build settings from conventional environment variables, falling back
    /// to defaults: `ADFORGE_REGEN_LIMIT`, `ADFORGE_SCORE_THRESHOLD`,
    /// `ADFORGE_FRAME_COUNT`, `ADFORGE_POLL_INTERVAL_SECS`,
    /// `ADFORGE_VIDEO_DIR`, `ADFORGE_STORAGE_DIR`.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(raw) = std::env::var("ADFORGE_REGEN_LIMIT") {
            settings.default_regen_limit = raw
                .parse()
                .map_err(|_| AdforgeError::Config(format!("ADFORGE_REGEN_LIMIT invalid: {raw}")))?;
        }
        if let Ok(raw) = std::env::var("ADFORGE_SCORE_THRESHOLD") {
            settings.score_threshold = raw.parse().map_err(|_| {
                AdforgeError::Config(format!("ADFORGE_SCORE_THRESHOLD invalid: {raw}"))
            })?;
        }
        if let Ok(raw) = std::env::var("ADFORGE_FRAME_COUNT") {
            settings.frame_sample_count = raw
                .parse()
                .map_err(|_| AdforgeError::Config(format!("ADFORGE_FRAME_COUNT invalid: {raw}")))?;
        }
        if let Ok(raw) = std::env::var("ADFORGE_POLL_INTERVAL_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                AdforgeError::Config(format!("ADFORGE_POLL_INTERVAL_SECS invalid: {raw}"))
            })?;
            settings.poll_interval = Duration::from_secs(secs);
        }
        if let Ok(dir) = std::env::var("ADFORGE_VIDEO_DIR") {
            settings.video_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("ADFORGE_STORAGE_DIR") {
            settings.storage_root = PathBuf::from(dir);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Override the score threshold.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Override the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the storage root.
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }

    /// Override the video output directory.
    pub fn with_video_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.video_dir = dir.into();
        self
    }

    /// Check invariants: positive regen limit and frame count, threshold in
    /// 0.0–1.0, non-zero poll interval.
    pub fn validate(&self) -> Result<()> {
        if self.default_regen_limit == 0 {
            return Err(AdforgeError::Config(
                "default regen limit must be a positive integer".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(AdforgeError::Config(format!(
                "score threshold {} outside 0.0–1.0",
                self.score_threshold
            )));
        }
        if self.frame_sample_count == 0 {
            return Err(AdforgeError::Config(
                "frame sample count must be positive".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(AdforgeError::Config(
                "poll interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Credentials and endpoints for the Google AI providers.
#[derive(Debug, Clone)]
pub struct GoogleAiConfig {
    /// API key for the critique model.
    pub api_key: String,

    /// API key for video generation. Defaults to `api_key` (both services
    /// live behind generativelanguage.googleapis.com).
    pub video_api_key: String,

    /// Base URL for the REST API.
    pub base_url: String,

    /// Model id for video generation.
    pub video_model: String,

    /// Model id for critique.
    pub critique_model: String,
}

impl GoogleAiConfig {
    /// Create a config with the given key and default endpoints/models.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            video_api_key: api_key.clone(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            video_model: "veo-3.1-generate-preview".to_string(),
            critique_model: "gemini-2.5-flash".to_string(),
        }
    }

    /// Build from `GEMINI_API_KEY` (required) and `VEO_API_KEY` (optional,
    /// falls back to the Gemini key).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AdforgeError::Config("GEMINI_API_KEY is required".to_string()))?;
        if api_key.trim().is_empty() {
            return Err(AdforgeError::Config("GEMINI_API_KEY is empty".to_string()));
        }

        let mut config = Self::new(api_key);
        if let Ok(video_key) = std::env::var("VEO_API_KEY") {
            if !video_key.trim().is_empty() {
                config.video_api_key = video_key;
            }
        }
        Ok(config)
    }

    /// Override the base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the video model id.
    pub fn with_video_model(mut self, model: impl Into<String>) -> Self {
        self.video_model = model.into();
        self
    }

    /// Override the critique model id.
    pub fn with_critique_model(mut self, model: impl Into<String>) -> Self {
        self.critique_model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_settings_defaults() {
        let settings = LoopSettings::default();
        assert_eq!(settings.default_regen_limit, 5);
        assert_eq!(settings.score_threshold, 0.8);
        assert_eq!(settings.frame_sample_count, 6);
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_loop_settings_rejects_zero_regen_limit() {
        let mut settings = LoopSettings::default();
        settings.default_regen_limit = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_loop_settings_rejects_bad_threshold() {
        let settings = LoopSettings::default().with_score_threshold(1.5);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_loop_settings_builders() {
        let settings = LoopSettings::default()
            .with_score_threshold(0.9)
            .with_poll_interval(Duration::from_millis(50))
            .with_storage_root("/tmp/attempts")
            .with_video_dir("/tmp/videos");
        assert_eq!(settings.score_threshold, 0.9);
        assert_eq!(settings.poll_interval, Duration::from_millis(50));
        assert_eq!(settings.storage_root, PathBuf::from("/tmp/attempts"));
        assert_eq!(settings.video_dir, PathBuf::from("/tmp/videos"));
    }

    #[test]
    fn test_google_config_key_fallback() {
        let config = GoogleAiConfig::new("key-1");
        assert_eq!(config.api_key, "key-1");
        assert_eq!(config.video_api_key, "key-1");
        assert!(config.base_url.contains("generativelanguage"));
    }

    #[test]
    fn test_google_config_builders() {
        let config = GoogleAiConfig::new("k")
            .with_base_url("http://localhost:9090/v1beta")
            .with_video_model("veo-test")
            .with_critique_model("gemini-test");
        assert_eq!(config.base_url, "http://localhost:9090/v1beta");
        assert_eq!(config.video_model, "veo-test");
        assert_eq!(config.critique_model, "gemini-test");
    }
}
