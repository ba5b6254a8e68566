//! Frame sampling from generated videos.
//!
//! The loop does not own extraction internals; it consumes the
//! [`FrameSampler`] contract: exactly `count` frames ordered by timestamp
//! ascending, with bytes available for inline encoding, or a fatal error
//! when the video is unreadable. [`FfmpegSampler`] adapts the ffmpeg/ffprobe
//! binaries to that contract. Extracted frames live in a sampler-owned temp
//! directory that is dropped once the bytes are read; permanent frame
//! storage is the caller's policy.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use tokio::process::Command;
use tracing::debug;

use crate::domain::error::{AdforgeError, Result};

/// One still image sampled from a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,

    /// MIME type of `bytes`.
    pub mime_type: String,
}

impl FrameImage {
    /// Create a PNG frame.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "image/png".to_string(),
        }
    }

    /// Base64 encoding of the image bytes, for inline provider payloads.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// External frame-extraction capability: given a video and a count, return
/// that many evenly spaced stills in timestamp order.
#[async_trait]
pub trait FrameSampler: Send + Sync {
    async fn extract_frames(&self, video_path: &Path, count: usize) -> Result<Vec<FrameImage>>;
}

/// ffmpeg/ffprobe-backed sampler.
#[derive(Debug, Clone)]
pub struct FfmpegSampler {
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl Default for FfmpegSampler {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }
}

impl FfmpegSampler {
    /// Use explicit binary paths instead of relying on `PATH`.
    pub fn with_binaries(ffmpeg_bin: impl Into<String>, ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    fn extraction_error(video_path: &Path, reason: impl Into<String>) -> AdforgeError {
        AdforgeError::FrameExtraction {
            video: video_path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Probe the container for its duration in seconds.
    async fn probe_duration(&self, video_path: &Path) -> Result<f64> {
        let output = Command::new(&self.ffprobe_bin)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(video_path)
            .output()
            .await
            .map_err(|err| Self::extraction_error(video_path, format!("ffprobe failed: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::extraction_error(
                video_path,
                format!("ffprobe exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or_else(|| {
                Self::extraction_error(video_path, format!("unparseable duration: {stdout:?}"))
            })
    }
}

#[async_trait]
impl FrameSampler for FfmpegSampler {
    async fn extract_frames(&self, video_path: &Path, count: usize) -> Result<Vec<FrameImage>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let duration = self.probe_duration(video_path).await?;
        let workdir = tempfile::tempdir().map_err(|err| {
            Self::extraction_error(video_path, format!("temp dir unavailable: {err}"))
        })?;

        let mut frames = Vec::with_capacity(count);
        for index in 0..count {
            // Midpoint of each of `count` equal spans, so frames are evenly
            // spaced and never land on the exact end of the stream.
            let timestamp = duration * (index as f64 + 0.5) / count as f64;
            let frame_path = workdir.path().join(format!("frame-{index:02}.png"));

            let output = Command::new(&self.ffmpeg_bin)
                .args(["-v", "error", "-ss", &format!("{timestamp:.3}"), "-i"])
                .arg(video_path)
                .args(["-frames:v", "1", "-y"])
                .arg(&frame_path)
                .output()
                .await
                .map_err(|err| {
                    Self::extraction_error(video_path, format!("ffmpeg failed: {err}"))
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(Self::extraction_error(
                    video_path,
                    format!("ffmpeg exited with {}: {}", output.status, stderr.trim()),
                ));
            }

            let bytes = tokio::fs::read(&frame_path).await.map_err(|err| {
                Self::extraction_error(
                    video_path,
                    format!("frame {index} missing after extraction: {err}"),
                )
            })?;
            if bytes.is_empty() {
                return Err(Self::extraction_error(
                    video_path,
                    format!("frame {index} is empty"),
                ));
            }
            frames.push(FrameImage::png(bytes));
        }

        debug!(
            video = %video_path.display(),
            frames = frames.len(),
            "extracted frames"
        );
        Ok(frames)
    }
}
