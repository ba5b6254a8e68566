//! Video generation client: submit, poll, fetch.
//!
//! Providers model generation as a long-running operation. The driver polls
//! at a fixed interval with no internal timeout; callers wanting a hard
//! wall-clock cap wrap the call (e.g. `tokio::time::timeout`). Provider
//! auth/quota errors, malformed operation results, and download failures are
//! not retried here; they propagate to the iteration controller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::error::{AdforgeError, Result};

/// One generation request: the composed prompt plus reference assets
/// (logo, product image, extras).
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub reference_assets: Vec<String>,
}

/// Provider-side handle for a long-running generation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    pub id: String,
}

/// Poll result for a generation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// Still generating.
    Pending,
    /// Finished. `has_video` reports whether a usable payload exists; a
    /// completed operation without one is fatal for the attempt.
    Complete { has_video: bool },
}

/// Asynchronous video generation provider.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Submit a generation request, returning the operation handle.
    async fn submit(&self, request: &GenerationRequest) -> Result<OperationHandle>;

    /// Poll the operation's current status.
    async fn poll(&self, operation: &OperationHandle) -> Result<OperationStatus>;

    /// Download the finished video bytes.
    async fn fetch(&self, operation: &OperationHandle) -> Result<Vec<u8>>;
}

/// A generated video materialized to local storage.
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub video_path: PathBuf,
    pub operation_id: String,
}

/// Drive one generation to completion: submit, poll at `poll_interval`
/// until done, then download into `output_dir`.
///
/// Fails loudly if the operation completes without a usable payload or the
/// download produces no bytes; a partial file is never returned.
pub async fn generate_video(
    generator: &dyn VideoGenerator,
    request: &GenerationRequest,
    output_dir: &Path,
    poll_interval: Duration,
) -> Result<GeneratedVideo> {
    let operation = generator.submit(request).await?;
    info!(operation = %operation.id, "generation operation started");

    loop {
        match generator.poll(&operation).await? {
            OperationStatus::Pending => {
                debug!(operation = %operation.id, "waiting for video generation");
                tokio::time::sleep(poll_interval).await;
            }
            OperationStatus::Complete { has_video: false } => {
                return Err(AdforgeError::MissingVideoPayload {
                    operation: operation.id,
                });
            }
            OperationStatus::Complete { has_video: true } => break,
        }
    }

    let bytes = generator.fetch(&operation).await?;
    if bytes.is_empty() {
        return Err(AdforgeError::MissingVideoPayload {
            operation: operation.id,
        });
    }

    tokio::fs::create_dir_all(output_dir).await?;
    let video_path = output_dir.join(format!("veo-{}.mp4", Uuid::new_v4()));
    tokio::fs::write(&video_path, &bytes).await?;
    info!(
        operation = %operation.id,
        path = %video_path.display(),
        size = bytes.len(),
        "generated video saved"
    );

    Ok(GeneratedVideo {
        video_path,
        operation_id: operation.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Completes after a configurable number of pending polls.
    struct SlowGenerator {
        pending_polls: u32,
        polls_seen: AtomicU32,
        payload: Vec<u8>,
        has_video: bool,
    }

    impl SlowGenerator {
        fn new(pending_polls: u32, payload: Vec<u8>, has_video: bool) -> Self {
            Self {
                pending_polls,
                polls_seen: AtomicU32::new(0),
                payload,
                has_video,
            }
        }
    }

    #[async_trait]
    impl VideoGenerator for SlowGenerator {
        async fn submit(&self, _request: &GenerationRequest) -> Result<OperationHandle> {
            Ok(OperationHandle {
                id: "operations/test-1".to_string(),
            })
        }

        async fn poll(&self, _operation: &OperationHandle) -> Result<OperationStatus> {
            let seen = self.polls_seen.fetch_add(1, Ordering::SeqCst);
            if seen < self.pending_polls {
                Ok(OperationStatus::Pending)
            } else {
                Ok(OperationStatus::Complete {
                    has_video: self.has_video,
                })
            }
        }

        async fn fetch(&self, _operation: &OperationHandle) -> Result<Vec<u8>> {
            Ok(self.payload.clone())
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "a short ad".to_string(),
            reference_assets: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_polls_until_complete_and_saves_video() {
        let generator = SlowGenerator::new(3, b"video-bytes".to_vec(), true);
        let dir = tempfile::tempdir().expect("tempdir");
        let video = generate_video(
            &generator,
            &request(),
            dir.path(),
            Duration::from_millis(1),
        )
        .await
        .expect("generate");

        assert_eq!(video.operation_id, "operations/test-1");
        assert_eq!(generator.polls_seen.load(Ordering::SeqCst), 4);
        let saved = std::fs::read(&video.video_path).expect("saved file");
        assert_eq!(saved, b"video-bytes");
    }

    #[tokio::test]
    async fn test_complete_without_payload_fails_loudly() {
        let generator = SlowGenerator::new(0, Vec::new(), false);
        let dir = tempfile::tempdir().expect("tempdir");
        let err = generate_video(
            &generator,
            &request(),
            dir.path(),
            Duration::from_millis(1),
        )
        .await
        .expect_err("missing payload must fail");
        assert!(matches!(err, AdforgeError::MissingVideoPayload { .. }));
    }

    #[tokio::test]
    async fn test_empty_download_fails_loudly() {
        let generator = SlowGenerator::new(0, Vec::new(), true);
        let dir = tempfile::tempdir().expect("tempdir");
        let err = generate_video(
            &generator,
            &request(),
            dir.path(),
            Duration::from_millis(1),
        )
        .await
        .expect_err("empty download must fail");
        assert!(matches!(err, AdforgeError::MissingVideoPayload { .. }));
        // No partial file left behind.
        assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
    }
}
