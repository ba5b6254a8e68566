//! Append-only persistence for attempt records.
//!
//! One record per completed attempt, written immediately after aggregation
//! so partial progress survives a crashed run. Records are keyed by
//! brand/campaign/run/iteration and stored as pretty JSON with a sibling
//! `.digest` file; read-back verifies the digest. Nothing is ever updated
//! in place.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::digest::digest_bytes;
use crate::domain::error::{AdforgeError, Result};
use crate::domain::scorecard::{AgentStatus, Scorecard};

/// Durable record of one evaluated attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Run this attempt belongs to.
    pub run_id: Uuid,

    /// Owning brand kit.
    pub brand_kit_id: Uuid,

    /// Owning campaign.
    pub campaign_id: Uuid,

    /// 1-based attempt number within the run.
    pub iteration: u32,

    /// Reference to the generated video asset.
    pub video_ref: String,

    /// Provider-side operation id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_operation_id: Option<String>,

    /// User-supplied caption, when one drove the generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Denormalized overall verdict, for cheap listing.
    pub overall_status: AgentStatus,

    /// The full reconciled scorecard.
    pub scorecard: Scorecard,

    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// Filesystem-backed attempt store.
///
/// Layout: `<root>/<brand_kit_id>/<campaign_id>/<run_id>/attempt-<NNN>.json`
/// plus a sibling `attempt-<NNN>.digest`.
#[derive(Debug, Clone)]
pub struct AttemptStore {
    root: PathBuf,
}

impl AttemptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run_dir(&self, brand_kit_id: Uuid, campaign_id: Uuid, run_id: Uuid) -> PathBuf {
        self.root
            .join(brand_kit_id.to_string())
            .join(campaign_id.to_string())
            .join(run_id.to_string())
    }

    fn attempt_basename(iteration: u32) -> String {
        format!("attempt-{iteration:03}")
    }

    /// Persist one attempt record. Returns the JSON path.
    pub fn write_attempt(&self, record: &AttemptRecord) -> Result<PathBuf> {
        let dir = self.run_dir(record.brand_kit_id, record.campaign_id, record.run_id);
        std::fs::create_dir_all(&dir)?;

        let base = Self::attempt_basename(record.iteration);
        let path = dir.join(format!("{base}.json"));
        let digest_path = dir.join(format!("{base}.digest"));
        if path.exists() {
            return Err(AdforgeError::Storage(format!(
                "attempt record already exists: {}",
                path.display()
            )));
        }

        let json = serde_json::to_vec_pretty(record)?;
        let digest = digest_bytes(&json);

        std::fs::write(&path, &json)?;
        std::fs::write(&digest_path, digest.as_bytes())?;

        Ok(path)
    }

    /// Read one attempt record back, verifying its digest.
    pub fn read_attempt(
        &self,
        brand_kit_id: Uuid,
        campaign_id: Uuid,
        run_id: Uuid,
        iteration: u32,
    ) -> Result<AttemptRecord> {
        let dir = self.run_dir(brand_kit_id, campaign_id, run_id);
        let base = Self::attempt_basename(iteration);
        let json = std::fs::read(dir.join(format!("{base}.json")))?;
        let recorded = std::fs::read_to_string(dir.join(format!("{base}.digest")))?;

        let actual = digest_bytes(&json);
        if recorded.trim() != actual {
            return Err(AdforgeError::DigestMismatch {
                expected: recorded.trim().to_string(),
                actual,
            });
        }
        Ok(serde_json::from_slice(&json)?)
    }

    /// List one run's attempt records in iteration order.
    pub fn list_attempts(
        &self,
        brand_kit_id: Uuid,
        campaign_id: Uuid,
        run_id: Uuid,
    ) -> Result<Vec<AttemptRecord>> {
        let dir = self.run_dir(brand_kit_id, campaign_id, run_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut iterations = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name
                .strip_prefix("attempt-")
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                if let Ok(iteration) = stem.parse::<u32>() {
                    iterations.push(iteration);
                }
            }
        }
        iterations.sort_unstable();

        iterations
            .into_iter()
            .map(|iteration| self.read_attempt(brand_kit_id, campaign_id, run_id, iteration))
            .collect()
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
