//! REST clients for the Google AI Studio endpoints: Veo-style long-running
//! video generation and Gemini structured-output critique.
//!
//! Both clients share [`GoogleAiConfig`] and authenticate with the `key`
//! query parameter. HTTP failures are classified into the provider error
//! taxonomy: 401/403 → auth, 429 → quota, anything else → request.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::GoogleAiConfig;
use crate::critique::pool::CritiqueModel;
use crate::domain::error::{AdforgeError, Result};
use crate::frames::FrameImage;
use crate::provider::video::{
    GenerationRequest, OperationHandle, OperationStatus, VideoGenerator,
};

/// Map a non-success HTTP status to the provider error taxonomy.
fn classify_http_failure(status: StatusCode, detail: &str) -> AdforgeError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AdforgeError::ProviderAuth(format!("{status}: {detail}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            AdforgeError::ProviderQuota(format!("{status}: {detail}"))
        }
        _ => AdforgeError::ProviderRequest(format!("{status}: {detail}")),
    }
}

async fn error_for_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(classify_http_failure(status, &body))
    }
}

/// Pull the finished video URI out of an operation body. Supports both
/// response shapes the API has shipped.
fn extract_video_uri(operation: &Value) -> Option<String> {
    let response = operation.get("response")?;
    let video = response
        .pointer("/generateVideoResponse/generatedSamples/0/video")
        .or_else(|| response.pointer("/generatedVideos/0/video"))?;
    video.get("uri")?.as_str().map(str::to_string)
}

/// Pull the first candidate's text out of a generateContent body.
fn extract_candidate_text(body: &Value) -> Option<String> {
    body.pointer("/candidates/0/content/parts/0/text")?
        .as_str()
        .map(str::to_string)
}

/// Veo REST client for long-running video generation.
pub struct GoogleVideoClient {
    config: GoogleAiConfig,
    http: reqwest::Client,
}

impl GoogleVideoClient {
    pub fn new(config: GoogleAiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn operation_url(&self, operation: &OperationHandle) -> String {
        format!("{}/{}", self.config.base_url, operation.id)
    }

    async fn get_operation(&self, operation: &OperationHandle) -> Result<Value> {
        let response = self
            .http
            .get(self.operation_url(operation))
            .query(&[("key", self.config.video_api_key.as_str())])
            .send()
            .await?;
        error_for_response(response).await
    }
}

#[async_trait]
impl VideoGenerator for GoogleVideoClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<OperationHandle> {
        if !request.reference_assets.is_empty() {
            debug!(
                assets = request.reference_assets.len(),
                "reference assets noted; provider receives prompt only"
            );
        }

        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.config.base_url, self.config.video_model
        );
        let body = json!({ "instances": [{ "prompt": request.prompt }] });
        let response = self
            .http
            .post(url)
            .query(&[("key", self.config.video_api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let parsed = error_for_response(response).await?;

        let name = parsed
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AdforgeError::ProviderRequest("operation response missing name".to_string())
            })?;
        Ok(OperationHandle {
            id: name.to_string(),
        })
    }

    async fn poll(&self, operation: &OperationHandle) -> Result<OperationStatus> {
        let body = self.get_operation(operation).await?;
        let done = body.get("done").and_then(Value::as_bool).unwrap_or(false);
        if !done {
            return Ok(OperationStatus::Pending);
        }
        Ok(OperationStatus::Complete {
            has_video: extract_video_uri(&body).is_some(),
        })
    }

    async fn fetch(&self, operation: &OperationHandle) -> Result<Vec<u8>> {
        let body = self.get_operation(operation).await?;
        let uri = extract_video_uri(&body).ok_or_else(|| AdforgeError::MissingVideoPayload {
            operation: operation.id.clone(),
        })?;

        let response = self
            .http
            .get(uri)
            .query(&[("key", self.config.video_api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status, &detail));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Gemini REST client used as the critique model.
pub struct GeminiCritic {
    config: GoogleAiConfig,
    http: reqwest::Client,
}

impl GeminiCritic {
    pub fn new(config: GoogleAiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn request_body(prompt: &str, frames: &[FrameImage]) -> Value {
        let mut parts: Vec<Value> = frames
            .iter()
            .map(|frame| {
                json!({
                    "inlineData": {
                        "mimeType": frame.mime_type,
                        "data": frame.to_base64(),
                    }
                })
            })
            .collect();
        parts.push(json!({ "text": prompt }));

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": { "responseMimeType": "application/json" },
        })
    }
}

#[async_trait]
impl CritiqueModel for GeminiCritic {
    fn id(&self) -> String {
        self.config.critique_model.clone()
    }

    async fn invoke(&self, prompt: &str, frames: &[FrameImage]) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.critique_model
        );
        let response = self
            .http
            .post(url)
            .query(&[("key", self.config.api_key.as_str()), ("alt", "json")])
            .json(&Self::request_body(prompt, frames))
            .send()
            .await?;
        let body = error_for_response(response).await?;

        extract_candidate_text(&body).ok_or_else(|| AdforgeError::EvaluatorResponse {
            evaluator: self.id(),
            reason: "empty response".to_string(),
        })
    }
}
