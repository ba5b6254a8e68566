//! Concurrent specialist evaluation: fan-out one task per configured
//! dimension, fan-in in configuration order.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::critique::specialists::SpecialistConfig;
use crate::domain::error::{AdforgeError, Result};
use crate::domain::scorecard::Dimension;
use crate::frames::FrameImage;
use crate::prompt::critique::{build_agent_prompt, CritiqueContext};

/// A multimodal model that evaluates frames against an instruction and
/// returns a single structured JSON object as text.
#[async_trait]
pub trait CritiqueModel: Send + Sync {
    /// Stable identifier recorded into each score's metadata.
    fn id(&self) -> String;

    /// Send one structured-output request. The returned text must be a
    /// single JSON object; parsing and validation happen in the pool and
    /// aggregator.
    async fn invoke(&self, prompt: &str, frames: &[FrameImage]) -> Result<String>;
}

/// One evaluator's parsed-but-unvalidated output.
#[derive(Debug, Clone)]
pub struct EvaluatorOutput {
    /// Identifier of the model that produced this output.
    pub evaluator: String,

    /// The dimension this evaluator was configured for.
    pub dimension: Dimension,

    /// Parsed JSON body; shape validation happens during aggregation.
    pub output: serde_json::Value,
}

/// Run every configured specialist concurrently against the same frame set.
///
/// Results come back in configuration order. The fan-in blocks until every
/// evaluator completes; a non-JSON response from any one of them is fatal
/// for the attempt and the others' results are discarded.
pub async fn evaluate(
    model: Arc<dyn CritiqueModel>,
    specialists: &[SpecialistConfig],
    frames: Arc<Vec<FrameImage>>,
    context: &CritiqueContext,
) -> Result<Vec<EvaluatorOutput>> {
    info!(
        evaluators = specialists.len(),
        frames = frames.len(),
        "dispatching specialist evaluators"
    );

    let mut tasks: Vec<JoinHandle<Result<EvaluatorOutput>>> =
        Vec::with_capacity(specialists.len());

    for specialist in specialists {
        let prompt = build_agent_prompt(context, specialist);
        let dimension = specialist.dimension;
        let model = Arc::clone(&model);
        let frames = Arc::clone(&frames);

        tasks.push(tokio::spawn(async move {
            let evaluator = model.id();
            let text = model.invoke(&prompt, &frames).await?;
            let output: serde_json::Value =
                serde_json::from_str(&text).map_err(|err| AdforgeError::EvaluatorResponse {
                    evaluator: evaluator.clone(),
                    reason: format!("not valid JSON ({err}): {text}"),
                })?;
            debug!(dimension = %dimension, "evaluator responded");
            Ok(EvaluatorOutput {
                evaluator,
                dimension,
                output,
            })
        }));
    }

    let joined = futures::future::try_join_all(tasks).await?;
    let mut outputs = Vec::with_capacity(joined.len());
    for result in joined {
        outputs.push(result?);
    }
    Ok(outputs)
}
