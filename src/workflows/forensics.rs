//! Media forensics workflow
//!
//! One schema call against the reasoning model with image + instruction
//! parts. The result is returned exactly as the model produced it:
//! percentage and verdict are never recomputed from each other here.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::gemini::ModelService;
use crate::models::{ForensicsResult, MediaPayload};
use crate::normalize::parse_forensics;
use crate::request::forensics_plan;
use crate::workflows::execute_plan;

/// Analyze a still image or captured frame for evidence of AI generation.
pub async fn detect_media_forgery(
    service: &dyn ModelService,
    payload: MediaPayload,
) -> crate::Result<ForensicsResult> {
    if payload.data.is_empty() {
        return Err(AnalysisError::Input("no media selected".to_string()));
    }

    let invocation = Uuid::new_v4();
    info!(%invocation, content_type = %payload.content_type, "Starting media forensics");

    let output = execute_plan(service, forensics_plan(&payload))
        .await
        .map_err(|e| {
            warn!(%invocation, error = %e, "Media forensics call failed");
            e
        })?;

    let result = parse_forensics(&output.text).map_err(|e| {
        warn!(%invocation, error = %e, "Media forensics response rejected");
        e
    })?;

    info!(%invocation, percent_ai = result.percent_ai, verdict = %result.verdict, "Media forensics complete");
    Ok(result)
}
