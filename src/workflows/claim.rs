//! Claim verification workflow
//!
//! Search-grounded verification followed by a formatting call. Cited
//! sources are extracted from stage-one grounding metadata and merged
//! into the structured verdict here, not by the model; source extraction
//! and answer formatting fail independently of each other.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::gemini::ModelService;
use crate::models::{ClaimVerdict, ClaimVerificationResult, MediaPayload};
use crate::normalize::{extract_sources, parse_structured};
use crate::request::claim_plan;
use crate::workflows::execute_plan;

/// What the formatting call emits; sources are merged in afterwards.
#[derive(Debug, Deserialize)]
struct FormattedVerdict {
    verdict: ClaimVerdict,
    correction: String,
}

/// Verify a factual claim, optionally supported by an image.
pub async fn verify_claim(
    service: &dyn ModelService,
    claim: &str,
    image: Option<MediaPayload>,
) -> crate::Result<ClaimVerificationResult> {
    if claim.trim().is_empty() {
        return Err(AnalysisError::Input("empty claim text".to_string()));
    }

    let invocation = Uuid::new_v4();
    info!(%invocation, with_image = image.is_some(), "Verifying claim");

    let output = execute_plan(service, claim_plan(claim, image.as_ref()))
        .await
        .map_err(|e| {
            warn!(%invocation, error = %e, "Claim verification call failed");
            e
        })?;

    let sources = extract_sources(&output.grounding_chunks);

    let formatted: FormattedVerdict = parse_structured(&output.text).map_err(|e| {
        warn!(%invocation, error = %e, "Claim verification response rejected");
        e
    })?;

    info!(%invocation, verdict = %formatted.verdict, source_count = sources.len(), "Claim verification complete");

    Ok(ClaimVerificationResult {
        verdict: formatted.verdict,
        correction: formatted.correction,
        sources,
    })
}
