//! Job-offer vetting workflow
//!
//! Two caller-selected modes. Fast: a search-grounded company check whose
//! free-text answer is reformatted by a second call. Deep: one schema call
//! with a high reasoning budget; slower by design, so the caller must not
//! time it out aggressively.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::gemini::ModelService;
use crate::models::OfferVettingResult;
use crate::normalize::parse_structured;
use crate::request::offer_plan;
use crate::workflows::execute_plan;

/// Vet a job-offer text for scam indicators. `deep` is an explicit caller
/// choice, never inferred from the input.
pub async fn vet_job_offer(
    service: &dyn ModelService,
    offer_text: &str,
    deep: bool,
) -> crate::Result<OfferVettingResult> {
    if offer_text.trim().is_empty() {
        return Err(AnalysisError::Input("empty job offer text".to_string()));
    }

    let invocation = Uuid::new_v4();
    let mode = if deep { "deep" } else { "fast" };
    info!(%invocation, mode, "Vetting job offer");

    let output = execute_plan(service, offer_plan(offer_text, deep))
        .await
        .map_err(|e| {
            warn!(%invocation, mode, error = %e, "Offer vetting call failed");
            e
        })?;

    let result: OfferVettingResult = parse_structured(&output.text).map_err(|e| {
        warn!(%invocation, mode, error = %e, "Offer vetting response rejected");
        e
    })?;

    info!(%invocation, verdict = %result.verdict, "Offer vetting complete");
    Ok(result)
}
