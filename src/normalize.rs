//! Response Normalizer
//!
//! Turns possibly-unstructured model output into validated domain results.
//! A structured-output schema is only a strong hint from the service, so
//! every answer is treated as untrusted text: fence-strip, parse, validate,
//! or fail with a terminal Parse error. Never coerced to defaults.

use serde::de::DeserializeOwned;

use crate::error::AnalysisError;
use crate::gemini::GroundingChunk;
use crate::models::{ForensicsResult, WebSource};

/// Remove an incidental markdown fence the service may wrap around JSON.
/// Text without fences passes through unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse cleaned response text as the expected schema shape.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> crate::Result<T> {
    let cleaned = strip_code_fences(text);

    serde_json::from_str(cleaned).map_err(|e| {
        AnalysisError::Parse(format!(
            "response did not match expected schema: {} | raw={}",
            e, text
        ))
    })
}

/// Parse a forensics answer, range-checking the reported percentage as a
/// shape violation.
pub fn parse_forensics(text: &str) -> crate::Result<ForensicsResult> {
    let result: ForensicsResult = parse_structured(text)?;

    if result.percent_ai > 100 {
        return Err(AnalysisError::Parse(format!(
            "percentAI out of range: {}",
            result.percent_ai
        )));
    }

    Ok(result)
}

/// Extract cited web sources from grounding metadata, dropping chunks that
/// reference anything other than a web resource. Independent of whether
/// the answer text parses; zero citations is an empty list, not an error.
pub fn extract_sources(chunks: &[GroundingChunk]) -> Vec<WebSource> {
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.clone()?;
            Some(WebSource {
                title: web.title.clone().unwrap_or_default(),
                uri,
            })
        })
        .collect()
}
