//! Workflow Orchestrators
//!
//! One externally callable operation per workflow, composing the Media
//! Encoder, Request Builder and Response Normalizer over an injected
//! model service. The orchestrators validate preconditions before
//! spending a network call, never retry internally, and log the
//! underlying cause of a failure while returning the typed error.

pub mod claim;
pub mod forensics;
pub mod offer;

use crate::gemini::{GroundingChunk, ModelService};
use crate::request::CallPlan;

pub use claim::verify_claim;
pub use forensics::detect_media_forgery;
pub use offer::vet_job_offer;

/// Final answer text plus stage-one grounding metadata (empty for
/// ungrounded plans).
pub(crate) struct PlanOutput {
    pub text: String,
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// Execute a call plan against the service.
///
/// Two-stage plans are strictly sequential: the formatting call is built
/// and issued only after the grounded call resolves, so a stage-one
/// failure never spends the second call. Grounding chunks always come
/// from stage one; the formatter never sees them.
pub(crate) async fn execute_plan(
    service: &dyn ModelService,
    plan: CallPlan,
) -> crate::Result<PlanOutput> {
    match plan {
        CallPlan::Single(request) => {
            let reply = service.generate(request).await?;
            let text = reply.require_text()?.to_string();
            Ok(PlanOutput {
                text,
                grounding_chunks: reply.grounding_chunks,
            })
        }
        CallPlan::TwoStage { grounded, formatter } => {
            let reply = service.generate(grounded).await?;
            let analysis = reply.require_text()?.to_string();
            let grounding_chunks = reply.grounding_chunks;

            let formatted = service.generate(formatter.into_request(&analysis)).await?;
            let text = formatted.require_text()?.to_string();

            Ok(PlanOutput {
                text,
                grounding_chunks,
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::error::AnalysisError;
    use crate::gemini::{ModelReply, ModelService};
    use crate::request::ModelRequest;

    /// Scripted stand-in for the Gemini client: pops one queued reply per
    /// call and records every request it saw.
    pub(crate) struct FakeService {
        replies: Mutex<VecDeque<crate::Result<ModelReply>>>,
        requests: Mutex<Vec<ModelRequest>>,
    }

    impl FakeService {
        pub fn new() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn push_text(&self, text: &str) {
            self.push_reply(ModelReply {
                text: Some(text.to_string()),
                grounding_chunks: Vec::new(),
            });
        }

        pub fn push_reply(&self, reply: ModelReply) {
            self.replies.lock().unwrap().push_back(Ok(reply));
        }

        pub fn push_error(&self, message: &str) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(AnalysisError::Service(message.to_string())));
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn request(&self, index: usize) -> ModelRequest {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl ModelService for FakeService {
        async fn generate(&self, request: ModelRequest) -> crate::Result<ModelReply> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(AnalysisError::Service(
                        "fake service: no reply queued".to_string(),
                    ))
                })
        }
    }
}
