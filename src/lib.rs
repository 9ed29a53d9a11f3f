//! Veritas Core
//!
//! Request-construction and response-normalization pipeline behind a
//! digital-integrity assistant:
//! - Encodes user media (still images, captured video frames) into
//!   transport-safe payloads
//! - Assembles Gemini requests per workflow: structured-output schemas,
//!   search grounding, deep-reasoning budgets
//! - Normalizes possibly-unstructured model output into validated,
//!   typed verdicts, including the two-stage grounded-then-formatted path
//! - Exposes one orchestrator per workflow plus a conversational
//!   assistant; the presentation layer calls nothing else
//!
//! PIPELINE:
//! INPUT → ENCODE → BUILD REQUEST → MODEL CALL(S) → NORMALIZE → TYPED RESULT

pub mod chat;
pub mod error;
pub mod gate;
pub mod gemini;
pub mod media;
pub mod models;
pub mod normalize;
pub mod request;
pub mod workflows;

pub use error::Result;

// Re-export the presentation-facing surface
pub use chat::{converse, converse_or_fallback};
pub use gate::{InvocationGate, InvocationToken};
pub use gemini::{GeminiClient, ModelReply, ModelService};
pub use media::{capture_frame, encode, FrameSource};
pub use models::*;
pub use workflows::{detect_media_forgery, verify_claim, vet_job_offer};
