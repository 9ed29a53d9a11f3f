//! Conversational assistant
//!
//! Sends the caller-owned history plus the new message to the reasoning
//! model under the fixed Veritas persona. No schema, no grounding; the
//! raw text reply comes back as-is. The caller decides whether a failed
//! turn stays in the history.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::gemini::ModelService;
use crate::models::ConversationTurn;
use crate::request::chat_request;

/// Single user-facing reply when a chat turn fails.
pub const CHAT_FALLBACK: &str =
    "Sorry, I couldn't answer that right now. Please try again.";

/// Produce the next assistant turn.
pub async fn converse(
    service: &dyn ModelService,
    history: &[ConversationTurn],
    new_message: &str,
) -> crate::Result<String> {
    if new_message.trim().is_empty() {
        return Err(AnalysisError::Input("empty chat message".to_string()));
    }

    let invocation = Uuid::new_v4();
    info!(%invocation, history_turns = history.len(), "Chat turn");

    let reply = service
        .generate(chat_request(history, new_message))
        .await
        .map_err(|e| {
            warn!(%invocation, error = %e, "Chat call failed");
            e
        })?;

    Ok(reply.require_text()?.to_string())
}

/// [`converse`], with every failure collapsed into the one fallback reply.
pub async fn converse_or_fallback(
    service: &dyn ModelService,
    history: &[ConversationTurn],
    new_message: &str,
) -> String {
    match converse(service, history, new_message).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "Chat turn falling back");
            CHAT_FALLBACK.to_string()
        }
    }
}
