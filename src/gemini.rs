//! Gemini API client for the analysis workflows
//!
//! Speaks the Generative Language v1beta `generateContent` wire format.
//! Uses a long-lived reqwest::Client for connection pooling; the API key is
//! the single process-wide credential, read once at startup.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{error, info};

use crate::error::AnalysisError;
use crate::models::MediaPayload;
use crate::request::ModelRequest;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable holding the service-access credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

//
// ================= Wire types: request =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_media(payload: &MediaPayload) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: payload.content_type.clone(),
                data: payload.data.clone(),
            },
        }
    }
}

/// Base64 bytes plus their MIME type, inlined into a request part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blob {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

//
// ================= Wire types: response =================
//

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    #[allow(dead_code)]
    finish_reason: Option<String>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One citation entry from grounding metadata. Only chunks with a `web`
/// resource are usable as sources.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebChunk {
    pub title: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    status: Option<String>,
}

//
// ================= Service seam =================
//

/// What every model call resolves to: the answer text (when the model
/// produced one) plus any citation chunks from grounding.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub text: Option<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl ModelReply {
    /// The answer text, or a Service error when the model returned none.
    pub fn require_text(&self) -> crate::Result<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AnalysisError::Service("empty response from model".to_string()))
    }
}

/// The sole network dependency of the orchestrators. Tests substitute a
/// fake; production injects a [`GeminiClient`].
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> crate::Result<ModelReply>;
}

//
// ================= Client =================
//

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    /// Build a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_ENV).unwrap_or_default();
        Self::new(api_key)
    }

    fn to_wire(request: &ModelRequest) -> GenerateContentRequest {
        let directives = &request.directives;

        let generation_config = if directives.response_schema().is_some()
            || directives.thinking_budget().is_some()
        {
            Some(GenerationConfig {
                response_mime_type: directives
                    .response_schema()
                    .map(|_| "application/json".to_string()),
                response_schema: directives.response_schema().cloned(),
                thinking_config: directives
                    .thinking_budget()
                    .map(|b| ThinkingConfig { thinking_budget: b }),
            })
        } else {
            None
        };

        let tools = directives.search_grounding().then(|| {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        });

        GenerateContentRequest {
            contents: request.contents.clone(),
            system_instruction: request.system_instruction.as_ref().map(|text| {
                SystemInstruction {
                    parts: vec![Part::text(text.clone())],
                }
            }),
            tools,
            generation_config,
        }
    }
}

#[async_trait]
impl ModelService for GeminiClient {
    async fn generate(&self, request: ModelRequest) -> crate::Result<ModelReply> {
        if self.api_key.is_empty() {
            return Err(AnalysisError::Service(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );
        let body = Self::to_wire(&request);

        info!(model = %request.model, "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                AnalysisError::Service(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(AnalysisError::Service(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response envelope: {}", e);
            AnalysisError::Service(format!("Gemini response envelope error: {}", e))
        })?;

        into_reply(parsed)
    }
}

/// Collapse a response envelope into a [`ModelReply`].
///
/// The answer text is the concatenation of every text part of the first
/// candidate; grounded answers routinely arrive split across parts, so
/// taking only the first would truncate the analysis fed to stage two.
fn into_reply(parsed: GenerateContentResponse) -> crate::Result<ModelReply> {
    if let Some(api_error) = parsed.error {
        return Err(AnalysisError::Service(format!(
            "Gemini API error ({}): {}",
            api_error.status.as_deref().unwrap_or("UNKNOWN"),
            api_error.message
        )));
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::Service("no response from Gemini API".to_string()))?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .concat()
        })
        .filter(|t| !t.is_empty());

    let grounding_chunks = candidate
        .grounding_metadata
        .map(|m| m.grounding_chunks)
        .unwrap_or_default();

    Ok(ModelReply {
        text,
        grounding_chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Directives, ModelRequest};
    use serde_json::json;

    fn text_request(directives: Directives) -> ModelRequest {
        ModelRequest::new(
            "gemini-2.5-flash",
            vec![Content::user(vec![Part::text("hello")])],
            directives,
        )
    }

    #[test]
    fn test_schema_call_serialization() {
        let schema = json!({ "type": "OBJECT", "properties": {} });
        let wire = GeminiClient::to_wire(&text_request(Directives::structured(schema)));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert!(json["generationConfig"]["responseSchema"].is_object());
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_grounded_call_serialization() {
        let wire = GeminiClient::to_wire(&text_request(Directives::grounded()));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["tools"][0]["googleSearch"], json!({}));
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_thinking_budget_serialization() {
        let schema = json!({ "type": "OBJECT" });
        let wire = GeminiClient::to_wire(&text_request(Directives::structured_with_thinking(
            schema, 32768,
        )));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            json["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            32768
        );
    }

    #[test]
    fn test_inline_media_part_serialization() {
        let payload = MediaPayload {
            data: "QUJD".to_string(),
            content_type: "image/png".to_string(),
        };
        let json = serde_json::to_value(Part::inline_media(&payload)).unwrap();
        assert_eq!(json["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["inlineData"]["data"], "QUJD");
    }

    #[test]
    fn test_response_deserialization_with_grounding() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "checked" }] },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://apnews.com/x", "title": "AP" } },
                        { "retrievedContext": { "uri": "internal" } }
                    ]
                }
            }]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let candidate = &parsed.candidates[0];
        let metadata = candidate.grounding_metadata.as_ref().unwrap();
        assert_eq!(metadata.grounding_chunks.len(), 2);
        assert!(metadata.grounding_chunks[0].web.is_some());
        assert!(metadata.grounding_chunks[1].web.is_none());
    }

    #[test]
    fn test_reply_concatenates_all_text_parts() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [
                    { "text": "The company " },
                    { "text": "does not exist." }
                ] }
            }]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let reply = into_reply(parsed).unwrap();
        assert_eq!(reply.require_text().unwrap(), "The company does not exist.");
    }

    #[test]
    fn test_reply_survives_empty_leading_part() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [
                    { "text": "" },
                    { "text": "answer" }
                ] }
            }]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let reply = into_reply(parsed).unwrap();
        assert_eq!(reply.require_text().unwrap(), "answer");
    }

    #[test]
    fn test_reply_with_only_empty_parts_is_service_error() {
        let raw = r#"{ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let reply = into_reply(parsed).unwrap();
        assert!(reply.require_text().is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let client = GeminiClient::new(String::new());
        let result = client.generate(text_request(Directives::none())).await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_require_text_on_empty_reply() {
        let reply = ModelReply::default();
        assert!(reply.require_text().is_err());
    }
}
