//! Request Builder
//!
//! Assembles model requests for the three analysis workflows and the chat
//! assistant: model selection per workflow and mode, payload parts,
//! structured-output schemas, search grounding, and the deep-reasoning
//! budget. The single-call vs. two-call shape is a tagged variant so the
//! orchestrators stay declarative about it.

use serde_json::{json, Value};

use crate::gemini::{Content, Part};
use crate::models::{ConversationTurn, MediaPayload, TurnRole};

/// Heavyweight reasoning model: forensics, deep offer vetting, chat.
pub const MODEL_REASONING: &str = "gemini-3-pro-preview";
/// Search-grounded model for live verification calls.
pub const MODEL_GROUNDED: &str = "gemini-2.5-flash";
/// Lightweight model for stage-two answer formatting.
pub const MODEL_FORMATTER: &str = "gemini-2.5-flash-lite";

/// Internal deliberation budget for the deep offer-vetting mode. Raises
/// latency; callers must treat this as an expected slow path.
pub const DEEP_THINKING_BUDGET: u32 = 32768;

const CHAT_PERSONA: &str = "You are Veritas AI, a helpful digital integrity assistant. \
    Answer questions about deepfakes, scams, and misinformation.";

//
// ================= Directives =================
//

/// Recognized request options. Constructed only through the factories
/// below: a structured-output schema and search grounding never appear on
/// the same call, and grounded calls never carry a thinking budget.
#[derive(Debug, Clone, Default)]
pub struct Directives {
    response_schema: Option<Value>,
    search_grounding: bool,
    thinking_budget: Option<u32>,
}

impl Directives {
    /// Plain free-text call, no options.
    pub fn none() -> Self {
        Self::default()
    }

    /// Structured-output call: the response should parse into `schema`.
    /// The service only makes well-formedness strongly likely, never
    /// guaranteed; callers still parse-and-validate.
    pub fn structured(schema: Value) -> Self {
        Self {
            response_schema: Some(schema),
            search_grounding: false,
            thinking_budget: None,
        }
    }

    /// Structured-output call with extra internal deliberation.
    pub fn structured_with_thinking(schema: Value, budget: u32) -> Self {
        Self {
            response_schema: Some(schema),
            search_grounding: false,
            thinking_budget: Some(budget),
        }
    }

    /// Search-grounded free-text call. The unstructured answer needs a
    /// follow-up formatting call to become structured output.
    pub fn grounded() -> Self {
        Self {
            response_schema: None,
            search_grounding: true,
            thinking_budget: None,
        }
    }

    pub fn response_schema(&self) -> Option<&Value> {
        self.response_schema.as_ref()
    }

    pub fn search_grounding(&self) -> bool {
        self.search_grounding
    }

    pub fn thinking_budget(&self) -> Option<u32> {
        self.thinking_budget
    }
}

//
// ================= Model request =================
//

/// One assembled call to the model service.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub system_instruction: Option<String>,
    pub directives: Directives,
}

impl ModelRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Content>, directives: Directives) -> Self {
        Self {
            model: model.into(),
            contents,
            system_instruction: None,
            directives,
        }
    }

    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(text.into());
        self
    }
}

/// The second stage of a two-call workflow: reformat an unstructured
/// analysis into the target schema. Built up front, instantiated only
/// after stage one resolves.
#[derive(Debug, Clone)]
pub struct FormatterSpec {
    model: String,
    instruction: String,
    schema: Value,
}

impl FormatterSpec {
    fn new(instruction: impl Into<String>, schema: Value) -> Self {
        Self {
            model: MODEL_FORMATTER.to_string(),
            instruction: instruction.into(),
            schema,
        }
    }

    /// Build the formatting request around the stage-one answer text.
    pub fn into_request(self, analysis_text: &str) -> ModelRequest {
        let prompt = format!("{}\n\n\"{}\"", self.instruction, analysis_text);
        ModelRequest::new(
            self.model,
            vec![Content::user(vec![Part::text(prompt)])],
            Directives::structured(self.schema),
        )
    }
}

/// Call shape per workflow and mode; the mode flag always comes from the
/// caller, never from inspecting the input.
#[derive(Debug, Clone)]
pub enum CallPlan {
    Single(ModelRequest),
    TwoStage {
        grounded: ModelRequest,
        formatter: FormatterSpec,
    },
}

//
// ================= Structured-output schemas =================
//

/// Schema for the media-forensics verdict; field descriptions steer the
/// model toward the expected shape.
pub fn forensics_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "percentAI": {
                "type": "INTEGER",
                "description": "Estimated percentage probability that the image is AI generated (0-100)"
            },
            "verdict": {
                "type": "STRING",
                "enum": ["LIKELY AUTHENTIC", "MIXED/SUSPICIOUS", "HIGHLY LIKELY AI GENERATED"],
                "description": "Categorical verdict based on the score"
            },
            "details": {
                "type": "STRING",
                "description": "A concise forensic report paragraph detailing specific artifacts found or absence thereof."
            }
        },
        "required": ["percentAI", "verdict", "details"]
    })
}

pub fn offer_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": {
                "type": "STRING",
                "enum": ["LEGITIMATE", "SUSPICIOUS", "POTENTIAL_SCAM"]
            },
            "evidence": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "redFlags": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "companyStatus": {
                "type": "STRING",
                "description": "Inferred status of the company entity based on text analysis"
            }
        },
        "required": ["verdict", "evidence", "redFlags", "companyStatus"]
    })
}

pub fn claim_format_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": {
                "type": "STRING",
                "enum": ["REAL", "FAKE", "MISLEADING"]
            },
            "correction": {
                "type": "STRING",
                "description": "A factual correction if fake, or summary if real."
            }
        },
        "required": ["verdict", "correction"]
    })
}

//
// ================= Workflow plans =================
//

/// Forensics: one schema call with image and instruction parts.
pub fn forensics_plan(payload: &MediaPayload) -> CallPlan {
    let instruction = "Analyze this visual media (image or video frame) for forensic \
        evidence of AI manipulation or deepfake generation. Look for inconsistencies \
        in lighting, shadows, anatomical details (hands, eyes, teeth), and pixel-level \
        artifacts. Provide a percentage likelihood of AI generation.";

    let request = ModelRequest::new(
        MODEL_REASONING,
        vec![Content::user(vec![
            Part::inline_media(payload),
            Part::text(instruction),
        ])],
        Directives::structured(forensics_schema()),
    );

    CallPlan::Single(request)
}

/// Offer vetting: deep mode is one schema call with a high reasoning
/// budget; fast mode is a grounded company check followed by a formatting
/// call.
pub fn offer_plan(offer_text: &str, deep: bool) -> CallPlan {
    if deep {
        let prompt = format!(
            "Analyze this job offer text for scam indicators. Thoroughly reason about \
            the compensation, language, and request patterns.\n\nJob Text: \"{}\"",
            offer_text
        );

        let request = ModelRequest::new(
            MODEL_REASONING,
            vec![Content::user(vec![Part::text(prompt)])],
            Directives::structured_with_thinking(offer_schema(), DEEP_THINKING_BUDGET),
        );

        return CallPlan::Single(request);
    }

    let prompt = format!(
        "Verify this job offer. Check if the company exists and if the offer details \
        align with standard practices for that company.\nJob Text: \"{}\"",
        offer_text
    );

    let grounded = ModelRequest::new(
        MODEL_GROUNDED,
        vec![Content::user(vec![Part::text(prompt)])],
        Directives::grounded(),
    );

    CallPlan::TwoStage {
        grounded,
        formatter: FormatterSpec::new(
            "Extract the verdict and details from this analysis text into JSON.\nAnalysis:",
            offer_schema(),
        ),
    }
}

/// Claim verification: grounded call (with an optional supporting image)
/// followed by a formatting call. Cited sources come from stage-one
/// grounding metadata, not from the formatter.
pub fn claim_plan(claim: &str, image: Option<&MediaPayload>) -> CallPlan {
    let prompt = format!(
        "Verify this claim using Google Search. Determine if it is REAL, FAKE, or \
        MISLEADING.\nClaim: \"{}\"",
        claim
    );

    let mut parts = vec![Part::text(prompt)];
    if let Some(payload) = image {
        parts.push(Part::inline_media(payload));
    }

    let grounded = ModelRequest::new(
        MODEL_GROUNDED,
        vec![Content::user(parts)],
        Directives::grounded(),
    );

    CallPlan::TwoStage {
        grounded,
        formatter: FormatterSpec::new(
            "Based on this verification text, extract the verdict and a factual \
            summary/correction.\nText:",
            claim_format_schema(),
        ),
    }
}

/// Chat: one free-text call carrying the persona instruction and the full
/// prior history; no schema, no grounding.
pub fn chat_request(history: &[ConversationTurn], new_message: &str) -> ModelRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| {
            let parts = vec![Part::text(turn.text.clone())];
            match turn.role {
                TurnRole::User => Content::user(parts),
                TurnRole::Assistant => Content::model(parts),
            }
        })
        .collect();

    contents.push(Content::user(vec![Part::text(new_message)]));

    ModelRequest::new(MODEL_REASONING, contents, Directives::none())
        .with_system_instruction(CHAT_PERSONA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_payload() -> MediaPayload {
        MediaPayload {
            data: "QUJD".to_string(),
            content_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_forensics_is_single_schema_call() {
        let plan = forensics_plan(&test_payload());

        let CallPlan::Single(request) = plan else {
            panic!("forensics must be a single-call plan");
        };
        assert_eq!(request.model, MODEL_REASONING);
        assert!(request.directives.response_schema().is_some());
        assert!(!request.directives.search_grounding());
        assert_eq!(request.contents[0].parts.len(), 2);
    }

    #[test]
    fn test_deep_offer_never_grounds() {
        let CallPlan::Single(request) = offer_plan("Remote role, $900/day", true) else {
            panic!("deep mode must be a single-call plan");
        };

        assert_eq!(request.model, MODEL_REASONING);
        assert!(!request.directives.search_grounding());
        assert!(request.directives.response_schema().is_some());
        assert_eq!(
            request.directives.thinking_budget(),
            Some(DEEP_THINKING_BUDGET)
        );
    }

    #[test]
    fn test_fast_offer_never_thinks() {
        let CallPlan::TwoStage { grounded, formatter } =
            offer_plan("Remote role, $900/day", false)
        else {
            panic!("fast mode must be a two-stage plan");
        };

        assert_eq!(grounded.model, MODEL_GROUNDED);
        assert!(grounded.directives.search_grounding());
        assert!(grounded.directives.response_schema().is_none());
        assert!(grounded.directives.thinking_budget().is_none());

        let format_request = formatter.into_request("looks legitimate");
        assert_eq!(format_request.model, MODEL_FORMATTER);
        assert!(format_request.directives.response_schema().is_some());
        assert!(!format_request.directives.search_grounding());
    }

    #[test]
    fn test_claim_plan_attaches_optional_image() {
        let CallPlan::TwoStage { grounded, .. } =
            claim_plan("Eiffel Tower demolished", Some(&test_payload()))
        else {
            panic!("claim verification must be a two-stage plan");
        };
        assert_eq!(grounded.contents[0].parts.len(), 2);

        let CallPlan::TwoStage { grounded, .. } = claim_plan("Eiffel Tower demolished", None)
        else {
            panic!("claim verification must be a two-stage plan");
        };
        assert_eq!(grounded.contents[0].parts.len(), 1);
        assert!(grounded.directives.search_grounding());
    }

    #[test]
    fn test_formatter_embeds_stage_one_text() {
        let formatter = FormatterSpec::new("Extract the verdict.", claim_format_schema());
        let request = formatter.into_request("the tower is still standing");

        let Part::Text { text } = &request.contents[0].parts[0] else {
            panic!("formatter prompt must be a text part");
        };
        assert!(text.contains("the tower is still standing"));
    }

    #[test]
    fn test_chat_request_keeps_history_order_and_roles() {
        let history = vec![
            ConversationTurn::user("what is a deepfake?"),
            ConversationTurn::assistant("A synthetic replacement of someone's likeness."),
        ];

        let request = chat_request(&history, "how do I spot one?");

        assert_eq!(request.model, MODEL_REASONING);
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert_eq!(request.contents[2].role.as_deref(), Some("user"));
        assert!(request.directives.response_schema().is_none());
        assert!(!request.directives.search_grounding());
        assert!(request
            .system_instruction
            .as_deref()
            .unwrap()
            .contains("Veritas AI"));
    }

    #[test]
    fn test_schema_fields_mirror_result_entities() {
        let schema = offer_schema();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["verdict", "evidence", "redFlags", "companyStatus"] {
            assert!(properties.contains_key(field), "missing {}", field);
        }
        assert_eq!(
            schema["required"],
            serde_json::json!(["verdict", "evidence", "redFlags", "companyStatus"])
        );
    }
}
