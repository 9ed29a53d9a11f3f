//! Domain value objects for the three analysis workflows
//!
//! All of these are request/response values: created for one call, returned
//! to the UI, never persisted or mutated afterwards. Serde renames pin the
//! wire spelling the structured-output schemas ask the model for.

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Media =================
//

/// A transport-safe encoded file or captured frame.
///
/// `data` is always base64 of exactly the bytes described by `content_type`;
/// raw binary never crosses this boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaPayload {
    pub data: String,
    pub content_type: String,
}

//
// ================= Media forensics =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ForensicsVerdict {
    #[serde(rename = "LIKELY AUTHENTIC")]
    LikelyAuthentic,
    #[serde(rename = "MIXED/SUSPICIOUS")]
    MixedSuspicious,
    #[serde(rename = "HIGHLY LIKELY AI GENERATED")]
    HighlyLikelyAiGenerated,
}

/// Forensic verdict on a single image or video frame.
///
/// `percent_ai` and `verdict` come from the model as-is; neither is ever
/// recomputed from the other on this side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForensicsResult {
    #[serde(rename = "percentAI")]
    pub percent_ai: u8,
    pub verdict: ForensicsVerdict,
    pub details: String,
}

//
// ================= Offer vetting =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferVerdict {
    Legitimate,
    Suspicious,
    PotentialScam,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferVettingResult {
    pub verdict: OfferVerdict,
    pub evidence: Vec<String>,
    #[serde(rename = "redFlags")]
    pub red_flags: Vec<String>,
    #[serde(rename = "companyStatus")]
    pub company_status: String,
}

//
// ================= Claim verification =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimVerdict {
    Real,
    Fake,
    Misleading,
}

/// A web resource cited by a grounded answer. Uniqueness is not guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimVerificationResult {
    pub verdict: ClaimVerdict,
    pub correction: String,
    pub sources: Vec<WebSource>,
}

//
// ================= Conversation =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One turn of the assistant conversation. The ordered history is owned by
/// the caller and passed by value into each `converse` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

impl fmt::Display for ForensicsVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ForensicsVerdict::LikelyAuthentic => "LIKELY AUTHENTIC",
            ForensicsVerdict::MixedSuspicious => "MIXED/SUSPICIOUS",
            ForensicsVerdict::HighlyLikelyAiGenerated => "HIGHLY LIKELY AI GENERATED",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for OfferVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OfferVerdict::Legitimate => "LEGITIMATE",
            OfferVerdict::Suspicious => "SUSPICIOUS",
            OfferVerdict::PotentialScam => "POTENTIAL_SCAM",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ClaimVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClaimVerdict::Real => "REAL",
            ClaimVerdict::Fake => "FAKE",
            ClaimVerdict::Misleading => "MISLEADING",
        };
        write!(f, "{}", s)
    }
}
