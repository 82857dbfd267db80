//! Wire types for the Gemini `generateContent` endpoint.
//!
//! Requests ask for JSON output constrained to `{"path": [string, ...]}`.
//! Responses carry the generated JSON as text inside the first candidate.
//!
//! See: <https://ai.google.dev/api/generate-content>

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; a single user turn holding the prompt.
    pub contents: Vec<Content>,
    /// Output constraints.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Build a JSON-mode request whose answer must be an ordered id list.
    #[must_use]
    pub fn path_request(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_owned(),
                response_schema: Schema::path(),
            },
        }
    }
}

/// One conversation turn.
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    /// Text fragments of the turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One fragment of a turn.
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    /// Text payload; absent for non-text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Structured output settings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Always `application/json`.
    pub response_mime_type: String,
    /// Shape the answer must take.
    pub response_schema: Schema,
}

/// Subset of the OpenAPI schema dialect Gemini accepts.
#[derive(Debug, Serialize)]
pub struct Schema {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<PathProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct PathProperties {
    path: Box<Schema>,
}

impl Schema {
    const fn scalar(kind: &'static str) -> Self {
        Self {
            kind,
            properties: None,
            items: None,
            required: Vec::new(),
        }
    }

    /// `{"path": ["id", ...]}` with `path` required.
    fn path() -> Self {
        let array = Self {
            items: Some(Box::new(Self::scalar("STRING"))),
            ..Self::scalar("ARRAY")
        };
        Self {
            properties: Some(PathProperties {
                path: Box::new(array),
            }),
            required: vec!["path"],
            ..Self::scalar("OBJECT")
        }
    }
}

/// Response body from `generateContent`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt itself was refused.
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// Reason the prompt was blocked, if it was.
    #[must_use]
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

/// One generated answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated turn; absent when generation stopped early.
    pub content: Option<Content>,
    /// Why generation stopped, for example `STOP` or `SAFETY`.
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was refused.
    pub block_reason: Option<String>,
}

/// The JSON document the model is asked to produce.
#[derive(Debug, Deserialize)]
pub struct PathAnswer {
    /// Attraction ids in visiting order.
    pub path: Vec<String>,
}
