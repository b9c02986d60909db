//! Wire types for the Gemini `generateContent` endpoint

use postsmith_core::{PostsmithError, Result};
use serde::{Deserialize, Serialize};

/// One text part of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Request body: `{ contents: [ { role: "user", parts: [ { text } ] } ] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn user prompt
    pub fn user_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }

    /// Text of the first part of the first turn
    pub fn prompt(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }
}

/// Response envelope; every level is optional on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

/// Pull the first candidate's first text part out of a raw response body
///
/// Any other shape is reported as [`PostsmithError::Parse`].
pub fn first_candidate_text(body: &serde_json::Value) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_value(body.clone())
        .map_err(|e| PostsmithError::Parse(format!("Unexpected response envelope: {}", e)))?;

    response
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| PostsmithError::Parse("No candidate text in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest::user_prompt("hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "contents": [ { "role": "user", "parts": [ { "text": "hello" } ] } ] })
        );
        assert_eq!(request.prompt(), Some("hello"));
    }

    #[test]
    fn test_first_candidate_text() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "first" }, { "text": "second" } ] } },
                { "content": { "parts": [ { "text": "other" } ] } }
            ]
        });
        assert_eq!(first_candidate_text(&body).unwrap(), "first");
    }

    #[test]
    fn test_unusable_shapes_are_parse_errors() {
        for body in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [ {} ] }),
            json!({ "candidates": [ { "content": { "parts": [] } } ] }),
            json!({ "candidates": "nope" }),
        ] {
            assert!(matches!(
                first_candidate_text(&body),
                Err(PostsmithError::Parse(_))
            ));
        }
    }
}
