//! Gemini `generateContent` wire types.
//!
//! Response types are deliberately lenient: every nested field is optional and
//! unknown fields are kept in `extra`, so the raw result can be echoed back in
//! diagnostics without losing information.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Finish reasons for which a candidate carries no usable text.
const BLOCKED_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
}

impl Content {
    /// A single user turn holding one text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockMediumAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, or `None` when the prompt or candidate was
    /// blocked or nothing was generated.
    pub fn text(&self) -> Option<String> {
        if self.block_reason().is_some() {
            return None;
        }

        let candidate = self.candidates.first()?;
        if candidate
            .finish_reason
            .as_deref()
            .is_some_and(|reason| BLOCKED_FINISH_REASONS.contains(&reason))
        {
            return None;
        }

        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        (!text.is_empty()).then_some(text)
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }

    /// Safety ratings of the first candidate.
    pub fn safety_ratings(&self) -> Option<&[SafetyRating]> {
        self.candidates.first()?.safety_ratings.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_ratings: Option<Vec<SafetyRating>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_ratings: Option<Vec<SafetyRating>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Categories and probabilities stay strings: the upstream adds new ones
/// faster than this service is released.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Google API error envelope: `{ "error": { "code", "message", "status" } }`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn text_concatenates_first_candidate_parts() {
        let response = response(json!({
            "candidates": [
                {
                    "content": { "role": "model", "parts": [{ "text": "Next.js " }, { "text": "is fast." }] },
                    "finishReason": "STOP"
                },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }));

        assert_eq!(response.text().as_deref(), Some("Next.js is fast."));
    }

    #[test]
    fn text_is_none_without_candidates() {
        let response = response(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert_eq!(response.text(), None);
        assert_eq!(response.block_reason(), Some("SAFETY"));
    }

    #[test]
    fn text_is_none_for_safety_finish() {
        let response = response(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "partial" }] },
                "finishReason": "SAFETY",
                "safetyRatings": [{ "category": "HARM_CATEGORY_HARASSMENT", "probability": "HIGH", "blocked": true }]
            }]
        }));

        assert_eq!(response.text(), None);
        let ratings = response.safety_ratings().unwrap();
        assert_eq!(ratings[0].probability.as_deref(), Some("HIGH"));
        assert_eq!(ratings[0].blocked, Some(true));
    }

    #[test]
    fn ratings_without_probability_still_parse() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Next.js is fast." }] },
                "finishReason": "STOP",
                "safetyRatings": [{ "category": "HARM_CATEGORY_HARASSMENT", "severity": "HARM_SEVERITY_NEGLIGIBLE" }]
            }]
        });

        let response = response(raw.clone());
        assert_eq!(response.text().as_deref(), Some("Next.js is fast."));

        let rating = &response.safety_ratings().unwrap()[0];
        assert_eq!(rating.category.as_deref(), Some("HARM_CATEGORY_HARASSMENT"));
        assert_eq!(rating.probability, None);
        assert_eq!(rating.extra["severity"], "HARM_SEVERITY_NEGLIGIBLE");
        assert_eq!(serde_json::to_value(response).unwrap(), raw);
    }

    #[test]
    fn null_lists_read_as_empty() {
        let blocked = response(json!({ "candidates": null, "promptFeedback": { "blockReason": "OTHER" } }));
        assert!(blocked.candidates.is_empty());
        assert_eq!(blocked.block_reason(), Some("OTHER"));

        let empty = response(json!({ "candidates": [{ "content": { "parts": null } }] }));
        assert!(empty.candidates[0].content.as_ref().unwrap().parts.is_empty());
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn text_is_none_for_empty_parts() {
        let response = response(json!({ "candidates": [{ "content": { "parts": [] }, "finishReason": "STOP" }] }));
        assert_eq!(response.text(), None);
    }

    #[test]
    fn unknown_fields_survive_reserialization() {
        let raw = json!({
            "candidates": [{ "content": { "parts": [{ "text": "hi" }] }, "index": 0 }],
            "usageMetadata": { "totalTokenCount": 7 },
            "modelVersion": "gemini-2.5-pro-exp-03-25"
        });

        let value = serde_json::to_value(response(raw.clone())).unwrap();
        assert_eq!(value, raw);
    }

    #[test]
    fn safety_settings_use_api_names() {
        let setting = SafetySetting {
            category: HarmCategory::SexuallyExplicit,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        };

        assert_eq!(
            serde_json::to_value(setting).unwrap(),
            json!({ "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" })
        );
    }

    #[test]
    fn generation_config_is_camel_case() {
        let config = GenerationConfig {
            temperature: 0.5,
            top_k: 2,
            top_p: 0.25,
            max_output_tokens: 64,
        };

        assert_eq!(
            serde_json::to_value(config).unwrap(),
            json!({ "temperature": 0.5, "topK": 2, "topP": 0.25, "maxOutputTokens": 64 })
        );
    }
}
