//! Fixed completion parameters.
//!
//! None of these are caller supplied; the request body of the completion
//! endpoint is ignored.

use crate::models::{
    Content, GenerateContentRequest, GenerationConfig, HarmBlockThreshold, HarmCategory,
    SafetySetting,
};

pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-pro-exp-03-25";

pub const COMPLETION_PROMPT: &str = "Write a short, fun fact about Next.js.";

pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.9,
    top_k: 1,
    top_p: 1.0,
    max_output_tokens: 8192,
};

pub const SAFETY_POLICY: [SafetySetting; 4] = [
    SafetySetting {
        category: HarmCategory::Harassment,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::HateSpeech,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::SexuallyExplicit,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::DangerousContent,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    },
];

/// Everything that goes into the upstream request besides the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub prompt: String,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl CompletionSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: COMPLETION_PROMPT.to_string(),
            generation_config: GENERATION_CONFIG,
            safety_settings: SAFETY_POLICY.to_vec(),
        }
    }

    /// One user turn with the prompt as the whole conversation.
    pub fn generate_content_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text(&self.prompt)],
            generation_config: self.generation_config,
            safety_settings: self.safety_settings.clone(),
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_NAME)
    }
}
