//! Domain models for the completion service.

pub mod completion;
pub mod gemini;

pub use completion::CompletionResponse;
pub use gemini::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    HarmBlockThreshold, HarmCategory, Part, PromptFeedback, SafetyRating, SafetySetting,
};
