use serde::{Deserialize, Serialize};

/// Success payload of the completion endpoint: `{ "text": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
}
