//! Response models for the Gemini image generation API.

use serde::Deserialize;

use super::{Content, Part};

/// One streamed response fragment (or a complete non-streamed response).
///
/// Every field below `candidates` is optional or defaulted: streamed
/// fragments routinely omit structure, and a fragment with nothing usable in
/// it is skipped downstream rather than rejected here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The generated candidates from the model.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt, present when the service blocked it.
    pub prompt_feedback: Option<PromptFeedback>,
    /// Metadata about token usage.
    pub usage_metadata: Option<UsageMetadata>,
    /// The version of the model used.
    pub model_version: Option<String>,
}

impl Response {
    /// Concatenates the text parts of all candidates.
    pub fn text(&self) -> String {
        self.candidates
            .iter()
            .flat_map(|candidate| {
                candidate
                    .content
                    .iter()
                    .flat_map(|content| &content.parts)
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
            })
            .collect()
    }

    /// Returns the reason the service blocked this response, if it did.
    ///
    /// Covers both prompt-level feedback and candidates finished for safety
    /// reasons.
    pub fn block_reason(&self) -> Option<String> {
        if let Some(feedback) = &self.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Some(reason.clone());
            }
        }
        self.candidates.iter().find_map(|candidate| {
            match candidate.finish_reason {
                Some(FinishReason::Safety) => Some("SAFETY".to_string()),
                Some(FinishReason::ProhibitedContent) => Some("PROHIBITED_CONTENT".to_string()),
                Some(FinishReason::Blocklist) => Some("BLOCKLIST".to_string()),
                _ => None,
            }
        })
    }
}

/// A candidate response from the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of the candidate response, if any was produced.
    pub content: Option<Content>,
    /// The reason why the generation finished.
    pub finish_reason: Option<FinishReason>,
}

/// Feedback the service attaches to a blocked prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// The reason the prompt was blocked, e.g. `SAFETY`.
    pub block_reason: Option<String>,
}

/// Reason why the generation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    #[serde(rename = "FINISH_REASON_UNSPECIFIED")]
    /// Default value. This value is unused.
    Unspecified,
    /// Natural stop point of the model or provided stop sequence.
    Stop,
    /// The maximum number of tokens as specified in the request was reached.
    MaxTokens,
    /// The response candidate content was flagged for safety reasons.
    Safety,
    /// The response candidate content was flagged for recitation reasons.
    Recitation,
    /// The response candidate content was flagged for using an unsupported language.
    Language,
    /// Unknown reason.
    Other,
    /// Token generation stopped because the content contains forbidden terms.
    Blocklist,
    /// Token generation stopped for potentially containing prohibited content.
    ProhibitedContent,
    /// Token generation stopped because the content potentially contains
    /// Sensitive Personally Identifiable Information.
    Spii,
}

/// Metadata about token usage in the request and response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of tokens in the prompt.
    pub prompt_token_count: Option<i32>,
    /// Number of tokens in the generated candidates.
    pub candidates_token_count: Option<i32>,
    /// Total number of tokens used.
    pub total_token_count: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_without_candidates_parses() {
        let response: Response = serde_json::from_str(r#"{"modelVersion":"m"}"#).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.text(), "");
    }

    #[test]
    fn text_concatenates_parts_in_order() {
        let response: Response = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"a"},{"text":"b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "ab");
    }

    #[test]
    fn unknown_part_shape_is_captured_not_rejected() {
        let response: Response = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"functionCall":{"name":"f"}}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "");
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert!(matches!(parts[0], Part::Unknown(_)));
    }

    #[test]
    fn safety_finish_reason_reported_as_block() {
        let response: Response = serde_json::from_str(
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
        )
        .unwrap();
        assert_eq!(response.block_reason().as_deref(), Some("SAFETY"));
    }

    #[test]
    fn prompt_feedback_block_reason_wins() {
        let response: Response =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(response.block_reason().as_deref(), Some("SAFETY"));
    }
}
