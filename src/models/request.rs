//! Request models for the Gemini image generation API.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::{GenerationConfig, Part};

/// A request to the generation API.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(doc)]
pub struct Request {
    /// Optional system instruction for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub system_instruction: Option<Content>,

    /// The contents of the request, including the prompt text.
    pub contents: Vec<Content>,

    /// Generation options for this request
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub generation_config: Option<GenerationConfig>,
}

/// A content object containing parts of a request or response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role that produced this content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts that make up the content.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// The author of a content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Content supplied by the caller
    User,
    /// Content produced by the model
    Model,
}

impl Request {
    /// Creates a new request with the given text prompt.
    ///
    /// # Arguments
    ///
    /// * `text` - The text prompt to generate content from
    pub fn from_prompt(text: impl Into<String>) -> Self {
        Self::builder()
            .contents(vec![Content {
                role: Some(Role::User),
                parts: vec![Part::text(text)],
            }])
            .build()
    }

    /// Creates an image generation request from a prompt, asking for IMAGE
    /// and TEXT output modalities.
    pub fn image_from_prompt(text: impl Into<String>) -> Self {
        Self::builder()
            .contents(vec![Content {
                role: Some(Role::User),
                parts: vec![Part::text(text)],
            }])
            .generation_config(Some(GenerationConfig::image_generation()))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_request_serializes_role_and_text() {
        let request = Request::from_prompt("a red fox");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "a red fox");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn image_request_carries_modalities() {
        let request = Request::image_from_prompt("a red fox");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
    }
}
