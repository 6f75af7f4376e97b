//! Generation options forwarded with a request.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Sampling and output-shape options for a generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(doc)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub temperature: Option<f32>,

    /// Nucleus sampling cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub top_k: Option<i32>,

    /// Output modalities the model may produce, e.g. `[Image, Text]`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub response_modalities: Option<Vec<ResponseModality>>,

    /// Requested MIME type for text output
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub response_mime_type: Option<String>,
}

impl GenerationConfig {
    /// Configuration for image generation: IMAGE plus TEXT modalities with
    /// plain-text transcripts, matching what the image models expect.
    pub fn image_generation() -> Self {
        Self::builder()
            .response_modalities(vec![ResponseModality::Image, ResponseModality::Text])
            .response_mime_type("text/plain")
            .build()
    }
}

/// An output modality the model may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseModality {
    /// Plain text output
    Text,
    /// Inline image output
    Image,
}
