//! Common part model used in both requests and responses.

use serde::{Deserialize, Serialize};

/// One part of a content object.
///
/// Deserialization is untagged: a part carrying a shape this crate does not
/// model lands in the `Unknown` variant instead of failing the whole
/// response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A text part containing a string value
    Text {
        /// The text content of the part
        text: String,
    },
    /// A part containing inline binary data
    InlineData {
        /// The inline data content of the part
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    /// Any part shape not modelled above, captured as raw JSON
    Unknown(serde_json::Value),
}

impl Part {
    /// Creates a text part from a string.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Inline binary data with its declared media type.
///
/// The payload is base64 as the API transmits it; decoding happens when a
/// fragment is classified, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// The declared media type of the payload, e.g. `image/png`
    pub mime_type: String,
    /// The base64-encoded payload
    pub data: String,
}
