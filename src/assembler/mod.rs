//! Streamed multi-modal response assembly.
//!
//! A streaming generation call yields a sequence of response fragments, each
//! carrying inline binary data, text, or nothing usable. [`assemble`] walks
//! that sequence once and folds it into at most one persisted binary
//! [`Artifact`] plus an ordered text transcript.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::{Stream, StreamExt};
use thiserror::Error;

use crate::error::GenerationError;
use crate::models::{Part, Response};

/// Extension used when the declared media type has no known mapping.
const FALLBACK_EXTENSION: &str = "bin";

/// Errors that can abort an assembly.
///
/// Both variants carry the transcript text accumulated before the failing
/// fragment, so callers lose nothing that already streamed in.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The upstream fragment stream failed, or the service blocked the
    /// content. Never retried here; retrying is the caller's decision.
    #[error("response stream failed: {source}")]
    Transport {
        /// The upstream error
        #[source]
        source: GenerationError,
        /// Transcript text accumulated before the failure
        transcript: String,
    },

    /// Writing the artifact bytes failed.
    #[error("failed to persist artifact {file_name}: {source}")]
    Persistence {
        /// The file name the write was attempted under
        file_name: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
        /// Transcript text accumulated before the failure
        transcript: String,
    },
}

impl AssembleError {
    /// The transcript text accumulated before the assembly failed.
    pub fn transcript(&self) -> &str {
        match self {
            Self::Transport { transcript, .. } | Self::Persistence { transcript, .. } => {
                transcript
            }
        }
    }
}

/// A persisted binary result of one assembly call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// The file name the bytes were written under
    pub file_name: String,
    /// The raw decoded bytes
    pub bytes: Vec<u8>,
}

/// The result of assembling one fragment stream.
#[derive(Debug, Default)]
pub struct Assembly {
    /// The persisted binary artifact, if any fragment carried one
    pub artifact: Option<Artifact>,
    /// Concatenation of all text fragments in stream order
    pub transcript: String,
}

/// One fragment of a streamed reply, classified once up front.
///
/// Classification looks at the first content part of the first candidate,
/// matching the single-part fragments the image models emit. Anything without
/// that shape is `Empty` and gets skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFragment {
    /// Inline binary data with its declared media type, already decoded
    Binary {
        /// The declared media type, e.g. `image/png`
        mime_type: String,
        /// The decoded payload
        data: Vec<u8>,
    },
    /// A non-empty text chunk
    Text(String),
    /// Nothing usable; skipped without side effect
    Empty,
}

impl From<&Response> for ResponseFragment {
    fn from(response: &Response) -> Self {
        let part = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first());

        match part {
            Some(Part::InlineData { inline_data }) => match BASE64.decode(&inline_data.data) {
                Ok(data) => Self::Binary {
                    mime_type: inline_data.mime_type.clone(),
                    data,
                },
                Err(error) => {
                    tracing::warn!(
                        mime_type = %inline_data.mime_type,
                        %error,
                        "dropping inline data with undecodable base64 payload"
                    );
                    Self::Empty
                }
            },
            Some(Part::Text { text }) if !text.is_empty() => Self::Text(text.clone()),
            _ => Self::Empty,
        }
    }
}

/// Picks a file extension for a declared media type.
///
/// The subtype is validated against the `mime_guess` table by reverse lookup,
/// so `image/png` maps to `png` and `image/jpeg` to `jpeg`. Types the table
/// does not know fall back to a generic `bin` suffix instead of failing the
/// assembly.
pub fn extension_for_media_type(media_type: &str) -> String {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
        .to_ascii_lowercase();

    if let Some(subtype) = essence.rsplit('/').next() {
        let known = mime_guess::from_ext(subtype)
            .iter()
            .any(|mime| mime.essence_str() == essence);
        if known {
            return subtype.to_string();
        }
    }

    tracing::debug!(%media_type, "no extension mapping, using fallback");
    FALLBACK_EXTENSION.to_string()
}

/// Assembles a fragment stream into an optional [`Artifact`] and a
/// transcript.
///
/// Fragments are processed in arrival order:
/// - the first fragment carrying inline binary data is decoded, written to
///   `{base_name}.{extension}` and recorded as the artifact; later binary
///   fragments in the same stream are ignored ("first wins"),
/// - non-empty text fragments are appended to the transcript with no
///   inserted separators,
/// - everything else is skipped.
///
/// The call terminates when the stream ends and returns whatever accumulated,
/// possibly an empty [`Assembly`]. A stream error or a content-safety block
/// aborts with [`AssembleError::Transport`]; a failed write aborts with
/// [`AssembleError::Persistence`] naming the attempted file. At most one
/// filesystem write happens per call.
pub async fn assemble<S>(mut fragments: S, base_name: &str) -> Result<Assembly, AssembleError>
where
    S: Stream<Item = Result<Response, GenerationError>> + Unpin,
{
    let mut assembly = Assembly::default();

    while let Some(next) = fragments.next().await {
        let response = match next {
            Ok(response) => response,
            Err(source) => {
                return Err(AssembleError::Transport {
                    source,
                    transcript: assembly.transcript,
                })
            }
        };

        if let Some(reason) = response.block_reason() {
            return Err(AssembleError::Transport {
                source: GenerationError::Blocked { reason },
                transcript: assembly.transcript,
            });
        }

        match ResponseFragment::from(&response) {
            ResponseFragment::Binary { mime_type, data } => {
                if assembly.artifact.is_some() {
                    // First artifact wins; the image models emit one anyway.
                    tracing::debug!(%mime_type, "ignoring extra binary fragment");
                    continue;
                }
                let extension = extension_for_media_type(&mime_type);
                let file_name = format!("{base_name}.{extension}");
                if let Err(source) = tokio::fs::write(&file_name, &data).await {
                    return Err(AssembleError::Persistence {
                        file_name,
                        source,
                        transcript: assembly.transcript,
                    });
                }
                tracing::debug!(%file_name, bytes = data.len(), "artifact persisted");
                assembly.artifact = Some(Artifact {
                    file_name,
                    bytes: data,
                });
            }
            ResponseFragment::Text(text) => assembly.transcript.push_str(&text),
            ResponseFragment::Empty => {}
        }
    }

    Ok(assembly)
}
