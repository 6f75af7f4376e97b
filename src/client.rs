//! Client implementation for the Gemini image generation API.

use futures::StreamExt;
use tokio::sync::mpsc;

use crate::assembler::{assemble, AssembleError, Assembly};
use crate::error::GenerationError;
use crate::models::{ModelParams, Request, RequestType, Response, ResponseStream};

/// Default API endpoint for Google's Generative AI service
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default API version
const DEFAULT_API_VERSION: &str = "v1beta";
/// Default channel buffer size for streaming responses
const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 16;

/// A client for the Gemini generation API.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    api_key: String,
    params: ModelParams,
    base_url: String,
    client: reqwest::Client,
}

impl GenerativeModel {
    /// Creates a new GenerativeModel with the specified API key and model.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The API key for authentication
    /// * `params` - The model parameters
    pub fn new(api_key: impl Into<String>, params: impl Into<ModelParams>) -> Self {
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            api_key: api_key.into(),
            params: params.into(),
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a new GenerativeModel using the ambient credentials.
    ///
    /// The key is resolved through [`crate::auth::resolve_api_key`]:
    /// `GEMINI_API_KEY` or the key file under the config directory.
    ///
    /// # Arguments
    ///
    /// * `model` - The model identifier
    ///
    /// # Errors
    ///
    /// Returns an error if no API key can be resolved.
    pub fn from_env(model: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = crate::auth::resolve_api_key(None)?;
        Ok(Self::new(
            api_key,
            ModelParams::builder().model(model).build(),
        ))
    }

    /// Overrides the API endpoint, e.g. to point at a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_url(&self, request_type: RequestType) -> String {
        format!(
            "{}/{}/models/{}:{}?key={}",
            self.base_url, DEFAULT_API_VERSION, self.params.model, request_type, self.api_key
        )
    }

    /// Makes a request to the generation API and checks the response status.
    async fn make_request(
        &self,
        url: &str,
        request: &Request,
    ) -> Result<reqwest::Response, GenerationError> {
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(format!(
                "Request failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(response)
    }

    /// Generates content in a single round trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or if the response cannot
    /// be parsed.
    pub async fn generate_response(
        &self,
        request: impl Into<Request>,
    ) -> Result<Response, GenerationError> {
        let url = self.build_url(RequestType::GenerateContent);
        Ok(self.make_request(&url, &request.into()).await?.json().await?)
    }

    /// Opens a streaming generation call and returns the fragment stream.
    ///
    /// The chunked body is scanned incrementally for top-level JSON objects;
    /// each complete object is parsed into a [`Response`] and yielded in
    /// arrival order. Transport and parse failures surface as stream items.
    pub async fn stream_generate_response(
        &self,
        request: impl Into<Request>,
    ) -> Result<ResponseStream, GenerationError> {
        let url = self.build_url(RequestType::StreamGenerateContent);
        let response = self.make_request(&url, &request.into()).await?;

        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_BUFFER_SIZE);
        let mut body = response.bytes_stream();

        tokio::spawn(async move {
            let mut scanner = JsonObjectScanner::new();
            let mut pending: Vec<u8> = Vec::new();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(error) => {
                        let _ = tx.send(Err(GenerationError::RequestError(error))).await;
                        return;
                    }
                };

                pending.extend_from_slice(&chunk);
                let text = match take_valid_prefix(&mut pending) {
                    Ok(text) => text,
                    Err(error) => {
                        let _ = tx
                            .send(Err(GenerationError::new(format!(
                                "invalid UTF-8 in response stream: {error}"
                            ))))
                            .await;
                        return;
                    }
                };

                for object in scanner.push(&text) {
                    let item = serde_json::from_str::<Response>(&object)
                        .map_err(GenerationError::JsonError);
                    if tx.send(item).await.is_err() {
                        // Receiver dropped; the caller abandoned the stream.
                        return;
                    }
                }
            }
        });

        Ok(ResponseStream::new(rx))
    }

    /// Generates an image from a prompt and assembles the streamed reply.
    ///
    /// Builds an IMAGE+TEXT request, opens the stream and hands it to
    /// [`assemble`]; the artifact, if the model produced one, is written to
    /// `{base_name}.{extension}`.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::Transport`] if the request or the stream
    /// fails, [`AssembleError::Persistence`] if the artifact write fails.
    pub async fn generate_image(
        &self,
        prompt: impl Into<String>,
        base_name: &str,
    ) -> Result<Assembly, AssembleError> {
        let request = Request::image_from_prompt(prompt);
        let stream = self
            .stream_generate_response(request)
            .await
            .map_err(|source| AssembleError::Transport {
                source,
                transcript: String::new(),
            })?;
        assemble(stream, base_name).await
    }
}

/// Splits off the longest valid UTF-8 prefix of `pending`, leaving any
/// trailing incomplete character for the next chunk.
///
/// Returns an error only for bytes that can never become valid UTF-8.
fn take_valid_prefix(pending: &mut Vec<u8>) -> Result<String, std::str::Utf8Error> {
    match std::str::from_utf8(pending) {
        Ok(text) => {
            let text = text.to_string();
            pending.clear();
            Ok(text)
        }
        Err(error) if error.error_len().is_none() => {
            let valid = error.valid_up_to();
            let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
            pending.drain(..valid);
            Ok(text)
        }
        Err(error) => Err(error),
    }
}

/// Incremental extractor of top-level JSON objects from a streamed array.
///
/// The service sends `[ {..}, {..}, ... ]` in arbitrary chunk boundaries.
/// The scanner tracks brace depth and string state across `push` calls and
/// emits each complete object exactly once; array punctuation between
/// objects is discarded.
struct JsonObjectScanner {
    buffer: String,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl JsonObjectScanner {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            depth: 0,
            in_string: false,
            escaped: false,
        }
    }

    /// Feeds a chunk of body text and returns the objects completed by it.
    fn push(&mut self, input: &str) -> Vec<String> {
        let mut complete = Vec::new();

        for c in input.chars() {
            if self.in_string {
                self.buffer.push(c);
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == '"' {
                    self.in_string = false;
                }
                continue;
            }

            match c {
                '{' => {
                    self.depth += 1;
                    self.buffer.push(c);
                }
                '}' if self.depth > 0 => {
                    self.depth -= 1;
                    self.buffer.push(c);
                    if self.depth == 0 {
                        complete.push(std::mem::take(&mut self.buffer));
                    }
                }
                '"' if self.depth > 0 => {
                    self.in_string = true;
                    self.buffer.push(c);
                }
                _ if self.depth > 0 => self.buffer.push(c),
                // Array punctuation and whitespace between objects.
                _ => {}
            }
        }

        complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scanner_extracts_objects_from_one_chunk() {
        let mut scanner = JsonObjectScanner::new();
        let objects = scanner.push(r#"[{"a":1},{"b":2}]"#);
        assert_eq!(objects, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[test]
    fn scanner_handles_objects_split_across_chunks() {
        let mut scanner = JsonObjectScanner::new();
        assert!(scanner.push(r#"[{"a":"#).is_empty());
        let objects = scanner.push("1},");
        assert_eq!(objects, vec![r#"{"a":1}"#]);
        let objects = scanner.push(r#"{"b":2}]"#);
        assert_eq!(objects, vec![r#"{"b":2}"#]);
    }

    #[test]
    fn scanner_ignores_braces_inside_strings() {
        let mut scanner = JsonObjectScanner::new();
        let objects = scanner.push(r#"[{"t":"}{"}]"#);
        assert_eq!(objects, vec![r#"{"t":"}{"}"#]);
    }

    #[test]
    fn scanner_handles_escaped_quotes() {
        let mut scanner = JsonObjectScanner::new();
        let objects = scanner.push(r#"[{"t":"\""}]"#);
        assert_eq!(objects, vec![r#"{"t":"\""}"#]);
    }

    #[test]
    fn scanner_handles_nested_objects() {
        let mut scanner = JsonObjectScanner::new();
        let objects = scanner.push(r#"[{"outer":{"inner":1}}]"#);
        assert_eq!(objects, vec![r#"{"outer":{"inner":1}}"#]);
    }

    #[test]
    fn utf8_prefix_keeps_incomplete_character_pending() {
        let bytes = "héllo".as_bytes();
        let split = 2; // inside the two-byte 'é'
        let mut pending = bytes[..split].to_vec();
        let text = take_valid_prefix(&mut pending).unwrap();
        assert_eq!(text, "h");
        pending.extend_from_slice(&bytes[split..]);
        let text = take_valid_prefix(&mut pending).unwrap();
        assert_eq!(text, "éllo");
        assert!(pending.is_empty());
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut pending = vec![b'a', 0xFF, b'b'];
        assert!(take_valid_prefix(&mut pending).is_err());
    }
}
