//! Data structures for the image generation API requests and responses.

mod generation_config;
mod model_params;
mod part;
mod request;
mod request_type;
mod response;
mod stream;

pub use generation_config::{GenerationConfig, ResponseModality};
pub use model_params::ModelParams;
pub use part::{InlineData, Part};
pub use request::{Content, Request, Role};
pub use request_type::RequestType;
pub use response::{Candidate, FinishReason, PromptFeedback, Response, UsageMetadata};
pub use stream::ResponseStream;
