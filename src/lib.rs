#![deny(missing_docs)]

//! A Rust client for Google Gemini image generation.
//!
//! The crate wraps the `streamGenerateContent` endpoint and assembles the
//! streamed multi-modal reply into a persisted image artifact plus a text
//! transcript. Transport, credential resolution, and assembly are separate
//! layers: the assembler only ever sees a fragment stream.

pub mod assembler;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use assembler::{assemble, AssembleError, Artifact, Assembly, ResponseFragment};
pub use client::GenerativeModel;
pub use error::GenerationError;
