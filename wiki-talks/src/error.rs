//! Error types for each pipeline stage.
//!
//! Every stage returns its own error enum so callers can match exhaustively
//! on what went wrong; [`PipelineError`] wraps them and names the stage.

use llm_client::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while resolving an article into text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Invalid Wikipedia URL format: {reference}")]
    InvalidReference { reference: String },

    #[error("Wikipedia page '{title}' not found")]
    NotFound { title: String },

    #[error(
        "Could not resolve disambiguation page '{title}' (first option: {})",
        .target.as_deref().unwrap_or("none")
    )]
    DisambiguationUnresolvable {
        title: String,
        target: Option<String>,
    },

    #[error("Page content too short or empty ({length} characters, need at least {minimum})")]
    ContentTooShort { length: usize, minimum: usize },

    #[error("Article source unavailable: {message}")]
    SourceUnavailable { message: String },
}

/// Failures while generating and validating the dialogue script.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("Generation request failed: {0}")]
    Generation(#[from] LlmError),

    #[error("JSON parsing error: {message}")]
    MalformedOutput { message: String },

    #[error("Script must be a JSON array, got {found}")]
    NotAnArray { found: &'static str },

    #[error("Entry {index} must have 'speaker' and 'text' fields (missing '{field}')")]
    MissingField { index: usize, field: &'static str },

    #[error("Entry {index} field '{field}' must be a string, got {found}")]
    InvalidField {
        index: usize,
        field: &'static str,
        found: &'static str,
    },

    #[error("Speaker must be '{}' or '{}', got: {speaker}", .expected[0], .expected[1])]
    UnknownSpeaker {
        speaker: String,
        expected: [String; 2],
    },

    #[error("Entry {index} has empty text")]
    EmptyText { index: usize },
}

/// Failures while rendering the script to audio.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesizeError {
    #[error("Voice ID not found for speaker: {speaker}")]
    UnmappedSpeaker { speaker: String },

    #[error("ElevenLabs API error: {status} - {detail}")]
    ProviderError { status: u16, detail: String },

    #[error("Network error: {message}")]
    TransportError { message: String },
}

/// A pipeline run failure, tagged with the stage that produced it.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing credential: {credential}")]
    MissingCredential { credential: String },

    #[error("Wikipedia fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Script generation failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Audio generation failed: {0}")]
    Synthesize(#[from] SynthesizeError),

    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::MissingCredential { .. } => "setup",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Compose(_) => "compose",
            PipelineError::Synthesize(_) => "synthesize",
            PipelineError::Output { .. } => "output",
        }
    }
}
