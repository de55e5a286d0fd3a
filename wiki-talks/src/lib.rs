//! Turn a Wikipedia article into a two-voice Hinglish radio conversation.
//!
//! The work is split into three stages that can be used on their own:
//!
//! 1. [`fetch::SourceFetcher`] resolves an article URL to bounded plain text.
//! 2. [`compose::DialogueComposer`] asks an LLM for a dialogue script and
//!    validates it against the chosen [`styles::StyleVariant`].
//! 3. [`voice::VoiceSynthesizer`] renders the script with one request to a
//!    multi-voice text-to-dialogue API.
//!
//! [`pipeline::Pipeline`] chains them and stops at the first failure.

pub mod compose;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod prompts;
pub mod script;
pub mod stats;
pub mod styles;
pub mod voice;

pub use compose::DialogueComposer;
pub use config::WikiTalksConfig;
pub use error::{ComposeError, FetchError, PipelineError, SynthesizeError};
pub use fetch::{Depth, SourceDocument, SourceFetcher, WikipediaSource};
pub use pipeline::{Credentials, Pipeline, PipelineOutput, PipelineRequest, Progress};
pub use script::{DialogueLine, DialogueScript};
pub use stats::ScriptStats;
pub use styles::{Style, StyleCatalog, StyleVariant, VoiceCast};
pub use voice::{ElevenLabsTransport, SynthesizedAudio, VoiceSynthesizer};
