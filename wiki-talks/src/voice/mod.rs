// Multi-voice dialogue synthesis

pub mod elevenlabs;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SynthesizeError;
use crate::script::DialogueScript;
use crate::styles::VoiceCast;

pub use elevenlabs::ElevenLabsTransport;

pub const DEFAULT_ENDPOINT: &str = "https://api.elevenlabs.io/v1/text-to-dialogue";
pub const RESIDENCY_ENDPOINT: &str = "https://api.in.residency.elevenlabs.io/v1/text-to-dialogue";
pub const DEFAULT_MODEL_ID: &str = "eleven_v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Raw-body characters kept in an error when the body isn't JSON
const ERROR_BODY_PREVIEW: usize = 200;

/// One turn of the dialogue as sent to the synthesis API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueInput {
    pub text: String,
    pub voice_id: String,
}

/// Request body for the text-to-dialogue endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueRequest {
    pub inputs: Vec<DialogueInput>,
    pub model_id: String,
}

/// Status and body of a synthesis HTTP call
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Encoded audio exactly as returned by the provider (MP3 for ElevenLabs)
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
}

impl SynthesizedAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Rough playback length, assuming ~1 KB per second of MP3
    pub fn estimated_duration_secs(&self) -> f64 {
        self.bytes.len() as f64 / 1000.0
    }
}

/// Sends a dialogue request somewhere and returns the raw response
#[async_trait]
pub trait DialogueTransport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        api_key: &str,
        request: &DialogueRequest,
    ) -> Result<TransportResponse, SynthesizeError>;
}

/// Pair every line with its voice, in script order.
///
/// Fails on the first speaker without a voice, before anything is sent.
pub fn build_request(
    script: &DialogueScript,
    cast: &VoiceCast,
    model_id: &str,
) -> Result<DialogueRequest, SynthesizeError> {
    let inputs = script
        .lines()
        .iter()
        .map(|line| {
            let voice_id = cast.voice_for(&line.speaker).ok_or_else(|| {
                SynthesizeError::UnmappedSpeaker {
                    speaker: line.speaker.clone(),
                }
            })?;
            Ok(DialogueInput {
                text: line.text.clone(),
                voice_id: voice_id.to_string(),
            })
        })
        .collect::<Result<Vec<_>, SynthesizeError>>()?;

    Ok(DialogueRequest {
        inputs,
        model_id: model_id.to_string(),
    })
}

/// Best description of a failed call's body
fn error_detail(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => {
            let detail = json.get("detail");
            if let Some(message) = detail.and_then(|d| d.get("message")).and_then(|m| m.as_str()) {
                message.to_string()
            } else if let Some(text) = detail.and_then(|d| d.as_str()) {
                text.to_string()
            } else {
                json.to_string()
            }
        }
        Err(_) => String::from_utf8_lossy(body)
            .chars()
            .take(ERROR_BODY_PREVIEW)
            .collect(),
    }
}

pub struct VoiceSynthesizer {
    transport: Box<dyn DialogueTransport>,
    api_key: String,
    endpoint: String,
    model_id: String,
}

impl VoiceSynthesizer {
    pub fn new(transport: Box<dyn DialogueTransport>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }

    /// Default endpoint used when a call gives no override
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Render the whole script in one request
    pub async fn synthesize(
        &self,
        script: &DialogueScript,
        cast: &VoiceCast,
        endpoint_override: Option<&str>,
    ) -> Result<SynthesizedAudio, SynthesizeError> {
        let request = build_request(script, cast, &self.model_id)?;
        let url = endpoint_override.unwrap_or(&self.endpoint);

        log::info!(
            "Synthesizing {} lines with {} via {}",
            request.inputs.len(),
            self.model_id,
            url
        );

        let response = self.transport.send(url, &self.api_key, &request).await?;
        if !(200..300).contains(&response.status) {
            let detail = error_detail(&response.body);
            log::warn!("Synthesis failed with status {}", response.status);
            return Err(SynthesizeError::ProviderError {
                status: response.status,
                detail,
            });
        }

        log::info!("Received {} bytes of audio", response.body.len());
        Ok(SynthesizedAudio {
            bytes: response.body,
        })
    }
}
