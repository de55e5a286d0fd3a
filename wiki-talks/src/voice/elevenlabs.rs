// ElevenLabs text-to-dialogue transport

use super::{DialogueRequest, DialogueTransport, TransportResponse};
use crate::error::SynthesizeError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP transport for the ElevenLabs dialogue API
pub struct ElevenLabsTransport {
    client: Client,
    timeout_secs: u64,
}

impl ElevenLabsTransport {
    pub fn new(timeout_secs: u64) -> Result<Self, SynthesizeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SynthesizeError::TransportError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl DialogueTransport for ElevenLabsTransport {
    async fn send(
        &self,
        url: &str,
        api_key: &str,
        request: &DialogueRequest,
    ) -> Result<TransportResponse, SynthesizeError> {
        let transport_error = |e: reqwest::Error| {
            let message = if e.is_timeout() {
                format!("request timed out after {} seconds", self.timeout_secs)
            } else {
                e.to_string()
            };
            SynthesizeError::TransportError { message }
        };

        let response = self
            .client
            .post(url)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/mpeg")
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesizeError;
    use crate::script::{DialogueLine, DialogueScript};
    use crate::styles::VoiceCast;
    use crate::voice::VoiceSynthesizer;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn cast() -> VoiceCast {
        VoiceCast::new()
            .with_voice("Host", "voice-host")
            .with_voice("Guest", "voice-guest")
    }

    fn script() -> DialogueScript {
        DialogueScript::new(vec![
            DialogueLine::new("Host", "Hi [laughs]"),
            DialogueLine::new("Guest", "Hello"),
            DialogueLine::new("Host", "Bye"),
        ])
    }

    fn synthesizer(server: &MockServer) -> VoiceSynthesizer {
        VoiceSynthesizer::new(Box::new(ElevenLabsTransport::new(5).unwrap()), "test-key")
            .with_endpoint(server.url("/v1/text-to-dialogue"))
    }

    #[tokio::test]
    async fn test_three_line_dialogue() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/text-to-dialogue")
                .header("xi-api-key", "test-key")
                .header("content-type", "application/json")
                .json_body(json!({
                    "inputs": [
                        {"text": "Hi [laughs]", "voice_id": "voice-host"},
                        {"text": "Hello", "voice_id": "voice-guest"},
                        {"text": "Bye", "voice_id": "voice-host"}
                    ],
                    "model_id": "eleven_v3"
                }));
            then.status(200)
                .header("content-type", "audio/mpeg")
                .body("AUDIO");
        });

        let audio = synthesizer(&server)
            .synthesize(&script(), &cast(), None)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(audio.bytes, b"AUDIO");
    }

    #[tokio::test]
    async fn test_status_400_is_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/text-to-dialogue");
            then.status(400)
                .json_body(json!({"detail": {"status": "invalid_voice", "message": "Voice not found"}}));
        });

        let err = synthesizer(&server)
            .synthesize(&script(), &cast(), None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("400"));
        assert_eq!(
            err,
            SynthesizeError::ProviderError {
                status: 400,
                detail: "Voice not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/text-to-dialogue");
            then.status(502).body("Bad Gateway");
        });

        let err = synthesizer(&server)
            .synthesize(&script(), &cast(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "ElevenLabs API error: 502 - Bad Gateway");
    }

    #[tokio::test]
    async fn test_override_endpoint_is_used() {
        let server = MockServer::start();
        let alternate = server.mock(|when, then| {
            when.method(POST).path("/residency/v1/text-to-dialogue");
            then.status(200).body("AUDIO");
        });

        let override_url = server.url("/residency/v1/text-to-dialogue");
        synthesizer(&server)
            .synthesize(&script(), &cast(), Some(&override_url))
            .await
            .unwrap();
        alternate.assert();
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let synth = VoiceSynthesizer::new(Box::new(ElevenLabsTransport::new(2).unwrap()), "k")
            .with_endpoint("http://127.0.0.1:9/v1/text-to-dialogue");

        let err = synth.synthesize(&script(), &cast(), None).await.unwrap_err();
        assert!(matches!(err, SynthesizeError::TransportError { .. }));
        assert!(err.to_string().starts_with("Network error"));
    }
}
