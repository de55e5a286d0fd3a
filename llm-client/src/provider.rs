//! Provider trait and request/response types

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// Output format hint passed to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,
    /// Ask the model for a JSON document
    Json,
}

/// A single completion request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub response_format: ResponseFormat,
}

impl LlmRequest {
    /// Create a request with just a user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Request structured JSON output
    pub fn with_json_output(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Provider response
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// Common interface for all generation backends
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one completion request and wait for the full response
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Human-readable provider name
    fn name(&self) -> &'static str;

    /// Check whether the provider can be used
    fn is_available(&self) -> Result<()>;
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for Arc<P> {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        (**self).complete(request).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_available(&self) -> Result<()> {
        (**self).is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_defaults_to_text() {
        let request = LlmRequest::new("hello");
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.response_format, ResponseFormat::Text);
        assert!(request.system_prompt.is_none());
    }

    #[test]
    fn test_request_with_json_output() {
        let request = LlmRequest::new("hello")
            .with_json_output()
            .with_temperature(Some(0.8));
        assert_eq!(request.response_format, ResponseFormat::Json);
        assert_eq!(request.temperature, Some(0.8));
    }
}
