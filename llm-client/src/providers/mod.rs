//! Provider implementations and construction from presets

pub mod gemini;
pub mod openai_compatible;

use async_trait::async_trait;
use std::sync::Mutex;

use crate::config::{ModelPreset, ProviderConfig};
use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

pub use gemini::GeminiProvider;
pub use openai_compatible::OpenAICompatibleProvider;

/// Default API key environment variable for a provider, if it needs one
pub fn default_api_key_env(provider: &str) -> Option<&'static str> {
    match provider {
        "gemini" | "gemini-openai" => Some("GEMINI_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        _ => None,
    }
}

/// Environment variable that holds the key for a preset
pub fn api_key_env_for(preset: &ModelPreset) -> Option<String> {
    preset
        .api_key_env
        .clone()
        .or_else(|| default_api_key_env(&preset.provider).map(String::from))
}

/// Create a provider, reading its API key from the environment
pub fn get_provider(
    preset: &ModelPreset,
    provider_config: Option<&ProviderConfig>,
) -> Result<Box<dyn LlmProvider>> {
    let api_key = match api_key_env_for(preset) {
        Some(env_var) => match std::env::var(&env_var) {
            Ok(key) if !key.trim().is_empty() => Some(key),
            _ => {
                return Err(LlmError::MissingApiKey {
                    provider: preset.provider.clone(),
                    env_var,
                });
            }
        },
        None => None,
    };

    get_provider_with_key(preset, provider_config, api_key)
}

/// Create a provider with an explicitly supplied API key
pub fn get_provider_with_key(
    preset: &ModelPreset,
    provider_config: Option<&ProviderConfig>,
    api_key: Option<String>,
) -> Result<Box<dyn LlmProvider>> {
    let settings = provider_config.cloned().unwrap_or_default();
    let timeout = settings.timeout_secs();
    let base_url = settings.base_url.as_deref();

    let require_key = |key: Option<String>| {
        key.filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                provider: preset.provider.clone(),
                env_var: api_key_env_for(preset).unwrap_or_default(),
            })
    };

    match preset.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(
            &preset.model,
            require_key(api_key)?,
            base_url,
            timeout,
        )?)),
        "gemini-openai" => Ok(Box::new(OpenAICompatibleProvider::gemini_openai(
            &preset.model,
            require_key(api_key)?,
            timeout,
        )?)),
        "openrouter" => Ok(Box::new(OpenAICompatibleProvider::openrouter(
            &preset.model,
            require_key(api_key)?,
            timeout,
        )?)),
        "lm-studio" => Ok(Box::new(OpenAICompatibleProvider::lm_studio(
            &preset.model,
            base_url,
            timeout,
        )?)),
        other => Err(LlmError::InvalidProvider(other.to_string())),
    }
}

/// Scripted provider for tests: returns canned results and records requests
pub struct MockProvider {
    outcome: std::result::Result<String, LlmError>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockProvider {
    pub fn always_succeeds(content: &str) -> Self {
        Self {
            outcome: Ok(content.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always_fails(error: LlmError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        match &self.outcome {
            Ok(content) => Ok(LlmResponse {
                content: content.clone(),
                model: "mock".to_string(),
                usage: None,
            }),
            Err(e) => Err(e.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "Mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}
