//! Shared LLM client library for the cli-programs workspace
//!
//! Programs pick a named preset from `~/.config/cli-programs/llm.toml`
//! (or the built-in defaults) and get back a boxed [`LlmProvider`].

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::{Config, DEFAULT_TIMEOUT_SECS, ModelPreset, ProviderConfig};
pub use error::{LlmError, Result};
pub use provider::{LlmProvider, LlmRequest, LlmResponse, ResponseFormat, TokenUsage};
pub use providers::{
    GeminiProvider, MockProvider, OpenAICompatibleProvider, api_key_env_for, default_api_key_env,
    get_provider, get_provider_with_key,
};
