//! Error types for LLM providers

use thiserror::Error;

/// Errors returned by providers and configuration loading.
///
/// Every variant carries owned strings so errors can be cloned into test
/// doubles and compared in assertions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("API error{}: {message}", status_suffix(.status_code))]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Missing API key for {provider} (set {env_var})")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Unknown provider '{0}'. Available: gemini, openrouter, gemini-openai, lm-studio")]
    InvalidProvider(String),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),
}

fn status_suffix(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

impl LlmError {
    /// Map a transport-level reqwest failure, distinguishing timeouts.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout {
                seconds: timeout_secs,
            }
        } else {
            LlmError::ApiError {
                message: format!("Request failed: {}", err),
                status_code: None,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_with_status() {
        let err = LlmError::ApiError {
            message: "quota exceeded".to_string(),
            status_code: Some(429),
        };
        assert_eq!(err.to_string(), "API error (429): quota exceeded");
    }

    #[test]
    fn test_api_error_without_status() {
        let err = LlmError::ApiError {
            message: "connection reset".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "API error: connection reset");
    }

    #[test]
    fn test_missing_api_key_names_env_var() {
        let err = LlmError::MissingApiKey {
            provider: "gemini".to_string(),
            env_var: "GEMINI_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<LlmError>();
        assert_sync::<LlmError>();
    }
}
