//! Shared LLM configuration
//!
//! Loaded from `~/.config/cli-programs/llm.toml`. Presets defined in the
//! file are merged over the built-in presets, so a user only needs to list
//! what they want to change.
//!
//! ```toml
//! default_preset = "gemini-flash"
//!
//! [defaults]
//! wiki-talks = "gemini-pro"
//!
//! [presets.gemini-pro]
//! provider = "gemini"
//! model = "gemini-2.5-pro"
//! temperature = 0.7
//!
//! [providers.gemini]
//! timeout_secs = 90
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LlmError, Result};

const DEFAULT_PRESET: &str = "gemini-flash";

/// Default request timeout applied when a provider has no override
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A named model configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelPreset {
    /// Provider key, e.g. "gemini" or "openrouter"
    pub provider: String,
    /// Model identifier understood by the provider
    pub model: String,
    /// Environment variable holding the API key (provider default if unset)
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Per-provider connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_preset_name")]
    pub default_preset: String,

    /// Program name -> preset name
    #[serde(default)]
    pub defaults: HashMap<String, String>,

    #[serde(default)]
    pub presets: HashMap<String, ModelPreset>,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_preset_name() -> String {
    DEFAULT_PRESET.to_string()
}

fn builtin_presets() -> HashMap<String, ModelPreset> {
    let mut presets = HashMap::new();
    presets.insert(
        "gemini-flash".to_string(),
        ModelPreset {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: Some("GEMINI_API_KEY".to_string()),
            temperature: Some(0.8),
        },
    );
    presets.insert(
        "gemini-pro".to_string(),
        ModelPreset {
            provider: "gemini".to_string(),
            model: "gemini-2.5-pro".to_string(),
            api_key_env: Some("GEMINI_API_KEY".to_string()),
            temperature: Some(0.8),
        },
    );
    presets.insert(
        "openrouter-gemini".to_string(),
        ModelPreset {
            provider: "openrouter".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key_env: Some("OPENROUTER_API_KEY".to_string()),
            temperature: Some(0.8),
        },
    );
    presets
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_preset: default_preset_name(),
            defaults: HashMap::new(),
            presets: builtin_presets(),
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Get the config file path: ~/.config/cli-programs/llm.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| LlmError::ConfigError("Could not determine home directory".into()))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("llm.toml"))
    }

    /// Load config from the default path, returning built-ins if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            LlmError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse TOML content and merge it over the built-in presets
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| LlmError::ConfigError(format!("Invalid llm.toml: {}", e)))?;

        for (name, preset) in builtin_presets() {
            config.presets.entry(name).or_insert(preset);
        }

        Ok(config)
    }

    /// Look up a preset by name
    pub fn get_preset(&self, name: &str) -> Result<&ModelPreset> {
        self.presets
            .get(name)
            .ok_or_else(|| LlmError::UnknownPreset(name.to_string()))
    }

    /// Provider settings, if any were configured
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider)
    }

    /// Preset name a program should use when none is given explicitly
    pub fn get_default_for_program(&self, program: &str) -> &str {
        self.defaults
            .get(program)
            .map(String::as_str)
            .unwrap_or(&self.default_preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_gemini_preset() {
        let config = Config::default();
        let preset = config.get_preset("gemini-flash").unwrap();
        assert_eq!(preset.provider, "gemini");
        assert_eq!(preset.model, "gemini-2.5-flash");
        assert_eq!(preset.temperature, Some(0.8));
        assert_eq!(config.default_preset, "gemini-flash");
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.ends_with("cli-programs/llm.toml"));
    }

    #[test]
    fn test_parse_merges_builtin_presets() {
        let toml_str = r#"
default_preset = "local"

[presets.local]
provider = "lm-studio"
model = "qwen3-8b"
"#;
        let config = Config::parse(toml_str).unwrap();
        assert_eq!(config.default_preset, "local");
        assert!(config.get_preset("local").is_ok());
        assert!(config.get_preset("gemini-flash").is_ok());
    }

    #[test]
    fn test_user_preset_overrides_builtin() {
        let toml_str = r#"
[presets.gemini-flash]
provider = "gemini"
model = "gemini-2.0-flash"
"#;
        let config = Config::parse(toml_str).unwrap();
        let preset = config.get_preset("gemini-flash").unwrap();
        assert_eq!(preset.model, "gemini-2.0-flash");
        assert_eq!(preset.temperature, None);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.default_preset, "gemini-flash");
        assert!(config.get_preset("gemini-pro").is_ok());
    }

    #[test]
    fn test_program_default() {
        let toml_str = r#"
[defaults]
wiki-talks = "gemini-pro"
"#;
        let config = Config::parse(toml_str).unwrap();
        assert_eq!(config.get_default_for_program("wiki-talks"), "gemini-pro");
        assert_eq!(config.get_default_for_program("other"), "gemini-flash");
    }

    #[test]
    fn test_unknown_preset() {
        let config = Config::default();
        let err = config.get_preset("nope").unwrap_err();
        assert_eq!(err, LlmError::UnknownPreset("nope".to_string()));
    }

    #[test]
    fn test_provider_timeout_default() {
        let toml_str = r#"
[providers.gemini]
timeout_secs = 30
"#;
        let config = Config::parse(toml_str).unwrap();
        assert_eq!(config.get_provider_config("gemini").unwrap().timeout_secs(), 30);
        assert_eq!(ProviderConfig::default().timeout_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("llm.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::parse("default_preset = [").unwrap_err();
        assert!(matches!(err, LlmError::ConfigError(_)));
    }
}
