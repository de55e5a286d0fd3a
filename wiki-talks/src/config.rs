// wiki-talks configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compose::{DEFAULT_SOURCE_CHAR_LIMIT, DEFAULT_WORDS_PER_MINUTE};
use crate::fetch::{DEFAULT_MAX_WORDS, Depth};
use crate::styles::Style;
use crate::voice::{DEFAULT_ENDPOINT, DEFAULT_MODEL_ID};

const DEFAULT_DURATION_SECS: u32 = 120;
const DEFAULT_OUTPUT: &str = "wiki_talk_output.mp3";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_API_KEY_ENV: &str = "ELEVENLABS_API_KEY";
const LEGACY_API_KEY_ENV: &str = "ELEVEN_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WikiTalksConfig {
    /// Conversation style
    #[serde(default)]
    pub style: Style,

    /// How much of the article to read
    #[serde(default)]
    pub depth: Depth,

    /// Target conversation length in seconds
    #[serde(default = "default_duration")]
    pub duration_secs: u32,

    /// Word cap for extended depth
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Characters of article text sent to the model
    #[serde(default = "default_source_char_limit")]
    pub source_char_limit: usize,

    /// Assumed speaking rate
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Default audio output path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Wikipedia language edition, e.g. "en" or "hi"
    #[serde(default = "default_language")]
    pub wikipedia_language: String,

    /// User-Agent sent to Wikipedia
    #[serde(default)]
    pub user_agent: Option<String>,

    /// LLM preset from llm.toml (program default if unset)
    #[serde(default)]
    pub preset: Option<String>,

    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Speaker name -> voice ID overrides
    #[serde(default)]
    pub voices: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynthesisConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment variable holding the ElevenLabs key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

fn default_max_words() -> usize {
    DEFAULT_MAX_WORDS
}

fn default_source_char_limit() -> usize {
    DEFAULT_SOURCE_CHAR_LIMIT
}

fn default_words_per_minute() -> u32 {
    DEFAULT_WORDS_PER_MINUTE
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_timeout() -> u64 {
    crate::voice::DEFAULT_TIMEOUT_SECS
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            timeout_secs: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl SynthesisConfig {
    /// Variables checked for the ElevenLabs key, in order
    pub fn api_key_envs(&self) -> Vec<String> {
        let mut envs = vec![self.api_key_env.clone()];
        for fallback in [DEFAULT_API_KEY_ENV, LEGACY_API_KEY_ENV] {
            if !envs.iter().any(|e| e == fallback) {
                envs.push(fallback.to_string());
            }
        }
        envs
    }
}

impl Default for WikiTalksConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            depth: Depth::default(),
            duration_secs: default_duration(),
            max_words: default_max_words(),
            source_char_limit: default_source_char_limit(),
            words_per_minute: default_words_per_minute(),
            output: default_output(),
            wikipedia_language: default_language(),
            user_agent: None,
            preset: None,
            synthesis: SynthesisConfig::default(),
            voices: HashMap::new(),
        }
    }
}

impl WikiTalksConfig {
    /// Get the config file path: ~/.config/cli-programs/wiki-talks.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("wiki-talks.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: WikiTalksConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
