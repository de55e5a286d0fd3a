//! Conversation styles and the voice cast
//!
//! A [`StyleCatalog`] is built once at startup and handed by reference to
//! the composer and the synthesizer.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::prompts;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// High-energy Bollywood radio jockeys
    #[default]
    Rj,
    /// Professional business podcast
    Business,
    /// Casual engineers on a Teams call
    Teams,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Rj, Style::Business, Style::Teams];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Rj => "rj",
            Style::Business => "business",
            Style::Teams => "teams",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt template plus the two speaker names bound to a style
#[derive(Debug, Clone, PartialEq)]
pub struct StyleVariant {
    pub style: Style,
    pub description: &'static str,
    pub template: &'static str,
    pub speaker_a: String,
    pub speaker_b: String,
}

impl StyleVariant {
    pub fn speakers(&self) -> [&str; 2] {
        [self.speaker_a.as_str(), self.speaker_b.as_str()]
    }

    pub fn render_prompt(&self, text: &str, duration_secs: u32, target_words: u32) -> String {
        prompts::render(
            self.template,
            text,
            &self.speaker_a,
            &self.speaker_b,
            duration_secs,
            target_words,
        )
    }
}

/// Speaker display name -> synthesis voice ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceCast {
    voices: HashMap<String, String>,
}

impl VoiceCast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voice(mut self, speaker: impl Into<String>, voice_id: impl Into<String>) -> Self {
        self.voices.insert(speaker.into(), voice_id.into());
        self
    }

    pub fn voice_for(&self, speaker: &str) -> Option<&str> {
        self.voices.get(speaker).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct StyleCatalog {
    rj: StyleVariant,
    business: StyleVariant,
    teams: StyleVariant,
    cast: VoiceCast,
}

impl StyleCatalog {
    /// The three built-in Hinglish styles and their voices
    pub fn builtin() -> Self {
        let variant = |style, description, template, a: &str, b: &str| StyleVariant {
            style,
            description,
            template,
            speaker_a: a.to_string(),
            speaker_b: b.to_string(),
        };

        Self {
            rj: variant(
                Style::Rj,
                "Bollywood-style radio hosts, fast and playful",
                prompts::RJ_TEMPLATE,
                "Ravi",
                "Priya",
            ),
            business: variant(
                Style::Business,
                "Professional business podcast",
                prompts::BUSINESS_TEMPLATE,
                "Amit",
                "Neha",
            ),
            teams: variant(
                Style::Teams,
                "Two engineers syncing on a Teams call",
                prompts::TEAMS_TEMPLATE,
                "Vikram",
                "Anjali",
            ),
            cast: VoiceCast::new()
                .with_voice("Ravi", "6MoEUz34rbRrmmyxgRm4")
                .with_voice("Priya", "SZfY4K69FwXus87eayHK")
                .with_voice("Amit", "iWNf11sz1GrUE4ppxTOL")
                .with_voice("Neha", "SZfY4K69FwXus87eayHK")
                .with_voice("Vikram", "iWNf11sz1GrUE4ppxTOL")
                .with_voice("Anjali", "SZfY4K69FwXus87eayHK"),
        }
    }

    pub fn variant(&self, style: Style) -> &StyleVariant {
        match style {
            Style::Rj => &self.rj,
            Style::Business => &self.business,
            Style::Teams => &self.teams,
        }
    }

    pub fn variants(&self) -> impl Iterator<Item = &StyleVariant> {
        Style::ALL.into_iter().map(|s| self.variant(s))
    }

    pub fn cast(&self) -> &VoiceCast {
        &self.cast
    }

    /// Replace or add voice IDs, e.g. from the user's config file
    pub fn with_voice_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (speaker, voice_id) in overrides {
            self.cast
                .voices
                .insert(speaker.clone(), voice_id.clone());
        }
        self
    }
}
