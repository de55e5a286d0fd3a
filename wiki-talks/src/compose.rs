//! Turn article text into a validated dialogue script with an LLM

use llm_client::{LlmProvider, LlmRequest};

use crate::error::ComposeError;
use crate::fetch::SourceDocument;
use crate::script::{DialogueScript, parse_script};
use crate::styles::StyleVariant;

pub const DEFAULT_SOURCE_CHAR_LIMIT: usize = 3000;
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 150;

/// Spoken words that fit in `duration_secs` at `words_per_minute`
pub fn target_words(duration_secs: u32, words_per_minute: u32) -> u32 {
    (f64::from(duration_secs) / 60.0 * f64::from(words_per_minute)).round() as u32
}

/// First `limit` characters of `text`, cut on a char boundary
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct DialogueComposer {
    provider: Box<dyn LlmProvider>,
    temperature: Option<f32>,
    source_char_limit: usize,
    words_per_minute: u32,
}

impl DialogueComposer {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: None,
            source_char_limit: DEFAULT_SOURCE_CHAR_LIMIT,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_source_char_limit(mut self, limit: usize) -> Self {
        self.source_char_limit = limit;
        self
    }

    pub fn with_words_per_minute(mut self, words_per_minute: u32) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Build the prompt that [`compose`](Self::compose) would send
    pub fn build_prompt(
        &self,
        source: &SourceDocument,
        style: &StyleVariant,
        duration_secs: u32,
    ) -> String {
        let text = truncate_chars(&source.text, self.source_char_limit);
        style.render_prompt(
            text,
            duration_secs,
            target_words(duration_secs, self.words_per_minute),
        )
    }

    /// One generation call, then strict validation of the reply
    pub async fn compose(
        &self,
        source: &SourceDocument,
        style: &StyleVariant,
        duration_secs: u32,
    ) -> Result<DialogueScript, ComposeError> {
        let prompt = self.build_prompt(source, style, duration_secs);
        let request = LlmRequest::new(prompt)
            .with_json_output()
            .with_temperature(self.temperature);

        log::info!(
            "Generating {} script with {} (~{} words)",
            style.style,
            self.provider.name(),
            target_words(duration_secs, self.words_per_minute)
        );

        let response = self.provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            log::debug!(
                "Tokens used: {} in, {} out",
                usage.input_tokens,
                usage.output_tokens
            );
        }

        let script = parse_script(&response.content, style.speakers())?;
        log::info!("Script has {} lines", script.len());
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::{Style, StyleCatalog};
    use llm_client::{LlmError, MockProvider, ResponseFormat};
    use std::sync::Arc;

    fn source(text: &str) -> SourceDocument {
        SourceDocument {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_target_words() {
        assert_eq!(target_words(120, 150), 300);
        assert_eq!(target_words(60, 150), 150);
        assert_eq!(target_words(90, 150), 225);
        assert_eq!(target_words(1, 150), 3); // 2.5 rounds half away from zero
        assert_eq!(target_words(0, 150), 0);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("नमस्ते", 2), "नम");
    }

    #[tokio::test]
    async fn test_compose_success() {
        let catalog = StyleCatalog::builtin();
        let mock = Arc::new(MockProvider::always_succeeds(
            "```json\n[{\"speaker\": \"Ravi\", \"text\": \"[laughing] Arre!\"}, {\"speaker\": \"Priya\", \"text\": \"Haan\"}]\n```",
        ));
        let composer = DialogueComposer::new(Box::new(mock.clone()))
            .with_temperature(Some(0.8));

        let script = composer
            .compose(&source("Cricket is popular in India."), catalog.variant(Style::Rj), 120)
            .await
            .unwrap();

        assert_eq!(script.len(), 2);
        assert_eq!(script.lines()[0].speaker, "Ravi");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].response_format, ResponseFormat::Json);
        assert_eq!(requests[0].temperature, Some(0.8));
        assert!(requests[0].prompt.contains("Approximately 300 words"));
        assert!(requests[0].prompt.contains("Cricket is popular in India."));
    }

    #[tokio::test]
    async fn test_prompt_matches_requested_duration() {
        let catalog = StyleCatalog::builtin();
        let composer = DialogueComposer::new(Box::new(MockProvider::always_succeeds("[]")));

        let prompt = composer.build_prompt(&source("Text"), catalog.variant(Style::Rj), 300);
        assert!(prompt.contains("5-minute audio segment"));
        assert!(prompt.contains("Approximately 750 words"));
        assert!(!prompt.contains("2-minute"));
    }

    #[tokio::test]
    async fn test_compose_truncates_source() {
        let catalog = StyleCatalog::builtin();
        let mock = Arc::new(MockProvider::always_succeeds("[]"));
        let composer = DialogueComposer::new(Box::new(mock.clone()));

        let long = format!("{}{}", "a".repeat(3000), "TAIL_MARKER");
        composer
            .compose(&source(&long), catalog.variant(Style::Business), 120)
            .await
            .unwrap();

        let prompt = &mock.requests()[0].prompt;
        assert!(prompt.contains(&"a".repeat(3000)));
        assert!(!prompt.contains("TAIL_MARKER"));
    }

    #[tokio::test]
    async fn test_compose_rejects_other_style_speakers() {
        let catalog = StyleCatalog::builtin();
        let composer = DialogueComposer::new(Box::new(MockProvider::always_succeeds(
            r#"[{"speaker": "Ravi", "text": "Hello"}]"#,
        )));

        let err = composer
            .compose(&source("Text"), catalog.variant(Style::Teams), 120)
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::UnknownSpeaker { speaker, .. } if speaker == "Ravi"));
    }

    #[tokio::test]
    async fn test_compose_generation_failure() {
        let catalog = StyleCatalog::builtin();
        let composer = DialogueComposer::new(Box::new(MockProvider::always_fails(
            LlmError::ApiError {
                message: "quota exceeded".to_string(),
                status_code: Some(429),
            },
        )));

        let err = composer
            .compose(&source("Text"), catalog.variant(Style::Rj), 120)
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::Generation(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_compose_not_an_array() {
        let catalog = StyleCatalog::builtin();
        let composer = DialogueComposer::new(Box::new(MockProvider::always_succeeds(
            r#"{"script": []}"#,
        )));

        let err = composer
            .compose(&source("Text"), catalog.variant(Style::Rj), 120)
            .await
            .unwrap_err();
        assert_eq!(err, ComposeError::NotAnArray { found: "object" });
    }
}
