//! Fetch -> compose -> synthesize
//!
//! Stages run strictly in order and the first failure stops the run. Nothing
//! is retried.

use std::path::{Path, PathBuf};

use crate::compose::DialogueComposer;
use crate::error::PipelineError;
use crate::fetch::{Depth, SourceDocument, SourceFetcher};
use crate::script::DialogueScript;
use crate::styles::{Style, StyleCatalog};
use crate::voice::{SynthesizedAudio, VoiceSynthesizer};

/// API keys for the two external services
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    generation: Option<String>,
    generation_env: Option<String>,
    synthesis: Option<String>,
    synthesis_envs: Vec<String>,
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Credentials {
    /// Read keys from the environment.
    ///
    /// `generation_env` is `None` for providers that need no key; the first
    /// non-empty variable in `synthesis_envs` wins.
    pub fn from_env(generation_env: Option<String>, synthesis_envs: &[String]) -> Self {
        Self {
            generation: generation_env.as_deref().and_then(read_env),
            generation_env,
            synthesis: synthesis_envs.iter().find_map(|name| read_env(name)),
            synthesis_envs: synthesis_envs.to_vec(),
        }
    }

    #[cfg(test)]
    pub(crate) fn new(generation: Option<String>, synthesis: Option<String>) -> Self {
        Self {
            generation,
            generation_env: Some("GEMINI_API_KEY".to_string()),
            synthesis,
            synthesis_envs: vec!["ELEVENLABS_API_KEY".to_string()],
        }
    }

    /// Generation key, `Ok(None)` if the provider doesn't use one
    pub fn require_generation(&self) -> Result<Option<&str>, PipelineError> {
        match (&self.generation_env, &self.generation) {
            (None, _) => Ok(None),
            (Some(_), Some(key)) => Ok(Some(key)),
            (Some(env), None) => Err(PipelineError::MissingCredential {
                credential: format!("generation API key (set {env})"),
            }),
        }
    }

    pub fn require_synthesis(&self) -> Result<&str, PipelineError> {
        self.synthesis
            .as_deref()
            .ok_or_else(|| PipelineError::MissingCredential {
                credential: format!("ElevenLabs API key (set {})", self.synthesis_envs.join(" or ")),
            })
    }
}

/// Inputs for one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub reference: String,
    pub style: Style,
    pub depth: Depth,
    pub duration_secs: u32,
    /// Keep only the first N script lines before synthesis
    pub max_lines: Option<usize>,
    pub endpoint_override: Option<String>,
}

impl PipelineRequest {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            style: Style::default(),
            depth: Depth::default(),
            duration_secs: 120,
            max_lines: None,
            endpoint_override: None,
        }
    }
}

/// Stage events reported while a run progresses
#[derive(Debug)]
pub enum Progress<'a> {
    Fetching,
    Fetched(&'a SourceDocument),
    Composing,
    Composed(&'a DialogueScript),
    Synthesizing,
    Synthesized(&'a SynthesizedAudio),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub source: SourceDocument,
    pub script: DialogueScript,
    /// `None` when the pipeline has no synthesizer (script-only run)
    pub audio: Option<SynthesizedAudio>,
}

pub struct Pipeline {
    fetcher: SourceFetcher,
    composer: DialogueComposer,
    synthesizer: Option<VoiceSynthesizer>,
    catalog: StyleCatalog,
}

impl Pipeline {
    pub fn new(fetcher: SourceFetcher, composer: DialogueComposer, catalog: StyleCatalog) -> Self {
        Self {
            fetcher,
            composer,
            synthesizer: None,
            catalog,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: VoiceSynthesizer) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    pub async fn fetch(&self, request: &PipelineRequest) -> Result<SourceDocument, PipelineError> {
        let source = self.fetcher.fetch(&request.reference, request.depth).await?;
        log::info!("Fetched {} characters", source.char_length());
        log::debug!("Content preview: {}", source.preview(500));
        Ok(source)
    }

    pub async fn compose(
        &self,
        source: &SourceDocument,
        request: &PipelineRequest,
    ) -> Result<DialogueScript, PipelineError> {
        let variant = self.catalog.variant(request.style);
        let script = self
            .composer
            .compose(source, variant, request.duration_secs)
            .await?;

        Ok(match request.max_lines {
            Some(max) if script.len() > max => {
                log::info!("Keeping first {} of {} lines", max, script.len());
                script.truncate(max)
            }
            _ => script,
        })
    }

    pub async fn synthesize(
        &self,
        script: &DialogueScript,
        request: &PipelineRequest,
    ) -> Result<SynthesizedAudio, PipelineError> {
        let synthesizer =
            self.synthesizer
                .as_ref()
                .ok_or_else(|| PipelineError::MissingCredential {
                    credential: "ElevenLabs API key".to_string(),
                })?;
        let audio = synthesizer
            .synthesize(
                script,
                self.catalog.cast(),
                request.endpoint_override.as_deref(),
            )
            .await?;
        Ok(audio)
    }

    /// Run every stage, reporting progress as each one starts and finishes
    pub async fn run(
        &self,
        request: &PipelineRequest,
        mut on_progress: impl FnMut(Progress<'_>),
    ) -> Result<PipelineOutput, PipelineError> {
        on_progress(Progress::Fetching);
        let source = self.fetch(request).await?;
        on_progress(Progress::Fetched(&source));

        on_progress(Progress::Composing);
        let script = self.compose(&source, request).await?;
        on_progress(Progress::Composed(&script));

        let audio = if self.synthesizer.is_some() {
            on_progress(Progress::Synthesizing);
            let audio = self.synthesize(&script, request).await?;
            on_progress(Progress::Synthesized(&audio));
            Some(audio)
        } else {
            None
        };

        Ok(PipelineOutput {
            source,
            script,
            audio,
        })
    }
}

/// `<dir>/<stem>_script.json` next to the audio file
pub fn script_path_for(audio_path: &Path) -> PathBuf {
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wiki_talk_output".to_string());
    audio_path.with_file_name(format!("{stem}_script.json"))
}

pub async fn write_audio(path: &Path, audio: &SynthesizedAudio) -> Result<(), PipelineError> {
    tokio::fs::write(path, &audio.bytes)
        .await
        .map_err(|source| PipelineError::Output {
            path: path.to_path_buf(),
            source,
        })
}

pub async fn write_script(path: &Path, script: &DialogueScript) -> Result<(), PipelineError> {
    tokio::fs::write(path, script.to_pretty_json())
        .await
        .map_err(|source| PipelineError::Output {
            path: path.to_path_buf(),
            source,
        })
}
