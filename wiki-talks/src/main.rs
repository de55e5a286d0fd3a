// wiki-talks - Turn Wikipedia articles into Hinglish radio conversations

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use llm_client::{Config as LlmConfig, api_key_env_for, get_provider_with_key};
use std::path::PathBuf;

use wiki_talks::config::WikiTalksConfig;
use wiki_talks::fetch::wikipedia::{DEFAULT_TIMEOUT_SECS as SOURCE_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use wiki_talks::pipeline::{script_path_for, write_audio, write_script};
use wiki_talks::voice::{DEFAULT_ENDPOINT, RESIDENCY_ENDPOINT};
use wiki_talks::{
    Credentials, Depth, DialogueComposer, DialogueScript, ElevenLabsTransport, Pipeline,
    PipelineRequest, Progress, ScriptStats, SourceFetcher, Style, StyleCatalog, VoiceSynthesizer,
    WikipediaSource,
};

const PROGRAM: &str = "wiki-talks";

#[derive(Parser, Debug)]
#[command(name = "wiki-talks")]
#[command(about = "Turn a Wikipedia article into a Hinglish radio conversation", long_about = None)]
#[command(version)]
struct Args {
    /// Wikipedia article URL
    url: Option<String>,

    /// Conversation style
    #[arg(short, long, value_enum)]
    style: Option<Style>,

    /// Article depth: summary (fast) or extended (pro)
    #[arg(long, value_enum)]
    depth: Option<Depth>,

    /// Target conversation length in seconds
    #[arg(long)]
    duration: Option<u32>,

    /// Output MP3 path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the script as <output>_script.json
    #[arg(long)]
    save_script: bool,

    /// Print the script JSON to stdout
    #[arg(long)]
    print_script: bool,

    /// Only synthesize the first N script lines
    #[arg(long)]
    max_lines: Option<usize>,

    /// Synthesis endpoint for this run
    #[arg(long)]
    endpoint: Option<String>,

    /// LLM preset from llm.toml
    #[arg(short, long)]
    preset: Option<String>,

    /// Fetch and write the script, skip audio
    #[arg(long)]
    dry_run: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List conversation styles and their speakers
    Styles,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default style
    SetStyle {
        #[arg(value_enum)]
        style: Style,
    },
    /// Set default article depth
    SetDepth {
        #[arg(value_enum)]
        depth: Depth,
    },
    /// Set default duration
    SetDuration {
        /// Duration in seconds
        seconds: u32,
    },
    /// Set synthesis endpoint ("default", "residency" or a URL)
    SetEndpoint { endpoint: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match &args.command {
        Some(Commands::Styles) => {
            list_styles(&StyleCatalog::builtin());
            return Ok(());
        }
        Some(Commands::Config { action }) => return handle_config_command(action),
        None => {}
    }

    let config = WikiTalksConfig::load().context("Failed to load configuration")?;
    let url = args
        .url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Wikipedia URL is required"))?;

    let llm_config = LlmConfig::load().context("Failed to load LLM configuration")?;
    let preset_name = args
        .preset
        .clone()
        .or_else(|| config.preset.clone())
        .unwrap_or_else(|| llm_config.get_default_for_program(PROGRAM).to_string());
    let preset = llm_config
        .get_preset(&preset_name)
        .context(format!("Unknown preset: {}", preset_name))?;

    // Both keys are checked before any network call
    let credentials =
        Credentials::from_env(api_key_env_for(preset), &config.synthesis.api_key_envs());
    let generation_key = credentials.require_generation()?.map(String::from);
    let synthesis_key = if args.dry_run {
        None
    } else {
        Some(credentials.require_synthesis()?.to_string())
    };

    let provider = get_provider_with_key(
        preset,
        llm_config.get_provider_config(&preset.provider),
        generation_key,
    )
    .context(format!(
        "Failed to initialize provider '{}' for preset '{}'",
        preset.provider, preset_name
    ))?;

    let catalog = StyleCatalog::builtin().with_voice_overrides(&config.voices);
    let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    let source = WikipediaSource::new(&config.wikipedia_language, user_agent, SOURCE_TIMEOUT_SECS)?;
    let fetcher = SourceFetcher::new(Box::new(source)).with_max_words(config.max_words);
    let composer = DialogueComposer::new(provider)
        .with_temperature(preset.temperature)
        .with_source_char_limit(config.source_char_limit)
        .with_words_per_minute(config.words_per_minute);

    let provider_name = composer.provider_name();
    let mut pipeline = Pipeline::new(fetcher, composer, catalog);
    if let Some(key) = synthesis_key {
        let transport = ElevenLabsTransport::new(config.synthesis.timeout_secs)?;
        pipeline = pipeline.with_synthesizer(
            VoiceSynthesizer::new(Box::new(transport), key)
                .with_endpoint(config.synthesis.endpoint.clone())
                .with_model_id(config.synthesis.model_id.clone()),
        );
    }

    let request = PipelineRequest {
        reference: url,
        style: args.style.unwrap_or(config.style),
        depth: args.depth.unwrap_or(config.depth),
        duration_secs: args.duration.unwrap_or(config.duration_secs),
        max_lines: args.max_lines,
        endpoint_override: args.endpoint.clone(),
    };
    let output_path = args.output.clone().unwrap_or_else(|| config.output.clone());

    if args.debug {
        eprintln!("URL: {}", request.reference);
        eprintln!("Style: {}", request.style);
        eprintln!("Depth: {}", request.depth);
        eprintln!("Preset: {} ({}, {})", preset_name, provider_name, preset.model);
        eprintln!("Output: {}", output_path.display());
    }

    let steps = if args.dry_run { 2 } else { 3 };
    let speakers = pipeline.catalog().variant(request.style).speakers().map(String::from);
    let output = pipeline
        .run(&request, |progress| match progress {
            Progress::Fetching => eprintln!("[1/{steps}] Fetching article..."),
            Progress::Fetched(source) => {
                eprintln!("Fetched {} characters", source.char_length())
            }
            Progress::Composing => eprintln!(
                "[2/{steps}] Writing {} script ({} & {})...",
                request.style, speakers[0], speakers[1]
            ),
            Progress::Composed(script) => print_script_listing(script),
            Progress::Synthesizing => eprintln!("[3/{steps}] Synthesizing audio..."),
            Progress::Synthesized(audio) => eprintln!(
                "Generated audio ({} bytes, ~{:.1} seconds)",
                audio.len(),
                audio.estimated_duration_secs()
            ),
        })
        .await?;

    let stats = ScriptStats::from_script(&output.script, config.words_per_minute);
    eprintln!("{}", stats);

    if args.print_script || args.dry_run {
        println!("{}", output.script.to_pretty_json());
    }

    if args.save_script {
        let script_path = script_path_for(&output_path);
        write_script(&script_path, &output.script).await?;
        eprintln!("Script: {}", script_path.display());
    }

    if let Some(audio) = &output.audio {
        write_audio(&output_path, audio).await?;
        eprintln!("Output: {}", output_path.display());
    }

    Ok(())
}

fn print_script_listing(script: &DialogueScript) {
    eprintln!("Script ({} lines):", script.len());
    for (i, line) in script.lines().iter().enumerate() {
        eprintln!("  {:>2}. {}: {}", i + 1, line.speaker, line.text);
    }
}

fn list_styles(catalog: &StyleCatalog) {
    println!("Available styles:");
    println!();
    for variant in catalog.variants() {
        println!(
            "  {:<10} {} & {:<8} {}",
            variant.style.as_str(),
            variant.speaker_a,
            variant.speaker_b,
            variant.description
        );
    }
}

fn resolve_endpoint(value: &str) -> String {
    match value {
        "default" => DEFAULT_ENDPOINT.to_string(),
        "residency" => RESIDENCY_ENDPOINT.to_string(),
        url => url.to_string(),
    }
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = WikiTalksConfig::load()?;
            println!("Configuration file: {:?}", WikiTalksConfig::config_path()?);
            println!();
            println!("style = \"{}\"", config.style);
            println!("depth = \"{}\"", config.depth);
            println!("duration_secs = {}", config.duration_secs);
            println!("max_words = {}", config.max_words);
            println!("output = \"{}\"", config.output.display());
            println!("wikipedia_language = \"{}\"", config.wikipedia_language);
            match &config.preset {
                Some(preset) => println!("preset = \"{}\"", preset),
                None => println!("preset = (llm.toml default)"),
            }
            println!("synthesis.endpoint = \"{}\"", config.synthesis.endpoint);
            println!("synthesis.model_id = \"{}\"", config.synthesis.model_id);
            println!("synthesis.api_key_env = \"{}\"", config.synthesis.api_key_env);
        }
        ConfigAction::SetStyle { style } => {
            let mut config = WikiTalksConfig::load()?;
            config.style = *style;
            config.save()?;
            println!("Default style set to: {}", style);
        }
        ConfigAction::SetDepth { depth } => {
            let mut config = WikiTalksConfig::load()?;
            config.depth = *depth;
            config.save()?;
            println!("Default depth set to: {}", depth);
        }
        ConfigAction::SetDuration { seconds } => {
            let mut config = WikiTalksConfig::load()?;
            config.duration_secs = *seconds;
            config.save()?;
            println!("Default duration set to: {} seconds", seconds);
        }
        ConfigAction::SetEndpoint { endpoint } => {
            let mut config = WikiTalksConfig::load()?;
            config.synthesis.endpoint = resolve_endpoint(endpoint);
            config.save()?;
            println!("Synthesis endpoint set to: {}", config.synthesis.endpoint);
        }
    }
    Ok(())
}
