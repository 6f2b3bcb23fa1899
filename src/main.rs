//! Resume matcher: score a resume against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_matcher::cli::{Cli, Commands, ConfigAction, DocumentKind};
use resume_matcher::config::{Config, OutputFormat};
use resume_matcher::error::{Result, ResumeMatcherError};
use resume_matcher::input::InputManager;
use resume_matcher::output::{format_report, format_search_hits, resolve_save_path, save_report_to_file};
use resume_matcher::processing::analyzer::MatchAnalyzer;
use resume_matcher::processing::chunker::Chunker;
use resume_matcher::processing::document::{JobDocument, ResumeDocument};
use resume_matcher::processing::embeddings::{build_embedder, Embedder};
use resume_matcher::processing::index::EmbeddingIndex;
use resume_matcher::suggestions::SuggestionGenerator;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            job,
            output,
            save,
            suggest,
            refine,
        } => {
            info!("Matching {} against {}", resume.display(), job.display());

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            let embedder = load_embedder(&config).await?;
            let analyzer = MatchAnalyzer::new(embedder, SuggestionGenerator::from_config(&config.suggestions));

            let report = {
                let analyzer = analyzer.clone();
                let (resume_text, job_text) = (resume_text.clone(), job_text.clone());
                tokio::task::spawn_blocking(move || analyzer.analyze(&resume_text, &job_text, suggest))
                    .await
                    .map_err(|e| ResumeMatcherError::Embedding(format!("Analysis task failed: {}", e)))??
            };

            let format = output.unwrap_or(config.output.format);
            match save {
                Some(target) => {
                    let path = resolve_save_path(&target, format, &resume.display().to_string());
                    let content = format_report(&report, format, false)?;
                    save_report_to_file(&content, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => {
                    let color = config.output.color_output && std::io::stdout().is_terminal();
                    print!("{}", format_report(&report, format, color)?);
                }
            }

            if refine {
                let generator = analyzer.suggestions().clone();
                let refinement = tokio::task::spawn_blocking(move || generator.refine(&resume_text, &job_text))
                    .await
                    .map_err(|e| ResumeMatcherError::Suggestion(format!("Refinement task failed: {}", e)))??;

                if format == OutputFormat::Json {
                    println!("{}", serde_json::to_string_pretty(&refinement)?);
                } else {
                    println!("\nRefined summary:\n{}\n", refinement.summary);
                    println!("Refined experience:\n{}", refinement.experience);
                }
            }
        }

        Commands::Extract { file, kind } => {
            let text = InputManager::new().extract_text(&file).await?;
            let json = match kind {
                DocumentKind::Resume => serde_json::to_string_pretty(&ResumeDocument::parse(&text)?.sections)?,
                DocumentKind::Job => serde_json::to_string_pretty(&JobDocument::analyze(&text)?.fields)?,
            };
            println!("{}", json);
        }

        Commands::Chunk { file, size, overlap } => {
            let chunker = Chunker::new(
                size.unwrap_or(config.processing.chunk_size),
                overlap.unwrap_or(config.processing.chunk_overlap),
            )?;
            let text = InputManager::new().extract_text(&file).await?;

            let chunks = chunker.chunks(&text);
            info!("Split {} into {} chunks", file.display(), chunks.len());
            for chunk in chunks {
                println!("--- chunk {} [{}..{}] ---", chunk.index, chunk.start, chunk.end);
                println!("{}", chunk.content);
            }
        }

        Commands::Search { files, query, k } => {
            let chunker = Chunker::from_config(&config.processing)?;
            let mut input_manager = InputManager::new();
            let mut documents = Vec::with_capacity(files.len());
            for file in &files {
                documents.push((file.display().to_string(), input_manager.extract_text(file).await?));
            }

            let embedder = load_embedder(&config).await?;
            let k = k.unwrap_or(config.retrieval.top_k);
            let hits = tokio::task::spawn_blocking(move || {
                let index = EmbeddingIndex::new(embedder);
                for (source, text) in &documents {
                    index.add_chunks(source, &chunker.chunks(text))?;
                }
                info!("Indexed {} chunks from {} files", index.len()?, documents.len());
                index.search(&query, k)
            })
            .await
            .map_err(|e| ResumeMatcherError::Index(format!("Search task failed: {}", e)))??;

            let color = config.output.color_output && std::io::stdout().is_terminal();
            print!("{}", format_search_hits(&hits, color));
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("# {}\n{}", path.display(), content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset: {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Build the configured embedder behind a spinner; model loading can take a while
async fn load_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    let bar = spinner(format!("Loading {:?} embeddings ({})", config.embedding.backend, config.embedding.model));

    let embedding_config = config.embedding.clone();
    let loaded = tokio::task::spawn_blocking(move || build_embedder(&embedding_config)).await;
    bar.finish_and_clear();

    let embedder = loaded.map_err(|e| ResumeMatcherError::Embedding(format!("Model loader task failed: {}", e)))??;
    info!("Using {} embeddings ({} dimensions)", embedder.name(), embedder.dimension());
    Ok(embedder)
}

fn spinner(message: String) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner()
        .with_style(ProgressStyle::with_template("{spinner} {msg}").expect("style template is valid"));
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
