//! Resume ranker: rank resumes against a job description

use clap::Parser;
use log::{error, info};
use resume_ranker::cli::{Cli, Commands, ConfigAction, ModelAction};
use resume_ranker::config::{Config, OutputFormat};
use resume_ranker::output::artifacts::ArtifactWriter;
use resume_ranker::output::formatter::formatter_for;
use resume_ranker::pipeline::{BatchPipeline, JobSource};
use resume_ranker::processing::embeddings::Model2VecProvider;
use resume_ranker::processing::model_manager::EmbeddingModelManager;
use resume_ranker::sink::{ConfiguredSink, ResultSink};
use resume_ranker::Result;
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            job_text,
            resumes,
            output_dir,
            format,
            no_log,
            no_pdf,
            no_chart,
            preview,
            embedding,
        } => {
            if let Some(dir) = output_dir {
                config.output.output_dir = dir;
            }
            if no_pdf {
                config.output.write_pdf = false;
            }
            if no_chart {
                config.output.write_chart = false;
            }
            let format = format.unwrap_or(config.output.default_format);
            let console = format == OutputFormat::Console;

            let job = match (job, job_text) {
                (Some(path), _) => JobSource::File(path),
                (None, Some(text)) => JobSource::Inline(text),
                (None, None) => JobSource::Inline(String::new()),
            };

            if console {
                println!("🚀 Resume ranking");
                match &job {
                    JobSource::File(path) => println!("💼 Job Description: {}", path.display()),
                    JobSource::Inline(_) => println!("💼 Job Description: (inline text)"),
                }
                println!("📄 Resumes: {}", resumes.len());
                println!("🧠 Loading embedding model...");
            }

            let provider = Model2VecProvider::from_config(&config, embedding.as_deref())?;

            let sink = if no_log {
                ConfiguredSink::disabled()
            } else {
                ConfiguredSink::from_config(&config)?
            };
            info!("Results log: {}", sink.describe());

            let pipeline = BatchPipeline::new(provider, sink)
                .with_artifacts(ArtifactWriter::from_config(&config.output))
                .with_progress(console);

            let report = pipeline.run(&job, &resumes).await?;

            let preview_chars = preview.then_some(config.processing.preview_chars);
            let formatter = formatter_for(format, config.output.color_output, preview_chars);
            println!("{}", formatter.format_batch(&report)?);
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                println!("📦 Embedding Models\n");
                let manager = EmbeddingModelManager::new(&config).await?;
                let statuses = manager.list().await;

                for status in &statuses {
                    let marker = if status.downloaded { "✅" } else { "⬜" };
                    let default = if status.model.name == config.models.default_embedding_model {
                        " (default)"
                    } else {
                        ""
                    };
                    println!("{} {}{}", marker, status.model.name, default);
                    println!(
                        "    {} | {} MB | {} dims",
                        status.model.repo_id, status.model.size_mb, status.model.dimensions
                    );
                    println!("    {}", status.model.description);
                    if !status.downloaded {
                        println!("    💡 Download: resume-ranker models download {}", status.model.name);
                    }
                    println!();
                }

                if statuses.iter().all(|s| !s.downloaded) {
                    println!("💡 No models downloaded yet. Models are also fetched from the Hub on first use.");
                }
            }

            ModelAction::Download { model, force } => {
                println!("⬇️  Downloading model: {}", model);
                if force {
                    println!("🔄 Force download enabled");
                }

                let manager = EmbeddingModelManager::new(&config).await?;
                let path = manager.download(&model, force).await?;
                println!("✅ Model '{}' ready", model);
                println!("📁 Location: {}", path.display());
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Models Directory: {}", config.models_dir().display());
                println!("Default Embedding Model: {}", config.models.default_embedding_model);
                println!("Output Directory: {}", config.output.output_dir.display());
                println!(
                    "Artifacts: txt={} pdf={} chart={} json={}",
                    config.output.write_txt,
                    config.output.write_pdf,
                    config.output.write_chart,
                    config.output.write_json
                );
                println!("Results Log: {:?}", config.logging.sink);
                println!("  Spreadsheet: {}", config.logging.spreadsheet_name);
                println!("  Credentials: {}", config.credentials_path().display());
                println!("  CSV Path: {}", config.logging.csv_path.display());
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(&config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}
