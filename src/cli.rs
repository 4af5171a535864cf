//! CLI interface for the resume ranker

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes against a job description")]
#[command(long_about = "Score resumes by semantic similarity to a job description, explain keyword gaps, and export feedback and a ranking chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a batch of resumes against one job description
    Rank {
        /// Job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description text given directly
        #[arg(long)]
        job_text: Option<String>,

        /// Resume files (PDF, DOCX, TXT, MD)
        #[arg(short, long, num_args = 1.., required = true)]
        resumes: Vec<PathBuf>,

        /// Directory for feedback files, chart and ranking.json
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format: console, json
        #[arg(short, long, value_parser = parse_output_format)]
        format: Option<OutputFormat>,

        /// Do not append results to the configured log
        #[arg(long)]
        no_log: bool,

        /// Skip feedback PDFs
        #[arg(long)]
        no_pdf: bool,

        /// Skip the ranking chart
        #[arg(long)]
        no_chart: bool,

        /// Show the start of each extracted resume
        #[arg(long)]
        preview: bool,

        /// Embedding model to use
        #[arg(short, long)]
        embedding: Option<String>,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List catalog models and whether they are downloaded
    List,

    /// Download a model
    Download {
        /// Model name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_rank_with_job_file() {
        let cli = Cli::try_parse_from([
            "resume-ranker", "rank", "--job", "jd.txt", "--resumes", "a.pdf", "b.docx", "--no-log",
        ])
        .unwrap();

        match cli.command {
            Commands::Rank { job, job_text, resumes, no_log, format, .. } => {
                assert_eq!(job, Some(PathBuf::from("jd.txt")));
                assert!(job_text.is_none());
                assert_eq!(resumes.len(), 2);
                assert!(no_log);
                assert!(format.is_none());
            }
            _ => panic!("expected rank"),
        }
    }

    #[test]
    fn test_rank_with_inline_job() {
        let cli = Cli::try_parse_from([
            "resume-ranker", "-v", "rank", "--job-text", "rust engineer", "-r", "a.txt", "--format", "json",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Rank { job_text, format, .. } => {
                assert_eq!(job_text.as_deref(), Some("rust engineer"));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            _ => panic!("expected rank"),
        }
    }

    #[test]
    fn test_rank_requires_one_job_source() {
        assert!(Cli::try_parse_from(["resume-ranker", "rank", "--resumes", "a.txt"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-ranker", "rank", "--job", "jd.txt", "--job-text", "x", "--resumes", "a.txt",
        ])
        .is_err());
    }

    #[test]
    fn test_rank_requires_resumes() {
        assert!(Cli::try_parse_from(["resume-ranker", "rank", "--job", "jd.txt"]).is_err());
    }
}
