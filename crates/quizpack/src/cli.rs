//! Thin presentation shell: reads the input files, resolves defaults from
//! the layered config, runs the pipeline, and writes the finished package.
//! All quiz semantics live in the core; the shell only moves bytes.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::app::pipeline::{PipelineRequest, generate};
use crate::domain::model::{MediaKind, MediaRef};
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "quizpack",
    version,
    about = "Package video and audio quizzes into H5P bundles"
)]
pub struct Cli {
    /// JSON file with the top-level `questions` list.
    #[arg(long, value_name = "FILE")]
    pub questions: PathBuf,

    /// Video or audio URL embedded ahead of the quiz.
    #[arg(long, value_name = "URL")]
    pub media_url: String,

    /// Kind of media the URL points at.
    #[arg(long, value_enum)]
    pub media_kind: Option<MediaKind>,

    /// Quiz title shown on the intro page.
    #[arg(long)]
    pub title: Option<String>,

    /// Shuffle question order per attempt.
    #[arg(long)]
    pub randomize: Option<bool>,

    /// Number of questions drawn per attempt (reference range 1-20).
    #[arg(long)]
    pub pool_size: Option<u32>,

    /// Score threshold (0-100) required to pass.
    #[arg(long)]
    pub pass_percentage: Option<u32>,

    /// PNG/JPEG replacing the template's title image.
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Template archive overriding the configured one.
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Output path for the finished package.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    let questions_json = fs::read_to_string(&cli.questions)
        .with_context(|| format!("failed to read question file {}", cli.questions.display()))?;
    let title_image = match &cli.image {
        Some(path) => Some(
            fs::read(path)
                .with_context(|| format!("failed to read image file {}", path.display()))?,
        ),
        None => None,
    };

    let media_kind = cli.media_kind.unwrap_or_else(|| {
        <MediaKind as ValueEnum>::from_str(&config.defaults.media_kind, true)
            .unwrap_or(MediaKind::Video)
    });
    let request = PipelineRequest {
        questions_json,
        media: MediaRef {
            kind: media_kind,
            url: cli.media_url.clone(),
        },
        title: cli
            .title
            .clone()
            .unwrap_or_else(|| config.defaults.title.clone()),
        randomize: cli.randomize.unwrap_or(config.defaults.randomize),
        pool_size: cli.pool_size.unwrap_or(config.defaults.pool_size),
        pass_percentage: cli
            .pass_percentage
            .unwrap_or(config.defaults.pass_percentage),
        title_image,
    };

    let template = cli
        .template
        .clone()
        .unwrap_or_else(|| config.template.path());
    let package = generate(&request, &template)?;

    for warning in &package.report.warnings {
        tracing::warn!(%warning, "pipeline warning");
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.output.file_name()));
    fs::write(&output, &package.bytes)
        .with_context(|| format!("failed to write package to {}", output.display()))?;
    tracing::info!(path = %output.display(), bytes = package.bytes.len(), "package written");

    Ok(())
}
