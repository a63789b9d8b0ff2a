//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort a pipeline run. No partial output is ever
/// returned alongside one of these.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The top-level question document could not be parsed at all.
    #[error("failed to parse question input: {source}")]
    MalformedInput {
        #[source]
        source: serde_json::Error,
    },
    /// The template archive is missing or not a readable zip file.
    #[error("failed to read template archive {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The output archive could not be written.
    #[error("failed to write output archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// I/O failure while streaming archive entries.
    #[error("i/o failure while assembling package: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing the content document or manifest failed.
    #[error("failed to serialize {what}: {source}")]
    ContentBuild {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub fn template_read(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PipelineError::TemplateRead {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Per-question mapping failures. These never abort the run: the orchestrator
/// records them and substitutes a placeholder node for the question.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The record does not match the shape its kind tag promises.
    #[error("question {index}: record does not match its declared kind: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    /// An entry in the option list is not an answer object.
    #[error("question {index}: option {option} is not an answer object: {source}")]
    InvalidOption {
        index: usize,
        option: usize,
        #[source]
        source: serde_json::Error,
    },
}
