//! Pipeline orchestration: parse input, map questions, build the document,
//! and hand everything to the package assembler.
//!
//! A run is synchronous and fully local to the call. Concurrent invocations
//! are safe by construction: no shared state, identifiers generated
//! independently per call.

use std::path::Path;

use serde_json::{Value, json};

use crate::app::document::{DocumentSpec, build_document};
use crate::app::mappers::{map_multiple_choice, map_true_false};
use crate::domain::errors::{MappingError, PipelineError};
use crate::domain::h5p::{ContentNode, PackageManifest};
use crate::domain::model::{BuildReport, MediaRef, QuestionRecord, QuizDocument, Warning};
use crate::infra::archive::PackageAssembler;

/// Everything the presentation shell hands to one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Raw JSON document with a top-level `questions` list.
    pub questions_json: String,
    pub media: MediaRef,
    pub title: String,
    pub randomize: bool,
    pub pool_size: u32,
    pub pass_percentage: u32,
    /// Optional PNG/JPEG bytes replacing the template's title image.
    pub title_image: Option<Vec<u8>>,
}

/// A finished package plus the warnings collected while producing it.
#[derive(Debug, Clone)]
pub struct GeneratedPackage {
    pub bytes: Vec<u8>,
    pub report: BuildReport,
}

/// Run the whole pipeline: input → mapped nodes → content document →
/// packaged archive. Fatal failures abort with no partial output; per
/// question problems degrade into warnings.
pub fn generate(
    request: &PipelineRequest,
    template_path: &Path,
) -> Result<GeneratedPackage, PipelineError> {
    let input: QuizDocument = serde_json::from_str(&request.questions_json)
        .map_err(|source| PipelineError::MalformedInput { source })?;

    let (questions, report) = map_questions(&input.questions)?;
    tracing::info!(
        questions = questions.len(),
        warnings = report.warnings.len(),
        "mapped question records"
    );

    let spec = DocumentSpec {
        title: request.title.clone(),
        media: request.media.clone(),
        randomize: request.randomize,
        pool_size: request.pool_size,
        pass_percentage: request.pass_percentage,
    };
    let document = build_document(questions, &spec);
    let manifest = PackageManifest::for_quiz(&request.title, request.media.kind);

    let assembler = PackageAssembler::new(template_path);
    let bytes = assembler.assemble(&document, &manifest, request.title_image.as_deref())?;
    tracing::info!(bytes = bytes.len(), "assembled package");

    Ok(GeneratedPackage { bytes, report })
}

/// Map every raw question record. Unknown kinds are skipped with a warning;
/// a record that cannot be mapped is replaced by the `{}` placeholder so one
/// bad question never blocks the rest of the quiz.
fn map_questions(raw: &[Value]) -> Result<(Vec<Value>, BuildReport), PipelineError> {
    let mut report = BuildReport::default();
    let mut questions = Vec::with_capacity(raw.len());

    for (index, value) in raw.iter().enumerate() {
        let record: QuestionRecord = match serde_json::from_value(value.clone()) {
            Ok(record) => record,
            Err(source) => {
                let error = MappingError::InvalidRecord { index, source };
                questions.push(placeholder(&mut report, index, error));
                continue;
            }
        };

        match record {
            QuestionRecord::MultipleChoice(question) => {
                match map_multiple_choice(index, &question) {
                    Ok((node, warnings)) => {
                        for warning in &warnings {
                            tracing::warn!(%warning, "question mapping degraded");
                        }
                        report.warnings.extend(warnings);
                        questions.push(node_value(node)?);
                    }
                    Err(error) => questions.push(placeholder(&mut report, index, error)),
                }
            }
            QuestionRecord::TrueFalse(question) => {
                questions.push(node_value(map_true_false(&question))?);
            }
            QuestionRecord::Unknown => {
                let warning = Warning::UnknownQuestionKind { index };
                tracing::warn!(%warning, "question skipped");
                report.push(warning);
            }
        }
    }

    Ok((questions, report))
}

fn node_value(node: ContentNode) -> Result<Value, PipelineError> {
    serde_json::to_value(&node).map_err(|source| PipelineError::ContentBuild {
        what: "question node",
        source,
    })
}

fn placeholder(report: &mut BuildReport, index: usize, error: MappingError) -> Value {
    tracing::warn!(%error, "question replaced by placeholder");
    report.push(Warning::QuestionReplaced {
        index,
        reason: error.to_string(),
    });
    json!({})
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_supported_kinds_and_skips_unknown_ones() {
        let raw = vec![
            json!({"type": "MultipleChoice", "question": "Q1", "options": []}),
            json!({"type": "Essay", "question": "unsupported"}),
            json!({"type": "TrueFalse", "question": "Q2", "correct_answer": false}),
        ];

        let (questions, report) = map_questions(&raw).expect("mapping runs");

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0]["library"], "H5P.MultiChoice 1.16");
        assert_eq!(questions[1]["library"], "H5P.TrueFalse 1.8");
        assert_eq!(
            report.warnings,
            vec![Warning::UnknownQuestionKind { index: 1 }]
        );
    }

    #[test]
    fn unmappable_record_becomes_placeholder() {
        let raw = vec![
            json!({"type": "MultipleChoice", "question": "ok", "options": [["nested"]]}),
            json!({"type": "TrueFalse", "question": "fine", "correct_answer": true}),
        ];

        let (questions, report) = map_questions(&raw).expect("mapping runs");

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0], json!({}));
        assert_eq!(questions[1]["params"]["correct"], "true");
        assert!(matches!(
            report.warnings.as_slice(),
            [Warning::QuestionReplaced { index: 0, .. }]
        ));
    }

    #[test]
    fn record_without_kind_tag_becomes_placeholder() {
        let raw = vec![json!({"question": "no tag at all"})];
        let (questions, report) = map_questions(&raw).expect("mapping runs");
        assert_eq!(questions, vec![json!({})]);
        assert_eq!(report.warnings.len(), 1);
    }
}
