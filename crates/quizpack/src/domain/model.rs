//! Input-side data model: question records, media references, and the
//! warning channel surfaced alongside every pipeline run.

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::Value;

/// Top-level shape of the user-supplied question document. Individual
/// entries stay untyped here; they are classified per question so that one
/// malformed record cannot poison the whole parse.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizDocument {
    #[serde(default)]
    pub questions: Vec<Value>,
}

/// Closed union over the supported question kinds. Records whose `type` tag
/// matches neither kind deserialize to [`QuestionRecord::Unknown`] and are
/// skipped with a warning rather than rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionRecord {
    MultipleChoice(MultipleChoiceQuestion),
    TrueFalse(TrueFalseQuestion),
    #[serde(other)]
    Unknown,
}

/// A multiple-choice question as supplied by the caller.
///
/// `options` is kept as a raw value: a non-list shape degrades to an empty
/// answer list plus a warning instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct MultipleChoiceQuestion {
    pub question: Option<String>,
    #[serde(default)]
    pub options: Value,
}

/// A true/false question as supplied by the caller. `correct_answer` is kept
/// raw; its truthiness decides the serialized `"true"`/`"false"` literal.
#[derive(Debug, Clone, Deserialize)]
pub struct TrueFalseQuestion {
    pub question: Option<String>,
    #[serde(default)]
    pub correct_answer: Value,
    #[serde(default)]
    pub feedback_correct: String,
    #[serde(default)]
    pub feedback_incorrect: String,
}

/// One entry of a multiple-choice option list. Every field is optional in
/// the input; missing fields fall back to neutral defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerOption {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub feedback: String,
}

/// Kind of media embedded ahead of the question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

/// Media reference supplied by the shell: a URL plus its kind.
#[derive(Debug, Clone)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub url: String,
}

impl MediaRef {
    pub fn video(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            url: url.into(),
        }
    }

    pub fn audio(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Audio,
            url: url.into(),
        }
    }
}

/// Non-fatal conditions observed during a run. The calling layer decides how
/// to surface them; the core never swallows one silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A question carried a kind tag matching no supported mapper.
    UnknownQuestionKind { index: usize },
    /// `options` was present but not a list; the answer list stays empty.
    OptionsNotAList { index: usize, question: String },
    /// A question could not be mapped; a placeholder node was emitted.
    QuestionReplaced { index: usize, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownQuestionKind { index } => {
                write!(f, "question {index}: unrecognized question kind, skipped")
            }
            Warning::OptionsNotAList { index, question } => {
                write!(
                    f,
                    "question {index} ({question}): 'options' is not a list, answers left empty"
                )
            }
            Warning::QuestionReplaced { index, reason } => {
                write!(f, "question {index}: replaced by placeholder: {reason}")
            }
        }
    }
}

/// Aggregated warning report for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub warnings: Vec<Warning>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

/// Python-style truthiness for JSON values, matching how the source data was
/// produced and consumed before reaching this pipeline.
pub fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
