//! Question mappers: pure per-question translation into H5P content nodes.
//!
//! Every string constant in the parameter skeletons below is UI-facing and
//! consumed verbatim by the third-party renderer; none of it may be reworded
//! or dropped.

use serde_json::{Value, json};

use crate::domain::errors::MappingError;
use crate::domain::h5p::{ContentNode, NodeMetadata};
use crate::domain::model::{
    AnswerOption, MultipleChoiceQuestion, TrueFalseQuestion, Warning,
};

const MULTI_CHOICE_LIBRARY: &str = "H5P.MultiChoice 1.16";
const TRUE_FALSE_LIBRARY: &str = "H5P.TrueFalse 1.8";
const MISSING_QUESTION_TEXT: &str = "Keine Frage gestellt.";

/// Map one multiple-choice question into a selection widget node: single
/// answer, single attempt, no retry, randomized option order, full pass
/// threshold. Returns the node plus any non-fatal warnings observed.
pub fn map_multiple_choice(
    index: usize,
    question: &MultipleChoiceQuestion,
) -> Result<(ContentNode, Vec<Warning>), MappingError> {
    let mut warnings = Vec::new();
    let question_text = question
        .question
        .clone()
        .unwrap_or_else(|| MISSING_QUESTION_TEXT.to_owned());

    let answers = match &question.options {
        Value::Array(options) => map_answers(index, options)?,
        Value::Null => Vec::new(),
        _ => {
            warnings.push(Warning::OptionsNotAList {
                index,
                question: question_text.clone(),
            });
            Vec::new()
        }
    };

    let params = json!({
        "question": question_text,
        "answers": answers,
        "behaviour": {
            "singleAnswer": true,
            "enableRetry": false,
            "enableSolutionsButton": false,
            "enableCheckButton": true,
            "type": "auto",
            "singlePoint": false,
            "randomAnswers": true,
            "showSolutionsRequiresInput": true,
            "confirmCheckDialog": false,
            "confirmRetryDialog": false,
            "autoCheck": false,
            "passPercentage": 100,
            "showScorePoints": true
        },
        "media": {
            "disableImageZooming": false
        },
        "overallFeedback": [
            {
                "from": 0,
                "to": 100
            }
        ],
        "UI": {
            "checkAnswerButton": "Überprüfen",
            "submitAnswerButton": "Absenden",
            "showSolutionButton": "Lösung anzeigen",
            "tryAgainButton": "Wiederholen",
            "tipsLabel": "Hinweis anzeigen",
            "scoreBarLabel": "Du hast :num von :total Punkten erreicht.",
            "tipAvailable": "Hinweis verfügbar",
            "feedbackAvailable": "Rückmeldung verfügbar",
            "readFeedback": "Rückmeldung vorlesen",
            "wrongAnswer": "Falsche Antwort",
            "correctAnswer": "Richtige Antwort",
            "shouldCheck": "Hätte gewählt werden müssen",
            "shouldNotCheck": "Hätte nicht gewählt werden sollen",
            "noInput": "Bitte antworte, bevor du die Lösung ansiehst",
            "a11yCheck": "Die Antworten überprüfen. Die Auswahlen werden als richtig, falsch oder fehlend markiert.",
            "a11yShowSolution": "Die Lösung anzeigen. Die richtigen Lösungen werden in der Aufgabe angezeigt.",
            "a11yRetry": "Die Aufgabe wiederholen. Alle Versuche werden zurückgesetzt und die Aufgabe wird erneut gestartet."
        },
        "confirmCheck": {
            "header": "Beenden?",
            "body": "Ganz sicher beenden?",
            "cancelLabel": "Abbrechen",
            "confirmLabel": "Beenden"
        },
        "confirmRetry": {
            "header": "Wiederholen?",
            "body": "Ganz sicher wiederholen?",
            "cancelLabel": "Abbrechen",
            "confirmLabel": "Bestätigen"
        }
    });

    let metadata = NodeMetadata::new("Multiple Choice", "Multiple Choice")
        .with_extra_title("Multiple Choice");
    Ok((
        ContentNode::new(MULTI_CHOICE_LIBRARY, params, metadata),
        warnings,
    ))
}

fn map_answers(index: usize, options: &[Value]) -> Result<Vec<Value>, MappingError> {
    let mut answers = Vec::with_capacity(options.len());
    for (option_index, raw) in options.iter().enumerate() {
        let option: AnswerOption =
            serde_json::from_value(raw.clone()).map_err(|source| MappingError::InvalidOption {
                index,
                option: option_index,
                source,
            })?;
        answers.push(json!({
            "text": option.text,
            "correct": option.is_correct,
            "tipsAndFeedback": {
                "tip": "",
                "chosenFeedback": format!("<div>{}</div>\n", option.feedback),
                "notChosenFeedback": ""
            }
        }));
    }
    Ok(answers)
}

/// Map one true/false question into a binary widget node. The correctness
/// field is serialized as the literal string `"true"` or `"false"`; the
/// target schema rejects booleans here.
pub fn map_true_false(question: &TrueFalseQuestion) -> ContentNode {
    let question_text = question
        .question
        .clone()
        .unwrap_or_else(|| MISSING_QUESTION_TEXT.to_owned());
    let correct = if crate::domain::model::value_is_truthy(&question.correct_answer) {
        "true"
    } else {
        "false"
    };

    let params = json!({
        "question": question_text,
        "correct": correct,
        "behaviour": {
            "enableRetry": false,
            "enableSolutionsButton": false,
            "enableCheckButton": true,
            "confirmCheckDialog": false,
            "confirmRetryDialog": false,
            "autoCheck": false,
            "feedbackOnCorrect": question.feedback_correct,
            "feedbackOnWrong": question.feedback_incorrect
        },
        "media": {
            "disableImageZooming": false
        },
        "l10n": {
            "trueText": "Wahr",
            "falseText": "Falsch",
            "score": "Du hast @score von @total Punkten erreicht.",
            "checkAnswer": "Überprüfen",
            "submitAnswer": "Absenden",
            "showSolutionButton": "Lösung anzeigen",
            "tryAgain": "Wiederholen",
            "wrongAnswerMessage": "Falsche Antwort",
            "correctAnswerMessage": "Richtige Antwort",
            "scoreBarLabel": "Du hast :num von :total Punkten erreicht.",
            "a11yCheck": "Die Antworten überprüfen. Die Antwort wird als richtig, falsch oder unbeantwortet markiert.",
            "a11yShowSolution": "Die Lösung anzeigen. Die richtige Lösung wird in der Aufgabe angezeigt.",
            "a11yRetry": "Die Aufgabe wiederholen. Alle Versuche werden zurückgesetzt, und die Aufgabe wird erneut gestartet."
        },
        "confirmCheck": {
            "header": "Beenden?",
            "body": "Ganz sicher beenden?",
            "cancelLabel": "Abbrechen",
            "confirmLabel": "Beenden"
        },
        "confirmRetry": {
            "header": "Wiederholen?",
            "body": "Ganz sicher wiederholen?",
            "cancelLabel": "Abbrechen",
            "confirmLabel": "Bestätigen"
        }
    });

    let metadata = NodeMetadata::new("True/False Question", "Richtig Falsch")
        .with_extra_title("Richtig Falsch");
    ContentNode::new(TRUE_FALSE_LIBRARY, params, metadata)
}
