//! Structural validation of quiz JSON produced by the model.
//!
//! Raw model output is untrusted: it may be wrapped in a Markdown code fence,
//! may not be JSON at all, or may drift from the `question`/`options`/`answer`
//! shape. Nothing reaches a session until it has passed through [`validate`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::domain::{Quiz, QuizQuestion};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)\r?\n?[ \t]*```$")
        .expect("CODE_FENCE is a valid regex pattern")
});

const MIN_OPTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("the model returned an empty response")]
    EmptyInput,

    #[error("the model response is not valid JSON: {0}")]
    Syntax(String),

    #[error("the model response is not a JSON array of questions")]
    NotArray,

    #[error("the model response contains no questions")]
    NoQuestions,

    #[error("question {index} is malformed: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

/// Removes a surrounding ```` ``` ```` fence (with or without a language tag)
/// and surrounding whitespace. Text without a fence is only trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match CODE_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

pub fn validate(raw: &str) -> Result<Quiz, ValidationError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let document: Value =
        serde_json::from_str(body).map_err(|e| ValidationError::Syntax(e.to_string()))?;

    let items = document.as_array().ok_or(ValidationError::NotArray)?;
    if items.is_empty() {
        return Err(ValidationError::NoQuestions);
    }

    let questions = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_question(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Quiz::new(questions))
}

/// Applies the per-question rules to questions that were already deserialized,
/// e.g. from a structured generation response.
pub fn check_questions(questions: &[QuizQuestion]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }
    questions
        .iter()
        .enumerate()
        .try_for_each(|(index, question)| check_cardinality(index, question))
}

fn parse_question(index: usize, item: &Value) -> Result<QuizQuestion, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidQuestion {
        index,
        reason: reason.to_string(),
    };

    let object = item
        .as_object()
        .ok_or_else(|| invalid("expected an object"))?;

    let question = match object.get("question") {
        Some(Value::String(text)) => text.clone(),
        Some(_) => return Err(invalid("`question` must be a string")),
        None => return Err(invalid("missing `question`")),
    };

    let options = match object.get("options") {
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| invalid("`options` must contain only strings"))?,
        Some(_) => return Err(invalid("`options` must be an array")),
        None => return Err(invalid("missing `options`")),
    };

    let answer = match object.get("answer") {
        Some(Value::String(text)) => text.clone(),
        Some(_) => return Err(invalid("`answer` must be a string")),
        None => return Err(invalid("missing `answer`")),
    };

    let parsed = QuizQuestion {
        question,
        options,
        answer,
    };
    check_cardinality(index, &parsed)?;
    Ok(parsed)
}

fn check_cardinality(index: usize, question: &QuizQuestion) -> Result<(), ValidationError> {
    if question.question.trim().is_empty() {
        return Err(ValidationError::InvalidQuestion {
            index,
            reason: "`question` is blank".to_string(),
        });
    }
    if question.options.len() < MIN_OPTIONS {
        return Err(ValidationError::InvalidQuestion {
            index,
            reason: format!(
                "expected at least {} options, found {}",
                MIN_OPTIONS,
                question.options.len()
            ),
        });
    }
    Ok(())
}
