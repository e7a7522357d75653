use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::domain::{
    chat_message::{ChatMessage, ChatRole},
    quiz::Quiz,
};

/// Rejections raised by the session state machine. A rejected transition never
/// modifies the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("A quiz must contain at least one question")]
    EmptyQuiz,

    #[error("Answers are locked until the quiz is reset")]
    AnswersLocked,

    #[error("Question {index} does not exist in a quiz of {total} questions")]
    QuestionOutOfRange { index: usize, total: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Unanswered,
    Submitted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

/// What the progress indicator shows: answered/total before submission,
/// correct/total after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Standing {
    Progress { answered: usize, total: usize },
    Score { correct: usize, total: usize },
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

impl Score {
    pub fn percentage(&self) -> f64 {
        percentage(self.correct, self.total)
    }
}

impl Progress {
    pub fn percentage(&self) -> f64 {
        percentage(self.answered, self.total)
    }
}

impl Standing {
    pub fn percentage(&self) -> f64 {
        match *self {
            Standing::Progress { answered, total } => percentage(answered, total),
            Standing::Score { correct, total } => percentage(correct, total),
        }
    }
}

/// One quiz-taking and refinement conversation over a single piece of source
/// material.
///
/// Fields are private so that `selected_answers.len() == quiz.len()` holds
/// after every transition.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: String,
    file_name: String,
    quiz: Quiz,
    chat_history: Vec<ChatMessage>,
    created_at: DateTime<Utc>,
    selected_answers: Vec<Option<String>>,
    is_submitted: bool,
}

impl Session {
    pub fn create(quiz: Quiz, file_name: &str) -> Result<Self, SessionError> {
        if quiz.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }

        let selected_answers = vec![None; quiz.len()];
        Ok(Session {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            quiz,
            chat_history: Vec::new(),
            created_at: Utc::now(),
            selected_answers,
            is_submitted: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn selected_answers(&self) -> &[Option<String>] {
        &self.selected_answers
    }

    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_submitted {
            SessionStatus::Submitted
        } else {
            SessionStatus::Unanswered
        }
    }

    /// Records `option` for the question at `question_index`. The option is not
    /// checked against the question's options.
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.is_submitted {
            return Err(SessionError::AnswersLocked);
        }

        let total = self.selected_answers.len();
        let slot = self
            .selected_answers
            .get_mut(question_index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question_index,
                total,
            })?;
        *slot = Some(option.into());
        Ok(())
    }

    /// Idempotent.
    pub fn submit(&mut self) {
        self.is_submitted = true;
    }

    pub fn reset(&mut self) {
        self.is_submitted = false;
        self.selected_answers = vec![None; self.quiz.len()];
    }

    /// Only available once the quiz has been submitted.
    pub fn score(&self) -> Option<Score> {
        if !self.is_submitted {
            return None;
        }

        let correct = self
            .quiz
            .iter()
            .zip(&self.selected_answers)
            .filter(|(question, selected)| {
                selected
                    .as_deref()
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count();

        Some(Score {
            correct,
            total: self.quiz.len(),
        })
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.selected_answers.iter().flatten().count(),
            total: self.quiz.len(),
        }
    }

    pub fn standing(&self) -> Standing {
        match self.score() {
            Some(score) => Standing::Score {
                correct: score.correct,
                total: score.total,
            },
            None => {
                let progress = self.progress();
                Standing::Progress {
                    answered: progress.answered,
                    total: progress.total,
                }
            }
        }
    }

    pub fn append_chat(&mut self, role: ChatRole, content: impl Into<String>) {
        self.chat_history.push(ChatMessage::new(role, content));
    }

    /// Swaps in a refined quiz. Answers are cleared to the new length and the
    /// session returns to `Unanswered`, all in the same call.
    pub fn apply_refinement(&mut self, quiz: Quiz) -> Result<(), SessionError> {
        if quiz.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }

        self.selected_answers = vec![None; quiz.len()];
        self.quiz = quiz;
        self.is_submitted = false;
        Ok(())
    }
}
