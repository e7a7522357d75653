use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>, // four by convention, not enforced
    pub answer: String,       // should match one of `options` verbatim
}

impl QuizQuestion {
    pub fn new<S: Into<String>>(question: S, options: Vec<String>, answer: S) -> Self {
        QuizQuestion {
            question: question.into(),
            options,
            answer: answer.into(),
        }
    }

    /// Exact, case-sensitive comparison against the expected answer.
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.answer
    }

    pub fn answer_is_an_option(&self) -> bool {
        self.options.iter().any(|option| option == &self.answer)
    }
}
