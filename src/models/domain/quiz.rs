use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizQuestion;

/// An ordered list of questions. Serialized as a bare JSON array, which is also
/// the format exchanged with the model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Quiz(Vec<QuizQuestion>);

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Quiz(questions)
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuizQuestion> {
        self.0.iter()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_serializes_as_bare_array() {
        let quiz = Quiz::new(vec![QuizQuestion::new(
            "2+2?",
            vec!["3".to_string(), "4".to_string()],
            "4",
        )]);

        let json = quiz.to_json().expect("quiz should serialize");

        assert_eq!(json, r#"[{"question":"2+2?","options":["3","4"],"answer":"4"}]"#);
    }

    #[test]
    fn quiz_deserializes_from_bare_array() {
        let quiz: Quiz = serde_json::from_str(
            r#"[{"question":"Q","options":["A","B"],"answer":"A"},
                {"question":"R","options":["C","D"],"answer":"D"}]"#,
        )
        .expect("quiz should deserialize");

        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.get(1).map(|q| q.answer.as_str()), Some("D"));
        assert!(quiz.get(2).is_none());
    }
}
