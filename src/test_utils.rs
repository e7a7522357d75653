use crate::models::domain::{Quiz, QuizQuestion, Session};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Four questions whose answers are "A", "B", "C" and "D" in order.
    pub fn four_question_quiz() -> Quiz {
        Quiz::new(
            ["A", "B", "C", "D"]
                .iter()
                .enumerate()
                .map(|(i, answer)| {
                    QuizQuestion::new(
                        format!("Question {}", i + 1),
                        vec!["A".into(), "B".into(), "C".into(), "D".into()],
                        answer.to_string(),
                    )
                })
                .collect(),
        )
    }

    pub fn test_session(file_name: &str) -> Session {
        Session::create(four_question_quiz(), file_name).expect("fixture quiz is non-empty")
    }

    /// Raw model output for a valid two-question quiz, wrapped in a fence.
    pub fn fenced_refinement() -> String {
        concat!(
            "```json\n",
            r#"[{"question":"Refined 1","options":["A","B"],"answer":"A"},"#,
            r#"{"question":"Refined 2","options":["A","B"],"answer":"B"}]"#,
            "\n```"
        )
        .to_string()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::refinement_validator::validate;

    #[test]
    fn test_fixtures_quiz_shape() {
        let quiz = four_question_quiz();
        assert_eq!(quiz.len(), 4);
        assert_eq!(quiz.questions()[3].answer, "D");
    }

    #[test]
    fn test_fixtures_session_starts_unanswered() {
        let session = test_session("fixture.pdf");
        assert_eq!(session.file_name(), "fixture.pdf");
        assert_eq!(session.progress().answered, 0);
    }

    #[test]
    fn test_fixtures_refinement_is_valid() {
        assert_eq!(validate(&fenced_refinement()).map(|q| q.len()), Ok(2));
    }
}
