pub mod chat_message;
pub mod quiz;
pub mod quiz_question;
pub mod session;
pub use chat_message::{ChatMessage, ChatRole};
pub use quiz::Quiz;
pub use quiz_question::QuizQuestion;
pub use session::{Progress, Score, Session, SessionError, SessionStatus, Standing};
