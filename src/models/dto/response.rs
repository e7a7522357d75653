use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{ChatMessage, Quiz, Session, SessionStatus, Standing},
    services::session_service::RefinementOutcome,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingDto {
    #[serde(flatten)]
    pub standing: Standing,
    pub percentage: f64,
}

impl From<Standing> for StandingDto {
    fn from(standing: Standing) -> Self {
        StandingDto {
            percentage: standing.percentage(),
            standing,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub file_name: String,
    pub quiz: Quiz,
    pub chat_history: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub selected_answers: Vec<Option<String>>,
    pub is_submitted: bool,
    pub status: SessionStatus,
    pub standing: StandingDto,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        SessionDto {
            id: session.id().to_string(),
            file_name: session.file_name().to_string(),
            quiz: session.quiz().clone(),
            chat_history: session.chat_history().to_vec(),
            created_at: session.created_at(),
            selected_answers: session.selected_answers().to_vec(),
            is_submitted: session.is_submitted(),
            status: session.status(),
            standing: session.standing().into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryDto {
    pub id: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub question_count: usize,
    pub status: SessionStatus,
}

impl From<&Session> for SessionSummaryDto {
    fn from(session: &Session) -> Self {
        SessionSummaryDto {
            id: session.id().to_string(),
            file_name: session.file_name().to_string(),
            created_at: session.created_at(),
            question_count: session.quiz().len(),
            status: session.status(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummaryDto>,
    pub active_session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefineSessionResponse {
    pub session: SessionDto,
    pub outcome: RefinementOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineQuizResponse {
    pub refined_quiz: Quiz,
    pub outcome: RefinementOutcome,
}
