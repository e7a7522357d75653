use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::domain::SessionError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Could not read the source material: {0}")]
    ExtractionError(String),

    #[error("Could not generate a quiz: {0}")]
    GenerationError(String),

    #[error("The quiz model could not be reached: {0}")]
    CapabilityError(String),

    #[error("A refinement is already in progress for session '{0}'")]
    RefinementInProgress(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Session(SessionError::EmptyQuiz) => "EMPTY_QUIZ",
            AppError::Session(SessionError::AnswersLocked) => "ANSWERS_LOCKED",
            AppError::Session(SessionError::QuestionOutOfRange { .. }) => "QUESTION_OUT_OF_RANGE",
            AppError::ExtractionError(_) => "EXTRACTION_ERROR",
            AppError::GenerationError(_) => "GENERATION_ERROR",
            AppError::CapabilityError(_) => "CAPABILITY_ERROR",
            AppError::RefinementInProgress(_) => "REFINEMENT_IN_PROGRESS",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::EmptyQuiz) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Session(SessionError::AnswersLocked) => StatusCode::CONFLICT,
            AppError::Session(SessionError::QuestionOutOfRange { .. }) => StatusCode::BAD_REQUEST,
            AppError::ExtractionError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::GenerationError(_) => StatusCode::BAD_GATEWAY,
            AppError::CapabilityError(_) => StatusCode::BAD_GATEWAY,
            AppError::RefinementInProgress(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            kind: self.error_code(),
        })
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::CapabilityError(err.to_string())
    }
}
impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::CapabilityError("the model did not answer in time".to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
