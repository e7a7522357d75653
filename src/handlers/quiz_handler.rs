use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{request::RefineQuizRequest, response::RefineQuizResponse},
};

/// Refines a quiz the caller holds. Nothing is stored.
#[post("/api/quizzes/refine")]
pub async fn refine_quiz(
    state: web::Data<AppState>,
    request: web::Json<RefineQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let (refined_quiz, outcome) = state
        .session_service
        .refine_quiz(request.current_quiz, &request.user_message)
        .await?;
    Ok(HttpResponse::Ok().json(RefineQuizResponse {
        refined_quiz,
        outcome,
    }))
}
