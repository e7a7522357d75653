use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{GenerateQuizRequest, RefineSessionRequest, SelectAnswerRequest},
        response::{RefineSessionResponse, SessionDto, SessionListResponse, SessionSummaryDto},
    },
};

#[post("/api/sessions")]
pub async fn create_session(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state
        .session_service
        .generate_session(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(SessionDto::from(session)))
}

#[get("/api/sessions")]
pub async fn list_sessions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (sessions, active_session_id) = state.session_service.list_sessions().await?;
    Ok(HttpResponse::Ok().json(SessionListResponse {
        sessions: sessions.iter().map(SessionSummaryDto::from).collect(),
        active_session_id,
    }))
}

#[get("/api/sessions/active")]
pub async fn get_active_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state.session_service.active_session().await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

/// Starts over without deleting anything: no session is active afterwards.
#[delete("/api/sessions/active")]
pub async fn clear_active_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.session_service.clear_active().await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

#[delete("/api/sessions/{id}")]
pub async fn delete_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.session_service.remove_session(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/sessions/{id}/activate")]
pub async fn activate_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.activate_session(&id).await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

#[put("/api/sessions/{id}/answers/{index}")]
pub async fn select_answer(
    state: web::Data<AppState>,
    path: web::Path<(String, usize)>,
    request: web::Json<SelectAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let (id, index) = path.into_inner();
    let session = state
        .session_service
        .select_answer(&id, index, request.into_inner().option)
        .await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

#[post("/api/sessions/{id}/submit")]
pub async fn submit_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.submit(&id).await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

#[post("/api/sessions/{id}/reset")]
pub async fn reset_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.reset(&id).await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

#[post("/api/sessions/{id}/chat")]
pub async fn refine_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<RefineSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let (session, outcome) = state
        .session_service
        .refine_session(&id, &request.message)
        .await?;
    Ok(HttpResponse::Ok().json(RefineSessionResponse {
        session: session.into(),
        outcome,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};

    use super::*;
    use crate::{
        config::Config,
        repositories::{InMemorySessionRepository, SessionRepository},
        services::{
            content_service::MockContentExtractor,
            model_service::{MockQuizGenerator, MockQuizRefiner},
            session_service::SessionService,
        },
        test_utils::{
            fixtures,
            test_helpers::{assert_error_status, assert_success_status},
        },
    };

    async fn state_with(refiner: MockQuizRefiner) -> (AppState, String) {
        let repository = Arc::new(InMemorySessionRepository::new());
        let stored = repository
            .insert(fixtures::test_session("lecture.pdf"))
            .await
            .unwrap();
        let service = SessionService::new(
            repository,
            Arc::new(MockContentExtractor::new()),
            Arc::new(MockQuizGenerator::new()),
            Arc::new(refiner),
            1_000,
        );
        (
            AppState::with_service(Config::test_config(), Arc::new(service)),
            stored.id().to_string(),
        )
    }

    #[actix_web::test]
    async fn test_active_route_is_not_captured_as_id() {
        let (state, _) = state_with(MockQuizRefiner::new()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/sessions/active").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "NOT_FOUND");
        assert_eq!(body["error"], "Not found: No session is active");
    }

    #[actix_web::test]
    async fn test_answer_submit_reset_cycle() {
        let (state, id) = state_with(MockQuizRefiner::new()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/answers/1", id))
            .set_json(serde_json::json!({ "option": "B" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/submit", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "submitted");
        assert_eq!(body["standing"]["correct"], 1);
        assert_eq!(body["standing"]["percentage"], 25.0);

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/answers/0", id))
            .set_json(serde_json::json!({ "option": "A" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/reset", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["isSubmitted"], false);
        assert_eq!(
            body["selectedAnswers"],
            serde_json::json!([null, null, null, null])
        );
    }

    #[actix_web::test]
    async fn test_out_of_range_answer_is_bad_request() {
        let (state, id) = state_with(MockQuizRefiner::new()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/answers/9", id))
            .set_json(serde_json::json!({ "option": "A" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_chat_reports_applied_refinement() {
        let mut refiner = MockQuizRefiner::new();
        refiner
            .expect_refine()
            .times(1)
            .returning(|_, _| Ok(fixtures::fenced_refinement()));
        let (state, id) = state_with(refiner).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/chat", id))
            .set_json(serde_json::json!({ "message": "only two questions" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["outcome"]["status"], "applied");
        assert_eq!(body["session"]["quiz"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["session"]["chatHistory"][0]["role"], "user");
        assert_eq!(body["session"]["chatHistory"][1]["role"], "model");
    }

    #[actix_web::test]
    async fn test_unknown_session_is_an_error() {
        let (state, _) = state_with(MockQuizRefiner::new()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/api/sessions/does-not-exist")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_status(resp.status());
    }
}
