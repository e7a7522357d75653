pub mod health_handler;
pub mod quiz_handler;
pub mod session_handler;

use actix_web::web;

use crate::errors::AppError;

pub use health_handler::{health_check, health_check_live};
pub use quiz_handler::refine_quiz;
pub use session_handler::{
    activate_session, clear_active_session, create_session, delete_session, get_active_session,
    get_session, list_sessions, refine_session, reset_session, select_answer, submit_session,
};

/// Registers every route. `/api/sessions/active` is registered ahead of
/// `/api/sessions/{id}` so it is never captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(create_session)
        .service(list_sessions)
        .service(get_active_session)
        .service(clear_active_session)
        .service(get_session)
        .service(delete_session)
        .service(activate_session)
        .service(select_answer)
        .service(submit_session)
        .service(reset_session)
        .service(refine_session)
        .service(refine_quiz);
}

/// JSON extractor settings shared by the server and the integration tests:
/// payloads above `limit` bytes and unparsable bodies become a 400
/// `VALIDATION_ERROR` response.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
