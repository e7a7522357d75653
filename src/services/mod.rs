pub mod content_service;
pub mod model_service;
pub mod refinement_validator;
pub mod session_service;
pub mod text_helpers;
