use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::InMemorySessionRepository,
    services::{
        content_service::HttpContentExtractor, model_service::OpenAiModelService,
        session_service::SessionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let repository = Arc::new(InMemorySessionRepository::new());
        let extractor = Arc::new(HttpContentExtractor::new(&config)?);
        let model = Arc::new(OpenAiModelService::new(&config));

        let session_service = Arc::new(SessionService::new(
            repository,
            extractor,
            model.clone(),
            model,
            config.max_source_chars,
        ));

        Ok(Self::with_service(config, session_service))
    }

    /// Builds state around an already-wired service, e.g. one backed by fakes.
    pub fn with_service(config: Config, session_service: Arc<SessionService>) -> Self {
        Self {
            session_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_builds_from_config() {
        let state = AppState::new(Config::test_config()).expect("state should build");

        assert_eq!(state.config.quiz_model, "test-model");
    }
}
