use std::env;
use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";
const DEFAULT_OEMBED_URL: &str = "https://www.youtube.com/oembed";

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub openai_api_key: SecretString,
    pub openai_api_base: Option<String>,
    pub quiz_model: String,
    pub model_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub max_payload_bytes: usize,
    pub max_source_chars: usize,
    pub transcript_language: String,
    pub youtube_timedtext_url: String,
    pub youtube_oembed_url: String,
    pub cors_allowed_origin: Option<String>,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: parsed_or("WEB_SERVER_PORT", 8080),
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE").ok().filter(|v| !v.is_empty()),
            quiz_model: env::var("QUIZ_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            model_timeout_secs: parsed_or("MODEL_TIMEOUT_SECS", 120),
            fetch_timeout_secs: parsed_or("FETCH_TIMEOUT_SECS", 30),
            max_payload_bytes: parsed_or("MAX_PAYLOAD_BYTES", 20 * 1024 * 1024),
            max_source_chars: parsed_or("MAX_SOURCE_CHARS", 100_000),
            transcript_language: env::var("TRANSCRIPT_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),
            youtube_timedtext_url: env::var("YOUTUBE_TIMEDTEXT_URL")
                .unwrap_or_else(|_| DEFAULT_TIMEDTEXT_URL.to_string()),
            youtube_oembed_url: env::var("YOUTUBE_OEMBED_URL")
                .unwrap_or_else(|_| DEFAULT_OEMBED_URL.to_string()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Refuses to start a production server without model credentials.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        if !self.is_production() {
            return Ok(());
        }

        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::InternalError(
                "FATAL: OPENAI_API_KEY is not set. Quiz generation cannot run without it."
                    .to_string(),
            ));
        }

        if self.cors_allowed_origin.is_none() {
            log::warn!("CORS_ALLOWED_ORIGIN is not set; accepting requests from any origin");
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            openai_api_key: SecretString::from("test-key".to_string()),
            openai_api_base: None,
            quiz_model: "test-model".to_string(),
            model_timeout_secs: 5,
            fetch_timeout_secs: 5,
            max_payload_bytes: 1024 * 1024,
            max_source_chars: 1_000,
            transcript_language: "en".to_string(),
            youtube_timedtext_url: DEFAULT_TIMEDTEXT_URL.to_string(),
            youtube_oembed_url: DEFAULT_OEMBED_URL.to_string(),
            cors_allowed_origin: None,
        }
    }
}
