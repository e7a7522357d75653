use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use schemars::JsonSchema;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    constants::quiz_prompt::{QUIZ_GENERATION_PROMPT, QUIZ_REFINEMENT_PROMPT},
    errors::{AppError, AppResult},
    models::domain::QuizQuestion,
    services::refinement_validator::strip_code_fence,
};

/// Turns normalized source text into quiz questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> AppResult<Vec<QuizQuestion>>;
}

/// Rewrites a serialized quiz according to a free-text instruction. The result
/// is raw model text and must be validated before use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRefiner: Send + Sync {
    async fn refine(&self, quiz_json: &str, instruction: &str) -> AppResult<String>;
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeneratedQuiz {
    #[serde(rename = "quizQuestions")]
    pub quiz_questions: Vec<QuizQuestion>,
}

pub struct OpenAiModelService {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiModelService {
    pub fn new(config: &Config) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret().to_string());
        if let Some(api_base) = &config.openai_api_base {
            openai_config = openai_config.with_api_base(api_base.clone());
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.quiz_model.clone(),
            timeout: Duration::from_secs(config.model_timeout_secs),
        }
    }

    async fn complete(&self, request: Value) -> AppResult<String> {
        let response: Value =
            tokio::time::timeout(self.timeout, self.client.chat().create_byot(request)).await??;
        message_content(&response)
    }

    fn generation_request(&self, text: &str) -> Value {
        let schema = schemars::schema_for!(GeneratedQuiz);
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": QUIZ_GENERATION_PROMPT },
                { "role": "user", "content": format!("Text: {}", text) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "generated_quiz", "schema": schema }
            }
        })
    }

    fn refinement_request(&self, quiz_json: &str, instruction: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": QUIZ_REFINEMENT_PROMPT },
                {
                    "role": "user",
                    "content": format!("Quiz: {}\n\nMessage: {}", quiz_json, instruction)
                }
            ]
        })
    }
}

#[async_trait]
impl QuizGenerator for OpenAiModelService {
    async fn generate(&self, text: &str) -> AppResult<Vec<QuizQuestion>> {
        log::debug!("Requesting quiz generation from model {}", self.model);
        let content = self.complete(self.generation_request(text)).await?;
        parse_generated_quiz(&content)
    }
}

#[async_trait]
impl QuizRefiner for OpenAiModelService {
    async fn refine(&self, quiz_json: &str, instruction: &str) -> AppResult<String> {
        log::debug!("Requesting quiz refinement from model {}", self.model);
        self.complete(self.refinement_request(quiz_json, instruction))
            .await
    }
}

/// Pulls the assistant text out of a chat-completion response body.
fn message_content(response: &Value) -> AppResult<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::CapabilityError("the model returned no message".to_string()))
}

pub fn parse_generated_quiz(content: &str) -> AppResult<Vec<QuizQuestion>> {
    let generated: GeneratedQuiz = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AppError::GenerationError(format!("unexpected model output: {}", e)))?;
    Ok(generated.quiz_questions)
}
