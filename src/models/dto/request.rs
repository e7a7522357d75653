use serde::Deserialize;
use validator::Validate;

use crate::models::domain::Quiz;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Base64-encoded PDF bytes.
    File,
    Url,
    Text,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    pub input_type: InputType,

    #[validate(length(min = 1, message = "data must not be empty"))]
    pub data: String,

    /// Blank names fall back to the default title for the source kind.
    #[validate(length(max = 255))]
    pub file_name: Option<String>,
}

/// Any string is accepted, including the empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectAnswerRequest {
    pub option: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefineSessionRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefineQuizRequest {
    pub current_quiz: Quiz,

    #[validate(length(min = 1, max = 4000))]
    pub user_message: String,
}
