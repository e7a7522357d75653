use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use serde::Serialize;
use validator::Validate;

use crate::{
    constants::quiz_prompt::{
        DEFAULT_DOCUMENT_TITLE, DEFAULT_VIDEO_TITLE, DEFAULT_WEBSITE_TITLE, PASTED_TEXT_LABEL,
        REFINEMENT_ACKNOWLEDGEMENT,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{ChatRole, Quiz, Session, SessionError},
        dto::request::{GenerateQuizRequest, InputType},
    },
    repositories::SessionRepository,
    services::{
        content_service::{ContentExtractor, SourceKind},
        model_service::{QuizGenerator, QuizRefiner},
        refinement_validator::{self, check_questions},
        text_helpers::{truncate_chars, youtube_video_id},
    },
};

/// What happened to the quiz after a refinement request. A rejected refinement
/// leaves the quiz exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RefinementOutcome {
    Applied,
    Rejected { reason: String },
}

pub fn source_kind(input_type: InputType, data: &str) -> SourceKind {
    match input_type {
        InputType::File => SourceKind::Pdf,
        InputType::Text => SourceKind::Text,
        InputType::Url if youtube_video_id(data).is_some() => SourceKind::YouTube,
        InputType::Url => SourceKind::WebPage,
    }
}

/// Picks the session label. URL sources prefer the title found while
/// extracting; every source falls back to a fixed label.
fn display_label(kind: SourceKind, file_name: Option<&str>, title: Option<String>) -> String {
    let file_name = file_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    match kind {
        SourceKind::Pdf => file_name.unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string()),
        SourceKind::Text => file_name.unwrap_or_else(|| PASTED_TEXT_LABEL.to_string()),
        SourceKind::WebPage => title
            .or(file_name)
            .unwrap_or_else(|| DEFAULT_WEBSITE_TITLE.to_string()),
        SourceKind::YouTube => title
            .or(file_name)
            .unwrap_or_else(|| DEFAULT_VIDEO_TITLE.to_string()),
    }
}

/// Releases the per-session refinement flag however the refinement ends.
struct RefinementGuard<'a> {
    refining: &'a Mutex<HashSet<String>>,
    session_id: String,
}

impl Drop for RefinementGuard<'_> {
    fn drop(&mut self) {
        self.refining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session_id);
    }
}

pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    extractor: Arc<dyn ContentExtractor>,
    generator: Arc<dyn QuizGenerator>,
    refiner: Arc<dyn QuizRefiner>,
    max_source_chars: usize,
    refining: Mutex<HashSet<String>>,
    // serializes read-modify-write cycles on stored sessions
    writes: tokio::sync::Mutex<()>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        extractor: Arc<dyn ContentExtractor>,
        generator: Arc<dyn QuizGenerator>,
        refiner: Arc<dyn QuizRefiner>,
        max_source_chars: usize,
    ) -> Self {
        Self {
            repository,
            extractor,
            generator,
            refiner,
            max_source_chars,
            refining: Mutex::new(HashSet::new()),
            writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Extracts the source, asks the model for a quiz and stores the result as
    /// the new active session. Nothing is stored when any step fails.
    pub async fn generate_session(&self, request: GenerateQuizRequest) -> AppResult<Session> {
        request.validate()?;

        let kind = source_kind(request.input_type, &request.data);
        let content = self.extractor.extract(kind, &request.data).await?;

        let text = truncate_chars(&content.text, self.max_source_chars);
        if text.len() < content.text.len() {
            log::info!(
                "Source text truncated to {} characters before generation",
                self.max_source_chars
            );
        }

        let questions = self.generator.generate(text).await.inspect_err(|e| {
            log::error!("Quiz generation failed: {}", e);
        })?;
        check_questions(&questions).map_err(|e| AppError::GenerationError(e.to_string()))?;

        let label = display_label(kind, request.file_name.as_deref(), content.title);
        let session = Session::create(Quiz::new(questions), &label)?;

        let session = self.repository.insert(session).await?;
        self.repository.set_active(Some(session.id())).await?;

        log::info!(
            "Created session {} '{}' with {} questions from {:?}",
            session.id(),
            session.file_name(),
            session.quiz().len(),
            kind
        );
        Ok(session)
    }

    pub async fn list_sessions(&self) -> AppResult<(Vec<Session>, Option<String>)> {
        let sessions = self.repository.list().await?;
        let active = self.repository.active_id().await?;
        Ok((sessions, active))
    }

    pub async fn get_session(&self, id: &str) -> AppResult<Session> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))
    }

    pub async fn active_session(&self) -> AppResult<Session> {
        let id = self
            .repository
            .active_id()
            .await?
            .ok_or_else(|| AppError::NotFound("No session is active".to_string()))?;
        self.get_session(&id).await
    }

    pub async fn activate_session(&self, id: &str) -> AppResult<Session> {
        self.repository.set_active(Some(id)).await?;
        self.get_session(id).await
    }

    /// Leaves every session stored; only the active pointer is cleared.
    pub async fn clear_active(&self) -> AppResult<()> {
        self.repository.set_active(None).await
    }

    pub async fn remove_session(&self, id: &str) -> AppResult<()> {
        let _write = self.writes.lock().await;
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!("Session with id '{}' not found", id)));
        }
        log::info!("Removed session {}", id);
        Ok(())
    }

    pub async fn select_answer(
        &self,
        id: &str,
        question_index: usize,
        option: String,
    ) -> AppResult<Session> {
        self.modify(id, move |session| Ok(session.select_answer(question_index, option)?))
            .await
    }

    pub async fn submit(&self, id: &str) -> AppResult<Session> {
        self.modify(id, |session| {
            session.submit();
            Ok(())
        })
        .await
    }

    pub async fn reset(&self, id: &str) -> AppResult<Session> {
        self.modify(id, |session| {
            session.reset();
            Ok(())
        })
        .await
    }

    /// Runs one conversational refinement against a stored session.
    ///
    /// The user's message is recorded before the model is called and stays
    /// recorded whatever the outcome. Model output that fails validation leaves
    /// the quiz untouched and is reported as [`RefinementOutcome::Rejected`];
    /// a failing model call is returned as an error.
    pub async fn refine_session(
        &self,
        id: &str,
        instruction: &str,
    ) -> AppResult<(Session, RefinementOutcome)> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(AppError::ValidationError(
                "message must not be empty".to_string(),
            ));
        }

        let _guard = self.begin_refinement(id)?;

        let session = self
            .modify(id, |session| {
                session.append_chat(ChatRole::User, instruction);
                Ok(())
            })
            .await?;
        let quiz_json = session.quiz().to_json()?;

        let raw = self
            .refiner
            .refine(&quiz_json, instruction)
            .await
            .inspect_err(|e| log::error!("Refinement of session {} failed: {}", id, e))?;

        match refinement_validator::validate(&raw) {
            Ok(quiz) => {
                let question_count = quiz.len();
                let session = self
                    .modify(id, move |session| {
                        session.apply_refinement(quiz)?;
                        session.append_chat(ChatRole::Model, REFINEMENT_ACKNOWLEDGEMENT);
                        Ok(())
                    })
                    .await?;
                log::info!(
                    "Applied refinement to session {} ({} questions)",
                    id,
                    question_count
                );
                Ok((session, RefinementOutcome::Applied))
            }
            Err(rejection) => {
                log::warn!("Discarded refinement for session {}: {}", id, rejection);
                let session = self.get_session(id).await?;
                Ok((
                    session,
                    RefinementOutcome::Rejected {
                        reason: rejection.to_string(),
                    },
                ))
            }
        }
    }

    /// Refines a quiz that is not stored anywhere. A rejected refinement hands
    /// back `current_quiz` unchanged.
    pub async fn refine_quiz(
        &self,
        current_quiz: Quiz,
        message: &str,
    ) -> AppResult<(Quiz, RefinementOutcome)> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::ValidationError(
                "userMessage must not be empty".to_string(),
            ));
        }
        if current_quiz.is_empty() {
            return Err(SessionError::EmptyQuiz.into());
        }

        let raw = self
            .refiner
            .refine(&current_quiz.to_json()?, message)
            .await
            .inspect_err(|e| log::error!("Quiz refinement failed: {}", e))?;

        match refinement_validator::validate(&raw) {
            Ok(refined) => Ok((refined, RefinementOutcome::Applied)),
            Err(rejection) => {
                log::warn!("Discarded quiz refinement: {}", rejection);
                Ok((
                    current_quiz,
                    RefinementOutcome::Rejected {
                        reason: rejection.to_string(),
                    },
                ))
            }
        }
    }

    fn begin_refinement(&self, id: &str) -> AppResult<RefinementGuard<'_>> {
        let mut refining = self
            .refining
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !refining.insert(id.to_string()) {
            return Err(AppError::RefinementInProgress(id.to_string()));
        }

        Ok(RefinementGuard {
            refining: &self.refining,
            session_id: id.to_string(),
        })
    }

    async fn modify<F>(&self, id: &str, change: F) -> AppResult<Session>
    where
        F: FnOnce(&mut Session) -> AppResult<()> + Send,
    {
        let _write = self.writes.lock().await;
        let mut session = self.get_session(id).await?;
        change(&mut session)?;
        self.repository.update(session).await
    }
}
