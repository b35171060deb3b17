//! QuestionnaireService - adaptive profile collection.
//!
//! Each round asks the model for the next question given what has been
//! collected so far. Answers go through a second model call that extracts
//! structured fields; when that reply is unusable the keyword heuristics
//! take over so an answer is never lost.

use std::sync::Arc;
use thiserror::Error;

use super::profile_store::{ProfileError, ProfileStore};
use crate::domain::profile::UserProfile;
use crate::domain::questionnaire::prompts::{
    extraction_user_message, question_system_prompt, EXTRACTION_SYSTEM_PROMPT,
    NEXT_QUESTION_REQUEST,
};
use crate::domain::questionnaire::{
    manual_extract, parse_extraction, AnswerSet, COMPLETION_TOKEN,
};
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestPurpose};

/// Default cap on questions per run.
pub const DEFAULT_MAX_QUESTIONS: usize = 15;

/// Errors raised by the questionnaire.
#[derive(Debug, Error)]
pub enum QuestionnaireError {
    #[error("failed to generate the next question: {0}")]
    Generation(#[from] AIError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Sampling settings for the questionnaire's model calls.
#[derive(Debug, Clone)]
pub struct QuestionnaireSettings {
    pub max_questions: usize,
    pub question_temperature: f32,
    pub extraction_temperature: f32,
    pub max_tokens: u32,
}

impl Default for QuestionnaireSettings {
    fn default() -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            question_temperature: 0.3,
            extraction_temperature: 0.1,
            max_tokens: 1024,
        }
    }
}

/// Drives one questionnaire run.
pub struct QuestionnaireService {
    ai_provider: Arc<dyn AIProvider>,
    profile_store: Arc<ProfileStore>,
    settings: QuestionnaireSettings,
}

impl QuestionnaireService {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        profile_store: Arc<ProfileStore>,
        settings: QuestionnaireSettings,
    ) -> Self {
        Self {
            ai_provider,
            profile_store,
            settings,
        }
    }

    /// Asks the model for the next question.
    ///
    /// Returns `None` once the model signals completion or the question cap
    /// has been reached.
    pub async fn next_question(
        &self,
        answers: &AnswerSet,
    ) -> Result<Option<String>, QuestionnaireError> {
        if answers.answered_count() >= self.settings.max_questions {
            tracing::info!(
                answered = answers.answered_count(),
                "Question limit reached, ending questionnaire"
            );
            return Ok(None);
        }

        let request = CompletionRequest::new(RequestPurpose::NextQuestion)
            .with_system_prompt(question_system_prompt(answers, self.profile_store.locale()))
            .with_message(MessageRole::User, NEXT_QUESTION_REQUEST)
            .with_temperature(self.settings.question_temperature)
            .with_max_tokens(self.settings.max_tokens);

        let response = self.ai_provider.complete(request).await?;
        let question = response.content.trim();

        if question.contains(COMPLETION_TOKEN) {
            tracing::info!(
                answered = answers.answered_count(),
                "Model signalled questionnaire completion"
            );
            return Ok(None);
        }

        Ok(Some(question.to_string()))
    }

    /// Extracts fields from an answer and records it.
    ///
    /// Never fails: model errors and bad replies fall back to keyword
    /// extraction. The verbatim pair is always recorded.
    pub async fn process_answer(&self, question: &str, answer: &str, answers: &mut AnswerSet) {
        let request = CompletionRequest::new(RequestPurpose::Extraction)
            .with_system_prompt(EXTRACTION_SYSTEM_PROMPT)
            .with_message(MessageRole::User, extraction_user_message(question, answer))
            .with_temperature(self.settings.extraction_temperature)
            .with_max_tokens(self.settings.max_tokens);

        let extracted = match self.ai_provider.complete(request).await {
            Ok(response) => match parse_extraction(&response.content) {
                Ok(fields) => fields,
                Err(e) => {
                    tracing::warn!(error = %e, "Unusable extraction reply, using keyword extraction");
                    manual_extract(question, answer)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Extraction call failed, using keyword extraction");
                manual_extract(question, answer)
            }
        };

        tracing::debug!(fields = extracted.len(), "Answer processed");
        answers.merge_extracted(extracted);
        answers.record_response(question, answer);
    }

    /// Persists the collected answers, keeping the stored creation time.
    pub async fn save_to_profile(
        &self,
        answers: &AnswerSet,
    ) -> Result<UserProfile, QuestionnaireError> {
        let existing = self.profile_store.load().await?;
        let mut profile = answers.to_profile(&existing);
        self.profile_store.save(&mut profile).await?;
        Ok(profile)
    }
}
