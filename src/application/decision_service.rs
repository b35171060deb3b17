//! DecisionService - end-to-end analysis of one decision question.
//!
//! Loads the profile context, enhances the question for its decision type,
//! runs the agent and turns the answer into a probability tree. Short
//! answers are rebuilt from the recorded observations; an attempt that still
//! yields too little text is retried after a pause.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::agent_executor::{AgentError, AgentExecutor};
use super::profile_store::{ProfileError, ProfileStore};
use super::tree_generator::TreeGenerator;
use crate::domain::agent::{summarize_observations, DecisionType};
use crate::domain::foundation::Timestamp;
use crate::domain::tree::DecisionNode;

/// Errors raised by [`DecisionService::analyze_decision`].
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision question must not be empty")]
    EmptyQuestion,

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("insufficient analysis ({chars} characters)")]
    InsufficientAnalysis { chars: usize },

    #[error("analysis failed after {attempts} attempts: {last_error}")]
    AttemptsExhausted {
        attempts: u32,
        last_error: Box<DecisionError>,
    },
}

/// Completed analysis of one question.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionAnalysis {
    pub question: String,
    pub analysis: String,
    pub decision_tree: DecisionNode,
    pub decision_type: DecisionType,
    pub timestamp: Timestamp,
}

/// Retry and length thresholds.
#[derive(Debug, Clone)]
pub struct DecisionSettings {
    pub max_attempts: u32,
    pub retry_pause: Duration,
    /// Answers shorter than this are rebuilt from observations.
    pub min_answer_chars: usize,
    /// Analyses shorter than this fail the attempt.
    pub min_analysis_chars: usize,
    pub max_tree_depth: u32,
}

impl Default for DecisionSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_pause: Duration::from_secs(2),
            min_answer_chars: 200,
            min_analysis_chars: 100,
            max_tree_depth: 4,
        }
    }
}

pub struct DecisionService {
    profile_store: Arc<ProfileStore>,
    agent: AgentExecutor,
    tree_generator: TreeGenerator,
    settings: DecisionSettings,
}

impl DecisionService {
    pub fn new(
        profile_store: Arc<ProfileStore>,
        agent: AgentExecutor,
        tree_generator: TreeGenerator,
        settings: DecisionSettings,
    ) -> Self {
        Self {
            profile_store,
            agent,
            tree_generator,
            settings,
        }
    }

    pub fn settings(&self) -> &DecisionSettings {
        &self.settings
    }

    pub fn identify_decision_type(&self, question: &str) -> DecisionType {
        DecisionType::identify(question)
    }

    pub fn enhance_question(&self, question: &str, decision_type: DecisionType) -> String {
        decision_type.enhance_question(question, self.profile_store.locale())
    }

    /// Analyzes a question, retrying failed attempts.
    ///
    /// `max_depth` defaults to the configured tree depth.
    pub async fn analyze_decision(
        &self,
        question: &str,
        max_depth: Option<u32>,
    ) -> Result<DecisionAnalysis, DecisionError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DecisionError::EmptyQuestion);
        }

        let max_depth = max_depth.unwrap_or(self.settings.max_tree_depth);
        let user_context = self.profile_store.context_string().await?;
        let decision_type = self.identify_decision_type(question);
        let enhanced = self.enhance_question(question, decision_type);

        tracing::info!(%decision_type, max_depth, "Analyzing decision");

        let attempts = self.settings.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self
                .attempt(question, &enhanced, &user_context, decision_type)
                .await
            {
                Ok(analysis) => {
                    let decision_tree = self
                        .tree_generator
                        .generate_tree(&user_context, question, &analysis, max_depth, decision_type)
                        .await;

                    return Ok(DecisionAnalysis {
                        question: question.to_string(),
                        analysis,
                        decision_tree,
                        decision_type,
                        timestamp: Timestamp::now(),
                    });
                }
                Err(e) => {
                    tracing::warn!(attempt, attempts, error = %e, "Analysis attempt failed");
                    last_error = Some(e);
                    if attempt < attempts && !self.settings.retry_pause.is_zero() {
                        tokio::time::sleep(self.settings.retry_pause).await;
                    }
                }
            }
        }

        Err(DecisionError::AttemptsExhausted {
            attempts,
            last_error: Box::new(last_error.unwrap_or(DecisionError::InsufficientAnalysis { chars: 0 })),
        })
    }

    async fn attempt(
        &self,
        question: &str,
        enhanced: &str,
        user_context: &str,
        decision_type: DecisionType,
    ) -> Result<String, DecisionError> {
        let outcome = self.agent.run(enhanced, user_context).await?;

        let mut analysis = outcome.output;
        if analysis.chars().count() < self.settings.min_answer_chars {
            tracing::debug!(
                chars = analysis.chars().count(),
                steps = outcome.steps.len(),
                "Answer too short, summarizing observations"
            );
            analysis = summarize_observations(question, &outcome.steps, decision_type);
        }

        let chars = analysis.chars().count();
        if chars < self.settings.min_analysis_chars {
            return Err(DecisionError::InsufficientAnalysis { chars });
        }

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::profile::InMemoryProfileStorage;
    use crate::adapters::tools::{CalculatorTool, ToolSet};
    use crate::application::agent_executor::AgentSettings;
    use crate::domain::foundation::Locale;
    use crate::ports::{AIError, RequestPurpose};

    fn service(provider: &MockAIProvider, settings: DecisionSettings) -> DecisionService {
        let store = Arc::new(ProfileStore::new(
            Arc::new(InMemoryProfileStorage::new()),
            Locale::default(),
        ));
        let agent = AgentExecutor::new(
            Arc::new(provider.clone()),
            ToolSet::new().with(Arc::new(CalculatorTool)),
            AgentSettings::default(),
            Locale::default(),
        );
        let tree_generator = TreeGenerator::new(Arc::new(provider.clone()), Locale::default());
        DecisionService::new(store, agent, tree_generator, settings)
    }

    fn no_pause() -> DecisionSettings {
        DecisionSettings {
            retry_pause: Duration::ZERO,
            ..Default::default()
        }
    }

    fn long_answer() -> String {
        format!(
            "Thought: I now know the final answer\nFinal Answer: {}",
            "Buying the car is reasonable given the stable income. ".repeat(6)
        )
    }

    const TREE: &str = r#"{"id": "root", "description": "Buy a car", "probability": 100,
        "children": [{"id": "a", "description": "Buy", "probability": 70},
                     {"id": "b", "description": "Wait", "probability": 30}]}"#;

    #[tokio::test]
    async fn long_answer_goes_straight_to_tree() {
        let provider = MockAIProvider::new()
            .with_response(long_answer())
            .with_response(TREE);
        let result = service(&provider, no_pause())
            .analyze_decision("Should I buy a car?", Some(2))
            .await
            .unwrap();

        assert_eq!(result.question, "Should I buy a car?");
        assert_eq!(result.decision_type, DecisionType::Financial);
        assert!(result.analysis.starts_with("Buying the car"));
        assert_eq!(result.decision_tree.children.len(), 2);

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0]
            .last_user_message()
            .unwrap()
            .contains("DECISION TO ANALYZE: Should I buy a car?"));
        assert_eq!(calls[1].purpose, RequestPurpose::DecisionTree);
    }

    #[tokio::test]
    async fn short_answer_is_rebuilt_from_observations() {
        let provider = MockAIProvider::new()
            .with_response("Thought: need numbers\nAction: calculator\nAction Input: 15000 * 0.2")
            .with_response("Thought: done\nFinal Answer: Yes.")
            .with_response(TREE);
        let result = service(&provider, no_pause())
            .analyze_decision("Should I buy a car?", None)
            .await
            .unwrap();

        assert!(result.analysis.starts_with("**Decision Analysis: Should I buy a car?**"));
        assert!(result.analysis.contains("Result: 3000"));
    }

    #[tokio::test]
    async fn retries_until_attempts_are_exhausted() {
        let provider = MockAIProvider::new()
            .with_error(MockError::AuthenticationFailed)
            .with_error(MockError::AuthenticationFailed)
            .with_error(MockError::AuthenticationFailed);
        let result = service(&provider, no_pause())
            .analyze_decision("Should I move abroad?", None)
            .await;

        match result {
            Err(DecisionError::AttemptsExhausted { attempts, last_error }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(
                    *last_error,
                    DecisionError::Agent(AgentError::Provider(AIError::AuthenticationFailed))
                ));
            }
            other => panic!("expected exhausted attempts, got {:?}", other),
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn second_attempt_can_succeed() {
        let provider = MockAIProvider::new()
            .with_error(MockError::AuthenticationFailed)
            .with_response(long_answer())
            .with_response(TREE);
        let result = service(&provider, no_pause())
            .analyze_decision("Should I study a master's degree?", None)
            .await
            .unwrap();

        assert_eq!(result.decision_type, DecisionType::Education);
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let provider = MockAIProvider::new();
        let result = service(&provider, no_pause()).analyze_decision("   ", None).await;

        assert!(matches!(result, Err(DecisionError::EmptyQuestion)));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn insufficient_analysis_reports_length() {
        let err = DecisionError::InsufficientAnalysis { chars: 42 };
        assert_eq!(err.to_string(), "insufficient analysis (42 characters)");
    }
}
