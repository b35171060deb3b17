//! TreeGenerator - turns an analysis into a probability tree.

use std::sync::Arc;

use crate::domain::agent::DecisionType;
use crate::domain::foundation::Locale;
use crate::domain::tree::prompt::{render_tree_prompt, TreePromptInput};
use crate::domain::tree::{fallback_tree, parse_tree, repair_json, DecisionNode, TreeError};
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestPurpose};

/// Default sampling temperature for tree generation.
pub const TREE_TEMPERATURE: f32 = 0.2;

/// Asks the model for a JSON tree; never fails.
pub struct TreeGenerator {
    ai_provider: Arc<dyn AIProvider>,
    locale: Locale,
    temperature: f32,
    max_tokens: u32,
}

impl TreeGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>, locale: Locale) -> Self {
        Self {
            ai_provider,
            locale,
            temperature: TREE_TEMPERATURE,
            max_tokens: 8192,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Generates the tree, falling back to a fixed two-option tree when the
    /// model call or the reply is unusable.
    pub async fn generate_tree(
        &self,
        profile_context: &str,
        question: &str,
        analysis: &str,
        max_depth: u32,
        decision_type: DecisionType,
    ) -> DecisionNode {
        match self
            .try_generate(profile_context, question, analysis, max_depth, decision_type)
            .await
        {
            Ok(tree) => {
                tracing::info!(
                    nodes = tree.node_count(),
                    depth = tree.depth(),
                    "Decision tree generated"
                );
                tree
            }
            Err(e) => {
                tracing::warn!(error = %e, "Tree generation failed, using fallback tree");
                fallback_tree(question, decision_type, &self.locale)
            }
        }
    }

    async fn try_generate(
        &self,
        profile_context: &str,
        question: &str,
        analysis: &str,
        max_depth: u32,
        decision_type: DecisionType,
    ) -> Result<DecisionNode, GenerationFailure> {
        let prompt = render_tree_prompt(
            &TreePromptInput {
                profile_context,
                question,
                analysis,
                max_depth,
                decision_type,
            },
            &self.locale,
        );

        let request = CompletionRequest::new(RequestPurpose::DecisionTree)
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.ai_provider.complete(request).await?;
        let json = repair_json(&response.content)?;
        Ok(parse_tree(&json, max_depth)?)
    }
}

#[derive(Debug, thiserror::Error)]
enum GenerationFailure {
    #[error(transparent)]
    Provider(#[from] AIError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
