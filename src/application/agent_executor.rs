//! AgentExecutor - the think/act/observe loop.
//!
//! Every iteration renders the agent template with the scratchpad so far,
//! asks the model for one turn and either finishes, runs a tool, or feeds a
//! corrective instruction back as the observation. Runs are bounded by an
//! iteration cap and a wall-clock cap; when either is hit one last call asks
//! the model to answer from what it has.

use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::adapters::tools::ToolSet;
use crate::domain::agent::{
    parse_output, render_agent_prompt, AgentAction, AgentFinish, AgentPromptInput, AgentStep,
    ErrorPolicy, IntermediateStep, Scratchpad, StepFailure, FORCED_FINAL_SUFFIX,
};
use crate::domain::foundation::Locale;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, RequestPurpose, ToolError,
};

/// Used when the forced final call produces nothing.
pub const STOPPED_OUTPUT: &str = "Agent stopped due to iteration limit or time limit.";

/// Generation stops before the model invents its own observation.
pub const OBSERVATION_STOP: &str = "\nObservation:";

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    FinalAnswer,
    IterationLimit,
    TimeLimit,
}

/// Result of one agent run.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub output: String,
    pub steps: Vec<IntermediateStep>,
    pub stop_reason: StopReason,
    pub iterations: u32,
    pub error_count: u32,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent model call failed: {0}")]
    Provider(#[from] AIError),
}

/// Progress hooks for a running agent. All methods default to no-ops.
pub trait AgentObserver: Send + Sync {
    fn on_agent_action(&self, _action: &AgentAction) {}

    fn on_tool_end(&self, _action: &AgentAction, _observation: &str) {}

    fn on_tool_error(&self, _action: &AgentAction, _error: &ToolError) {}

    fn on_step_error(&self, _failure: &StepFailure, _instruction: &str) {}

    fn on_agent_finish(&self, _finish: &AgentFinish) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}

/// Loop limits and sampling settings.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub max_iterations: u32,
    pub max_execution_time: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: 12,
            max_execution_time: Duration::from_secs(600),
            temperature: 0.1,
            max_tokens: 8192,
        }
    }
}

/// Runs the ReAct loop against a fixed toolset.
pub struct AgentExecutor {
    ai_provider: Arc<dyn AIProvider>,
    tools: ToolSet,
    observer: Arc<dyn AgentObserver>,
    settings: AgentSettings,
    locale: Locale,
}

impl AgentExecutor {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        tools: ToolSet,
        settings: AgentSettings,
        locale: Locale,
    ) -> Self {
        Self {
            ai_provider,
            tools,
            observer: Arc::new(NoopObserver),
            settings,
            locale,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Runs the loop for one (already enhanced) question.
    pub async fn run(&self, input: &str, user_context: &str) -> Result<AgentOutcome, AgentError> {
        let started = Instant::now();
        let listing = self.tools.render_listing();
        let names = self.tools.render_names();
        let mut scratchpad = Scratchpad::new();
        let mut policy = ErrorPolicy::new(self.tools.names());
        let mut iterations = 0;

        let stop_reason = loop {
            if iterations >= self.settings.max_iterations {
                break StopReason::IterationLimit;
            }
            if started.elapsed() >= self.settings.max_execution_time {
                break StopReason::TimeLimit;
            }
            iterations += 1;

            let prompt = render_agent_prompt(
                &AgentPromptInput {
                    user_context,
                    tools: &listing,
                    tool_names: &names,
                    input,
                    agent_scratchpad: &scratchpad.render(),
                },
                &self.locale,
            );

            let text = match self.generate(prompt, RequestPurpose::AgentStep).await {
                Ok(text) => text,
                Err(e) if e.is_retryable() => {
                    tracing::warn!(iteration = iterations, error = %e, "Agent step generation failed");
                    let failure = StepFailure::generation(e.to_string());
                    let instruction = policy.on_failure(&failure);
                    self.observer.on_step_error(&failure, &instruction);
                    scratchpad.record_exception("", instruction);
                    continue;
                }
                Err(e) => {
                    tracing::error!(iteration = iterations, error = %e, "Agent aborted");
                    return Err(AgentError::Provider(e));
                }
            };

            let action = match parse_output(&text) {
                Ok(AgentStep::Finish(finish)) => {
                    tracing::info!(
                        iterations,
                        steps = scratchpad.steps().len(),
                        "Agent produced a final answer"
                    );
                    self.observer.on_agent_finish(&finish);
                    return Ok(AgentOutcome {
                        output: finish.output,
                        steps: scratchpad.into_steps(),
                        stop_reason: StopReason::FinalAnswer,
                        iterations,
                        error_count: policy.total_errors(),
                    });
                }
                Ok(AgentStep::Action(action)) => action,
                Err(e) => {
                    tracing::debug!(iteration = iterations, error = %e, "Unparseable agent output");
                    let failure = StepFailure::parse(&e);
                    let instruction = policy.on_failure(&failure);
                    self.observer.on_step_error(&failure, &instruction);
                    scratchpad.record_exception(e.output(), instruction);
                    continue;
                }
            };

            self.observer.on_agent_action(&action);

            let Some(tool) = self.tools.get(&action.tool) else {
                let failure = StepFailure::invalid_tool(&action.tool);
                let instruction = policy.on_failure(&failure);
                self.observer.on_step_error(&failure, &instruction);
                scratchpad.record_rejection(action, instruction);
                continue;
            };

            if scratchpad.was_executed(&action.tool, &action.tool_input) {
                let failure = StepFailure::repetition(&action.tool, &action.tool_input);
                let instruction = policy.on_failure(&failure);
                self.observer.on_step_error(&failure, &instruction);
                scratchpad.record_rejection(action, instruction);
                continue;
            }

            tracing::debug!(tool = %action.tool, input = %action.tool_input, "Running tool");
            match tool.run(&action.tool_input).await {
                Ok(observation) => {
                    self.observer.on_tool_end(&action, &observation);
                    policy.on_success();
                    scratchpad.record_execution(action, observation);
                }
                Err(e) => {
                    tracing::warn!(tool = %action.tool, error = %e, "Tool failed");
                    self.observer.on_tool_error(&action, &e);
                    scratchpad.record_execution(action, e.to_string());
                }
            }
        };

        tracing::warn!(?stop_reason, iterations, "Agent budget exhausted, forcing a final answer");
        let output = self.force_final_answer(input, user_context, &listing, &names, &scratchpad).await;

        Ok(AgentOutcome {
            output,
            steps: scratchpad.into_steps(),
            stop_reason,
            iterations,
            error_count: policy.total_errors(),
        })
    }

    async fn generate(&self, prompt: String, purpose: RequestPurpose) -> Result<String, AIError> {
        let request = CompletionRequest::new(purpose)
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
            .with_stop(OBSERVATION_STOP);
        Ok(self.ai_provider.complete(request).await?.content)
    }

    /// One last call asking for an answer from the scratchpad.
    async fn force_final_answer(
        &self,
        input: &str,
        user_context: &str,
        listing: &str,
        names: &str,
        scratchpad: &Scratchpad,
    ) -> String {
        let mut prompt = render_agent_prompt(
            &AgentPromptInput {
                user_context,
                tools: listing,
                tool_names: names,
                input,
                agent_scratchpad: &scratchpad.render(),
            },
            &self.locale,
        );
        prompt.push_str(FORCED_FINAL_SUFFIX);

        let text = match self.generate(prompt, RequestPurpose::ForcedAnswer).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Forced final answer failed");
                return STOPPED_OUTPUT.to_string();
            }
        };

        let output = match parse_output(&text) {
            Ok(AgentStep::Finish(finish)) => finish.output,
            _ => text.trim().to_string(),
        };

        if output.trim().is_empty() {
            STOPPED_OUTPUT.to_string()
        } else {
            output
        }
    }
}
