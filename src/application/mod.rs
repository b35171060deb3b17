//! Application layer - services that drive the domain through ports.
//!
//! - `profile_store` - whole-document profile persistence
//! - `questionnaire_service` - adaptive question/extraction cycle
//! - `agent_executor` - the ReAct loop with error recovery
//! - `tree_generator` - probability tree from an analysis
//! - `decision_service` - end-to-end decision analysis with retries

pub mod agent_executor;
pub mod decision_service;
pub mod profile_store;
pub mod questionnaire_service;
pub mod tree_generator;

pub use agent_executor::{
    AgentError, AgentExecutor, AgentObserver, AgentOutcome, AgentSettings, NoopObserver,
    StopReason, STOPPED_OUTPUT,
};
pub use decision_service::{DecisionAnalysis, DecisionError, DecisionService, DecisionSettings};
pub use profile_store::{ProfileError, ProfileStore};
pub use questionnaire_service::{QuestionnaireError, QuestionnaireService, QuestionnaireSettings};
pub use tree_generator::TreeGenerator;
