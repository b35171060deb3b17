//! Integration tests for decision analysis.
//!
//! Runs the agent loop with real tools (search backed by a stub provider)
//! against a scripted mock model, then checks the analysis, the generated
//! tree and its text rendering.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use decision_agent::adapters::ai::MockAIProvider;
use decision_agent::adapters::profile::InMemoryProfileStorage;
use decision_agent::adapters::tools::{
    CalculatorTool, ProbabilityTool, ToolSet, WebSearchTool,
};
use decision_agent::application::{
    AgentExecutor, AgentSettings, DecisionService, DecisionSettings, ProfileStore, StopReason,
    TreeGenerator,
};
use decision_agent::domain::agent::DecisionType;
use decision_agent::domain::foundation::Locale;
use decision_agent::domain::tree::{render_summary, render_tree, to_json, TreeLayout};
use decision_agent::ports::{
    RequestPurpose, SearchError, SearchProvider, SearchResponse, SearchResult,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Search provider returning a canned response and recording queries.
struct StubSearch {
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    fn new() -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(SearchResponse {
            answer: Some("Used compact cars in Lima cost between 35,000 and 50,000 PEN.".to_string()),
            results: vec![SearchResult {
                title: Some("Car prices 2024".to_string()),
                content: Some(
                    "Average price of a used compact car is 42,000 PEN, with insurance \
                     costing around 2,500 PEN per year and a clear benefit for commuters."
                        .to_string(),
                ),
                url: Some("https://example.com/cars".to_string()),
            }],
        })
    }
}

fn build_service(
    provider: &MockAIProvider,
    search: Arc<StubSearch>,
    agent_settings: AgentSettings,
) -> DecisionService {
    let storage = InMemoryProfileStorage::with_document(
        json!({"age": 38, "occupation": "Nurse", "monthly_income": 5200}).to_string(),
    );
    let store = Arc::new(ProfileStore::new(Arc::new(storage), Locale::default()));

    let tools = ToolSet::new()
        .with(Arc::new(WebSearchTool::new(search)))
        .with(Arc::new(CalculatorTool))
        .with(Arc::new(ProbabilityTool));

    let agent = AgentExecutor::new(
        Arc::new(provider.clone()),
        tools,
        agent_settings,
        Locale::default(),
    );
    let tree_generator = TreeGenerator::new(Arc::new(provider.clone()), Locale::default());

    DecisionService::new(
        store,
        agent,
        tree_generator,
        DecisionSettings {
            retry_pause: Duration::ZERO,
            ..Default::default()
        },
    )
}

fn action(tool: &str, input: &str) -> String {
    format!("Thought: I need more data\nAction: {}\nAction Input: {}", tool, input)
}

const TREE: &str = r#"```json
{
  "id": "root",
  "description": "Buy a used car",
  "probability": 100,
  "reasoning": "Financial decision with recurring costs",
  "costs": [{"resource_type": "money", "amount": 42000, "unit": "PEN", "description": "Purchase"}],
  "children": [
    {"id": "opt1", "description": "Buy now with savings", "probability": 60,
     "benefits": [{"resource_type": "time", "amount": 10, "unit": "hours/week", "description": "Commute saved"}]},
    {"id": "opt2", "description": "Keep using public transport", "probability": 20},
    {"id": "opt3", "description": "Finance the purchase", "probability": 20}
  ]
}
```"#;

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn analysis_uses_tools_and_builds_tree() {
    let final_answer = format!(
        "Thought: I now know the final answer\nFinal Answer: {}",
        "With an income of 5,200 PEN and a used car at 42,000 PEN, the purchase takes \
         about eight months of income; insurance adds 2,500 PEN per year. Buying is \
         reasonable if savings cover at least half of the price."
    );
    let provider = MockAIProvider::new().with_responses([
        action("web_search", "used car prices Lima"),
        action("calculator", "42000 / 5200"),
        action("probability_calculator", r#"{"favorable_outcomes": 3, "total_outcomes": 5}"#),
        final_answer,
        TREE.to_string(),
    ]);
    let search = Arc::new(StubSearch::new());
    let service = build_service(&provider, Arc::clone(&search), AgentSettings::default());

    let result = service
        .analyze_decision("Should I buy a used car?", None)
        .await
        .unwrap();

    assert_eq!(result.decision_type, DecisionType::Financial);
    assert!(result.analysis.starts_with("With an income of 5,200 PEN"));
    assert_eq!(*search.queries.lock().unwrap(), vec!["used car prices Lima"]);

    // Profile context and tool observations reach the model
    let calls = provider.get_calls();
    let first_prompt = calls[0].last_user_message().unwrap();
    assert!(first_prompt.contains("Occupation: Nurse"));
    assert!(first_prompt.contains("web_search, calculator, probability_calculator"));

    let fourth_prompt = calls[3].last_user_message().unwrap();
    assert!(fourth_prompt.contains("SUMMARY: Used compact cars in Lima"));
    assert!(fourth_prompt.contains("Observation: Result: 8.0769"));
    assert!(fourth_prompt.contains("Observation: Probability: 60.00%"));

    let tree_call = &calls[4];
    assert_eq!(tree_call.purpose, RequestPurpose::DecisionTree);
    assert!(tree_call.last_user_message().unwrap().contains("Should I buy a used car?"));

    // Tree
    let tree = &result.decision_tree;
    assert_eq!(tree.children.len(), 3);
    assert_eq!(tree.children[0].level, 1);
    assert_eq!(tree.children_probability_total(), 100.0);

    let text = render_tree(tree);
    assert!(text.starts_with("[100.0%] Buy a used car"));
    assert!(text.contains("└─ [60.0%] Buy now with savings"));

    let summary = render_summary(tree);
    assert!(summary.contains("Buy now with savings"));
    assert!(summary.contains(" 60.0%"));

    let layout = TreeLayout::compute(tree);
    assert_eq!(layout.positions().len(), 4);
    assert_eq!(layout.get("opt2").unwrap().y, 1.0);

    let exported: serde_json::Value = serde_json::from_str(&to_json(tree).unwrap()).unwrap();
    assert_eq!(exported["children"][2]["id"], "opt3");
}

#[tokio::test]
async fn exhausted_budget_falls_back_to_observations() {
    let provider = MockAIProvider::new().with_responses([
        action("web_search", "used car prices Lima"),
        action("web_search", "used car prices  lima"),
        "Thought: I should think about this more".to_string(),
        // Forced final answer: too short to keep
        "Final Answer: Maybe.".to_string(),
        // Tree reply without JSON
        "Sorry, I cannot draw a tree.".to_string(),
    ]);
    let search = Arc::new(StubSearch::new());
    let settings = AgentSettings {
        max_iterations: 3,
        ..Default::default()
    };
    let service = build_service(&provider, Arc::clone(&search), settings);

    let result = service
        .analyze_decision("Should I buy a used car?", Some(2))
        .await
        .unwrap();

    // Repeated search was rejected, not executed
    assert_eq!(search.queries.lock().unwrap().len(), 1);

    assert!(result
        .analysis
        .starts_with("**Decision Analysis: Should I buy a used car?**"));
    assert!(result.analysis.contains("**Information Found:**"));
    assert!(result.analysis.contains("Risk factors"));

    let calls = provider.get_calls();
    assert_eq!(calls[3].purpose, RequestPurpose::ForcedAnswer);

    let tree = &result.decision_tree;
    assert_eq!(tree.description, "Decision: Should I buy a used car?");
    assert_eq!(tree.children[0].description, "Proceed with the decision");
    assert_eq!(tree.children[1].probability, 50.0);
}

#[tokio::test]
async fn agent_reports_stop_reason() {
    let provider = MockAIProvider::new().with_responses([
        action("calculator", "2 ** 10"),
        "Final Answer: done".to_string(),
    ]);
    let agent = AgentExecutor::new(
        Arc::new(provider.clone()),
        ToolSet::new().with(Arc::new(CalculatorTool)),
        AgentSettings {
            max_iterations: 1,
            ..Default::default()
        },
        Locale::default(),
    );

    let outcome = agent.run("Q", "ctx").await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::IterationLimit);
    assert_eq!(outcome.steps[0].observation, "Result: 1024");
    assert_eq!(outcome.output, "done");
}
