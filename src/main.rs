//! decision-agent - command-line front end.
//!
//! Collects the user profile through the adaptive questionnaire and runs
//! decision analyses that end in a probability tree.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use decision_agent::adapters::ai::{
    AnthropicConfig, AnthropicProvider, OpenAIConfig, OpenAIProvider,
};
use decision_agent::adapters::profile::{GcsConfig, GcsProfileStorage, LocalProfileStorage};
use decision_agent::adapters::tools::{
    CalculatorTool, ProbabilityTool, TavilyConfig, TavilySearchProvider, ToolSet, WebSearchTool,
};
use decision_agent::application::{
    AgentExecutor, AgentObserver, AgentSettings, DecisionAnalysis, DecisionService,
    DecisionSettings, ProfileStore, QuestionnaireService, QuestionnaireSettings, TreeGenerator,
};
use decision_agent::config::{AiProvider, AppConfig, StorageBackend};
use decision_agent::domain::agent::{AgentAction, AgentFinish, StepFailure};
use decision_agent::domain::foundation::truncate_with_ellipsis;
use decision_agent::domain::questionnaire::AnswerSet;
use decision_agent::domain::tree::{render_summary, render_tree, to_json, to_yaml};
use decision_agent::ports::{AIProvider, ProfileStorage, ToolError};

#[derive(Parser)]
#[command(name = "decision-agent", about = "Decision support agent", version)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the user profile through the adaptive questionnaire.
    Questionnaire {
        /// Run even when a profile already exists.
        #[arg(short, long)]
        force: bool,
    },
    /// Analyze a decision and print its probability tree.
    Analyze {
        /// The decision question, e.g. "Should I change jobs?".
        question: String,
        /// Maximum tree depth.
        #[arg(short, long)]
        depth: Option<u32>,
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Print only the decision tree.
        #[arg(long)]
        tree_only: bool,
    },
    /// Inspect or reset the stored profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the stored profile.
    Show,
    /// Replace the stored profile with an empty one.
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = AppConfig::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Questionnaire { force } => {
            config.validate()?;
            run_questionnaire(&config, force).await
        }
        Commands::Analyze {
            question,
            depth,
            format,
            tree_only,
        } => {
            config.validate()?;
            run_analysis(&config, &question, depth, format, tree_only).await
        }
        Commands::Profile { action } => {
            config.storage.validate()?;
            run_profile(&config, action).await
        }
    }
}

fn init_tracing(json: bool) {
    let noisy_crate_filters = ",hyper=warn,reqwest=warn";
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(_) => {
            let combined = format!(
                "{}{}",
                std::env::var("RUST_LOG").unwrap_or_default(),
                noisy_crate_filters
            );
            tracing_subscriber::EnvFilter::new(combined)
        }
        Err(_) => tracing_subscriber::EnvFilter::new(format!("warn{}", noisy_crate_filters)),
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn AIProvider>> {
    let ai = &config.ai;
    let provider: Arc<dyn AIProvider> = match ai.provider {
        AiProvider::OpenAI => {
            let key = ai
                .openai_api_key
                .as_ref()
                .context("OpenAI API key is not configured")?;
            Arc::new(OpenAIProvider::new(
                OpenAIConfig::new(key.expose_secret().clone())
                    .with_model(&ai.openai_model)
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries),
            )?)
        }
        AiProvider::Anthropic => {
            let key = ai
                .anthropic_api_key
                .as_ref()
                .context("Anthropic API key is not configured")?;
            Arc::new(AnthropicProvider::new(
                AnthropicConfig::new(key.expose_secret().clone())
                    .with_model(&ai.anthropic_model)
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries),
            )?)
        }
    };

    let info = provider.provider_info();
    tracing::info!(
        provider = %info.name,
        model = %info.model,
        max_context_tokens = info.max_context_tokens,
        "AI provider configured"
    );
    Ok(provider)
}

fn build_storage(config: &AppConfig) -> Result<Arc<dyn ProfileStorage>> {
    let storage = &config.storage;
    let backend: Arc<dyn ProfileStorage> = match storage.backend {
        StorageBackend::Local => Arc::new(LocalProfileStorage::new(&storage.local_path)),
        StorageBackend::Gcs => {
            let bucket = storage.bucket.clone().context("storage bucket is not configured")?;
            let mut gcs = GcsConfig::new(bucket, storage.object.clone());
            if let Some(token) = &storage.access_token {
                gcs = gcs.with_access_token(token.expose_secret().clone());
            }
            if let Some(url) = &storage.gcs_base_url {
                gcs = gcs.with_base_url(url.clone());
            }
            Arc::new(GcsProfileStorage::new(gcs)?)
        }
    };
    Ok(backend)
}

fn build_tools(config: &AppConfig) -> Result<ToolSet> {
    let mut tools = ToolSet::new();

    match config.search.api_key() {
        Some(key) => {
            let search = TavilySearchProvider::new(
                TavilyConfig::new(key)
                    .with_base_url(&config.search.base_url)
                    .with_search_depth(&config.search.search_depth)
                    .with_max_results(config.search.max_results)
                    .with_timeout(config.search.timeout()),
            )?;
            tools.register(Arc::new(WebSearchTool::new(Arc::new(search))));
        }
        None => {
            tracing::warn!("Tavily API key not configured, web search is disabled");
        }
    }

    tools.register(Arc::new(CalculatorTool));
    tools.register(Arc::new(ProbabilityTool));
    Ok(tools)
}

fn profile_store(config: &AppConfig) -> Result<Arc<ProfileStore>> {
    Ok(Arc::new(ProfileStore::new(
        build_storage(config)?,
        config.locale.clone(),
    )))
}

async fn run_questionnaire(config: &AppConfig, force: bool) -> Result<()> {
    let store = profile_store(config)?;
    if !force && store.profile_exists().await {
        println!("A profile already exists at {}.", store.location());
        println!("Run `decision-agent questionnaire --force` to answer it again.");
        return Ok(());
    }

    let service = QuestionnaireService::new(
        build_provider(config)?,
        Arc::clone(&store),
        QuestionnaireSettings {
            max_questions: config.questionnaire.max_questions,
            question_temperature: config.ai.questionnaire_temperature,
            ..Default::default()
        },
    );

    println!("Let's get to know you. Type 'exit' to stop early.\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut answers = AnswerSet::new();

    'questions: while let Some(question) = service.next_question(&answers).await? {
        let answer = loop {
            print!("{}\n> ", question);
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break 'questions;
            };
            let line = line.trim().to_string();
            if line.eq_ignore_ascii_case("exit") {
                break 'questions;
            }
            if !line.is_empty() {
                break line;
            }
        };

        service.process_answer(&question, &answer, &mut answers).await;
        println!();
    }

    if answers.is_empty() {
        println!("No answers collected; profile left unchanged.");
        return Ok(());
    }

    let profile = service.save_to_profile(&answers).await?;
    println!("Profile saved to {}.\n", store.location());
    println!("{}", profile.to_context_string(store.locale()));
    Ok(())
}

async fn run_analysis(
    config: &AppConfig,
    question: &str,
    depth: Option<u32>,
    format: OutputFormat,
    tree_only: bool,
) -> Result<()> {
    if let Some(0) = depth {
        bail!("--depth must be at least 1");
    }

    let store = profile_store(config)?;
    if !store.profile_exists().await {
        tracing::warn!("No profile stored; run the questionnaire for personalized analyses");
    }

    let provider = build_provider(config)?;
    let agent = AgentExecutor::new(
        Arc::clone(&provider),
        build_tools(config)?,
        AgentSettings {
            max_iterations: config.agent.max_iterations,
            max_execution_time: config.agent.max_execution_time(),
            temperature: config.ai.agent_temperature,
            max_tokens: config.ai.max_tokens,
        },
        config.locale.clone(),
    );
    let agent = match format {
        OutputFormat::Text if !tree_only => agent.with_observer(Arc::new(ConsoleObserver)),
        _ => agent,
    };

    let tree_generator = TreeGenerator::new(provider, config.locale.clone())
        .with_temperature(config.ai.tree_temperature)
        .with_max_tokens(config.ai.max_tokens);

    let service = DecisionService::new(
        store,
        agent,
        tree_generator,
        DecisionSettings {
            max_attempts: config.agent.max_attempts,
            retry_pause: config.agent.retry_pause(),
            min_answer_chars: config.agent.min_answer_chars,
            min_analysis_chars: config.agent.min_analysis_chars,
            max_tree_depth: config.agent.max_tree_depth,
        },
    );

    let analysis = service.analyze_decision(question, depth).await?;
    print_analysis(&analysis, format, tree_only)
}

fn print_analysis(analysis: &DecisionAnalysis, format: OutputFormat, tree_only: bool) -> Result<()> {
    if tree_only {
        let tree = &analysis.decision_tree;
        match format {
            OutputFormat::Text => println!("{}", render_tree(tree)),
            OutputFormat::Json => println!("{}", to_json(tree)?),
            OutputFormat::Yaml => println!("{}", to_yaml(tree)?),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Text => {
            println!("\n=== Analysis ({}) ===\n", analysis.decision_type);
            println!("{}\n", analysis.analysis);
            println!("=== Decision tree ===\n");
            println!("{}", render_tree(&analysis.decision_tree));
            println!("{}", render_summary(&analysis.decision_tree));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(analysis)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(analysis)?);
        }
    }
    Ok(())
}

async fn run_profile(config: &AppConfig, action: ProfileAction) -> Result<()> {
    let store = profile_store(config)?;
    match action {
        ProfileAction::Show => {
            let profile = store.load().await?;
            if !profile.has_data() {
                println!("No profile stored at {}.", store.location());
                return Ok(());
            }
            println!(
                "Profile at {} (last updated {}):\n",
                store.location(),
                profile.updated_at
            );
            println!("{}", profile.to_context_string(store.locale()));
        }
        ProfileAction::Reset => {
            store.clear().await?;
            println!("Profile at {} reset.", store.location());
        }
    }
    Ok(())
}

/// Prints agent progress as it happens.
struct ConsoleObserver;

impl AgentObserver for ConsoleObserver {
    fn on_agent_action(&self, action: &AgentAction) {
        println!("🔧 {}: {}", action.tool, truncate_with_ellipsis(&action.tool_input, 120));
    }

    fn on_tool_end(&self, _action: &AgentAction, observation: &str) {
        let flattened = observation.replace('\n', " ");
        println!("   ↳ {}", truncate_with_ellipsis(&flattened, 200));
    }

    fn on_tool_error(&self, action: &AgentAction, error: &ToolError) {
        println!("   ⚠️  {} failed: {}", action.tool, error);
    }

    fn on_step_error(&self, failure: &StepFailure, _instruction: &str) {
        println!("   ⚠️  {:?}: {}", failure.category, truncate_with_ellipsis(&failure.message, 120));
    }

    fn on_agent_finish(&self, _finish: &AgentFinish) {
        println!("✅ Analysis complete");
    }
}
