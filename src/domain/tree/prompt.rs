//! Prompt asking the model for a JSON probability tree.

use crate::domain::agent::DecisionType;
use crate::domain::foundation::{truncate_chars, Locale};

/// Characters of the analysis included in the tree prompt.
pub const ANALYSIS_EXCERPT_CHARS: usize = 500;

/// Inputs to the tree prompt.
#[derive(Debug, Clone)]
pub struct TreePromptInput<'a> {
    pub profile_context: &'a str,
    pub question: &'a str,
    pub analysis: &'a str,
    pub max_depth: u32,
    pub decision_type: DecisionType,
}

pub fn render_tree_prompt(input: &TreePromptInput<'_>, locale: &Locale) -> String {
    format!(
        r#"Generate a JSON decision tree for this situation.

CONTEXT: {context}
DECISION TYPE: {decision_type}
FOCUS: {focus}
QUESTION: {question}
PRIOR ANALYSIS: {analysis}

Generate JSON with EXACTLY this structure:
{{
  "id": "root",
  "description": "clear description of the decision",
  "probability": 100,
  "costs": [
    {{"resource_type": "money", "amount": 10000, "unit": "{currency}", "description": "description"}}
  ],
  "benefits": [
    {{"resource_type": "money", "amount": 2000, "unit": "{currency}/month", "description": "description"}}
  ],
  "level": 0,
  "reasoning": "reasoning for this decision",
  "children": [
    {{
      "id": "opt1",
      "description": "First option",
      "probability": 40,
      "costs": [],
      "benefits": [],
      "level": 1,
      "reasoning": "why this option",
      "children": []
    }},
    {{
      "id": "opt2",
      "description": "Second option",
      "probability": 35,
      "costs": [],
      "benefits": [],
      "level": 1,
      "reasoning": "why this option",
      "children": []
    }},
    {{
      "id": "opt3",
      "description": "Third option",
      "probability": 25,
      "costs": [],
      "benefits": [],
      "level": 1,
      "reasoning": "why this option",
      "children": []
    }}
  ]
}}

Valid resource_type values: money, time, energy, health, stress, wellbeing, reputation, relationships, family, network, career, education, experience, skills, knowledge, credentials, opportunity, quality_of_life, freedom, flexibility, security, stability, savings, debt, investment, net_worth, risk, uncertainty, other

IMPORTANT:
- Children probabilities must add up to 100%
- Use {currency} for monetary values
- At most {max_depth} levels deep
- Include costs and benefits relevant to the decision type
- Return only the JSON, with no additional text"#,
        context = input.profile_context,
        decision_type = input.decision_type,
        focus = input.decision_type.tree_focus(),
        question = input.question,
        analysis = truncate_chars(input.analysis, ANALYSIS_EXCERPT_CHARS),
        currency = locale.currency,
        max_depth = input.max_depth,
    )
}
