//! Decision tree node types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource a cost or benefit is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ResourceType {
    // Tangible
    Money,
    Time,
    // Personal
    Energy,
    Health,
    Stress,
    Wellbeing,
    // Social
    Reputation,
    Relationships,
    Family,
    Network,
    // Professional
    Career,
    Education,
    Experience,
    Skills,
    Knowledge,
    Credentials,
    // Strategic
    Opportunity,
    QualityOfLife,
    Freedom,
    Flexibility,
    Security,
    Stability,
    // Financial
    Savings,
    Debt,
    Investment,
    NetWorth,
    // Other
    Risk,
    Uncertainty,
    Other,
}

impl ResourceType {
    /// Every variant, in declaration order.
    pub const ALL: [ResourceType; 29] = [
        ResourceType::Money,
        ResourceType::Time,
        ResourceType::Energy,
        ResourceType::Health,
        ResourceType::Stress,
        ResourceType::Wellbeing,
        ResourceType::Reputation,
        ResourceType::Relationships,
        ResourceType::Family,
        ResourceType::Network,
        ResourceType::Career,
        ResourceType::Education,
        ResourceType::Experience,
        ResourceType::Skills,
        ResourceType::Knowledge,
        ResourceType::Credentials,
        ResourceType::Opportunity,
        ResourceType::QualityOfLife,
        ResourceType::Freedom,
        ResourceType::Flexibility,
        ResourceType::Security,
        ResourceType::Stability,
        ResourceType::Savings,
        ResourceType::Debt,
        ResourceType::Investment,
        ResourceType::NetWorth,
        ResourceType::Risk,
        ResourceType::Uncertainty,
        ResourceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Money => "money",
            ResourceType::Time => "time",
            ResourceType::Energy => "energy",
            ResourceType::Health => "health",
            ResourceType::Stress => "stress",
            ResourceType::Wellbeing => "wellbeing",
            ResourceType::Reputation => "reputation",
            ResourceType::Relationships => "relationships",
            ResourceType::Family => "family",
            ResourceType::Network => "network",
            ResourceType::Career => "career",
            ResourceType::Education => "education",
            ResourceType::Experience => "experience",
            ResourceType::Skills => "skills",
            ResourceType::Knowledge => "knowledge",
            ResourceType::Credentials => "credentials",
            ResourceType::Opportunity => "opportunity",
            ResourceType::QualityOfLife => "quality_of_life",
            ResourceType::Freedom => "freedom",
            ResourceType::Flexibility => "flexibility",
            ResourceType::Security => "security",
            ResourceType::Stability => "stability",
            ResourceType::Savings => "savings",
            ResourceType::Debt => "debt",
            ResourceType::Investment => "investment",
            ResourceType::NetWorth => "net_worth",
            ResourceType::Risk => "risk",
            ResourceType::Uncertainty => "uncertainty",
            ResourceType::Other => "other",
        }
    }

    /// Parses a resource name, accepting Spanish aliases.
    ///
    /// Unknown names map to [`ResourceType::Other`].
    pub fn parse_lenient(name: &str) -> Self {
        let normalized = name.trim().to_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
        if let Some(found) = Self::ALL.iter().find(|r| r.as_str() == normalized) {
            return *found;
        }
        match normalized.as_str() {
            "dinero" => ResourceType::Money,
            "tiempo" => ResourceType::Time,
            "energia" | "energía" => ResourceType::Energy,
            "salud" => ResourceType::Health,
            "estres" | "estrés" => ResourceType::Stress,
            "bienestar" | "well_being" => ResourceType::Wellbeing,
            "reputacion" | "reputación" => ResourceType::Reputation,
            "relaciones" => ResourceType::Relationships,
            "familia" => ResourceType::Family,
            "red_contactos" | "contacts" => ResourceType::Network,
            "carrera" => ResourceType::Career,
            "educacion" | "educación" => ResourceType::Education,
            "experiencia" => ResourceType::Experience,
            "habilidades" => ResourceType::Skills,
            "conocimiento" => ResourceType::Knowledge,
            "credenciales" => ResourceType::Credentials,
            "oportunidad" => ResourceType::Opportunity,
            "calidad_vida" | "calidad_de_vida" => ResourceType::QualityOfLife,
            "libertad" => ResourceType::Freedom,
            "flexibilidad" => ResourceType::Flexibility,
            "seguridad" => ResourceType::Security,
            "estabilidad" => ResourceType::Stability,
            "ahorros" => ResourceType::Savings,
            "deuda" => ResourceType::Debt,
            "inversion" | "inversión" => ResourceType::Investment,
            "patrimonio" => ResourceType::NetWorth,
            "riesgo" => ResourceType::Risk,
            "incertidumbre" => ResourceType::Uncertainty,
            _ => ResourceType::Other,
        }
    }

    /// Icon shown next to costs and benefits of this kind.
    pub fn icon(&self) -> &'static str {
        match self {
            ResourceType::Money => "💰",
            ResourceType::Time => "⏰",
            ResourceType::Energy => "⚡",
            ResourceType::Health => "❤️",
            ResourceType::Stress => "😰",
            ResourceType::Wellbeing => "😊",
            ResourceType::Reputation => "⭐",
            ResourceType::Relationships => "👥",
            ResourceType::Family => "👨‍👩‍👧",
            ResourceType::Network => "🤝",
            ResourceType::Career => "📈",
            ResourceType::Education => "🎓",
            ResourceType::Experience => "💼",
            ResourceType::Skills => "🛠️",
            ResourceType::Knowledge => "📚",
            ResourceType::Credentials => "📜",
            ResourceType::Opportunity => "🚪",
            ResourceType::QualityOfLife => "🌟",
            ResourceType::Freedom => "🕊️",
            ResourceType::Flexibility => "🤸",
            ResourceType::Security => "🛡️",
            ResourceType::Stability => "⚓",
            ResourceType::Savings => "🏦",
            ResourceType::Debt => "💳",
            ResourceType::Investment => "📊",
            ResourceType::NetWorth => "🏠",
            ResourceType::Risk => "⚠️",
            ResourceType::Uncertainty => "❓",
            ResourceType::Other => "📌",
        }
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cost or benefit attached to a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub resource_type: ResourceType,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Cost {
    pub fn new(
        resource_type: ResourceType,
        amount: f64,
        unit: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            resource_type,
            amount,
            unit: unit.into(),
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
        }
    }

    /// Description, or the resource name when none was given.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or_else(|| self.resource_type.as_str())
    }
}

/// A scenario in the decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    pub id: String,
    pub description: String,
    /// Probability in percent, 0..=100.
    pub probability: f64,
    #[serde(default)]
    pub costs: Vec<Cost>,
    #[serde(default)]
    pub benefits: Vec<Cost>,
    #[serde(default)]
    pub children: Vec<DecisionNode>,
    /// Depth of this node; the root is level 0.
    #[serde(default)]
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl DecisionNode {
    /// Creates a childless node with no costs or benefits.
    pub fn leaf(
        id: impl Into<String>,
        description: impl Into<String>,
        probability: f64,
        level: u32,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            probability,
            costs: Vec::new(),
            benefits: Vec::new(),
            children: Vec::new(),
            level,
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DecisionNode::node_count).sum::<usize>()
    }

    /// Number of levels below this node.
    pub fn depth(&self) -> u32 {
        self.children
            .iter()
            .map(|c| 1 + c.depth())
            .max()
            .unwrap_or(0)
    }

    /// Sum of the direct children's probabilities.
    pub fn children_probability_total(&self) -> f64 {
        self.children.iter().map(|c| c.probability).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_29_distinct_names() {
        let names: std::collections::HashSet<_> =
            ResourceType::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names.len(), 29);
    }

    #[test]
    fn parse_lenient_accepts_english_spanish_and_unknown() {
        assert_eq!(ResourceType::parse_lenient("Money"), ResourceType::Money);
        assert_eq!(ResourceType::parse_lenient("quality of life"), ResourceType::QualityOfLife);
        assert_eq!(ResourceType::parse_lenient("dinero"), ResourceType::Money);
        assert_eq!(ResourceType::parse_lenient("calidad_vida"), ResourceType::QualityOfLife);
        assert_eq!(ResourceType::parse_lenient("red_contactos"), ResourceType::Network);
        assert_eq!(ResourceType::parse_lenient("karma"), ResourceType::Other);
    }

    #[test]
    fn resource_type_serializes_snake_case_and_reads_aliases() {
        assert_eq!(
            serde_json::to_string(&ResourceType::NetWorth).unwrap(),
            "\"net_worth\""
        );
        let parsed: ResourceType = serde_json::from_str("\"patrimonio\"").unwrap();
        assert_eq!(parsed, ResourceType::NetWorth);
    }

    #[test]
    fn cost_label_falls_back_to_resource_name() {
        let cost = Cost::new(ResourceType::Time, 6.0, "months", "");
        assert_eq!(cost.label(), "time");

        let cost = Cost::new(ResourceType::Money, 100.0, "PEN", "tuition");
        assert_eq!(cost.label(), "tuition");
    }

    #[test]
    fn node_metrics() {
        let mut root = DecisionNode::leaf("root", "Decide", 100.0, 0);
        let mut child = DecisionNode::leaf("a", "A", 60.0, 1);
        child.children.push(DecisionNode::leaf("a1", "A1", 100.0, 2));
        root.children.push(child);
        root.children.push(DecisionNode::leaf("b", "B", 40.0, 1));

        assert_eq!(root.node_count(), 4);
        assert_eq!(root.depth(), 2);
        assert_eq!(root.children_probability_total(), 100.0);
        assert!(!root.is_leaf());
    }
}
