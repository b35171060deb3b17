//! Decision type detection and question enhancement.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Locale;

/// Broad category of a decision question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    Financial,
    Career,
    Education,
    Personal,
    Technology,
    General,
}

/// Categories in detection order with their keywords (English and Spanish).
const KEYWORDS: &[(DecisionType, &[&str])] = &[
    (
        DecisionType::Financial,
        &[
            "money", "invest", "buy", "sell", "loan", "saving", "debt", "salary", "cost",
            "price", "pay", "spend", "bank", "credit", "mortgage", "dinero", "invertir",
            "comprar", "vender", "préstamo", "ahorro", "deuda", "sueldo", "salario", "costo",
            "precio", "pagar", "gastar", "ahorrar", "banco", "crédito",
        ],
    ),
    (
        DecisionType::Career,
        &[
            "job", "work", "employ", "company", "boss", "position", "career", "profession",
            "business", "entrepreneur", "quit", "resign", "promotion", "contract", "trabajo",
            "empleo", "empresa", "jefe", "cargo", "puesto", "carrera", "profesión", "negocio",
            "emprender", "renunciar", "ascenso", "promoción", "contrato",
        ],
    ),
    (
        DecisionType::Education,
        &[
            "study", "course", "university", "master", "degree", "certification", "learn",
            "training", "diploma", "postgraduate", "phd", "doctorate", "mba", "estudiar",
            "curso", "universidad", "maestría", "certificación", "aprender", "capacitación",
            "título", "posgrado", "doctorado", "especialización",
        ],
    ),
    (
        DecisionType::Personal,
        &[
            "move", "moving", "house", "family", "child", "partner", "relationship", "health",
            "travel", "live", "marriage", "divorce", "pet", "home", "apartment", "mudanza",
            "casa", "familia", "hijo", "pareja", "relación", "salud", "viajar", "vivir",
            "matrimonio", "divorcio", "mascota", "hogar", "departamento",
        ],
    ),
    (
        DecisionType::Technology,
        &[
            "software", "system", "application", "technology", "tool", "platform", "upgrade",
            "migrate", "computer", "program", "app", "digital", "sistema", "aplicación",
            "tecnología", "herramienta", "plataforma", "actualizar", "migrar", "computadora",
            "programa",
        ],
    ),
];

impl DecisionType {
    /// Picks the first category whose keywords appear in the question.
    pub fn identify(question: &str) -> Self {
        let lower = question.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(kind, _)| *kind)
            .unwrap_or(DecisionType::General)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Financial => "financial",
            DecisionType::Career => "career",
            DecisionType::Education => "education",
            DecisionType::Personal => "personal",
            DecisionType::Technology => "technology",
            DecisionType::General => "general",
        }
    }

    /// Analysis checklist prepended to the question.
    pub fn checklist(&self, locale: &Locale) -> String {
        match self {
            DecisionType::Financial => format!(
                "Analyze this financial decision considering:\n\
                 - Expected ROI and payback period\n\
                 - Upfront and recurring costs in {}\n\
                 - Comparison with alternative investments\n\
                 - Specific financial risks",
                locale.currency
            ),
            DecisionType::Career => "Analyze this career decision evaluating:\n\
                 - Impact on professional development\n\
                 - Salary and benefit differences\n\
                 - Growth opportunities\n\
                 - Work-life balance"
                .to_string(),
            DecisionType::Education => format!(
                "Analyze this education decision considering:\n\
                 - Cost versus educational return\n\
                 - Time commitment required\n\
                 - Value in the {} job market\n\
                 - Alternative forms of training",
                locale.country
            ),
            DecisionType::Personal => "Analyze this personal decision evaluating:\n\
                 - Impact on quality of life\n\
                 - Emotional and economic costs\n\
                 - Effects on family relationships\n\
                 - Long-term wellbeing"
                .to_string(),
            DecisionType::Technology => "Analyze this technology decision considering:\n\
                 - Implementation and maintenance costs\n\
                 - Learning curve and training\n\
                 - Productivity benefits\n\
                 - Obsolescence risks"
                .to_string(),
            DecisionType::General => "Analyze this decision considering:\n\
                 - Main costs and benefits\n\
                 - Risks and opportunities\n\
                 - Short and long term impact\n\
                 - Available alternatives"
                .to_string(),
        }
    }

    /// One-line focus used by the tree prompt.
    pub fn tree_focus(&self) -> &'static str {
        match self {
            DecisionType::Financial => "Focus on ROI, cash flows and financial metrics.",
            DecisionType::Career => {
                "Consider salary, benefits, professional development and work-life balance."
            }
            DecisionType::Education => {
                "Evaluate education costs, study time and professional return."
            }
            DecisionType::Personal => {
                "Weigh emotional wellbeing, family impact and quality of life."
            }
            DecisionType::Technology => {
                "Analyze implementation costs, learning curve and obsolescence."
            }
            DecisionType::General => {
                "Consider costs, benefits, risks and opportunities as a whole."
            }
        }
    }

    /// Wraps the question in the type checklist and locale instructions.
    pub fn enhance_question(&self, question: &str, locale: &Locale) -> String {
        format!(
            "{}\n\nDECISION TO ANALYZE: {}\n\nIMPORTANT:\n\
             - Look for data specific to the {} market\n\
             - Provide concrete numbers and percentages\n\
             - Consider the current economic context\n\
             - Give a clear, well-founded recommendation",
            self.checklist(locale),
            question,
            locale.country
        )
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
