//! Prompts for the adaptive questionnaire.

use super::AnswerSet;
use crate::domain::foundation::Locale;

/// Literal token the model replies with once enough has been collected.
pub const COMPLETION_TOKEN: &str = "QUESTIONNAIRE_COMPLETE";

/// User turn that asks for the next question.
pub const NEXT_QUESTION_REQUEST: &str = "Generate the next question.";

/// System prompt for generating the next question.
pub fn question_system_prompt(answers: &AnswerSet, locale: &Locale) -> String {
    format!(
        r#"You are an assistant running a questionnaire to get to know the user.
Your goal is to gather information that helps the user make better decisions.

INFORMATION ALREADY COLLECTED:
{answered}

RULES:
1. You may ask ONE question, or TWO closely related questions on the same line
2. You must ALWAYS obtain: age, sex, marital status, occupation, income
3. If you have neither age NOR sex, ask for both together: "What is your age and sex?"
4. Be adaptive: if the user says they are married, ask about children
5. If the user has children, ask how many and their ages
6. If the user works, ask about their occupation and income
7. Ask about health (weight, chronic illnesses)
8. Ask about family (whether their parents are alive)
9. Ask about dietary preferences
10. Once you have enough basic information (at least 8-10 fields), reply exactly: "{token}"

EXAMPLE QUESTIONS:
- First question (no data yet): "What is your age and sex?"
- "Are you married or single?"
- "What is your occupation?"
- "What is your approximate monthly income in {currency}?"

IMPORTANT:
- The user lives in {country}
- Ask natural, conversational questions
- Do not ask unnecessarily invasive questions
- If you already have information on a topic, do not ask again
- When you have enough information, reply ONLY "{token}""#,
        answered = answers.summary_for_prompt(),
        token = COMPLETION_TOKEN,
        country = locale.country,
        currency = locale.currency,
    )
}

/// System prompt for extracting structured fields from one answer.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are an assistant that processes questionnaire answers.
Given a question and its answer, extract the relevant structured fields.

MAIN STRUCTURED FIELDS:
- age (int)
- sex (str)
- marital_status (str)
- number_of_children (int)
- occupation (str)
- monthly_income (float)
- years_of_experience (int)
- weight_kg (float)
- height_cm (float)
- illnesses (list of strings)
- parents_alive (bool)
- dietary_preferences (list of strings)

ADDITIONAL FIELDS:
- location (str) - if a city or country is mentioned
- housing (str) - if owning a home, renting, etc. is mentioned
- education (str) - if studies are mentioned
- goals (str) - if goals or plans are mentioned
- ANY other relevant information goes into "additional_context"

REPLY ONLY WITH A VALID JSON OBJECT.

EXAMPLES:
Question: "What is your age and sex?"
Answer: "35, male, I live in Lima"
{"age": 35, "sex": "male", "location": "Lima"}

Question: "How old are you?"
Answer: "I'm 41 and I work in IT"
{"age": 41, "additional_context": "works in IT"}

Question: "Are you married?"
Answer: "Yes, married for 10 years"
{"marital_status": "married", "additional_context": "married for 10 years"}

REPLY WITH JSON ONLY, NO EXTRA TEXT."#;

/// User turn for the extraction call.
pub fn extraction_user_message(question: &str, answer: &str) -> String {
    format!("Question: {}\nAnswer: {}\n\nJSON:", question, answer)
}
