use crate::{
    answer::Evaluation,
    error::{EvaluationError, GenerationError, InterviewError},
    job::JobProfile,
    question::{GeneratedQuestion, Question, QuestionSet},
};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;

pub const GENERATE_QUESTIONS_PROMPT: &str = "generate_questions";
pub const EVALUATE_ANSWER_PROMPT: &str = "evaluate_answer";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// The interview core only talks to these two traits, so the session can be
// driven by a live model, the offline `SimulatedAssessor`, or a mock in tests.

/// Produces the questions for one interview.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_questions(
        &self,
        profile: &JobProfile,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError>;
}

/// Scores one answer. The question carries its own topic and weight.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer: &str,
        job_context: &str,
    ) -> Result<Evaluation, EvaluationError>;
}

/// Validates the profile, asks the generator for questions and resolves them
/// into a question set.
pub async fn generate_question_set<G>(
    generator: &G,
    profile: &JobProfile,
) -> Result<QuestionSet, InterviewError>
where
    G: QuestionGenerator + ?Sized,
{
    profile.validate()?;
    tracing::info!(
        "Generating {} questions for '{}'",
        profile.question_count,
        profile.job_title
    );
    let generated = generator.generate_questions(profile).await?;
    if generated.is_empty() {
        return Err(GenerationError::NoQuestions.into());
    }
    if generated.len() != profile.question_count {
        tracing::debug!(
            "Generator returned {} questions, {} requested",
            generated.len(),
            profile.question_count
        );
    }
    QuestionSet::from_generated(generated)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAI,
    Gemini,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

/// Question generation and answer scoring backed by a hosted language model.
pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    base_url: String,
    api_key: SecretString,
    model: String,
    prompts: HashMap<String, String>,
}

impl LlmClient {
    pub fn new(
        provider: LlmProvider,
        api_key: SecretString,
        model: String,
        prompts: HashMap<String, String>,
    ) -> Self {
        let base_url = match provider {
            LlmProvider::OpenAI => OPENAI_BASE_URL,
            LlmProvider::Gemini => GEMINI_BASE_URL,
        };
        Self {
            client: Client::new(),
            provider,
            base_url: base_url.to_string(),
            api_key,
            model,
            prompts,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn prompt(&self, key: &str) -> Option<&str> {
        self.prompts.get(key).map(String::as_str)
    }

    /// Sends one user prompt and returns the model's text, or `None` when the
    /// reply had no text in it.
    async fn complete(&self, prompt: &str, temperature: f32) -> reqwest::Result<Option<String>> {
        match self.provider {
            LlmProvider::OpenAI => {
                let body = serde_json::json!({
                    "model": self.model,
                    "messages": [
                        { "role": "user", "content": prompt }
                    ],
                    "temperature": temperature
                });
                let resp = self
                    .client
                    .post(format!("{}/chat/completions", self.base_url))
                    .bearer_auth(self.api_key.expose_secret())
                    .json(&body)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<ChatResponse>()
                    .await?;
                Ok(resp
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content))
            }
            LlmProvider::Gemini => {
                let body = serde_json::json!({
                    "contents": [
                        { "role": "user", "parts": [{ "text": prompt }] }
                    ],
                    "generationConfig": { "temperature": temperature }
                });
                let resp = self
                    .client
                    .post(format!(
                        "{}/models/{}:generateContent",
                        self.base_url, self.model
                    ))
                    .query(&[("key", self.api_key.expose_secret())])
                    .json(&body)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<GeminiResponse>()
                    .await?;
                Ok(resp
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content)
                    .map(|c| {
                        c.parts
                            .into_iter()
                            .filter_map(|p| p.text)
                            .collect::<String>()
                    })
                    .filter(|text| !text.is_empty()))
            }
        }
    }
}

#[async_trait]
impl QuestionGenerator for LlmClient {
    async fn generate_questions(
        &self,
        profile: &JobProfile,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let template = self
            .prompt(GENERATE_QUESTIONS_PROMPT)
            .ok_or_else(|| GenerationError::MissingPrompt(GENERATE_QUESTIONS_PROMPT.into()))?;
        let prompt = question_prompt(template, profile);

        let text = self
            .complete(&prompt, 0.7)
            .await?
            .ok_or_else(|| GenerationError::InvalidResponse("No response from LLM".into()))?;
        parse_questions(&text)
    }
}

#[async_trait]
impl Evaluator for LlmClient {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer: &str,
        job_context: &str,
    ) -> Result<Evaluation, EvaluationError> {
        let template = self
            .prompt(EVALUATE_ANSWER_PROMPT)
            .ok_or_else(|| EvaluationError::MissingPrompt(EVALUATE_ANSWER_PROMPT.into()))?;
        let prompt = evaluation_prompt(template, question, answer, job_context);

        // Low temperature for consistent scoring.
        let text = self
            .complete(&prompt, 0.1)
            .await?
            .ok_or_else(|| EvaluationError::InvalidResponse("No response from LLM".into()))?;
        parse_evaluation(&text)
    }
}

/// Substitutes `{name}` placeholders in a prompt template.
pub fn render_prompt(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

fn question_prompt(template: &str, profile: &JobProfile) -> String {
    let count = profile.question_count.to_string();
    let topics_section = match profile.topics_weightage.as_deref().map(str::trim) {
        Some(weightage) if !weightage.is_empty() => format!(
            "Topics and Weightage: {weightage}\n\n\
             IMPORTANT: Distribute the {count} questions according to these topic weightages. \
             For example, if \"algorithms\" is 40%, then roughly 40% of questions should be about algorithms."
        ),
        _ => String::new(),
    };
    let description = profile.description();
    render_prompt(
        template,
        &[
            ("count", count.as_str()),
            ("job_title", profile.job_title.as_str()),
            ("job_description", description.as_str()),
            ("topics_section", topics_section.as_str()),
        ],
    )
}

fn evaluation_prompt(template: &str, question: &Question, answer: &str, job_context: &str) -> String {
    let scoring_context = format!(
        "Topic: {}\nQuestion Worth: {} points out of 100 total interview points",
        question.topic,
        format_points(question.points)
    );
    render_prompt(
        template,
        &[
            ("job_context", job_context),
            ("scoring_context", scoring_context.as_str()),
            ("question", question.text.as_str()),
            ("answer", answer),
        ],
    )
}

fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points:.1}")
    }
}

/// Returns the outermost `open ... close` span of `text`, skipping any prose
/// or code fences the model wrapped around its JSON.
pub fn extract_json(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_questions(text: &str) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let json = extract_json(text, '[', ']')
        .ok_or_else(|| GenerationError::InvalidResponse(format!("No JSON array in: {text}")))?;
    serde_json::from_str(json)
        .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse questions: {e}")))
}

pub fn parse_evaluation(text: &str) -> Result<Evaluation, EvaluationError> {
    let json = extract_json(text, '{', '}')
        .ok_or_else(|| EvaluationError::InvalidResponse(format!("No JSON object in: {text}")))?;
    let evaluation: Evaluation = serde_json::from_str(json).map_err(|e| {
        EvaluationError::InvalidResponse(format!("Failed to parse evaluation: {e}"))
    })?;
    Ok(evaluation.clamped())
}
