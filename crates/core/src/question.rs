use crate::error::InterviewError;
use serde::{Deserialize, Serialize};

/// Topic used when the generator does not tag a question.
pub const DEFAULT_TOPIC: &str = "general";

/// The whole interview is worth this many points when the generator
/// leaves weights out.
pub const TOTAL_POINTS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Technical,
    Behavioral,
    #[serde(other)]
    Other,
}

/// A question as the generation service returns it. Every field except the
/// text is optional; defaults are filled in by [`QuestionSet::from_generated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    #[serde(alias = "text")]
    pub question: String,
    #[serde(rename = "type", default)]
    pub kind: Option<QuestionKind>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub follow_up: Option<String>,
}

impl GeneratedQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            kind: None,
            topic: None,
            points: None,
            follow_up: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }
}

/// One interview question with its resolved topic and point weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub topic: String,
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

impl Question {
    pub fn new(text: impl Into<String>, topic: impl Into<String>, points: f64) -> Self {
        Self {
            text: text.into(),
            topic: topic.into(),
            points,
            kind: None,
            follow_up: None,
        }
    }
}

/// The ordered, immutable questions of one session. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, InterviewError> {
        if questions.is_empty() {
            return Err(InterviewError::EmptySession);
        }
        Ok(Self { questions })
    }

    /// Resolves generator output into questions.
    ///
    /// A missing (or unusable) weight becomes an equal share of
    /// [`TOTAL_POINTS`], computed once here from the generated count. An
    /// explicit zero weight is kept. A blank topic becomes [`DEFAULT_TOPIC`].
    pub fn from_generated(generated: Vec<GeneratedQuestion>) -> Result<Self, InterviewError> {
        if generated.is_empty() {
            return Err(InterviewError::EmptySession);
        }
        let default_points = TOTAL_POINTS / generated.len() as f64;

        let questions = generated
            .into_iter()
            .map(|g| {
                let topic = g
                    .topic
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_TOPIC.to_string());
                let points = match g.points {
                    Some(p) if p.is_finite() && p >= 0.0 => p,
                    Some(p) => {
                        tracing::warn!(
                            "Ignoring unusable weight {} for question {:?}",
                            p,
                            g.question
                        );
                        default_points
                    }
                    None => default_points,
                };
                Question {
                    text: g.question,
                    topic,
                    points,
                    kind: g.kind,
                    follow_up: g.follow_up,
                }
            })
            .collect();

        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn total_points(&self) -> f64 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
