use crate::error::InterviewError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_QUESTION_COUNT: usize = 5;
/// Upper bound on questions per interview.
pub const MAX_QUESTION_COUNT: usize = 20;

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

/// The role being interviewed for. Drives question generation and is passed
/// to the evaluator as job context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProfile {
    pub job_title: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub seniority_level: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    /// Free-form weighting, e.g. `"algorithms: 40%, system design: 30%"`.
    #[serde(default)]
    pub topics_weightage: Option<String>,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
}

impl JobProfile {
    pub fn new(job_title: impl Into<String>) -> Self {
        Self {
            job_title: job_title.into(),
            job_description: None,
            seniority_level: None,
            organization: None,
            skills: None,
            topics_weightage: None,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    /// Rejects a blank title and a question count outside
    /// `1..=MAX_QUESTION_COUNT`.
    pub fn validate(&self) -> Result<(), InterviewError> {
        if self.job_title.trim().is_empty() {
            return Err(InterviewError::InvalidProfile(
                "jobTitle must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_QUESTION_COUNT).contains(&self.question_count) {
            return Err(InterviewError::InvalidProfile(format!(
                "questionCount must be between 1 and {MAX_QUESTION_COUNT}, got {}",
                self.question_count
            )));
        }
        Ok(())
    }

    /// The explicit description, or one assembled from the other fields.
    pub fn description(&self) -> String {
        match self.job_description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => format!(
                "{} position at {}. Required skills: {}",
                self.seniority_level.as_deref().unwrap_or("Open"),
                self.organization(),
                self.skills(),
            ),
        }
    }

    /// One-line context handed to the evaluator with every answer.
    pub fn job_context(&self) -> String {
        format!(
            "{} at {} - Skills: {}",
            self.job_title,
            self.organization(),
            self.skills()
        )
    }

    fn organization(&self) -> &str {
        non_blank(self.organization.as_deref()).unwrap_or("Company")
    }

    fn skills(&self) -> &str {
        non_blank(self.skills.as_deref()).unwrap_or("Various")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
