use crate::question::Question;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 100.0;

/// The scoring collaborator's verdict on one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Percentage score for this question, 1..=100.
    pub score: f64,
    /// Points the evaluator awarded itself, if it did the weighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Evaluation {
    pub fn with_score(score: f64) -> Self {
        Self {
            score,
            points_earned: None,
            topic: None,
            strengths: vec![],
            improvements: vec![],
            feedback: None,
        }
    }

    /// Forces the score into 1..=100. A non-finite score becomes the minimum.
    pub fn clamped(mut self) -> Self {
        let clamped = if self.score.is_finite() {
            self.score.clamp(MIN_SCORE, MAX_SCORE)
        } else {
            MIN_SCORE
        };
        if clamped != self.score {
            tracing::warn!("Clamping evaluator score {} to {}", self.score, clamped);
            self.score = clamped;
        }
        self
    }

    /// Points this evaluation is worth for a question carrying `points`.
    /// An explicit `points_earned` always wins, even when it is zero.
    pub fn earned(&self, points: f64) -> f64 {
        match self.points_earned {
            Some(earned) => earned,
            None => (self.score / 100.0) * points,
        }
    }
}

/// One finalized answer. The evaluation slot is filled at most once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question: Question,
    pub answer_text: String,
    pub evaluation: Option<Evaluation>,
    /// Why `evaluation` is absent, when the evaluator failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl AnswerRecord {
    pub fn new(question: Question, answer_text: String) -> Self {
        Self {
            question,
            answer_text,
            evaluation: None,
            failure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_parses_camel_case_and_defaults() {
        let eval: Evaluation = serde_json::from_str(
            r#"{"score": 72, "pointsEarned": 14.4, "strengths": ["clear"], "feedback": "Good."}"#,
        )
        .unwrap();
        assert_eq!(eval.score, 72.0);
        assert_eq!(eval.points_earned, Some(14.4));
        assert_eq!(eval.strengths, vec!["clear".to_string()]);
        assert!(eval.improvements.is_empty());
        assert!(eval.topic.is_none());
    }

    #[test]
    fn test_earned_prefers_explicit_points() {
        let mut eval = Evaluation::with_score(50.0);
        assert_eq!(eval.earned(20.0), 10.0);

        eval.points_earned = Some(0.0);
        assert_eq!(eval.earned(20.0), 0.0);
    }

    #[test]
    fn test_clamped_bounds_score() {
        assert_eq!(Evaluation::with_score(140.0).clamped().score, 100.0);
        assert_eq!(Evaluation::with_score(0.0).clamped().score, 1.0);
        assert_eq!(Evaluation::with_score(f64::NAN).clamped().score, 1.0);
        assert_eq!(Evaluation::with_score(64.0).clamped().score, 64.0);
    }
}
