use crate::answer::AnswerRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Points earned and available for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TopicScore {
    pub earned: f64,
    pub possible: f64,
}

impl TopicScore {
    /// Earned share of the possible points; `None` for a zero-weight topic.
    pub fn ratio(&self) -> Option<f64> {
        if self.possible > 0.0 {
            Some(self.earned / self.possible)
        } else {
            None
        }
    }
}

/// The interview outcome. Derived once from the answers and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResult {
    pub final_score: u8,
    pub topic_breakdown: BTreeMap<String, TopicScore>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub feedback: String,
    pub total_earned: f64,
    pub total_possible: f64,
}

/// Folds every answer into a weighted final score.
///
/// Each question adds its points to the possible total whether or not it was
/// evaluated; an answer without an evaluation earns nothing. The result only
/// depends on `answers`.
pub fn aggregate(answers: &[AnswerRecord]) -> FinalResult {
    let mut total_earned = 0.0;
    let mut total_possible = 0.0;
    let mut topic_breakdown: BTreeMap<String, TopicScore> = BTreeMap::new();
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut feedback = Vec::new();

    for record in answers {
        let points = record.question.points;
        let bucket = topic_breakdown
            .entry(record.question.topic.clone())
            .or_default();
        total_possible += points;
        bucket.possible += points;

        let Some(evaluation) = &record.evaluation else {
            continue;
        };

        let earned = evaluation.earned(points);
        if earned > points {
            tracing::warn!(
                "Evaluator awarded {} points for a question worth {}: {:?}",
                earned,
                points,
                record.question.text
            );
        }
        total_earned += earned;
        bucket.earned += earned;

        strengths.extend(evaluation.strengths.iter().cloned());
        improvements.extend(evaluation.improvements.iter().cloned());
        if let Some(text) = evaluation.feedback.as_deref().map(str::trim) {
            if !text.is_empty() {
                feedback.push(text.to_string());
            }
        }
    }

    let raw_score = if total_possible > 0.0 {
        (100.0 * total_earned / total_possible).round()
    } else {
        total_earned.round()
    };

    FinalResult {
        final_score: raw_score.clamp(0.0, 100.0) as u8,
        topic_breakdown,
        strengths,
        improvements,
        feedback: feedback.join(" "),
        total_earned,
        total_possible,
    }
}
