use crate::answer::Evaluation;
use crate::assessor::{Evaluator, QuestionGenerator};
use crate::error::{EvaluationError, GenerationError};
use crate::job::{JobProfile, MAX_QUESTION_COUNT};
use crate::question::{GeneratedQuestion, Question, QuestionKind};
use async_trait::async_trait;

/// An offline stand-in for the language model.
///
/// It makes no network calls: questions come from fixed templates and
/// answers are scored by length. Useful for running the whole interview loop
/// without API keys.
pub struct SimulatedAssessor;

const TEMPLATES: &[(&str, &str, QuestionKind)] = &[
    (
        "general",
        "Walk me through your background and why you want to work as a {title}.",
        QuestionKind::Behavioral,
    ),
    (
        "technical",
        "Describe a technically difficult problem you solved as a {title}.",
        QuestionKind::Technical,
    ),
    (
        "behavioral",
        "Tell me about a time you disagreed with a teammate. How did you resolve it?",
        QuestionKind::Behavioral,
    ),
    (
        "technical",
        "Which tools or skills from this role ({skills}) are you strongest in, and why?",
        QuestionKind::Technical,
    ),
    (
        "general",
        "Where do you see yourself growing in this position over the next two years?",
        QuestionKind::Behavioral,
    ),
];

/// Topic names from a weightage string such as `"algorithms: 40%, design: 60%"`.
fn weighted_topics(weightage: &str) -> Vec<String> {
    weightage
        .split(',')
        .filter_map(|part| part.split(':').next())
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

#[async_trait]
impl QuestionGenerator for SimulatedAssessor {
    async fn generate_questions(
        &self,
        profile: &JobProfile,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let topics = profile
            .topics_weightage
            .as_deref()
            .map(weighted_topics)
            .unwrap_or_default();
        let skills = profile.skills.as_deref().unwrap_or("your core skills");

        Ok((0..profile.question_count.min(MAX_QUESTION_COUNT))
            .map(|i| {
                let (default_topic, template, kind) = TEMPLATES[i % TEMPLATES.len()];
                let topic = if topics.is_empty() {
                    default_topic.to_string()
                } else {
                    topics[i % topics.len()].clone()
                };
                GeneratedQuestion {
                    question: template
                        .replace("{title}", &profile.job_title)
                        .replace("{skills}", skills),
                    kind: Some(kind),
                    topic: Some(topic),
                    points: None,
                    follow_up: Some("Can you give a concrete example?".to_string()),
                }
            })
            .collect())
    }
}

#[async_trait]
impl Evaluator for SimulatedAssessor {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer: &str,
        _job_context: &str,
    ) -> Result<Evaluation, EvaluationError> {
        let words = answer.split_whitespace().count();
        // Longer answers score higher, capped at 100.
        let score = (30 + words * 3).min(100) as f64;

        let (strengths, improvements) = if words == 0 {
            (vec![], vec!["Provide an answer to the question".to_string()])
        } else if words < 20 {
            (
                vec!["Answered the question directly".to_string()],
                vec!["Add more detail and a concrete example".to_string()],
            )
        } else {
            (
                vec!["Detailed, well-developed answer".to_string()],
                vec![],
            )
        };

        Ok(Evaluation {
            score,
            points_earned: None,
            topic: Some(question.topic.clone()),
            strengths,
            improvements,
            feedback: Some(format!("Your answer ran to {words} words.")),
        }
        .clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessor::generate_question_set;

    #[tokio::test]
    async fn test_generates_requested_count_with_weighted_topics() {
        let mut profile = JobProfile::new("Rust Developer");
        profile.question_count = 3;
        profile.topics_weightage = Some("Async: 50%, Unsafe: 50%".to_string());

        let set = generate_question_set(&SimulatedAssessor, &profile)
            .await
            .unwrap();
        let topics: Vec<&str> = set.iter().map(|q| q.topic.as_str()).collect();
        assert_eq!(topics, vec!["async", "unsafe", "async"]);
        assert!(set.get(0).unwrap().text.contains("Rust Developer"));
    }

    #[tokio::test]
    async fn test_scores_by_answer_length() {
        let question = Question::new("Q", "general", 20.0);
        let empty = SimulatedAssessor
            .evaluate_answer(&question, "", "ctx")
            .await
            .unwrap();
        assert_eq!(empty.score, 30.0);
        assert!(empty.strengths.is_empty());

        let long_answer = vec!["word"; 40].join(" ");
        let long = SimulatedAssessor
            .evaluate_answer(&question, &long_answer, "ctx")
            .await
            .unwrap();
        assert_eq!(long.score, 100.0);
    }

    #[tokio::test]
    async fn test_caps_question_count() {
        let mut profile = JobProfile::new("Rust Developer");
        profile.question_count = usize::MAX;

        let questions = SimulatedAssessor.generate_questions(&profile).await.unwrap();
        assert_eq!(questions.len(), MAX_QUESTION_COUNT);
    }
}
