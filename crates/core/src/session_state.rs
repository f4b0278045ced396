use crate::{
    answer::{AnswerRecord, Evaluation},
    error::{EvaluationError, InterviewError},
    question::{Question, QuestionSet},
    scoring::{FinalResult, aggregate},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewState {
    AwaitingStart,
    AskingQuestion(usize),
    AwaitingAnswer(usize),
    Evaluating(usize),
    Finalized,
}

impl fmt::Display for InterviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterviewState::AwaitingStart => write!(f, "AwaitingStart"),
            InterviewState::AskingQuestion(i) => write!(f, "AskingQuestion({i})"),
            InterviewState::AwaitingAnswer(i) => write!(f, "AwaitingAnswer({i})"),
            InterviewState::Evaluating(i) => write!(f, "Evaluating({i})"),
            InterviewState::Finalized => write!(f, "Finalized"),
        }
    }
}

/// Where the session went after an evaluation was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next(usize),
    Finalized,
}

/// The state of one interview: which question is live, and every answer
/// given so far.
///
/// All transitions are synchronous. The caller performs the side effects
/// (speaking, evaluating) between them.
#[derive(Debug)]
pub struct InterviewSession {
    state: InterviewState,
    questions: Option<QuestionSet>,
    answers: Vec<AnswerRecord>,
    result: Option<FinalResult>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            state: InterviewState::AwaitingStart,
            questions: None,
            answers: vec![],
            result: None,
        }
    }

    pub fn state(&self) -> InterviewState {
        self.state
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    /// Index of the question currently in play; equals the question count
    /// once finalized.
    pub fn current_index(&self) -> usize {
        match self.state {
            InterviewState::AwaitingStart => 0,
            InterviewState::AskingQuestion(i)
            | InterviewState::AwaitingAnswer(i)
            | InterviewState::Evaluating(i) => i,
            InterviewState::Finalized => self.question_count(),
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.as_ref().map_or(0, QuestionSet::len)
    }

    pub fn is_finalized(&self) -> bool {
        self.state == InterviewState::Finalized
    }

    /// Begins the interview. A session runs once; it cannot be restarted.
    pub fn start(&mut self, questions: QuestionSet) -> Result<&Question, InterviewError> {
        match self.state {
            InterviewState::AwaitingStart => {}
            InterviewState::Finalized => return Err(InterviewError::SessionFinalized),
            _ => return Err(InterviewError::AlreadyStarted),
        }
        if questions.is_empty() {
            return Err(InterviewError::EmptySession);
        }

        tracing::info!("Starting interview with {} questions", questions.len());
        self.answers = Vec::with_capacity(questions.len());
        self.state = InterviewState::AskingQuestion(0);
        let questions = self.questions.insert(questions);
        questions.get(0).ok_or(InterviewError::EmptySession)
    }

    /// Opens the answer window for the question being asked.
    pub fn present_question(&mut self) -> Result<(usize, &Question), InterviewError> {
        let InterviewState::AskingQuestion(index) = self.state else {
            return Err(InterviewError::UnexpectedAnswer {
                index: self.current_index(),
                state: self.state.to_string(),
            });
        };
        let question = self
            .questions
            .as_ref()
            .and_then(|q| q.get(index))
            .ok_or(InterviewError::EmptySession)?;
        self.state = InterviewState::AwaitingAnswer(index);
        Ok((index, question))
    }

    /// Records the one answer for question `index`. Rejected without effect
    /// unless that question is awaiting its answer.
    pub fn accept_answer(&mut self, index: usize, text: String) -> Result<(), InterviewError> {
        if self.state != InterviewState::AwaitingAnswer(index) {
            tracing::warn!(
                "Rejecting answer for question {} while {}",
                index,
                self.state
            );
            return Err(InterviewError::UnexpectedAnswer {
                index,
                state: self.state.to_string(),
            });
        }
        let question = self
            .questions
            .as_ref()
            .and_then(|q| q.get(index))
            .cloned()
            .ok_or(InterviewError::EmptySession)?;

        tracing::debug!("Accepted answer for question {}: {:?}", index, text);
        self.answers.push(AnswerRecord::new(question, text));
        self.state = InterviewState::Evaluating(index);
        Ok(())
    }

    /// Fills the evaluation slot of answer `index` and moves on. A failed
    /// evaluation leaves the slot empty; the session advances either way.
    pub fn attach_evaluation(
        &mut self,
        index: usize,
        outcome: Result<Evaluation, EvaluationError>,
    ) -> Result<Transition, InterviewError> {
        if self.state != InterviewState::Evaluating(index) {
            return Err(InterviewError::UnexpectedAnswer {
                index,
                state: self.state.to_string(),
            });
        }
        let record = self
            .answers
            .get_mut(index)
            .ok_or(InterviewError::EmptySession)?;

        match outcome {
            Ok(evaluation) => {
                tracing::info!("Question {} scored {}", index, evaluation.score);
                record.evaluation = Some(evaluation);
            }
            Err(e) => {
                tracing::warn!("Evaluation of question {} failed: {}", index, e);
                record.failure = Some(e.to_string());
            }
        }

        let next = index + 1;
        if next < self.question_count() {
            self.state = InterviewState::AskingQuestion(next);
            Ok(Transition::Next(next))
        } else {
            self.finalize();
            Ok(Transition::Finalized)
        }
    }

    /// The cached final result.
    pub fn result(&self) -> Result<&FinalResult, InterviewError> {
        self.result.as_ref().ok_or(InterviewError::NotFinalized)
    }

    fn finalize(&mut self) {
        self.state = InterviewState::Finalized;
        if self.result.is_none() {
            let result = aggregate(&self.answers);
            tracing::info!("Interview finalized with score {}", result.final_score);
            self.result = Some(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::GeneratedQuestion;

    fn question_set(n: usize) -> QuestionSet {
        QuestionSet::from_generated(
            (0..n)
                .map(|i| GeneratedQuestion::new(format!("Question {i}")))
                .collect(),
        )
        .unwrap()
    }

    fn answer_and_score(session: &mut InterviewSession, score: f64) -> Transition {
        let (index, _) = session.present_question().unwrap();
        session
            .accept_answer(index, format!("answer {index}"))
            .unwrap();
        session
            .attach_evaluation(index, Ok(Evaluation::with_score(score)))
            .unwrap()
    }

    #[test]
    fn test_start_moves_to_first_question() {
        let mut session = InterviewSession::new();
        let first = session.start(question_set(3)).unwrap();
        assert_eq!(first.text, "Question 0");
        assert_eq!(session.state(), InterviewState::AskingQuestion(0));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_full_session_finalizes_with_stable_result() {
        let mut session = InterviewSession::new();
        session.start(question_set(4)).unwrap();

        for i in 0..4 {
            assert_eq!(session.answers().len(), i);
            let transition = answer_and_score(&mut session, 75.0);
            if i < 3 {
                assert_eq!(transition, Transition::Next(i + 1));
            } else {
                assert_eq!(transition, Transition::Finalized);
            }
        }

        assert!(session.is_finalized());
        assert_eq!(session.current_index(), 4);
        let first = session.result().unwrap().clone();
        let second = session.result().unwrap();
        assert_eq!(&first, second);
        assert_eq!(first.final_score, 75);
    }

    #[test]
    fn test_duplicate_answer_is_rejected_without_effect() {
        let mut session = InterviewSession::new();
        session.start(question_set(2)).unwrap();
        session.present_question().unwrap();
        session.accept_answer(0, "first".to_string()).unwrap();

        let err = session
            .accept_answer(0, "second".to_string())
            .unwrap_err();
        assert!(matches!(
            err,
            InterviewError::UnexpectedAnswer { index: 0, .. }
        ));
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0].answer_text, "first");
        assert_eq!(session.state(), InterviewState::Evaluating(0));
    }

    #[test]
    fn test_answer_before_question_is_presented_is_rejected() {
        let mut session = InterviewSession::new();
        assert!(session.accept_answer(0, "early".to_string()).is_err());

        session.start(question_set(2)).unwrap();
        assert!(session.accept_answer(0, "early".to_string()).is_err());
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_answer_for_wrong_index_is_rejected() {
        let mut session = InterviewSession::new();
        session.start(question_set(3)).unwrap();
        session.present_question().unwrap();
        assert!(session.accept_answer(1, "skip ahead".to_string()).is_err());
        assert_eq!(session.state(), InterviewState::AwaitingAnswer(0));
    }

    #[test]
    fn test_failed_evaluation_still_advances() {
        let mut session = InterviewSession::new();
        session.start(question_set(2)).unwrap();
        session.present_question().unwrap();
        session.accept_answer(0, "answer".to_string()).unwrap();

        let transition = session
            .attach_evaluation(
                0,
                Err(EvaluationError::InvalidResponse("not json".to_string())),
            )
            .unwrap();

        assert_eq!(transition, Transition::Next(1));
        let record = &session.answers()[0];
        assert!(record.evaluation.is_none());
        assert!(record.failure.as_deref().unwrap().contains("not json"));

        answer_and_score(&mut session, 100.0);
        assert_eq!(session.result().unwrap().final_score, 50);
    }

    #[test]
    fn test_evaluation_attaches_only_once() {
        let mut session = InterviewSession::new();
        session.start(question_set(2)).unwrap();
        answer_and_score(&mut session, 60.0);

        let err = session
            .attach_evaluation(0, Ok(Evaluation::with_score(100.0)))
            .unwrap_err();
        assert!(matches!(err, InterviewError::UnexpectedAnswer { .. }));
        assert_eq!(
            session.answers()[0].evaluation.as_ref().unwrap().score,
            60.0
        );
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut session = InterviewSession::new();
        session.start(question_set(2)).unwrap();
        assert!(matches!(
            session.start(question_set(1)),
            Err(InterviewError::AlreadyStarted)
        ));
        assert_eq!(session.question_count(), 2);
    }

    #[test]
    fn test_start_after_finalized_fails_and_keeps_state() {
        let mut session = InterviewSession::new();
        session.start(question_set(1)).unwrap();
        answer_and_score(&mut session, 90.0);
        assert!(session.is_finalized());

        assert!(matches!(
            session.start(question_set(3)),
            Err(InterviewError::SessionFinalized)
        ));
        assert!(session.is_finalized());
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.result().unwrap().final_score, 90);
    }

    #[test]
    fn test_result_before_finalized_fails() {
        let mut session = InterviewSession::new();
        assert!(matches!(
            session.result(),
            Err(InterviewError::NotFinalized)
        ));
        session.start(question_set(1)).unwrap();
        assert!(session.result().is_err());
    }
}
