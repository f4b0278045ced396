use crate::{
    Command, Speaker, TranscriptEntry,
    answer::Evaluation,
    assessor::Evaluator,
    error::{CaptureError, EvaluationError, InterviewError},
    question::{Question, QuestionSet},
    scoring::FinalResult,
    session_state::{InterviewSession, InterviewState, Transition},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_EVALUATION_TIMEOUT: Duration = Duration::from_secs(30);

/// What the caller gets back after submitting an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Next { index: usize, question: Question },
    Finished(FinalResult),
}

/// Drives one interview session: presents questions, evaluates each answer
/// and reports the final result.
///
/// Speech and transcript output go to the runtime as [`Command`]s. Evaluation
/// failures and timeouts are folded into the score, so a started interview
/// always reaches a result.
pub struct Interview {
    session: InterviewSession,
    evaluator: Arc<dyn Evaluator>,
    job_context: String,
    evaluation_timeout: Duration,
    command_tx: Option<mpsc::Sender<Command>>,
}

impl Interview {
    pub fn new(evaluator: Arc<dyn Evaluator>, job_context: impl Into<String>) -> Self {
        Self {
            session: InterviewSession::new(),
            evaluator,
            job_context: job_context.into(),
            evaluation_timeout: DEFAULT_EVALUATION_TIMEOUT,
            command_tx: None,
        }
    }

    pub fn with_evaluation_timeout(mut self, timeout: Duration) -> Self {
        self.evaluation_timeout = timeout;
        self
    }

    pub fn with_commands(mut self, command_tx: mpsc::Sender<Command>) -> Self {
        self.command_tx = Some(command_tx);
        self
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    /// The question currently waiting for an answer, if any.
    pub fn current_question(&self) -> Option<(usize, &Question)> {
        match self.session.state() {
            InterviewState::AwaitingAnswer(index) => self
                .session
                .questions()
                .and_then(|q| q.get(index))
                .map(|q| (index, q)),
            _ => None,
        }
    }

    /// Starts the session and asks the first question.
    pub async fn start(&mut self, questions: QuestionSet) -> Result<Question, InterviewError> {
        self.session.start(questions)?;
        let (_, question) = self.present().await?;
        Ok(question)
    }

    /// Answers whichever question is currently awaiting an answer.
    pub async fn submit_answer(&mut self, text: String) -> Result<Step, InterviewError> {
        let InterviewState::AwaitingAnswer(index) = self.session.state() else {
            return Err(InterviewError::UnexpectedAnswer {
                index: self.session.current_index(),
                state: self.session.state().to_string(),
            });
        };
        self.submit_answer_at(index, text).await
    }

    /// Submits the outcome of an answer capture. A capture that produced no
    /// text still uses up the turn, as an empty answer.
    pub async fn submit_capture(
        &mut self,
        capture: Result<String, CaptureError>,
    ) -> Result<Step, InterviewError> {
        let text = capture.unwrap_or_else(|e| {
            tracing::warn!("Answer capture failed, recording an empty answer: {}", e);
            String::new()
        });
        self.submit_answer(text).await
    }

    /// Answers question `index`. Fails without effect if that question is not
    /// the one awaiting an answer.
    pub async fn submit_answer_at(
        &mut self,
        index: usize,
        text: String,
    ) -> Result<Step, InterviewError> {
        self.session.accept_answer(index, text.clone())?;
        self.emit(Command::Transcript(TranscriptEntry {
            speaker: Speaker::Candidate,
            text: text.clone(),
        }))
        .await;

        let question = self.session.answers()[index].question.clone();
        let outcome = self.evaluate(&question, &text).await;

        if let Ok(evaluation) = &outcome {
            let feedback = evaluation.feedback.as_deref().unwrap_or_default();
            let ack = format!("Thank you for your answer. {feedback}");
            self.emit(Command::SpeakText(ack.trim_end().to_string()))
                .await;
        }

        match self.session.attach_evaluation(index, outcome)? {
            Transition::Next(_) => {
                let (index, question) = self.present().await?;
                Ok(Step::Next { index, question })
            }
            Transition::Finalized => {
                let result = self.session.result()?.clone();
                self.emit(Command::SessionComplete(format!(
                    "Interview complete! Your overall score is {} out of 100. Thank you for participating.",
                    result.final_score
                )))
                .await;
                Ok(Step::Finished(result))
            }
        }
    }

    /// The final result, once every question has been answered.
    pub fn result(&self) -> Result<&FinalResult, InterviewError> {
        self.session.result()
    }

    async fn evaluate(
        &self,
        question: &Question,
        answer: &str,
    ) -> Result<Evaluation, EvaluationError> {
        let evaluation = self
            .evaluator
            .evaluate_answer(question, answer, &self.job_context);
        match tokio::time::timeout(self.evaluation_timeout, evaluation).await {
            Ok(outcome) => outcome,
            Err(_) => Err(EvaluationError::Timeout(self.evaluation_timeout)),
        }
    }

    async fn present(&mut self) -> Result<(usize, Question), InterviewError> {
        let (index, question) = self.session.present_question()?;
        let question = question.clone();
        tracing::info!("Asking question {}: {}", index + 1, question.text);

        self.emit(Command::Transcript(TranscriptEntry {
            speaker: Speaker::Interviewer,
            text: question.text.clone(),
        }))
        .await;
        self.emit(Command::SpeakText(question.text.clone())).await;
        Ok((index, question))
    }

    async fn emit(&self, command: Command) {
        let Some(tx) = &self.command_tx else {
            return;
        };
        if let Err(e) = tx.send(command).await {
            tracing::warn!("Failed to send command to runtime: {:?}", e);
        }
    }
}
