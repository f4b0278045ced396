use std::time::Duration;

/// Errors raised by the interview session itself.
///
/// Only `Generation` comes from a collaborator; everything else is a protocol
/// violation by whoever is driving the session.
#[derive(Debug, thiserror::Error)]
pub enum InterviewError {
    #[error("An interview needs at least one question")]
    EmptySession,
    #[error("Answer for question {index} is not expected while the session is {state}")]
    UnexpectedAnswer { index: usize, state: String },
    #[error("Invalid job profile: {0}")]
    InvalidProfile(String),
    #[error("The interview has already been started")]
    AlreadyStarted,
    #[error("The interview is finalized and cannot be started again")]
    SessionFinalized,
    #[error("The interview has not been finalized yet")]
    NotFinalized,
    #[error("Failed to generate interview questions: {0}")]
    Generation(#[from] GenerationError),
}

/// The question source failed. Fatal to starting a session.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Request to the question generator failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Question generator returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("Question generator returned no questions")]
    NoQuestions,
    #[error("Missing prompt template: {0}")]
    MissingPrompt(String),
}

/// The scoring collaborator failed. Never fatal: the answer keeps its turn
/// and scores zero.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Request to the evaluator failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Evaluator returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("Evaluation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Missing prompt template: {0}")]
    MissingPrompt(String),
}

/// Answer capture produced no text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    #[error("Microphone permission was denied")]
    PermissionDenied,
    #[error("No speech was recognized")]
    NoSpeech,
    #[error("The capture source was closed")]
    Closed,
    #[error("Capture device error: {0}")]
    Device(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_answer_display() {
        let err = InterviewError::UnexpectedAnswer {
            index: 2,
            state: "Evaluating(2)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Answer for question 2 is not expected while the session is Evaluating(2)"
        );
    }

    #[test]
    fn test_generation_error_converts_into_interview_error() {
        let err: InterviewError = GenerationError::NoQuestions.into();
        assert!(matches!(
            err,
            InterviewError::Generation(GenerationError::NoQuestions)
        ));
        assert!(err.to_string().contains("no questions"));
    }
}
