pub mod answer;
pub mod assessor;
pub mod audio;
pub mod error;
pub mod interview;
pub mod job;
pub mod question;
pub mod scoring;
pub mod session_state;
pub mod simulated;

pub use answer::{AnswerRecord, Evaluation};
pub use error::{CaptureError, EvaluationError, GenerationError, InterviewError};
pub use interview::{Interview, Step};
pub use job::JobProfile;
pub use question::{Question, QuestionSet};
pub use scoring::{FinalResult, TopicScore};

/// Who said a line of the interview transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Side effects the interview asks its runtime to perform.
///
/// The core never plays audio or renders anything itself; it sends these
/// over a channel and keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Speak the given text to the candidate.
    SpeakText(String),
    /// Append a line to the visible transcript.
    Transcript(TranscriptEntry),
    /// The interview is over, with a closing message.
    SessionComplete(String),
}
