use crate::error::CaptureError;
use anyhow::Result;
use async_trait::async_trait;

/// Plays interviewer speech. Callers do not wait for playback to finish
/// before moving the interview on.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Turns one recording window into the candidate's final answer text.
#[async_trait]
pub trait AnswerCapture: Send {
    async fn capture_until_stop(&mut self) -> Result<String, CaptureError>;
}
