//! Terminal stand-ins for the speaker and the microphone.

use anyhow::Result;
use async_trait::async_trait;
use interview_core::audio::{AnswerCapture, AudioOutput};
use interview_core::{CaptureError, Command, FinalResult, Speaker};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::mpsc;

/// Prints interviewer speech to stdout.
pub struct ConsoleSpeaker;

#[async_trait]
impl AudioOutput for ConsoleSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        println!("\nInterviewer: {text}");
        Ok(())
    }
}

/// Reads one answer per line. Pressing enter is the "stop recording" signal.
pub struct LineCapture<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin + Send> LineCapture<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl LineCapture<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> AnswerCapture for LineCapture<R> {
    async fn capture_until_stop(&mut self) -> Result<String, CaptureError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| CaptureError::Device(e.to_string()))?;
        if read == 0 {
            return Err(CaptureError::Closed);
        }
        let answer = line.trim();
        if answer.is_empty() {
            return Err(CaptureError::NoSpeech);
        }
        Ok(answer.to_string())
    }
}

/// Performs the interview's side effects until the command channel closes.
pub async fn run_commands(mut command_rx: mpsc::Receiver<Command>, output: Arc<dyn AudioOutput>) {
    while let Some(command) = command_rx.recv().await {
        match command {
            Command::SpeakText(text) => {
                tracing::debug!("COMMAND RECEIVED: Speak Text: '{}'", text);
                if let Err(e) = output.speak(&text).await {
                    tracing::error!("Failed to speak text: {:?}", e);
                }
            }
            Command::Transcript(entry) => {
                let who = match entry.speaker {
                    Speaker::Interviewer => "interviewer",
                    Speaker::Candidate => "candidate",
                };
                tracing::info!(speaker = who, "{}", entry.text);
            }
            Command::SessionComplete(message) => {
                tracing::info!("COMMAND RECEIVED: Session Complete");
                if let Err(e) = output.speak(&message).await {
                    tracing::error!("Failed to speak closing message: {:?}", e);
                }
            }
        }
    }
}

/// A human-readable report of the final result.
pub fn render_summary(result: &FinalResult) -> String {
    let mut lines = vec![
        format!("Final score: {}/100", result.final_score),
        format!(
            "Points: {:.1} of {:.1}",
            result.total_earned, result.total_possible
        ),
    ];
    if !result.topic_breakdown.is_empty() {
        lines.push("Topics:".to_string());
        lines.extend(
            result
                .topic_breakdown
                .iter()
                .map(|(topic, score)| match score.ratio() {
                    Some(ratio) => format!(
                        "  {topic}: {:.1}/{:.1} ({:.0}%)",
                        score.earned,
                        score.possible,
                        ratio * 100.0
                    ),
                    None => format!("  {topic}: unweighted"),
                }),
        );
    }
    for (heading, items) in [
        ("Strengths", &result.strengths),
        ("Improvements", &result.improvements),
    ] {
        if !items.is_empty() {
            lines.push(format!("{heading}:"));
            lines.extend(items.iter().map(|item| format!("  - {item}")));
        }
    }
    if !result.feedback.is_empty() {
        lines.push(format!("Feedback: {}", result.feedback));
    }
    lines.push(String::new());
    lines.join("\n")
}
