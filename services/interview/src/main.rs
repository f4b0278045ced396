use anyhow::{Context, Result};
use clap::Parser;
use interview_core::audio::AnswerCapture;
use interview_core::{Interview, JobProfile, Step, assessor::generate_question_set};
use interview_service::build_assessors;
use interview_service::config::Config;
use interview_service::console::{ConsoleSpeaker, LineCapture, render_summary, run_commands};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Runs a spoken-style job interview in the terminal. Each answer is one line.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The role being interviewed for
    #[arg(long, required_unless_present = "profile")]
    job_title: Option<String>,
    #[arg(long)]
    job_description: Option<String>,
    #[arg(long)]
    organization: Option<String>,
    #[arg(long)]
    seniority: Option<String>,
    /// Comma-separated skills
    #[arg(long)]
    skills: Option<String>,
    /// Topic weighting, e.g. "algorithms: 40%, system design: 60%"
    #[arg(long)]
    topics: Option<String>,
    /// Number of questions to ask
    #[arg(long)]
    questions: Option<usize>,
    /// Load the job profile from a JSON file instead of flags
    #[arg(long, conflicts_with = "job_title")]
    profile: Option<PathBuf>,
}

impl Cli {
    fn job_profile(&self) -> Result<JobProfile> {
        let mut profile = match (&self.profile, &self.job_title) {
            (Some(path), _) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read profile: {}", path.display()))?;
                serde_json::from_str::<JobProfile>(&raw)
                    .with_context(|| format!("Invalid profile JSON: {}", path.display()))?
            }
            (None, Some(title)) => {
                let mut profile = JobProfile::new(title.clone());
                profile.job_description = self.job_description.clone();
                profile.organization = self.organization.clone();
                profile.seniority_level = self.seniority.clone();
                profile.skills = self.skills.clone();
                profile.topics_weightage = self.topics.clone();
                profile
            }
            (None, None) => anyhow::bail!("Either --job-title or --profile is required"),
        };
        if let Some(count) = self.questions {
            profile.question_count = count;
        }
        profile.validate()?;
        Ok(profile)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Configuration loaded successfully. Starting interview service...");

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();
    let profile = args.job_profile()?;

    // --- 4. Initialize Assessors and Questions ---
    let assessors = build_assessors(&config)?;
    let questions = generate_question_set(assessors.generator.as_ref(), &profile)
        .await
        .context("Failed to generate interview questions")?;
    tracing::info!("Prepared {} questions.", questions.len());

    // --- 5. Command Handler ---
    // The command channel decouples the interview logic from the terminal.
    let (command_tx, command_rx) = tokio::sync::mpsc::channel(32);
    let command_handle = tokio::spawn(run_commands(command_rx, Arc::new(ConsoleSpeaker)));

    let mut interview = Interview::new(assessors.evaluator.clone(), profile.job_context())
        .with_evaluation_timeout(config.evaluation_timeout)
        .with_commands(command_tx);

    // --- 6. Interview Loop ---
    let mut capture = LineCapture::stdin();
    let run = async {
        interview.start(questions).await?;
        loop {
            let answer = capture.capture_until_stop().await;
            if let Err(interview_core::CaptureError::Closed) = answer {
                anyhow::bail!("Input closed before the interview finished");
            }
            match interview.submit_capture(answer).await? {
                Step::Next { index, .. } => tracing::debug!("Moving to question {}", index + 1),
                Step::Finished(result) => return Ok(result),
            }
        }
    };

    let outcome = tokio::select! {
        outcome = run => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, ending the interview.");
            Err(anyhow::anyhow!("Interview interrupted"))
        }
    };

    // Closing the channel lets the command handler drain and exit.
    drop(interview);
    if let Err(e) = command_handle.await {
        tracing::error!("Command handler task failed: {:?}", e);
    }

    let result = outcome?;
    println!("\n{}", render_summary(&result));
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
