pub mod config;
pub mod console;
pub mod prompt_loader;

use crate::config::{Config, Provider};
use anyhow::{Context, Result};
use interview_core::assessor::{
    EVALUATE_ANSWER_PROMPT, Evaluator, GENERATE_QUESTIONS_PROMPT, LlmClient, LlmProvider,
    QuestionGenerator,
};
use interview_core::simulated::SimulatedAssessor;
use std::sync::Arc;

/// Prompt templates every live provider needs.
pub const REQUIRED_PROMPTS: &[&str] = &[GENERATE_QUESTIONS_PROMPT, EVALUATE_ANSWER_PROMPT];

/// The question generator and answer evaluator for one provider.
#[derive(Clone)]
pub struct Assessors {
    pub generator: Arc<dyn QuestionGenerator>,
    pub evaluator: Arc<dyn Evaluator>,
}

/// Builds the assessors for the configured provider. Live providers load
/// their prompt templates from `config.prompts_dir`.
pub fn build_assessors(config: &Config) -> Result<Assessors> {
    let (provider, api_key) = match config.provider {
        Provider::Simulated => {
            tracing::info!("Using the simulated assessor; no model calls will be made.");
            let simulated = Arc::new(SimulatedAssessor);
            return Ok(Assessors {
                generator: simulated.clone(),
                evaluator: simulated,
            });
        }
        Provider::OpenAI => (LlmProvider::OpenAI, config.openai_api_key.clone()),
        Provider::Gemini => (LlmProvider::Gemini, config.gemini_api_key.clone()),
    };
    let api_key = api_key.context("API key for the selected provider is not set")?;

    let prompts = prompt_loader::load_prompts(&config.prompts_dir, REQUIRED_PROMPTS)
        .context("Failed to load LLM prompts")?;
    tracing::info!("Loaded {} prompts successfully.", prompts.len());

    let client = Arc::new(LlmClient::new(
        provider,
        api_key,
        config.chat_model.clone(),
        prompts,
    ));
    tracing::info!("Using {:?} with model '{}'", provider, client.model());
    Ok(Assessors {
        generator: client.clone(),
        evaluator: client,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::JobProfile;
    use interview_core::assessor::generate_question_set;
    use std::path::PathBuf;

    fn config(provider: Provider, prompts_dir: PathBuf) -> Config {
        Config::from_vars(|key| match key {
            "LLM_PROVIDER" => Some(
                match provider {
                    Provider::OpenAI => "openai",
                    Provider::Gemini => "gemini",
                    Provider::Simulated => "simulated",
                }
                .to_string(),
            ),
            "OPENAI_API_KEY" | "GEMINI_API_KEY" => Some("test-key".to_string()),
            "PROMPTS_DIR" => Some(prompts_dir.display().to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_simulated_assessors_need_no_prompts() {
        let config = config(Provider::Simulated, PathBuf::from("does-not-exist"));
        let assessors = build_assessors(&config).unwrap();

        let set = generate_question_set(assessors.generator.as_ref(), &JobProfile::new("SRE"))
            .await
            .unwrap();
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_live_provider_requires_prompts() {
        let missing = config(Provider::OpenAI, PathBuf::from("does-not-exist"));
        assert!(build_assessors(&missing).is_err());

        let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../prompts");
        assert!(build_assessors(&config(Provider::Gemini, bundled)).is_ok());
    }
}
