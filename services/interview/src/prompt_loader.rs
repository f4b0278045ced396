use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reads every `*.md` file in `dir_path` into a map keyed by file stem, then
/// checks that each of the `required` templates is present.
pub fn load_prompts(dir_path: &Path, required: &[&str]) -> Result<HashMap<String, String>> {
    let mut prompts = HashMap::new();

    for entry in fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read prompts directory: {}", dir_path.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            let prompt_key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem for prompt file")?
                .to_string();

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;

            prompts.insert(prompt_key, content);
        }
    }

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| !prompts.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        bail!(
            "Missing prompt templates in {}: {}",
            dir_path.display(),
            missing.join(", ")
        );
    }

    Ok(prompts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::assessor::{EVALUATE_ANSWER_PROMPT, GENERATE_QUESTIONS_PROMPT};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_prompts_successfully() -> Result<()> {
        let dir = tempdir()?;
        let dir_path = dir.path();

        // `{{...}}` in `writeln!` writes a single-brace placeholder to the file.
        let mut file1 = File::create(dir_path.join("evaluate_answer.md"))?;
        writeln!(file1, "Question: {{question}}")?;

        let mut file2 = File::create(dir_path.join("generate_questions.md"))?;
        writeln!(file2, "Generate {{count}} questions.")?;

        // Not a markdown file; ignored.
        let mut ignored_file = File::create(dir_path.join("config.txt"))?;
        writeln!(ignored_file, "some config")?;

        std::fs::create_dir(dir_path.join("subdir"))?;

        let prompts = load_prompts(dir_path, &[GENERATE_QUESTIONS_PROMPT, EVALUATE_ANSWER_PROMPT])?;

        assert_eq!(prompts.len(), 2, "Should only load .md files");
        assert_eq!(
            prompts.get("evaluate_answer").unwrap(),
            "Question: {question}\n"
        );
        assert!(prompts.get("config").is_none());

        Ok(())
    }

    #[test]
    fn test_missing_required_prompt_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let mut file = File::create(dir.path().join("generate_questions.md"))?;
        writeln!(file, "Generate questions.")?;

        let err = load_prompts(dir.path(), &[GENERATE_QUESTIONS_PROMPT, EVALUATE_ANSWER_PROMPT])
            .unwrap_err();
        assert!(err.to_string().contains("evaluate_answer"));
        Ok(())
    }

    #[test]
    fn test_load_prompts_from_nonexistent_dir() {
        let dir_path = Path::new("nonexistent_dir_for_testing_prompts");
        assert!(load_prompts(dir_path, &[]).is_err());
    }

    #[test]
    fn test_bundled_prompts_have_placeholders() -> Result<()> {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../prompts");
        let prompts = load_prompts(&dir, &[GENERATE_QUESTIONS_PROMPT, EVALUATE_ANSWER_PROMPT])?;

        let generate = &prompts[GENERATE_QUESTIONS_PROMPT];
        for placeholder in ["{count}", "{job_title}", "{job_description}", "{topics_section}"] {
            assert!(generate.contains(placeholder), "missing {placeholder}");
        }
        let evaluate = &prompts[EVALUATE_ANSWER_PROMPT];
        for placeholder in ["{job_context}", "{scoring_context}", "{question}", "{answer}"] {
            assert!(evaluate.contains(placeholder), "missing {placeholder}");
        }
        Ok(())
    }
}
