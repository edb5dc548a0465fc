use super::generation::GenerationParams;
use super::TextGenerator;
use crate::error::{Error, Result};

/// Outcome of one prompt: generated text, or a message to show in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Completed(String),
    Failed(String),
}

impl Generation {
    pub fn text(&self) -> &str {
        match self {
            Generation::Completed(text) | Generation::Failed(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Generation::Failed(_))
    }
}

impl From<Result<String>> for Generation {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Generation::Completed(text),
            Err(e) => {
                tracing::warn!("generation failed: {}", e);
                Generation::Failed(format!("Error: {e}"))
            }
        }
    }
}

/// tokenize -> generate -> decode; the first returned sequence is decoded.
pub fn complete(
    generator: &dyn TextGenerator,
    prompt: &str,
    params: &GenerationParams,
) -> Result<String> {
    let input = generator.tokenize(prompt)?;
    let output = generator.generate(&input, params)?;
    let first = output
        .sequences
        .first()
        .ok_or_else(|| Error::Generation("no sequence was generated".to_string()))?;
    generator.decode(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{EncodedInput, EncodedOutput};

    struct Echo {
        sequences: usize,
    }

    impl TextGenerator for Echo {
        fn model_id(&self) -> &str {
            "echo"
        }

        fn tokenize(&self, text: &str) -> Result<EncodedInput> {
            Ok(EncodedInput {
                ids: text.bytes().map(u32::from).collect(),
            })
        }

        fn generate(&self, input: &EncodedInput, _: &GenerationParams) -> Result<EncodedOutput> {
            if input.ids.is_empty() {
                return Err(Error::Generation("empty prompt".to_string()));
            }
            let mut ids = input.ids.clone();
            ids.extend(b"!".iter().map(|&b| u32::from(b)));
            Ok(EncodedOutput {
                sequences: vec![ids; self.sequences],
            })
        }

        fn decode(&self, ids: &[u32]) -> Result<String> {
            Ok(ids.iter().filter_map(|&i| char::from_u32(i)).collect())
        }
    }

    fn run(generator: &dyn TextGenerator, prompt: &str) -> Generation {
        complete(generator, prompt, &GenerationParams::default()).into()
    }

    #[test]
    fn completes_prompt() {
        let out = run(&Echo { sequences: 2 }, "Hello");
        assert_eq!(out, Generation::Completed("Hello!".to_string()));
        assert!(!out.is_error());
    }

    #[test]
    fn failures_become_messages() {
        let out = run(&Echo { sequences: 1 }, "");
        assert!(out.is_error());
        assert!(out.text().contains("empty prompt"));
    }

    #[test]
    fn no_sequences_is_a_failure() {
        let out = run(&Echo { sequences: 0 }, "Hi");
        assert!(out.text().contains("no sequence"));
    }
}
