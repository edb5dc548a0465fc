use llm_form::error::{Error, Result};
use llm_form::llm::{generation::GenerationParams, EncodedInput, EncodedOutput, TextGenerator};

pub const BOS: u32 = 1_000;
pub const CONTINUATION: &str = " and welcome";

/// Byte-level stand-in for a real model: appends a fixed continuation,
/// bounded by `max_length`.
pub struct FakeGenerator;

impl TextGenerator for FakeGenerator {
    fn model_id(&self) -> &str {
        llm_form::llm::DEFAULT_MODEL_ID
    }

    fn tokenize(&self, text: &str) -> Result<EncodedInput> {
        let mut ids = vec![BOS];
        ids.extend(text.bytes().map(u32::from));
        Ok(EncodedInput { ids })
    }

    fn generate(&self, input: &EncodedInput, params: &GenerationParams) -> Result<EncodedOutput> {
        if input.ids.len() <= 1 {
            return Err(Error::Generation("nothing to continue".to_string()));
        }
        let mut ids = input.ids.clone();
        ids.extend(CONTINUATION.bytes().map(u32::from));
        ids.truncate(params.max_length);
        Ok(EncodedOutput {
            sequences: vec![ids; params.num_return_sequences],
        })
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        let bytes: Vec<u8> = ids
            .iter()
            .filter(|&&id| id != BOS)
            .map(|&id| id as u8)
            .collect();
        String::from_utf8(bytes).map_err(Error::tokenizer)
    }
}

/// Fails every generation.
pub struct BrokenGenerator;

impl TextGenerator for BrokenGenerator {
    fn model_id(&self) -> &str {
        "broken"
    }

    fn tokenize(&self, text: &str) -> Result<EncodedInput> {
        FakeGenerator.tokenize(text)
    }

    fn generate(&self, _: &EncodedInput, _: &GenerationParams) -> Result<EncodedOutput> {
        Err(Error::Generation("out of memory".to_string()))
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        FakeGenerator.decode(ids)
    }
}
