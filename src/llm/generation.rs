use crate::error::{Error, Result};
use candle_core::Tensor;
use candle_transformers::generation::{LogitsProcessor, Sampling};
use serde::Deserialize;
use validator::Validate;

/// Sampling controls for a single `generate` call.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct GenerationParams {
    /// Upper bound on prompt + generated tokens.
    #[validate(range(min = 1))]
    pub max_length: usize,
    #[validate(range(min = 0.0))]
    pub temperature: f64,
    pub top_k: Option<usize>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: Option<f64>,
    #[validate(range(min = 1, max = 16))]
    pub num_return_sequences: usize,
    pub seed: Option<u64>,
    #[validate(range(min = 0.01))]
    pub repeat_penalty: f32,
    pub repeat_last_n: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            temperature: 0.4,
            top_k: Some(50),
            top_p: Some(0.95),
            num_return_sequences: 1,
            seed: None,
            repeat_penalty: 1.0,
            repeat_last_n: 64,
        }
    }
}

impl GenerationParams {
    pub fn sampling(&self) -> Sampling {
        let temperature = self.temperature;
        // a zero nucleus keeps only the most likely token
        if temperature <= 0. || self.top_p.is_some_and(|p| p <= 0.) {
            return Sampling::ArgMax;
        }
        let top_k = self.top_k.filter(|&k| k > 0);
        let top_p = self.top_p.filter(|&p| p < 1.0);
        match (top_k, top_p) {
            (None, None) => Sampling::All { temperature },
            (Some(k), None) => Sampling::TopK { k, temperature },
            (None, Some(p)) => Sampling::TopP { p, temperature },
            (Some(k), Some(p)) => Sampling::TopKThenTopP { k, p, temperature },
        }
    }

    pub fn logits_processor(&self) -> LogitsProcessor {
        let seed = self.seed.unwrap_or_else(rand::random);
        LogitsProcessor::from_sampling(seed, self.sampling())
    }
}

/// Runs the autoregressive loop for one sequence.
///
/// `forward` receives the tokens to feed and their starting position and
/// returns the logits of the last position as a rank-1 tensor. With the KV
/// cache enabled only the newest token is fed after the first step.
pub fn sample_sequence<F>(
    prompt: &[u32],
    params: &GenerationParams,
    eos_token_ids: &[u32],
    use_kv_cache: bool,
    logits_processor: &mut LogitsProcessor,
    mut forward: F,
) -> Result<Vec<u32>>
where
    F: FnMut(&[u32], usize) -> Result<Tensor>,
{
    if prompt.is_empty() {
        return Err(Error::Generation("input encodes to zero tokens".to_string()));
    }
    if prompt.len() > params.max_length {
        return Err(Error::Generation(format!(
            "input is {} tokens long, more than max_length {}",
            prompt.len(),
            params.max_length
        )));
    }

    let mut tokens = prompt.to_vec();
    let mut index_pos = 0;
    let budget = params.max_length - prompt.len();

    for index in 0..budget {
        let (context_size, context_index) = if use_kv_cache && index > 0 {
            (1, index_pos)
        } else {
            (tokens.len(), 0)
        };
        let ctxt = &tokens[tokens.len().saturating_sub(context_size)..];
        let logits = forward(ctxt, context_index)?;
        let logits = if params.repeat_penalty == 1. {
            logits
        } else {
            let start_at = tokens.len().saturating_sub(params.repeat_last_n);
            candle_transformers::utils::apply_repeat_penalty(
                &logits,
                params.repeat_penalty,
                &tokens[start_at..],
            )?
        };
        index_pos += ctxt.len();

        let next_token = logits_processor.sample(&logits)?;
        tokens.push(next_token);
        if eos_token_ids.contains(&next_token) {
            break;
        }
    }

    Ok(tokens)
}
