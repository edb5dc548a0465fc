pub mod generation;
pub mod load_llm;
pub mod predict;
mod util;

use crate::error::{Error, Result};
use crate::settings::Credentials;
use candle_core::{DType, Device, Tensor};
use candle_transformers::models::llama::{Cache, Config, Llama};
use generation::GenerationParams;
use serde::Deserialize;
use std::time::Instant;
use tokenizers::Tokenizer;

pub const DEFAULT_MODEL_ID: &str = "meta-llama/Llama-3.2-1B";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LLMCfg {
    pub model_id: String,
    pub revision: String,
    /// Load from this directory instead of the hub.
    pub model_dir: Option<String>,
    pub cache_dir: Option<String>,
    pub use_cpu: bool,
    pub dtype: Option<String>,
    pub use_kv_cache: bool,
    pub use_flash_attn: bool,
    pub generation: GenerationParams,
}

impl Default for LLMCfg {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: "main".to_string(),
            model_dir: None,
            cache_dir: None,
            use_cpu: false,
            dtype: None,
            use_kv_cache: true,
            use_flash_attn: false,
            generation: GenerationParams::default(),
        }
    }
}

/// Token ids of one encoded prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    pub ids: Vec<u32>,
}

/// One or more completed sequences, prompt tokens included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub sequences: Vec<Vec<u32>>,
}

/// A loaded tokenizer + causal language model pair.
///
/// Implementations are shared across request handlers and must tolerate
/// concurrent calls.
pub trait TextGenerator: Send + Sync {
    fn model_id(&self) -> &str;

    fn tokenize(&self, text: &str) -> Result<EncodedInput>;

    fn generate(&self, input: &EncodedInput, params: &GenerationParams) -> Result<EncodedOutput>;

    /// Special tokens are dropped.
    fn decode(&self, ids: &[u32]) -> Result<String>;
}

pub struct LLM {
    pub model_id: String,
    pub device: Device,
    pub dtype: DType,
    pub model: Llama,
    pub config: Config,
    pub tokenizer: Tokenizer,
    pub eos_token_ids: Vec<u32>,
    pub use_kv_cache: bool,
}

impl LLM {
    /// Blocking; fetches artifacts if needed and maps every failure to
    /// `Error::ModelLoad`.
    pub fn new(cfg: &LLMCfg, credentials: &Credentials) -> Result<Self> {
        Self::load(cfg, credentials).map_err(|e| match e {
            Error::ModelLoad(_) => e,
            other => Error::ModelLoad(other.to_string()),
        })
    }

    fn load(cfg: &LLMCfg, credentials: &Credentials) -> Result<Self> {
        let start = Instant::now();
        let device = load_llm::device(cfg.use_cpu)?;
        let dtype = load_llm::dtype(cfg.dtype.as_deref(), &device)?;
        tracing::info!("using device {:?} with dtype {:?}", device, dtype);

        let files = load_llm::resolve_files(cfg, credentials)?;
        let tokenizer = load_llm::load_tokenizer(&files.tokenizer)?;
        let config = load_llm::load_config(&files.config, cfg.use_flash_attn)?;

        tracing::info!("initializing model from {} weight files", files.weights.len());
        let vb = util::from_mmaped_safetensors(&files.weights, dtype, &device, false)?;
        let model = Llama::load(vb, &config)?;
        let eos_token_ids = load_llm::eos_token_ids(&config, &tokenizer);

        tracing::info!(
            "model {} loaded in {:.1}s",
            cfg.model_id,
            start.elapsed().as_secs_f64()
        );
        Ok(Self {
            model_id: cfg.model_id.clone(),
            device,
            dtype,
            model,
            config,
            tokenizer,
            eos_token_ids,
            use_kv_cache: cfg.use_kv_cache,
        })
    }

    fn forward(&self, ctxt: &[u32], index_pos: usize, cache: &mut Cache) -> Result<Tensor> {
        let input = Tensor::new(ctxt, &self.device)?.unsqueeze(0)?;
        let logits = self.model.forward(&input, index_pos, cache)?;
        Ok(logits.squeeze(0)?)
    }
}

impl TextGenerator for LLM {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn tokenize(&self, text: &str) -> Result<EncodedInput> {
        let encoding = self.tokenizer.encode(text, true).map_err(Error::tokenizer)?;
        Ok(EncodedInput {
            ids: encoding.get_ids().to_vec(),
        })
    }

    fn generate(&self, input: &EncodedInput, params: &GenerationParams) -> Result<EncodedOutput> {
        let start = Instant::now();
        let mut logits_processor = params.logits_processor();
        let mut sequences = Vec::with_capacity(params.num_return_sequences);

        for _ in 0..params.num_return_sequences {
            // each sequence owns its cache; the weights are only read
            let mut cache = Cache::new(self.use_kv_cache, self.dtype, &self.config, &self.device)?;
            let tokens = generation::sample_sequence(
                &input.ids,
                params,
                &self.eos_token_ids,
                self.use_kv_cache,
                &mut logits_processor,
                |ctxt, index_pos| self.forward(ctxt, index_pos, &mut cache),
            )?;
            sequences.push(tokens);
        }

        let generated: usize = sequences.iter().map(|s| s.len() - input.ids.len()).sum();
        tracing::info!(
            "{} prompt tokens, {} tokens generated in {:.2}s",
            input.ids.len(),
            generated,
            start.elapsed().as_secs_f64()
        );
        Ok(EncodedOutput { sequences })
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer.decode(ids, true).map_err(Error::tokenizer)
    }
}
