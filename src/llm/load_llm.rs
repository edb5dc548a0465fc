use super::util;
use super::LLMCfg;
use crate::error::{Error, Result};
use crate::settings::Credentials;
use candle_core::{
    utils::{cuda_is_available, metal_is_available},
    DType, Device,
};
use candle_transformers::models::llama::{Config, LlamaConfig, LlamaEosToks};
use hf_hub::{
    api::sync::{ApiBuilder, ApiRepo},
    Cache, Repo, RepoType,
};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

/// Local paths of everything needed to build the model.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub tokenizer: PathBuf,
    pub config: PathBuf,
    pub weights: Vec<PathBuf>,
}

pub fn device(cpu: bool) -> Result<Device> {
    if cpu {
        Ok(Device::Cpu)
    } else if cuda_is_available() {
        Ok(Device::new_cuda(0)?)
    } else if metal_is_available() {
        Ok(Device::new_metal(0)?)
    } else {
        #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
        {
            tracing::info!("Running on CPU, to run on GPU(metal), build with `--features metal`");
        }
        #[cfg(not(all(target_os = "macos", target_arch = "aarch64")))]
        {
            tracing::info!("Running on CPU, to run on GPU, build with `--features cuda`");
        }
        Ok(Device::Cpu)
    }
}

pub fn dtype(name: Option<&str>, device: &Device) -> Result<DType> {
    match name {
        Some("f16") => Ok(DType::F16),
        Some("bf16") => Ok(DType::BF16),
        Some("f32") => Ok(DType::F32),
        Some(other) => Err(Error::Configuration(format!("unsupported dtype {other}"))),
        None if device.is_cpu() => Ok(DType::F32),
        None => Ok(DType::F16),
    }
}

pub fn resolve_files(cfg: &LLMCfg, credentials: &Credentials) -> Result<ModelFiles> {
    match &cfg.model_dir {
        Some(dir) => local_files(Path::new(dir)),
        None => hub_files(cfg, credentials),
    }
}

pub fn local_files(dir: &Path) -> Result<ModelFiles> {
    tracing::info!("loading model files from {}", dir.display());
    let weights = crate::utility::find_files_with_extension(dir, "safetensors")?;
    if weights.is_empty() {
        return Err(Error::ModelLoad(format!(
            "no .safetensors files under {}",
            dir.display()
        )));
    }
    Ok(ModelFiles {
        tokenizer: dir.join("tokenizer.json"),
        config: dir.join("config.json"),
        weights,
    })
}

fn hub_files(cfg: &LLMCfg, credentials: &Credentials) -> Result<ModelFiles> {
    tracing::info!(
        "fetching {} (revision {}) from the hub",
        cfg.model_id,
        cfg.revision
    );
    let builder = match &cfg.cache_dir {
        Some(dir) => ApiBuilder::from_cache(Cache::new(PathBuf::from(dir))),
        None => ApiBuilder::new(),
    };
    let api = builder
        .with_token(Some(credentials.hf_token().to_string()))
        .build()?;
    let repo = api.repo(Repo::with_revision(
        cfg.model_id.clone(),
        RepoType::Model,
        cfg.revision.clone(),
    ));

    Ok(ModelFiles {
        tokenizer: repo.get("tokenizer.json")?,
        config: repo.get("config.json")?,
        weights: hub_weights(&repo)?,
    })
}

fn hub_weights(repo: &ApiRepo) -> Result<Vec<PathBuf>> {
    match repo.get("model.safetensors.index.json") {
        Ok(index) => util::shard_names(&index)?
            .iter()
            .map(|name| repo.get(name).map_err(Error::from))
            .collect(),
        Err(_) => Ok(vec![repo.get("model.safetensors")?]),
    }
}

pub fn load_tokenizer(file: &Path) -> Result<Tokenizer> {
    tracing::info!("loading tokenizer from {}", file.display());
    Tokenizer::from_file(file).map_err(Error::tokenizer)
}

pub fn load_config(file: &Path, use_flash_attn: bool) -> Result<Config> {
    let config: LlamaConfig = serde_json::from_slice(&std::fs::read(file)?)?;
    Ok(config.into_config(use_flash_attn))
}

/// End-of-sequence ids from the model config, or looked up in the tokenizer
/// vocabulary when the config carries none.
pub fn eos_token_ids(config: &Config, tokenizer: &Tokenizer) -> Vec<u32> {
    match &config.eos_token_id {
        Some(LlamaEosToks::Single(id)) => vec![*id],
        Some(LlamaEosToks::Multiple(ids)) => ids.clone(),
        None => ["<|end_of_text|>", "<|eot_id|>", "</s>"]
            .iter()
            .filter_map(|t| tokenizer.token_to_id(t))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_defaults_by_device() {
        assert_eq!(dtype(None, &Device::Cpu).unwrap(), DType::F32);
        assert_eq!(dtype(Some("bf16"), &Device::Cpu).unwrap(), DType::BF16);
        assert!(matches!(
            dtype(Some("int8"), &Device::Cpu),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn cpu_is_honoured() {
        assert!(device(true).unwrap().is_cpu());
    }

    #[test]
    fn local_dir_without_weights_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(local_files(dir.path()), Err(Error::ModelLoad(_))));
    }

    #[test]
    fn local_dir_layout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.safetensors"), b"").unwrap();
        let files = local_files(dir.path()).unwrap();
        assert_eq!(files.tokenizer, dir.path().join("tokenizer.json"));
        assert_eq!(files.config, dir.path().join("config.json"));
        assert_eq!(files.weights, vec![dir.path().join("model.safetensors")]);
    }
}
