use crate::error::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use serde::Deserialize;
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};
use tqdm::Iter;

/// Load every tensor of the memory-mapped safetensors `paths` onto `device`
/// and wrap them in a `VarBuilder`.
/// Set `silent` to not show a progress bar.
pub fn from_mmaped_safetensors<P: AsRef<Path>>(
    paths: &[P],
    dtype: DType,
    device: &Device,
    silent: bool,
) -> Result<VarBuilder<'static>> {
    let tensors = unsafe { candle_core::safetensors::MmapedSafetensors::multi(paths)? };
    let names: Vec<String> = tensors.tensors().into_iter().map(|(name, _)| name).collect();

    let mut ws = HashMap::with_capacity(names.len());
    if silent {
        for name in names {
            let tensor = load_one(&tensors, &name, dtype, device)?;
            ws.insert(name, tensor);
        }
    } else {
        for name in names.into_iter().tqdm() {
            let tensor = load_one(&tensors, &name, dtype, device)?;
            ws.insert(name, tensor);
        }
    }

    Ok(VarBuilder::from_tensors(ws, dtype, device))
}

fn load_one(
    tensors: &candle_core::safetensors::MmapedSafetensors,
    name: &str,
    dtype: DType,
    device: &Device,
) -> Result<Tensor> {
    Ok(tensors.load(name, device)?.to_dtype(dtype)?)
}

#[derive(Debug, Deserialize)]
struct SafetensorsIndex {
    weight_map: HashMap<String, String>,
}

/// Shard file names listed in a `model.safetensors.index.json`, deduplicated
/// and sorted.
pub fn shard_names(index_file: &Path) -> Result<Vec<String>> {
    let index: SafetensorsIndex = serde_json::from_slice(&fs::read(index_file)?)?;
    let mut names: Vec<String> = index
        .weight_map
        .into_values()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    names.sort();
    Ok(names)
}
