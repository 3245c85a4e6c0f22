//! Model loading from safetensors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use tracing::{debug, info};

use super::{Classifier, LesionCnn, LesionCnnConfig};
use crate::error::LesionError;

/// A classifier that loads its weights on first use.
///
/// The outcome of the first load, success or failure, is cached; a failed
/// load is reported as [`LesionError::ModelUnavailable`] on every call.
pub struct LazyClassifier {
    path: PathBuf,
    device: Device,
    config: LesionCnnConfig,
    model: OnceLock<Result<LesionCnn, String>>,
}

impl LazyClassifier {
    /// Creates a lazy classifier for the weights at `path`.
    ///
    /// Nothing is read until the first call to [`Classifier::infer`].
    #[must_use]
    pub fn new(path: impl AsRef<Path>, device: Device) -> Self {
        Self::with_config(path, device, LesionCnnConfig::default())
    }

    /// Creates a lazy classifier with a custom network shape.
    #[must_use]
    pub fn with_config(path: impl AsRef<Path>, device: Device, config: LesionCnnConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            device,
            config,
            model: OnceLock::new(),
        }
    }

    /// Path the weights are loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the model has been loaded successfully.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.model.get(), Some(Ok(_)))
    }

    /// Gets the model, loading it if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`LesionError::ModelUnavailable`] if the weights cannot be read
    /// or do not fit the network.
    pub fn get(&self) -> Result<&LesionCnn, LesionError> {
        self.model
            .get_or_init(|| self.load().map_err(|e| format!("{e:#}")))
            .as_ref()
            .map_err(|e| LesionError::ModelUnavailable(e.clone()))
    }

    fn load(&self) -> Result<LesionCnn> {
        info!("Loading lesion classifier from {}", self.path.display());
        let vb = load_safetensors(&self.path, &self.device)?;
        LesionCnn::new(vb, self.config)
            .with_context(|| format!("Invalid model weights: {}", self.path.display()))
    }
}

impl Classifier for LazyClassifier {
    fn infer(&self, input: &Tensor) -> crate::error::Result<Vec<f32>> {
        self.get()?.infer(input)
    }
}

/// Loads a safetensors file and creates a `VarBuilder` for the model.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The safetensors data is invalid
/// - A tensor uses a dtype candle does not support
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading safetensors from {}", path.display());

    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;

    let tensors = SafeTensors::deserialize(&data)
        .with_context(|| format!("Failed to parse safetensors: {}", path.display()))?;

    let mut tensor_map: HashMap<String, Tensor> = HashMap::new();

    for name in tensors.names() {
        let view = tensors
            .tensor(name)
            .with_context(|| format!("Failed to get tensor '{name}'"))?;

        let dtype = safetensors_dtype_to_candle(view.dtype())?;
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, &view.shape().to_vec(), device)
            .with_context(|| format!("Failed to create tensor '{name}'"))?;

        tensor_map.insert(name.clone(), tensor);
    }

    debug!("Loaded {} tensors", tensor_map.len());
    Ok(VarBuilder::from_tensors(tensor_map, DType::F32, device))
}

/// Converts safetensors dtype to candle dtype.
fn safetensors_dtype_to_candle(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype as S;
    match dtype {
        S::F32 => Ok(DType::F32),
        S::F64 => Ok(DType::F64),
        S::F16 => Ok(DType::F16),
        S::BF16 => Ok(DType::BF16),
        S::I64 => Ok(DType::I64),
        S::U8 => Ok(DType::U8),
        S::U32 => Ok(DType::U32),
        other => anyhow::bail!("Unsupported dtype: {other:?}"),
    }
}
