//! Convolutional lesion classifier.
//!
//! Mirrors the network built by the training script: two 3x3 conv blocks with
//! max pooling, a 128-unit dense layer and a softmax head. Weights are loaded
//! from safetensors exported from that network.

use anyhow::{ensure, Result};
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{conv2d, linear, ops::softmax, Conv2d, Conv2dConfig, Linear, VarBuilder};

use super::Classifier;
use crate::domain::DiseaseLabel;
use crate::preprocess::{INPUT_CHANNELS, INPUT_SIZE};

const CONV1_CHANNELS: usize = 32;
const CONV2_CHANNELS: usize = 64;
const HIDDEN_UNITS: usize = 128;
const KERNEL: usize = 3;

/// Shape parameters of [`LesionCnn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LesionCnnConfig {
    /// Side length of the square input.
    pub input_size: usize,
    /// Number of output classes.
    pub num_classes: usize,
}

impl Default for LesionCnnConfig {
    fn default() -> Self {
        Self {
            input_size: INPUT_SIZE,
            num_classes: DiseaseLabel::COUNT,
        }
    }
}

impl LesionCnnConfig {
    /// Spatial side length after both conv + pool blocks.
    ///
    /// Each block is a valid 3x3 convolution followed by a 2x2 pool:
    /// 224 -> 222 -> 111 -> 109 -> 54.
    #[must_use]
    pub const fn feature_side(&self) -> usize {
        let after_first = (self.input_size.saturating_sub(KERNEL - 1)) / 2;
        (after_first.saturating_sub(KERNEL - 1)) / 2
    }

    /// Length of the flattened feature vector fed to the dense layer.
    #[must_use]
    pub const fn flat_features(&self) -> usize {
        let side = self.feature_side();
        CONV2_CHANNELS * side * side
    }
}

/// Lesion classifier model.
///
/// Input: `(1, H, W, 3)` NHWC tensor in `[0, 1]`
/// Output: `(1, num_classes)` softmax probabilities
pub struct LesionCnn {
    conv1: Conv2d,
    conv2: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl LesionCnn {
    /// Creates the classifier from weights.
    ///
    /// Expects tensors `conv1.*`, `conv2.*`, `fc1.*` and `fc2.*`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input size is too small for the network or if
    /// weights are missing or have the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder, config: LesionCnnConfig) -> Result<Self> {
        ensure!(
            config.feature_side() > 0,
            "input size {} is too small for the network",
            config.input_size
        );
        let device = vb.device().clone();

        let conv1 = conv2d(
            INPUT_CHANNELS,
            CONV1_CHANNELS,
            KERNEL,
            Conv2dConfig::default(),
            vb.pp("conv1"),
        )?;
        let conv2 = conv2d(
            CONV1_CHANNELS,
            CONV2_CHANNELS,
            KERNEL,
            Conv2dConfig::default(),
            vb.pp("conv2"),
        )?;
        let fc1 = linear(config.flat_features(), HIDDEN_UNITS, vb.pp("fc1"))?;
        let fc2 = linear(HIDDEN_UNITS, config.num_classes, vb.pp("fc2"))?;

        Ok(Self {
            conv1,
            conv2,
            fc1,
            fc2,
            device,
        })
    }

    /// Runs the network and returns class probabilities for a single image.
    ///
    /// # Errors
    ///
    /// Returns an error if the input shape does not match or inference fails.
    pub fn classify(&self, input: &Tensor) -> candle_core::Result<Vec<f32>> {
        let input = input.to_device(&self.device)?;
        let probs = self.forward(&input)?;
        probs.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()
    }
}

impl Module for LesionCnn {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        // NHWC -> NCHW for candle convolutions
        let x = x.permute((0, 3, 1, 2))?.contiguous()?;

        let x = self.conv1.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv2.forward(&x)?.relu()?.max_pool2d(2)?;

        // Flatten in NHWC order to match Keras-exported dense weights
        let x = x.permute((0, 2, 3, 1))?.contiguous()?.flatten_from(1)?;

        let x = self.fc1.forward(&x)?.relu()?;
        let x = self.fc2.forward(&x)?;
        softmax(&x, 1)
    }
}

impl Classifier for LesionCnn {
    fn infer(&self, input: &Tensor) -> crate::error::Result<Vec<f32>> {
        Ok(self.classify(input)?)
    }
}
