//! Device selection for inference.

use candle_core::Device;
use tracing::info;

/// Returns the best available device for inference.
///
/// Uses Metal or CUDA when the matching cargo feature is enabled and a device
/// is present, falling back to CPU.
#[must_use]
pub fn get_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Using Metal device for lesion classification");
            return device;
        }
    }

    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Using CUDA device for lesion classification");
            return device;
        }
    }

    info!("Using CPU for lesion classification");
    Device::Cpu
}
