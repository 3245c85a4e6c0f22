//! Ports between the classification core and its adapters.
//!
//! Image sources feed the batch pipeline; outputs and progress sinks receive
//! what it produces. Front-ends supply the implementations.

mod image_source;
mod progress;
mod result_output;

pub use image_source::ImageSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
