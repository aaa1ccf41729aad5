//! GestureWatch: motion-triggered gesture capture and classification.
//!
//! The library holds the hardware-independent core: trigger detection,
//! fixed-length window capture, normalization, the inference boundary and
//! the text emitters, tied together by [`pipeline::Pipeline`].  The IMU
//! driver is only built for the ESP-IDF target.

pub mod config;
pub mod emitter;
pub mod error;
pub mod inference;
pub mod normalize;
pub mod pipeline;
pub mod sample;
pub mod source;
pub mod trigger;
pub mod window;

#[cfg(not(target_os = "espidf"))]
pub mod recording;

#[cfg(target_os = "espidf")]
pub mod drivers;

pub use emitter::{ClassificationEmitter, Emitter, RawEmitter};
pub use error::{InferenceError, PipelineError, SetupError};
pub use inference::{ClassificationResult, DefaultEngine, InferenceEngine, TensorArena};
pub use normalize::NormalizedVector;
pub use pipeline::{Pipeline, Step};
pub use sample::{Acceleration, AngularRate, RawSample};
pub use source::{MotionSource, ReplaySource};
