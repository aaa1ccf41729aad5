// GestureWatch - Error Types
//
// Every error here is fatal for the device: the caller prints it once and
// halts.  A sensor that is simply not ready is not an error.

use std::io;

use thiserror::Error;

/// Start-up failure of the inference engine.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Model schema version {found} not equal to supported version {expected}")]
    SchemaMismatch { expected: u32, found: u32 },
    #[error("Tensor arena too small: {provided} bytes provided, {required} required")]
    ArenaTooSmall { required: usize, provided: usize },
    #[error("Model {what} tensor holds {found} values, expected {expected}")]
    TensorShape {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Inference engine init failed (code {0})")]
    Engine(i32),
}

/// Failure of a single `infer` call on a completed window.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Model input needs {expected} values, got {found}")]
    InputLength { expected: usize, found: usize },
    #[error("Model returned {found} scores for {expected} labels")]
    OutputLength { expected: usize, found: usize },
    #[error("Invoke failed (code {0})")]
    Invoke(i32),
}

/// Runtime failure of the control loop.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("Output write failed: {0}")]
    Output(#[from] io::Error),
}
