// GestureWatch - Inference Adapter
//
// Safe Rust boundary around the gesture classifier.
//
// Back-ends:
//   1. STUB (default) - `HeuristicEngine` scores punch vs. flex from window
//      energy so the firmware and the host tools run end-to-end without the
//      C++ TensorFlow Lite Micro runtime compiled in.
//   2. FFI (`tflm` feature) - `TfliteEngine` drives the compiled model through
//      a small C shim built by build.rs.
//
// Both take a caller-owned tensor arena at construction and never grow it.

use crate::config::*;
use crate::error::{InferenceError, SetupError};
use crate::normalize::NormalizedVector;

// ---------------------------------------------------------------------------
// Public interface
// ---------------------------------------------------------------------------

/// Per-label probabilities, in model output order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    scores: Vec<(&'static str, f32)>,
}

impl ClassificationResult {
    pub fn new(labels: &[&'static str], scores: &[f32]) -> Result<Self, InferenceError> {
        if labels.len() != scores.len() {
            return Err(InferenceError::OutputLength {
                expected: labels.len(),
                found: scores.len(),
            });
        }
        Ok(Self {
            scores: labels.iter().copied().zip(scores.iter().copied()).collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.scores.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest-scoring label.  Ties keep the earlier label.
    pub fn best(&self) -> Option<(&'static str, f32)> {
        self.iter()
            .fold(None, |best: Option<(&'static str, f32)>, cur| match best {
                Some(b) if b.1 >= cur.1 => Some(b),
                _ => Some(cur),
            })
    }
}

/// Working memory handed to the engine once at start-up.
pub struct TensorArena<'a> {
    buf: &'a mut [u8],
}

impl<'a> TensorArena<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn check(&self) -> Result<(), SetupError> {
        if self.buf.len() < TENSOR_ARENA_SIZE {
            return Err(SetupError::ArenaTooSmall {
                required: TENSOR_ARENA_SIZE,
                provided: self.buf.len(),
            });
        }
        Ok(())
    }
}

pub trait InferenceEngine {
    /// Labels in output order.
    fn labels(&self) -> &[&'static str];

    /// Number of scalars the model consumes.
    fn input_len(&self) -> usize;

    /// Run the model once.  Returns one raw score per output slot.
    fn invoke(&mut self, input: &[f32]) -> Result<Vec<f32>, InferenceError>;

    /// Validated single-shot classification of a complete window.
    fn infer(&mut self, input: &NormalizedVector) -> Result<ClassificationResult, InferenceError> {
        if input.len() != self.input_len() {
            return Err(InferenceError::InputLength {
                expected: self.input_len(),
                found: input.len(),
            });
        }
        let scores = self.invoke(input.as_slice())?;
        ClassificationResult::new(self.labels(), &scores)
    }
}

#[cfg(not(feature = "tflm"))]
pub type DefaultEngine = HeuristicEngine;

#[cfg(feature = "tflm")]
pub type DefaultEngine = TfliteEngine<'static>;

// ---------------------------------------------------------------------------
// Stub back-end - development / testing without the C++ runtime
// ---------------------------------------------------------------------------

/// Reference swing that maps to a score of 1.0 for each class.
const PUNCH_REF_G: f32 = 1.0;
const FLEX_REF_DPS: f32 = 200.0;

pub struct HeuristicEngine {
    input_len: usize,
}

impl HeuristicEngine {
    pub fn new(arena: TensorArena<'_>) -> Result<Self, SetupError> {
        Self::with_input_len(arena, FEATURE_LEN)
    }

    /// Stub for a window length other than the default.  The stub needs no
    /// working memory but enforces the same arena contract as the real model.
    pub fn with_input_len(arena: TensorArena<'_>, input_len: usize) -> Result<Self, SetupError> {
        arena.check()?;
        log::info!("Heuristic classifier ready ({} inputs)", input_len);
        Ok(Self { input_len })
    }
}

impl InferenceEngine for HeuristicEngine {
    fn labels(&self) -> &[&'static str] {
        &GESTURES
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn invoke(&mut self, input: &[f32]) -> Result<Vec<f32>, InferenceError> {
        // Mean distance from rest (0.5) per sensor, back in physical units.
        let mut accel = 0.0f32;
        let mut gyro = 0.0f32;
        for frame in input.chunks_exact(CHANNELS) {
            accel += frame[..3].iter().map(|v| (v - 0.5).abs()).sum::<f32>();
            gyro += frame[3..].iter().map(|v| (v - 0.5).abs()).sum::<f32>();
        }
        let frames = (input.len() / CHANNELS).max(1) as f32;
        let accel_g = accel / frames * 2.0 * ACCEL_RANGE_G;
        let gyro_dps = gyro / frames * 2.0 * GYRO_RANGE_DPS;

        let punch = accel_g / PUNCH_REF_G;
        let flex = gyro_dps / FLEX_REF_DPS;
        let p_punch = if punch + flex > 0.0 {
            punch / (punch + flex)
        } else {
            0.5
        };

        log::debug!(
            "STUB inference - mean |a| = {:.2} g, mean |w| = {:.1} dps, punch = {:.3}",
            accel_g,
            gyro_dps,
            p_punch
        );
        Ok(vec![p_punch, 1.0 - p_punch])
    }
}

// ---------------------------------------------------------------------------
// Real FFI back-end - calls the compiled TensorFlow Lite Micro model
// ---------------------------------------------------------------------------
#[cfg(feature = "tflm")]
mod ffi {
    extern "C" {
        pub fn gw_model_schema_version() -> u32;
        pub fn gw_model_init(arena: *mut u8, arena_len: usize) -> i32;
        pub fn gw_model_input_len() -> usize;
        pub fn gw_model_output_len() -> usize;
        pub fn gw_model_invoke(
            input: *const f32,
            input_len: usize,
            output: *mut f32,
            output_len: usize,
        ) -> i32;
    }
}

/// The C shim keeps one global interpreter; construct at most one engine.
#[cfg(feature = "tflm")]
pub struct TfliteEngine<'a> {
    // Borrowed by the interpreter for as long as the engine lives.
    _arena: TensorArena<'a>,
    output_len: usize,
}

#[cfg(feature = "tflm")]
impl<'a> TfliteEngine<'a> {
    pub fn new(arena: TensorArena<'a>) -> Result<Self, SetupError> {
        let found = unsafe { ffi::gw_model_schema_version() };
        if found != MODEL_SCHEMA_VERSION {
            return Err(SetupError::SchemaMismatch {
                expected: MODEL_SCHEMA_VERSION,
                found,
            });
        }

        arena.check()?;
        let mut arena = arena;
        // SAFETY: the arena outlives the interpreter because it is moved into
        // the engine; nothing else touches the buffer afterwards.
        let err = unsafe { ffi::gw_model_init(arena.buf.as_mut_ptr(), arena.len()) };
        if err != 0 {
            return Err(SetupError::Engine(err));
        }

        let input_len = unsafe { ffi::gw_model_input_len() };
        if input_len != FEATURE_LEN {
            return Err(SetupError::TensorShape {
                what: "input",
                expected: FEATURE_LEN,
                found: input_len,
            });
        }
        let output_len = unsafe { ffi::gw_model_output_len() };
        if output_len != LABEL_COUNT {
            return Err(SetupError::TensorShape {
                what: "output",
                expected: LABEL_COUNT,
                found: output_len,
            });
        }

        log::info!(
            "TFLM model ready (schema v{}, arena {} bytes)",
            found,
            arena.len()
        );
        Ok(Self {
            _arena: arena,
            output_len,
        })
    }
}

#[cfg(feature = "tflm")]
impl InferenceEngine for TfliteEngine<'_> {
    fn labels(&self) -> &[&'static str] {
        &GESTURES
    }

    fn input_len(&self) -> usize {
        FEATURE_LEN
    }

    fn invoke(&mut self, input: &[f32]) -> Result<Vec<f32>, InferenceError> {
        let mut output = vec![0.0f32; self.output_len];
        // SAFETY: both pointers are valid for the lengths passed alongside.
        let err = unsafe {
            ffi::gw_model_invoke(
                input.as_ptr(),
                input.len(),
                output.as_mut_ptr(),
                output.len(),
            )
        };
        if err != 0 {
            log::error!("TFLM invoke error: {}", err);
            return Err(InferenceError::Invoke(err));
        }
        Ok(output)
    }
}
