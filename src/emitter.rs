// GestureWatch - Result Emitter
//
// Line-oriented text output.  Exactly one emitter is built per firmware image:
//   - `RawEmitter` (feature `raw-capture`): one CSV line per captured sample,
//     blank line after each gesture.  Used to record training data.
//   - `ClassificationEmitter` (default): one `label: probability` line per
//     gesture label after each completed window, then a blank line.
// Partial windows are never emitted.

use std::io::Write;

use crate::config::{PROBABILITY_DECIMALS, RAW_DECIMALS, RAW_HEADER};
use crate::error::PipelineError;
use crate::inference::{ClassificationResult, InferenceEngine};
use crate::normalize::NormalizedVector;
use crate::sample::RawSample;

pub trait Emitter {
    /// Called once before the first poll.
    fn begin(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// A paired sample was appended to the window in progress.
    fn sample(&mut self, _sample: &RawSample) -> Result<(), PipelineError> {
        Ok(())
    }

    /// The window reached FULL and was normalized.
    fn gesture(&mut self, features: &NormalizedVector) -> Result<(), PipelineError>;
}

// ---------------------------------------------------------------------------
// Raw capture
// ---------------------------------------------------------------------------

pub struct RawEmitter<W: Write> {
    out: W,
}

impl<W: Write> RawEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Emitter for RawEmitter<W> {
    fn begin(&mut self) -> Result<(), PipelineError> {
        writeln!(self.out, "{}", RAW_HEADER)?;
        Ok(())
    }

    fn sample(&mut self, sample: &RawSample) -> Result<(), PipelineError> {
        let [ax, ay, az, gx, gy, gz] = sample.channels();
        writeln!(
            self.out,
            "{:.p$},{:.p$},{:.p$},{:.p$},{:.p$},{:.p$}",
            ax,
            ay,
            az,
            gx,
            gy,
            gz,
            p = RAW_DECIMALS
        )?;
        Ok(())
    }

    fn gesture(&mut self, _features: &NormalizedVector) -> Result<(), PipelineError> {
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub struct ClassificationEmitter<E: InferenceEngine, W: Write> {
    engine: E,
    out: W,
    last: Option<ClassificationResult>,
}

impl<E: InferenceEngine, W: Write> ClassificationEmitter<E, W> {
    pub fn new(engine: E, out: W) -> Self {
        Self {
            engine,
            out,
            last: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn last_result(&self) -> Option<&ClassificationResult> {
        self.last.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<E: InferenceEngine, W: Write> Emitter for ClassificationEmitter<E, W> {
    fn gesture(&mut self, features: &NormalizedVector) -> Result<(), PipelineError> {
        let result = self.engine.infer(features)?;

        for (label, probability) in result.iter() {
            writeln!(
                self.out,
                "{}: {:.p$}",
                label,
                probability,
                p = PROBABILITY_DECIMALS
            )?;
        }
        writeln!(self.out)?;
        self.out.flush()?;

        if let Some((label, p)) = result.best() {
            log::info!("Gesture: {} ({:.1}%)", label, p * 100.0);
        }
        self.last = Some(result);
        Ok(())
    }
}
