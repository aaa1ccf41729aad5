// GestureWatch - Capture Pipeline
//
// One cooperative control loop: the driver calls `step()` repeatedly and each
// call performs exactly one sensor poll.
//
//   IDLE:    poll accelerometer -> trigger detector -> maybe start a window
//   FILLING: poll both sensors  -> append paired sample -> maybe hand the
//            completed window to the normalizer and the emitter, then IDLE
//
// The trigger detector is not consulted while a window is filling.  There is
// no timeout: a sensor that stops reporting ready stalls the capture.

use crate::config::WINDOW_LEN;
use crate::emitter::Emitter;
use crate::error::PipelineError;
use crate::normalize::{normalize, NormalizedVector};
use crate::sample::RawSample;
use crate::source::MotionSource;
use crate::trigger::{TriggerDetector, TriggerState};
use crate::window::{CollectorState, Fill, WindowCollector};

/// What a single poll did.
#[derive(Debug, PartialEq)]
pub enum Step {
    /// Required data-ready flag(s) not set, or a soft read fault.
    Waiting,
    /// IDLE reading below the trigger threshold.
    Quiet,
    /// Trigger fired; a fresh window is filling.
    Triggered,
    /// Sample appended; `count` samples in the window.
    Sampled { count: usize },
    /// Window completed, normalized and emitted.
    Completed(NormalizedVector),
}

pub struct Pipeline<S: MotionSource, R: Emitter, const N: usize = WINDOW_LEN> {
    source: S,
    emitter: R,
    trigger: TriggerDetector,
    collector: WindowCollector<N>,
    gestures: u32,
}

impl<S: MotionSource, R: Emitter, const N: usize> Pipeline<S, R, N> {
    pub fn new(source: S, emitter: R, trigger: TriggerDetector) -> Self {
        Self {
            source,
            emitter,
            trigger,
            collector: WindowCollector::new(),
            gestures: 0,
        }
    }

    /// Emit the start-up output (raw-mode header).  Call once before polling.
    pub fn start(&mut self) -> Result<(), PipelineError> {
        log::info!(
            "Pipeline started (window {} samples, trigger {:.2} g)",
            N,
            self.trigger.threshold()
        );
        self.emitter.begin()
    }

    pub fn step(&mut self) -> Result<Step, PipelineError> {
        if self.collector.is_idle() {
            Ok(self.poll_trigger())
        } else {
            self.poll_window()
        }
    }

    fn poll_trigger(&mut self) -> Step {
        if !self.source.acceleration_ready() {
            return Step::Waiting;
        }

        let accel = match self.source.read_acceleration() {
            Ok(a) => a,
            Err(e) => {
                log::warn!("Accelerometer read error: {}", e);
                return Step::Waiting;
            }
        };

        if self.trigger.observe(&accel) {
            self.collector.begin();
            Step::Triggered
        } else {
            Step::Quiet
        }
    }

    fn poll_window(&mut self) -> Result<Step, PipelineError> {
        // Both halves must be fresh in the same poll.
        if !(self.source.acceleration_ready() && self.source.gyroscope_ready()) {
            return Ok(Step::Waiting);
        }

        let accel = self.source.read_acceleration();
        let gyro = self.source.read_gyroscope();
        let sample = match (accel, gyro) {
            (Ok(a), Ok(g)) => RawSample::new(a, g),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("IMU read error: {}", e);
                return Ok(Step::Waiting);
            }
        };

        match self.collector.push(sample) {
            Fill::Partial { count } => {
                self.emitter.sample(&sample)?;
                Ok(Step::Sampled { count })
            }
            Fill::Complete(window) => {
                self.emitter.sample(&sample)?;
                self.trigger.rearm();
                self.gestures += 1;

                let features = normalize(&window);
                log::debug!(
                    "Window #{} complete ({} samples, {} features)",
                    self.gestures,
                    window.len(),
                    features.len()
                );
                self.emitter.gesture(&features)?;
                Ok(Step::Completed(features))
            }
            Fill::Ignored => Ok(Step::Waiting),
        }
    }

    pub fn collector_state(&self) -> CollectorState {
        self.collector.state()
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger.state()
    }

    /// Windows completed since start-up.
    pub fn gestures(&self) -> u32 {
        self.gestures
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn emitter(&self) -> &R {
        &self.emitter
    }

    pub fn into_parts(self) -> (S, R) {
        (self.source, self.emitter)
    }
}
