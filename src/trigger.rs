// GestureWatch - Trigger Detector
//
// Fires once when the summed absolute acceleration reaches the threshold.
// No debounce or hysteresis: a single reading at or above the threshold is
// enough, so short noise spikes can start a capture.

use crate::config::TRIGGER_THRESHOLD_G;
use crate::sample::Acceleration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Waiting for a reading at or above the threshold.
    Armed,
    /// Fired; ignored until re-armed.
    Fired,
}

pub struct TriggerDetector {
    threshold: f32,
    state: TriggerState,
}

impl Default for TriggerDetector {
    fn default() -> Self {
        Self::new(TRIGGER_THRESHOLD_G)
    }
}

impl TriggerDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            state: TriggerState::Armed,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Returns `true` the first time `|x| + |y| + |z| >= threshold` since
    /// the last fire.
    pub fn observe(&mut self, accel: &Acceleration) -> bool {
        if self.state == TriggerState::Fired {
            return false;
        }

        let intensity = accel.intensity();
        if intensity >= self.threshold {
            log::debug!("Trigger fired (|a| = {:.3} g)", intensity);
            self.state = TriggerState::Fired;
            true
        } else {
            false
        }
    }

    pub fn rearm(&mut self) {
        self.state = TriggerState::Armed;
    }
}
