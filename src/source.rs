// GestureWatch - Sensor Source
//
// Polled 6-axis source with independent data-ready flags for the two
// halves.  Reads are only issued after the matching flag was seen set.

use std::convert::Infallible;
use std::fmt::Display;

use crate::sample::{Acceleration, AngularRate, RawSample};

pub trait MotionSource {
    type Error: Display;

    fn acceleration_ready(&mut self) -> bool;
    fn read_acceleration(&mut self) -> Result<Acceleration, Self::Error>;
    fn gyroscope_ready(&mut self) -> bool;
    fn read_gyroscope(&mut self) -> Result<AngularRate, Self::Error>;
}

// ---------------------------------------------------------------------------
// Replay of recorded samples
// ---------------------------------------------------------------------------

/// Serves a recording one row per poll.
///
/// Every `acceleration_ready` call latches the next row, the way the IMU
/// output registers are overwritten at each output-data tick; both halves of
/// a paired read therefore come from the same row.  Once the rows run out
/// neither flag is ever set again.
pub struct ReplaySource {
    rows: Vec<RawSample>,
    next: usize,
    current: Option<RawSample>,
}

impl ReplaySource {
    pub fn new(rows: Vec<RawSample>) -> Self {
        Self {
            rows,
            next: 0,
            current: None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.rows.len() && self.current.is_none()
    }

    pub fn remaining(&self) -> usize {
        self.rows.len() - self.next
    }
}

impl MotionSource for ReplaySource {
    type Error = Infallible;

    fn acceleration_ready(&mut self) -> bool {
        self.current = self.rows.get(self.next).copied();
        if self.current.is_some() {
            self.next += 1;
        }
        self.current.is_some()
    }

    fn read_acceleration(&mut self) -> Result<Acceleration, Infallible> {
        Ok(self.current.map(|s| s.accel).unwrap_or_default())
    }

    fn gyroscope_ready(&mut self) -> bool {
        self.current.is_some()
    }

    fn read_gyroscope(&mut self) -> Result<AngularRate, Infallible> {
        Ok(self.current.map(|s| s.gyro).unwrap_or_default())
    }
}
