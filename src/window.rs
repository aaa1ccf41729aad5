// GestureWatch - Window Collector
//
// IDLE -> FILLING -> FULL -> IDLE.  FULL only exists for the duration of the
// `push` that completes the window: the finished window is handed back to
// the caller and the collector is already IDLE when `push` returns.

use crate::config::WINDOW_LEN;
use crate::sample::RawSample;

// ---------------------------------------------------------------------------
// Capture window
// ---------------------------------------------------------------------------

/// Fixed-capacity, arrival-ordered sequence of paired samples.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureWindow<const N: usize = WINDOW_LEN> {
    samples: [RawSample; N],
    len: usize,
}

impl<const N: usize> Default for CaptureWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CaptureWindow<N> {
    pub fn new() -> Self {
        Self {
            samples: [RawSample::default(); N],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawSample> {
        self.samples().iter()
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns `false` (and drops the sample) once the window is full.
    fn push(&mut self, sample: RawSample) -> bool {
        if self.len == N {
            return false;
        }
        self.samples[self.len] = sample;
        self.len += 1;
        true
    }
}

// ---------------------------------------------------------------------------
// Collector state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Idle,
    Filling { count: usize },
}

/// Result of appending one paired sample.
#[derive(Debug, PartialEq)]
pub enum Fill<const N: usize> {
    /// Still FILLING; `count` samples captured so far.
    Partial { count: usize },
    /// Reached FULL.  The collector has re-armed to IDLE.
    Complete(CaptureWindow<N>),
    /// Sample arrived while IDLE and was dropped.
    Ignored,
}

pub struct WindowCollector<const N: usize = WINDOW_LEN> {
    window: CaptureWindow<N>,
    filling: bool,
}

impl<const N: usize> Default for WindowCollector<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> WindowCollector<N> {
    pub fn new() -> Self {
        Self {
            window: CaptureWindow::new(),
            filling: false,
        }
    }

    pub fn state(&self) -> CollectorState {
        if self.filling {
            CollectorState::Filling {
                count: self.window.len(),
            }
        } else {
            CollectorState::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.filling
    }

    /// IDLE -> FILLING: clears the window and resets the count to 0.
    ///
    /// A capture in progress cannot be restarted or extended; returns `false`
    /// without touching it.
    pub fn begin(&mut self) -> bool {
        if self.filling {
            log::debug!("Capture already in progress ({}/{})", self.window.len(), N);
            return false;
        }
        self.window.clear();
        self.filling = true;
        true
    }

    pub fn push(&mut self, sample: RawSample) -> Fill<N> {
        if !self.filling {
            return Fill::Ignored;
        }

        self.window.push(sample);

        if self.window.is_full() {
            self.filling = false;
            let complete = std::mem::take(&mut self.window);
            Fill::Complete(complete)
        } else {
            Fill::Partial {
                count: self.window.len(),
            }
        }
    }
}
