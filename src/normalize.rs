// GestureWatch - Feature Normalization
//
// Maps each channel into [0, 1] with a fixed affine transform:
//   accel' = (accel + 4) / 8
//   gyro'  = (gyro + 2000) / 4000
// Out-of-range readings are passed through unclamped.

use crate::config::{ACCEL_RANGE_G, CHANNELS, GYRO_RANGE_DPS};
use crate::sample::RawSample;
use crate::window::CaptureWindow;

/// Flat `N * 6` model input, sample-major, channels ax..gz within a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVector(Vec<f32>);

impl NormalizedVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values for sample `index`, or `None` past the end.
    pub fn sample(&self, index: usize) -> Option<&[f32]> {
        let start = index * CHANNELS;
        self.0.get(start..start + CHANNELS)
    }
}

impl From<Vec<f32>> for NormalizedVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

pub fn normalize_accel(g: f32) -> f32 {
    (g + ACCEL_RANGE_G) / (2.0 * ACCEL_RANGE_G)
}

pub fn normalize_gyro(dps: f32) -> f32 {
    (dps + GYRO_RANGE_DPS) / (2.0 * GYRO_RANGE_DPS)
}

pub fn normalize_sample(sample: &RawSample) -> [f32; CHANNELS] {
    [
        normalize_accel(sample.accel.x),
        normalize_accel(sample.accel.y),
        normalize_accel(sample.accel.z),
        normalize_gyro(sample.gyro.x),
        normalize_gyro(sample.gyro.y),
        normalize_gyro(sample.gyro.z),
    ]
}

pub fn normalize<const N: usize>(window: &CaptureWindow<N>) -> NormalizedVector {
    let mut values = Vec::with_capacity(window.len() * CHANNELS);
    for sample in window.iter() {
        values.extend_from_slice(&normalize_sample(sample));
    }
    NormalizedVector(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{Fill, WindowCollector};

    fn full_window<const N: usize>(samples: &[RawSample]) -> CaptureWindow<N> {
        let mut c = WindowCollector::<N>::new();
        c.begin();
        for s in samples {
            if let Fill::Complete(w) = c.push(*s) {
                return w;
            }
        }
        panic!("window did not fill");
    }

    #[test]
    fn accel_range_endpoints() {
        assert_eq!(normalize_accel(0.0), 0.5);
        assert_eq!(normalize_accel(4.0), 1.0);
        assert_eq!(normalize_accel(-4.0), 0.0);
    }

    #[test]
    fn gyro_range_endpoints() {
        assert_eq!(normalize_gyro(0.0), 0.5);
        assert_eq!(normalize_gyro(2000.0), 1.0);
        assert_eq!(normalize_gyro(-2000.0), 0.0);
    }

    #[test]
    fn out_of_range_is_not_clamped() {
        assert_eq!(normalize_accel(8.0), 1.5);
        assert_eq!(normalize_gyro(-4000.0), -0.5);
    }

    #[test]
    fn preserves_sample_and_channel_order() {
        let w = full_window::<2>(&[
            RawSample::from_channels([4.0, 0.0, -4.0, 2000.0, 0.0, -2000.0]),
            RawSample::from_channels([-4.0, 4.0, 0.0, -2000.0, 2000.0, 0.0]),
        ]);
        let v = normalize(&w);

        assert_eq!(v.len(), 12);
        assert_eq!(v.sample(0), Some(&[1.0, 0.5, 0.0, 1.0, 0.5, 0.0][..]));
        assert_eq!(v.sample(1), Some(&[0.0, 1.0, 0.5, 0.0, 1.0, 0.5][..]));
        assert_eq!(v.sample(2), None);
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let w = full_window::<3>(&[
            RawSample::from_channels([0.1, -0.2, 0.98, 12.5, -300.0, 7.0]),
            RawSample::from_channels([1.3, 2.2, -0.5, 900.0, 3.0, -1999.0]),
            RawSample::from_channels([-3.9, 0.0, 0.0, 0.0, 45.0, 0.25]),
        ]);
        assert_eq!(normalize(&w), normalize(&w));
    }
}
