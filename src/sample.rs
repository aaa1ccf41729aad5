// GestureWatch - Sensor Data Types

// ---------------------------------------------------------------------------
// Single-sensor readings
// ---------------------------------------------------------------------------

/// Linear acceleration in g.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// `|x| + |y| + |z|`, the trigger intensity.
    pub fn intensity(&self) -> f32 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }
}

/// Angular rate in °/s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngularRate {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AngularRate {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ---------------------------------------------------------------------------
// Paired 6-axis sample
// ---------------------------------------------------------------------------

/// Acceleration and angular rate read during the same polling tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSample {
    pub accel: Acceleration,
    pub gyro: AngularRate,
}

impl RawSample {
    pub const fn new(accel: Acceleration, gyro: AngularRate) -> Self {
        Self { accel, gyro }
    }

    pub const fn from_channels(c: [f32; 6]) -> Self {
        Self {
            accel: Acceleration::new(c[0], c[1], c[2]),
            gyro: AngularRate::new(c[3], c[4], c[5]),
        }
    }

    /// Channel order shared with the model input and the raw CSV columns.
    pub fn channels(&self) -> [f32; 6] {
        [
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
        ]
    }
}
