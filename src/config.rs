// GestureWatch - Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V) + LSM9DS1 breakout

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_I2C_SDA: i32 = 6; // D4 - I2C data line
pub const PIN_I2C_SCL: i32 = 7; // D5 - I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_LSM9DS1_AG: u8 = 0x6B; // accelerometer + gyroscope die
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Sensor full-scale ranges (must match the IMU register setup)
// ---------------------------------------------------------------------------
pub const ACCEL_RANGE_G: f32 = 4.0; // ±4 g
pub const GYRO_RANGE_DPS: f32 = 2000.0; // ±2000 °/s

// ---------------------------------------------------------------------------
// Gesture capture
// ---------------------------------------------------------------------------
/// Sum of absolute acceleration (g) that starts a capture.
pub const TRIGGER_THRESHOLD_G: f32 = 2.5;
/// Samples per gesture: ~1 second at 119 Hz. Shared with the trained model.
pub const WINDOW_LEN: usize = 119;
/// ax, ay, az, gx, gy, gz
pub const CHANNELS: usize = 6;
pub const FEATURE_LEN: usize = WINDOW_LEN * CHANNELS; // 714

// ---------------------------------------------------------------------------
// Inference (TensorFlow Lite Micro model)
// ---------------------------------------------------------------------------
pub const LABEL_COUNT: usize = 2;
/// Labels in model output order.
pub const GESTURES: [&str; LABEL_COUNT] = ["punch", "flex"];
pub const TENSOR_ARENA_SIZE: usize = 8 * 1024;
pub const MODEL_SCHEMA_VERSION: u32 = 3;

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------
pub const RAW_HEADER: &str = "aX,aY,aZ,gX,gY,gZ";
pub const RAW_DECIMALS: usize = 3;
pub const PROBABILITY_DECIMALS: usize = 6;
