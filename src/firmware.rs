// GestureWatch - Firmware
//
// Boot sequence:
//   1. Bring up the I2C bus and the LSM9DS1.
//   2. Allocate the tensor arena and set up the classifier (classification
//      builds only).
//   3. Print the CSV header (raw-capture builds only).
//   4. Poll the pipeline forever.
//
// Any failure prints one diagnostic line on the console and parks the
// device until it is power-cycled.

use std::convert::Infallible;
use std::fmt::Display;
use std::io::Stdout;
use std::thread;
use std::time::Duration;

use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::prelude::*;

use gesturewatch::config::*;
use gesturewatch::drivers::imu::Lsm9ds1;
use gesturewatch::trigger::TriggerDetector;
use gesturewatch::Pipeline;

#[cfg(feature = "raw-capture")]
use gesturewatch::RawEmitter;
#[cfg(not(feature = "raw-capture"))]
use gesturewatch::{ClassificationEmitter, DefaultEngine, SetupError, TensorArena};

pub fn main() -> ! {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("GestureWatch firmware starting…");

    match run() {
        Ok(never) => match never {},
        Err(e) => halt(e),
    }
}

fn run() -> anyhow::Result<Infallible> {
    let peripherals = Peripherals::take()?;

    // ---- I2C bus + IMU ------------------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;

    let mut imu = Lsm9ds1::new(i2c);
    imu.init()?;

    // ---- Output mode ---------------------------------------------------------
    let emitter = build_emitter()?;

    let mut pipeline: Pipeline<_, _> =
        Pipeline::new(imu, emitter, TriggerDetector::new(TRIGGER_THRESHOLD_G));
    pipeline.start()?;
    log::info!("Boot complete - waiting for gestures");

    // Busy-polls the IMU flags; each step is one poll.
    loop {
        pipeline.step()?;
    }
}

#[cfg(feature = "raw-capture")]
fn build_emitter() -> anyhow::Result<RawEmitter<Stdout>> {
    log::info!("Raw capture mode");
    Ok(RawEmitter::new(std::io::stdout()))
}

#[cfg(not(feature = "raw-capture"))]
fn build_emitter() -> Result<ClassificationEmitter<DefaultEngine, Stdout>, SetupError> {
    // The arena lives for the whole programme (embedded firmware never exits).
    let arena: &'static mut [u8] = Box::leak(vec![0u8; TENSOR_ARENA_SIZE].into_boxed_slice());
    let engine = DefaultEngine::new(TensorArena::new(arena))?;
    Ok(ClassificationEmitter::new(engine, std::io::stdout()))
}

/// Report a fatal condition once and stop.  Does not return.
fn halt(err: impl Display) -> ! {
    println!("{}", err);
    log::error!("Fatal: {} - halted until power cycle", err);
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
