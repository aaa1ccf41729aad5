// GestureWatch - Entry Point
//
// ESP-IDF target: gesture capture firmware (see firmware.rs).
// Any other target: host tools for recording training data and replaying
// recordings through the same pipeline (see host.rs).

#[cfg(target_os = "espidf")]
mod firmware;
#[cfg(not(target_os = "espidf"))]
mod host;

#[cfg(target_os = "espidf")]
fn main() {
    firmware::main()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    host::main()
}
