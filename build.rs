fn main() {
    // ESP-IDF link/cfg args only apply when building the firmware.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    if std::env::var("CARGO_FEATURE_TFLM").is_ok() {
        // Find the C++ compiler in the Embuild toolchain directory
        // Typically: .embuild/espressif/tools/riscv32-esp-elf/esp-<VER>/
        //            riscv32-esp-elf/bin/riscv32-esp-elf-g++
        let compiler = find_compiler().unwrap_or_else(|| "riscv32-esp-elf-g++".into());
        build_model(&compiler);
    }
}

fn find_compiler() -> Option<std::path::PathBuf> {
    use std::path::PathBuf;
    // Check local .embuild first, then global ~/.espressif
    let search_dirs = vec![
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").ok()?).join(".embuild"),
        dirs::home_dir().map(|h| h.join(".espressif")).unwrap_or_default(),
    ];

    for root in search_dirs {
        let tools_dir = root.join("espressif/tools/riscv32-esp-elf");
        let Ok(entries) = std::fs::read_dir(&tools_dir) else {
            continue;
        };
        // Versioned directory, e.g. esp-13.2.0_20240530
        for entry in entries.flatten() {
            let candidate = entry.path().join("riscv32-esp-elf/bin/riscv32-esp-elf-g++");
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Compile the exported gesture model, the TensorFlow Lite Micro runtime and
/// the `gw_model_*` C shim into one static library.
fn build_model(compiler_path: &std::path::Path) {
    use std::path::PathBuf;

    let model_root = PathBuf::from("gesture_model");

    let mut build = cc::Build::new();
    build
        .cpp(true)
        .compiler(compiler_path)
        .flag("-std=c++17")
        .flag("-O3")
        .flag("-fno-rtti")
        .flag("-fno-exceptions")
        .define("TF_LITE_STATIC_MEMORY", None)
        .define("TF_LITE_DISABLE_X86_NEON", None)
        .include(&model_root)
        .include(model_root.join("tflite-micro"))
        .include(model_root.join("tflite-micro/third_party/flatbuffers/include"))
        .include(model_root.join("tflite-micro/third_party/gemmlowp"))
        .include(model_root.join("tflite-micro/third_party/ruy"));

    add_source_files(&mut build, &model_root);

    build.compile("gesture-model");

    println!("cargo:rerun-if-changed=gesture_model");
}

fn add_source_files(build: &mut cc::Build, dir: &std::path::Path) {
    let entries = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", dir.display(), e));
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            // Unit tests and examples ship their own main().
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name == "tests" || name == "examples" {
                continue;
            }
            add_source_files(build, &path);
        } else if let Some(ext) = path.extension() {
            if ext == "c" || ext == "cpp" || ext == "cc" {
                build.file(&path);
            }
        }
    }
}
