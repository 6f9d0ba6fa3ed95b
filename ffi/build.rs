use std::env;
use std::path::PathBuf;

/// Copy of the header for the mobile shell's source tree; opt-in.
const HEADER_DIR_VAR: &str = "SCREENS_FFI_HEADER_DIR";

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(err) => {
            println!("cargo:warning=C header not generated: OUT_DIR unset ({err})");
            return;
        }
    };

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-env-changed={HEADER_DIR_VAR}");

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("SCREENS_FFI_H".to_string()),
        ..Default::default()
    };

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=C header not generated: {err}");
            return;
        }
    };

    bindings.write_to_file(out_dir.join("screens.h"));
    if let Ok(dir) = env::var(HEADER_DIR_VAR) {
        bindings.write_to_file(PathBuf::from(dir).join("screens.h"));
    }
}
