//! Build script for the cluster simulator.
//!
//! On Windows, links against the SDL2 import library in `vendor/sdl2` at the
//! workspace root and places `SDL2.dll` next to the built binary.

use std::path::{Path, PathBuf};
use std::{env, fs};

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let sdl2_dir = manifest_dir.join("..").join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", sdl2_dir.display());

    if !sdl2_dir.exists() {
        println!("cargo:warning=SDL2 not found in {}", sdl2_dir.display());
        println!("cargo:warning=Put SDL2.lib and SDL2.dll there to build the simulator");
        return;
    }
    println!("cargo:rustc-link-search=native={}", sdl2_dir.display());

    // OUT_DIR is target/<profile>/build/<pkg>-<hash>/out
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap_or_default());
    if let Some(profile_dir) = out_dir.ancestors().nth(3) {
        copy_dll(&sdl2_dir.join("SDL2.dll"), &profile_dir.join("SDL2.dll"));
    }
}

fn copy_dll(
    from: &Path,
    to: &Path,
) {
    if !from.exists() || to.exists() {
        return;
    }
    match fs::copy(from, to) {
        Ok(_) => println!("cargo:warning=Copied SDL2.dll to {}", to.display()),
        Err(e) => println!("cargo:warning=Failed to copy SDL2.dll: {e}"),
    }
}
