//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `justdo_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Keep a tiny CLI probe to validate core crate wiring independently
    // from the Flutter/FFI runtime setup.
    println!("justdo_core ping={}", justdo_core::ping());
    println!("justdo_core version={}", justdo_core::core_version());
}
