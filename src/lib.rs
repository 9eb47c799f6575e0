//! Umbrella crate for the geocoder workspace.
//!
//! Re-exports [`geocoder_core`] so the demos under `demos/` can be run from the
//! workspace root with `cargo run --example basic_usage`.

pub use geocoder_core::*;
