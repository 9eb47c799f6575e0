// crates/geocoder-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (I/O, decompression) and the two input
//! formats: the JSON Lines hierarchy dump and the versioned binary index.

pub mod binary;
pub mod common_io;

#[cfg(feature = "json")]
mod jsonl;

#[cfg(feature = "json")]
pub use jsonl::{parse_id, parse_line};
