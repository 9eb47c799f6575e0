// crates/geocoder-core/src/model/mod.rs
pub mod convert;
pub mod entry;
pub mod hierarchy;
pub mod raw;
pub mod types;

pub use entry::{BoundingBox, Entry, Geometry};
pub use hierarchy::Hierarchy;
pub use types::Type;
