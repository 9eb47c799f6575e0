// crates/geocoder-core/src/search/mod.rs
pub mod context;
pub mod geocoder;
pub mod result;

pub use context::{BeamKey, Context, Layer};
pub use geocoder::Geocoder;
pub use result::GeocodeResult;
