// crates/geocoder-core/src/lib.rs

//! # geocoder-core
//!
//! Hierarchical address geocoder. A gazetteer of countries, regions,
//! localities, streets and buildings is loaded once (from JSON Lines or a
//! prebuilt binary index), indexed by normalized name tokens, and then
//! queried with free text:
//!
//! ```rust
//! use geocoder_core::{Geocoder, GeocoderConfig, Hierarchy, Type};
//!
//! let lines = [
//!     r#"{"id": 1, "type": "country", "name": "Nederland"}"#,
//!     r#"{"id": 2, "address": {"country": "Nederland", "region": "Noord-Holland"}}"#,
//!     r#"{"id": 3, "address": {"country": "Nederland", "region": "Noord-Holland", "locality": "Amsterdam"}}"#,
//! ];
//! let (hierarchy, _stats) = Hierarchy::from_jsonl_lines(&lines, 2)?;
//! let geocoder = Geocoder::new(hierarchy, GeocoderConfig::default())?;
//!
//! let results = geocoder.process_query("Amsterdam, Noord-Holland");
//! assert_eq!(results[0].osm_id.get(), 3);
//! assert_eq!(results[0].kind, Type::Locality);
//! # Ok::<(), geocoder_core::GeocoderError>(())
//! ```

pub mod beam;
pub mod common;
pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod model;
pub mod search;
pub mod text;
pub mod traits;

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// Re-exports
pub use crate::beam::{Beam, BeamEntry};
pub use crate::common::{DocId, GeoObjectId, HierarchyStats, IndexStats, LoadStats};
pub use crate::config::{GeocoderConfig, GeocoderConfigBuilder};
pub use crate::error::{GeocoderError, Result};
pub use crate::index::Index;
pub use crate::loader::binary::INDEX_FORMAT_VERSION;
pub use crate::model::{BoundingBox, Entry, Geometry, Hierarchy, Type};
pub use crate::search::{GeocodeResult, Geocoder};
pub use crate::traits::EntryStore;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Installs a `tracing` subscriber for the process.
///
/// `RUST_LOG` wins when set; otherwise `level` is used. Later calls are
/// no-ops, so libraries and tests may call it freely.
///
/// ```rust
/// use geocoder_core::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::WARN)?;
/// # Ok::<(), geocoder_core::GeocoderError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static ()> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        // Another subscriber may already be installed by the host program.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
        Ok(())
    })
}
