// crates/geocoder-core/src/config.rs
use serde::{Deserialize, Serialize};

/// Default width of the per-query beam.
pub const DEFAULT_BEAM_SIZE: usize = 100;
/// Default cap on the number of returned results.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Tunables of a [`crate::Geocoder`].
///
/// Missing fields in a JSON config fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// How many scored candidates a query keeps while searching.
    pub beam_size: usize,
    /// How many results `process_query` returns at most.
    pub max_results: usize,
    /// Worker threads for JSON Lines ingestion and the index build.
    pub load_threads: usize,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            beam_size: DEFAULT_BEAM_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
            load_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl GeocoderConfig {
    pub fn builder() -> GeocoderConfigBuilder {
        GeocoderConfigBuilder::new()
    }

    /// Reads a config from a JSON file such as `{"beam_size": 50}`.
    #[cfg(feature = "json")]
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }
}

/// Builder for [`GeocoderConfig`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct GeocoderConfigBuilder {
    config: GeocoderConfig,
}

impl GeocoderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GeocoderConfig::default(),
        }
    }

    pub fn beam_size(mut self, size: usize) -> Self {
        self.config.beam_size = size;
        self
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.config.max_results = max;
        self
    }

    /// Clamped to at least one worker.
    pub fn load_threads(mut self, threads: usize) -> Self {
        self.config.load_threads = threads.max(1);
        self
    }

    pub fn build(self) -> GeocoderConfig {
        self.config
    }
}
