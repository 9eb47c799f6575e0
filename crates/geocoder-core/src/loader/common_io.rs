// crates/geocoder-core/src/loader/common_io.rs
use crate::error::{GeocoderError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// Opens a text input for line-wise reading. Files ending in `.gz` are
/// decompressed on the fly when the `compact` feature is enabled.
pub fn open_stream(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| {
        GeocoderError::NotFound(format!("Hierarchy not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        return Ok(Box::new(BufReader::new(GzDecoder::new(reader))));

        #[cfg(not(feature = "compact"))]
        return Err(GeocoderError::InvalidData(format!(
            "{} is gzip-compressed, build with the `compact` feature to read it",
            path.display()
        )));
    }

    Ok(Box::new(reader))
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
