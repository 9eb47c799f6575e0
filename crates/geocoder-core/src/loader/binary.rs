// crates/geocoder-core/src/loader/binary.rs

//! Versioned binary index.
//!
//! ```text
//! magic   8 bytes  "GEOCODER"
//! version u32 LE   INDEX_FORMAT_VERSION
//! len     u64 LE   hierarchy section length
//! bytes            bincode(Hierarchy)
//! len     u64 LE   index section length
//! bytes            bincode(Index)
//! ```

use crate::common::DocId;
use crate::error::{GeocoderError, Result};
use crate::index::Index;
use crate::model::Hierarchy;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tracing::{info, instrument};

pub const MAGIC: &[u8; 8] = b"GEOCODER";

/// Bumped on every change to the section encoding. Files of another version
/// are refused, never read best-effort.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Upper bound for a single section, guarding allocations against corrupt
/// length prefixes.
const MAX_SECTION_BYTES: u64 = 4 * 1024 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_SECTION_BYTES)
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_index(path: &Path, hierarchy: &Hierarchy, index: &Index) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let written = write_to(&mut writer, hierarchy, index)?;
    writer.flush()?;
    info!(bytes = written, entries = hierarchy.len(), "binary index saved");
    Ok(())
}

/// Writes the full layout to `w`, returning the number of bytes written.
pub fn write_to<W: Write>(w: &mut W, hierarchy: &Hierarchy, index: &Index) -> Result<u64> {
    w.write_all(MAGIC)?;
    w.write_all(&INDEX_FORMAT_VERSION.to_le_bytes())?;
    let mut written = (MAGIC.len() + 4) as u64;
    written += write_section(w, hierarchy)?;
    written += write_section(w, index)?;
    Ok(written)
}

fn write_section<W: Write, T: Serialize>(w: &mut W, value: &T) -> Result<u64> {
    let bytes = options().serialize(value)?;
    let len = bytes.len() as u64;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(&bytes)?;
    Ok(8 + len)
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_index(path: &Path) -> Result<(Hierarchy, Index)> {
    let file = File::open(path).map_err(|e| {
        GeocoderError::NotFound(format!("Binary index not found at {}: {}", path.display(), e))
    })?;
    let mut reader = BufReader::new(file);
    let (hierarchy, index) = read_from(&mut reader)?;
    info!(entries = hierarchy.len(), "binary index loaded");
    Ok((hierarchy, index))
}

pub fn read_from<R: Read>(r: &mut R) -> Result<(Hierarchy, Index)> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => GeocoderError::BadMagic,
        _ => GeocoderError::Io(e),
    })?;
    if &magic != MAGIC {
        return Err(GeocoderError::BadMagic);
    }

    let mut version = [0u8; 4];
    r.read_exact(&mut version)?;
    let found = u32::from_le_bytes(version);
    if found != INDEX_FORMAT_VERSION {
        return Err(GeocoderError::VersionMismatch {
            expected: INDEX_FORMAT_VERSION,
            found,
        });
    }

    let hierarchy: Hierarchy = read_section(r, "hierarchy")?;
    let index: Index = read_section(r, "index")?;

    if DocId::try_from(hierarchy.len()).is_err() {
        return Err(GeocoderError::InvalidData(format!(
            "hierarchy holds {} entries, more than a doc id can address",
            hierarchy.len()
        )));
    }
    if let Some(max) = index.max_doc_id() {
        if max as usize >= hierarchy.len() {
            return Err(GeocoderError::InvalidData(format!(
                "index refers to doc {max} but the hierarchy holds {} entries",
                hierarchy.len()
            )));
        }
    }
    Ok((hierarchy, index))
}

fn read_section<R: Read, T: DeserializeOwned>(r: &mut R, name: &str) -> Result<T> {
    let mut len = [0u8; 8];
    r.read_exact(&mut len).map_err(|e| truncated(e, name))?;
    let len = u64::from_le_bytes(len);
    if len > MAX_SECTION_BYTES {
        return Err(GeocoderError::InvalidData(format!(
            "{name} section claims {len} bytes"
        )));
    }

    let mut buf = Vec::new();
    r.by_ref().take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(GeocoderError::InvalidData(format!(
            "{name} section truncated: {} of {len} bytes",
            buf.len()
        )));
    }
    Ok(options().deserialize(&buf)?)
}

fn truncated(e: std::io::Error, name: &str) -> GeocoderError {
    match e.kind() {
        ErrorKind::UnexpectedEof => {
            GeocoderError::InvalidData(format!("{name} section missing"))
        }
        _ => GeocoderError::Io(e),
    }
}
