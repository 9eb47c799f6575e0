// crates/geocoder-core/src/loader/jsonl.rs

// ---------------------------------------------------------------------------
// This entire file is skipped if the 'json' feature is missing.
// ---------------------------------------------------------------------------

use super::common_io::open_stream;
use crate::common::LoadStats;
use crate::error::{GeocoderError, Result};
use crate::model::convert::entry_from_raw;
use crate::model::raw::EntryRaw;
use crate::model::{Entry, Hierarchy};
use rayon::prelude::*;
use std::io::BufRead;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Parses a geo-object id: `0x`-prefixed hex, decimal, or bare hex.
pub fn parse_id(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    s.parse().ok().or_else(|| u64::from_str_radix(s, 16).ok())
}

/// Parses one hierarchy line: either a bare JSON object or `<id> <json>`,
/// where the prefix id overrides the object's own.
pub fn parse_line(line: &str) -> Result<Entry> {
    let line = line.trim();
    let (id, json) = if line.starts_with('{') {
        (None, line)
    } else {
        let (prefix, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| GeocoderError::InvalidData("expected `<id> <json>`".into()))?;
        let id = parse_id(prefix)
            .ok_or_else(|| GeocoderError::InvalidData(format!("bad id {prefix:?}")))?;
        (Some(id), rest.trim_start())
    };
    let raw: EntryRaw = serde_json::from_str(json)?;
    entry_from_raw(raw, id)
}

/// Entries parsed by one worker, plus its counters.
#[derive(Default)]
struct Shard {
    entries: Vec<Entry>,
    lines: usize,
    skipped: usize,
}

fn parse_shard<S: AsRef<[u8]>>(first_line: usize, lines: &[S]) -> Shard {
    let mut shard = Shard::default();
    for (offset, line) in lines.iter().enumerate() {
        let parsed = match std::str::from_utf8(line.as_ref()) {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => parse_line(text),
            Err(e) => Err(GeocoderError::InvalidData(format!("not valid UTF-8: {e}"))),
        };
        shard.lines += 1;
        match parsed {
            Ok(entry) => shard.entries.push(entry),
            Err(e) => {
                let err = GeocoderError::Parse {
                    line: first_line + offset + 1,
                    reason: e.to_string(),
                };
                warn!(error = %err, "skipping malformed hierarchy line");
                shard.skipped += 1;
            }
        }
    }
    shard
}

impl Hierarchy {
    /// Loads a JSON Lines dump (plain or `.gz`).
    ///
    /// Malformed lines are logged and counted, never fatal; I/O failures
    /// are.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), threads = threads))]
    pub fn load_from_jsonl<P: AsRef<Path>>(path: P, threads: usize) -> Result<(Self, LoadStats)> {
        let reader = open_stream(path.as_ref())?;
        // Raw bytes: a line that is not UTF-8 is skipped by its worker, not fatal.
        let lines = reader
            .split(b'\n')
            .collect::<std::io::Result<Vec<Vec<u8>>>>()?;
        Self::from_jsonl_lines(&lines, threads)
    }

    /// Parses already-read lines (`&str`, `String` or raw bytes) with
    /// `threads` workers.
    ///
    /// Lines are cut into one contiguous shard per worker; each worker
    /// parses into its own buffer and the buffers are merged in line order
    /// once every worker is done.
    pub fn from_jsonl_lines<S: AsRef<[u8]> + Sync>(
        lines: &[S],
        threads: usize,
    ) -> Result<(Self, LoadStats)> {
        let threads = threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        let chunk = lines.len().div_ceil(threads).max(1);

        let shards: Vec<Shard> = pool.install(|| {
            lines
                .par_chunks(chunk)
                .enumerate()
                .map(|(n, shard)| parse_shard(n * chunk, shard))
                .collect()
        });

        let mut stats = LoadStats::default();
        let mut entries = Vec::with_capacity(shards.iter().map(|s| s.entries.len()).sum());
        for shard in shards {
            stats.lines += shard.lines;
            stats.skipped += shard.skipped;
            entries.extend(shard.entries);
        }

        let (hierarchy, duplicates) = Hierarchy::from_entries(entries)?;
        stats.duplicates = duplicates;
        stats.loaded = hierarchy.len();
        info!(
            lines = stats.lines,
            loaded = stats.loaded,
            skipped = stats.skipped,
            duplicates = stats.duplicates,
            "hierarchy loaded"
        );
        Ok((hierarchy, stats))
    }
}
