//! geocoder-cli: command-line interface for geocoder-core
//!
//! Builds a binary index from a JSON Lines hierarchy dump once, then answers
//! free-text queries from that index.
//!
//! Usage examples
//! --------------
//!
//! - Build an index with 8 parse workers
//!   $ geocoder-cli build --input hierarchy.jsonl.gz --output geocoder.bin --threads 8
//!
//! - Geocode a query, best match first
//!   $ geocoder-cli query --index geocoder.bin 84 Main Street Springfield
//!
//! - Show what an index holds
//!   $ geocoder-cli stats --index geocoder.bin
//!
//! Logging goes to stderr; `-v` enables info, `-vv` debug. `RUST_LOG`
//! overrides both.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context as _;
use clap::Parser;
use geocoder_core::{Geocoder, GeocoderConfig, Type};
use tracing::{info, Level};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    geocoder_core::init_logging(level)?;

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Build {
            input,
            output,
            threads,
        } => {
            let mut config = config;
            if let Some(threads) = threads {
                config.load_threads = threads.max(1);
            }
            let (geocoder, stats) = load_jsonl(&input, config)?;
            geocoder
                .save_to_binary_index(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Loaded {} entries from {}", stats.loaded, input.display());
            println!("  Lines: {}", stats.lines);
            println!("  Skipped (malformed): {}", stats.skipped);
            println!("  Duplicates: {}", stats.duplicates);
            println!("Index written to {}", output.display());
        }

        Commands::Query {
            index,
            limit,
            query,
        } => {
            let mut config = config;
            if let Some(limit) = limit {
                config.max_results = limit;
            }
            let geocoder = open_index(&index)?.with_config(config);
            let query = query.join(" ");
            info!(query = %query, "geocoding");

            let results = geocoder.process_query(&query);
            if results.is_empty() {
                println!("No match for: {query}");
            }
            let hierarchy = geocoder.hierarchy();
            for r in results {
                let Some(doc_id) = hierarchy.find(r.osm_id) else {
                    continue;
                };
                let place: Vec<&str> = std::iter::once(doc_id)
                    .chain(geocoder.ancestors(doc_id))
                    .map(|d| hierarchy.entry_at(d).name.as_str())
                    .collect();
                println!(
                    "{:.3}  {:<12} {:>20}  {}",
                    r.certainty,
                    r.kind,
                    r.osm_id,
                    place.join(", ")
                );
            }
        }

        Commands::Stats { index } => {
            let geocoder = open_index(&index)?;
            let hierarchy = geocoder.hierarchy().stats();
            let tokens = geocoder.index().stats();
            println!("Hierarchy:");
            println!("  Entries: {}", hierarchy.entries);
            for kind in Type::ALL {
                println!("  {:<12} {}", format!("{kind}:"), hierarchy.count(kind));
            }
            println!("Index:");
            println!("  Tokens: {}", tokens.tokens);
            println!("  Postings: {}", tokens.postings);
            println!("  Building owners: {}", tokens.building_owners);
            println!("  Related buildings: {}", tokens.related_buildings);
        }
    }

    Ok(())
}

fn open_index(path: &std::path::Path) -> anyhow::Result<Geocoder> {
    Geocoder::load_from_binary_index(path)
        .with_context(|| format!("opening binary index {}", path.display()))
}

#[cfg(feature = "json")]
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<GeocoderConfig> {
    match path {
        Some(path) => GeocoderConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display())),
        None => Ok(GeocoderConfig::default()),
    }
}

#[cfg(not(feature = "json"))]
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<GeocoderConfig> {
    match path {
        Some(_) => anyhow::bail!("--config needs the `json` feature"),
        None => Ok(GeocoderConfig::default()),
    }
}

#[cfg(feature = "json")]
fn load_jsonl(
    input: &std::path::Path,
    config: GeocoderConfig,
) -> anyhow::Result<(Geocoder, geocoder_core::LoadStats)> {
    Geocoder::load_from_jsonl_with_config(input, config)
        .with_context(|| format!("loading hierarchy {}", input.display()))
}

#[cfg(not(feature = "json"))]
fn load_jsonl(
    _input: &std::path::Path,
    _config: GeocoderConfig,
) -> anyhow::Result<(Geocoder, geocoder_core::LoadStats)> {
    anyhow::bail!("`build` needs the `json` feature")
}
