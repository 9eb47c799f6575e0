//! geocoder-cli
//! ============
//!
//! Command-line interface for the `geocoder-core` hierarchical geocoder.
//!
//! This crate primarily provides a binary (`geocoder-cli`). The library
//! target only carries this overview.
//!
//! Basic usage:
//!
//! ```text
//! geocoder-cli build --input hierarchy.jsonl.gz --output geocoder.bin --threads 8
//! geocoder-cli query --index geocoder.bin 84 Main Street Springfield
//! geocoder-cli stats --index geocoder.bin
//! geocoder-cli -vv --config geocoder.json query --index geocoder.bin --limit 5 Amsterdam
//! ```
//!
//! For programmatic access use the [`geocoder-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
