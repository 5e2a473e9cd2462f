//! oltp-bench library
//!
//! Wires the key distributions and the batched loader together for the
//! `oltp-bench` command line.
//!
//! # CLI Usage
//!
//! ```bash
//! # Reset and load a table described by a catalog and a loader config
//! oltp-bench load --catalog catalog.yaml --config loader.yaml
//!
//! # Only report how many records and batches a load would produce
//! oltp-bench load --catalog catalog.yaml --table usertable --record-count 1000 --dry-run
//!
//! # Inspect a key distribution
//! oltp-bench sample --distribution focused-zipfian --max 9999 --num 1 --denom 4
//! ```

pub mod load;
pub mod sample;

pub use load::{run_load, LoadReport};
pub use sample::{run_sample, SampleArgs, SampleSummary};
