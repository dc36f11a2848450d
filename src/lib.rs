//! recbench - Storage microbenchmark for fixed-record datasets
//!
//! recbench generates synthetic read workloads against a directory of
//! fixed-record `.bin` files and measures throughput and latency, with
//! optional cache-bypassing (unbuffered) I/O.
//!
//! # Architecture
//!
//! - **Catalog**: validated, name-sorted list of data files (`target`)
//! - **Bounds**: user ranges (counts, byte sizes or ratios) resolved once per session (`plan::bounds`)
//! - **Planner**: per-iteration file and extent selection, block-aligned (`plan`)
//! - **Executor**: sequential or interleaved open/seek/read (`engine`)
//! - **Workers**: one thread each, bounded by a wall-clock budget (`worker`, `coordinator`)
//! - **Stats**: counters and latency histograms merged under a mutex (`stats`)
//! - **Writer**: populates a directory with random-content data files (`target::writer`)

pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod output;
pub mod plan;
pub mod stats;
pub mod target;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::Session;
pub use error::BenchError;
pub use worker::Workload;

/// Result type used throughout the engine
pub type Result<T> = std::result::Result<T, error::BenchError>;
