//! Dataset targets
//!
//! - `catalog`: discovers and validates the `.bin` files of a dataset
//! - `file`: read-only handle used by the executor, with optional page-cache bypass
//! - `writer`: generates a dataset of fixed-size files

pub mod catalog;
pub mod file;
pub mod writer;

pub use catalog::{DataFile, FileCatalog};
pub use file::{detect_block_size, DataFileReader};
pub use writer::{DatasetWriter, WrittenFile};
