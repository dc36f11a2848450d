//! Data file catalog
//!
//! The catalog is the validated, immutable list of `.bin` files a session
//! reads from. It is built once before any worker starts and shared read-only
//! (`Arc<FileCatalog>`) by every worker.
//!
//! # Validation
//!
//! - the path must exist and be a directory
//! - at least one regular file with a `.bin` suffix (case-insensitive)
//! - every such file's size must be a multiple of the record size
//!
//! Entries are sorted by name, so datasets written with zero-padded indices
//! come back in index order.

use crate::error::{BenchError, IoOp};
use crate::Result;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix that marks a data file
pub const DATA_FILE_SUFFIX: &str = ".bin";

/// One file of the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Validated, name-sorted list of data files
#[derive(Debug, Clone)]
pub struct FileCatalog {
    dir: PathBuf,
    record_size: u64,
    files: Vec<DataFile>,
}

/// Whether `name` ends in `.bin`, ignoring case
pub fn is_data_file_name(name: &str) -> bool {
    let suffix_len = DATA_FILE_SUFFIX.len();
    name.len() > suffix_len
        && name.is_char_boundary(name.len() - suffix_len)
        && name[name.len() - suffix_len..].eq_ignore_ascii_case(DATA_FILE_SUFFIX)
}

impl FileCatalog {
    /// Scan `dir` and validate every data file against `record_size`
    pub fn build(dir: &Path, record_size: u64) -> Result<Self> {
        if record_size == 0 {
            return Err(BenchError::invalid_config("record size must be greater than 0"));
        }

        let meta = fs::metadata(dir).map_err(|e| BenchError::InvalidDirectory {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(BenchError::InvalidDirectory {
                path: dir.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let mut candidates = Vec::new();
        let entries = fs::read_dir(dir).map_err(|e| BenchError::InvalidDirectory {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| BenchError::io(IoOp::Stat, dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_data_file_name(&name) {
                candidates.push((name, entry.path()));
            }
        }

        // Large datasets hold thousands of files; stat them in parallel
        let mut files: Vec<DataFile> = candidates
            .into_par_iter()
            .map(|(name, path)| -> Result<Option<DataFile>> {
                let meta = fs::metadata(&path).map_err(|e| BenchError::io(IoOp::Stat, &path, e))?;
                if !meta.is_file() {
                    return Ok(None);
                }
                Ok(Some(DataFile {
                    name,
                    path,
                    size: meta.len(),
                }))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        if files.is_empty() {
            return Err(BenchError::InvalidDirectory {
                path: dir.to_path_buf(),
                reason: format!("no {} files found", DATA_FILE_SUFFIX),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(bad) = files.iter().find(|f| f.size % record_size != 0) {
            return Err(BenchError::MalformedFile {
                file: bad.path.clone(),
                size: bad.size,
                record_size,
            });
        }

        tracing::debug!(
            dir = %dir.display(),
            files = files.len(),
            total_bytes = files.iter().map(|f| f.size).sum::<u64>(),
            "built file catalog"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            record_size,
            files,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_size(&self) -> u64 {
        self.record_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false for a successfully built catalog
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &DataFile {
        &self.files[index]
    }

    pub fn files(&self) -> &[DataFile] {
        &self.files
    }

    /// Sum of all file sizes
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, size: usize) {
        fs::write(dir.join(name), vec![0u8; size]).unwrap();
    }

    #[test]
    fn test_catalog_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "02.bin", 4096);
        write_file(tmp.path(), "00.bin", 8192);
        write_file(tmp.path(), "01.BIN", 4096);

        let catalog = FileCatalog::build(tmp.path(), 4096).unwrap();
        let names: Vec<&str> = catalog.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["00.bin", "01.BIN", "02.bin"]);
        assert_eq!(catalog.get(0).size, 8192);
        assert_eq!(catalog.total_bytes(), 16384);
    }

    #[test]
    fn test_catalog_ignores_other_files() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "0.bin", 100);
        write_file(tmp.path(), "notes.txt", 7);
        write_file(tmp.path(), "bin", 3);
        fs::create_dir(tmp.path().join("dir.bin")).unwrap();

        let catalog = FileCatalog::build(tmp.path(), 100).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = FileCatalog::build(&tmp.path().join("nope"), 4096).unwrap_err();
        assert!(matches!(err, BenchError::InvalidDirectory { .. }));
    }

    #[test]
    fn test_catalog_path_is_a_file() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "0.bin", 4096);
        let err = FileCatalog::build(&tmp.path().join("0.bin"), 4096).unwrap_err();
        assert!(matches!(err, BenchError::InvalidDirectory { .. }));
    }

    #[test]
    fn test_catalog_empty_directory() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "readme.md", 10);
        let err = FileCatalog::build(tmp.path(), 4096).unwrap_err();
        assert!(matches!(err, BenchError::InvalidDirectory { .. }));
    }

    #[test]
    fn test_catalog_malformed_file() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "0.bin", 4096);
        write_file(tmp.path(), "1.bin", 4000);

        match FileCatalog::build(tmp.path(), 4096).unwrap_err() {
            BenchError::MalformedFile { file, size, record_size } => {
                assert!(file.ends_with("1.bin"));
                assert_eq!(size, 4000);
                assert_eq!(record_size, 4096);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_catalog_zero_record_size() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "0.bin", 4096);
        assert!(matches!(
            FileCatalog::build(tmp.path(), 0).unwrap_err(),
            BenchError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn test_is_data_file_name() {
        assert!(is_data_file_name("0.bin"));
        assert!(is_data_file_name("0001.Bin"));
        assert!(!is_data_file_name(".bin"));
        assert!(!is_data_file_name("0.bin.tmp"));
        assert!(!is_data_file_name("0bin"));
    }
}
