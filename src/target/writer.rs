//! Dataset generation
//!
//! Populates a directory with the fixed-size `.bin` files the lookup and scan
//! workloads read. Names are zero-padded indices (`00.bin` .. `15.bin`) so the
//! catalog's name order equals index order. Contents are random bytes; nothing
//! ever verifies them.

use crate::error::{BenchError, IoOp};
use crate::target::catalog::is_data_file_name;
use crate::util::time::Timer;
use crate::Result;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest chunk handed to a single `write` call
pub const MAX_WRITE_CHUNK: u64 = 128 * 1024 * 1024;

/// Outcome of writing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub name: String,
    pub size: u64,
    pub elapsed_ns: u64,
}

/// Writes a dataset of `total_size` bytes split into `file_size` files
#[derive(Debug)]
pub struct DatasetWriter {
    dir: PathBuf,
    total_size: u64,
    file_size: u64,
    sequential: bool,
    rng: Xoshiro256PlusPlus,
}

impl DatasetWriter {
    /// Prepare `dir` for writing
    ///
    /// A `file_size` of 0, or one at least `total_size`, produces a single
    /// file. The directory is created when missing; an existing directory must
    /// not already hold data files.
    pub fn new(dir: &Path, total_size: u64, file_size: u64, sequential: bool) -> Result<Self> {
        if total_size == 0 {
            return Err(BenchError::invalid_config("total size must be greater than 0"));
        }

        match fs::metadata(dir) {
            Ok(meta) if !meta.is_dir() => {
                return Err(BenchError::InvalidDirectory {
                    path: dir.to_path_buf(),
                    reason: "not a directory".to_string(),
                });
            }
            Ok(_) => {
                let entries = fs::read_dir(dir).map_err(|e| BenchError::io(IoOp::Stat, dir, e))?;
                for entry in entries {
                    let entry = entry.map_err(|e| BenchError::io(IoOp::Stat, dir, e))?;
                    if is_data_file_name(&entry.file_name().to_string_lossy()) {
                        return Err(BenchError::InvalidDirectory {
                            path: dir.to_path_buf(),
                            reason: "already contains data files".to_string(),
                        });
                    }
                }
            }
            Err(_) => {
                fs::create_dir_all(dir).map_err(|e| BenchError::io(IoOp::Create, dir, e))?;
            }
        }

        let file_size = if file_size == 0 || file_size > total_size {
            total_size
        } else {
            file_size
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            total_size,
            file_size,
            sequential,
            rng: Xoshiro256PlusPlus::from_entropy(),
        })
    }

    /// Use a fixed seed for the write order and file contents
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn sequential(&self) -> bool {
        self.sequential
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names in write order
    pub fn file_names(&mut self) -> Vec<String> {
        if self.file_size == self.total_size {
            return vec!["0.bin".to_string()];
        }

        let num_files = self.total_size.div_ceil(self.file_size);
        let width = (num_files - 1).to_string().len();
        let mut names: Vec<String> = (0..num_files)
            .map(|i| format!("{:0width$}.bin", i, width = width))
            .collect();

        if !self.sequential {
            names.shuffle(&mut self.rng);
        }
        names
    }

    /// Write every file and return per-file timings sorted by name
    pub fn write(mut self) -> Result<Vec<WrittenFile>> {
        let names = self.file_names();
        let chunk = self.file_size.min(MAX_WRITE_CHUNK) as usize;
        let mut buf = vec![0u8; chunk];
        let mut written = Vec::with_capacity(names.len());

        tracing::info!(
            dir = %self.dir.display(),
            files = names.len(),
            file_size = self.file_size,
            "writing dataset"
        );

        let mut timer = Timer::new();
        for name in names {
            let path = self.dir.join(&name);
            timer.start();

            let mut file = File::create(&path).map_err(|e| BenchError::io(IoOp::Create, &path, e))?;
            let mut remaining = self.file_size;
            while remaining > 0 {
                let n = remaining.min(chunk as u64) as usize;
                self.rng.fill_bytes(&mut buf[..n]);
                file.write_all(&buf[..n])
                    .map_err(|e| BenchError::io(IoOp::Write, &path, e))?;
                remaining -= n as u64;
            }
            file.flush().map_err(|e| BenchError::io(IoOp::Write, &path, e))?;
            drop(file);

            let elapsed_ns = timer.stop();
            written.push(WrittenFile {
                name,
                size: self.file_size,
                elapsed_ns,
            });
        }

        written.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::catalog::FileCatalog;
    use tempfile::TempDir;

    #[test]
    fn test_single_file_when_file_size_zero() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        let written = DatasetWriter::new(&dir, 8192, 0, true).unwrap().write().unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(written[0].name, "0.bin");
        assert_eq!(fs::metadata(dir.join("0.bin")).unwrap().len(), 8192);
    }

    #[test]
    fn test_single_file_when_file_size_exceeds_total() {
        let tmp = TempDir::new().unwrap();
        let writer = DatasetWriter::new(tmp.path(), 4096, 1 << 20, true).unwrap();
        assert_eq!(writer.file_size(), 4096);
    }

    #[test]
    fn test_zero_padded_names() {
        let tmp = TempDir::new().unwrap();
        let mut writer = DatasetWriter::new(tmp.path(), 16 * 512, 512, true).unwrap();
        let names = writer.file_names();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "00.bin");
        assert_eq!(names[15], "15.bin");
    }

    #[test]
    fn test_partial_last_file_rounds_up_count() {
        let tmp = TempDir::new().unwrap();
        let mut writer = DatasetWriter::new(tmp.path(), 2500, 1000, true).unwrap();
        assert_eq!(writer.file_names(), vec!["0.bin", "1.bin", "2.bin"]);
    }

    #[test]
    fn test_shuffled_order_same_set() {
        let tmp = TempDir::new().unwrap();
        let mut writer = DatasetWriter::new(tmp.path(), 100 * 512, 512, false)
            .unwrap()
            .with_seed(3);
        let mut names = writer.file_names();
        let shuffled = names.clone();
        names.sort();
        assert_ne!(shuffled, names);
        assert_eq!(names[0], "000.bin");
        assert_eq!(names[99], "099.bin");
    }

    #[test]
    fn test_written_dataset_is_a_valid_catalog() {
        let tmp = TempDir::new().unwrap();
        let written = DatasetWriter::new(tmp.path(), 4 * 4096, 4096, false)
            .unwrap()
            .write()
            .unwrap();
        let names: Vec<&str> = written.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["0.bin", "1.bin", "2.bin", "3.bin"]);

        let catalog = FileCatalog::build(tmp.path(), 4096).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.total_bytes(), 4 * 4096);
    }

    #[test]
    fn test_rejects_directory_with_data_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("7.bin"), b"x").unwrap();
        let err = DatasetWriter::new(tmp.path(), 4096, 0, true).unwrap_err();
        assert!(matches!(err, BenchError::InvalidDirectory { .. }));
    }

    #[test]
    fn test_rejects_file_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain");
        fs::write(&path, b"x").unwrap();
        assert!(DatasetWriter::new(&path, 4096, 0, true).is_err());
    }
}
