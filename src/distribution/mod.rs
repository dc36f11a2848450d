//! Random sources for access planning
//!
//! Every worker owns one random source; nothing here is shared between
//! threads. The planner draws three kinds of values from it:
//!
//! - ratios in `[0, 1)` for extent sizes and positions
//! - inclusive integer ranges for file counts, file indices and burst lengths
//!
//! # Example
//!
//! ```
//! use recbench::distribution::{RandomSource, uniform::UniformSource};
//!
//! let mut rng = UniformSource::with_seed(7);
//! let files = rng.next_range(2, 5);
//! assert!((2..=5).contains(&files));
//! assert!(rng.next_unit() < 1.0);
//! ```

pub mod uniform;

/// Source of uniformly distributed values
///
/// Must be `Send` so a worker can be moved onto its own thread.
pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in the inclusive range `[min, max]`
    ///
    /// Returns `min` when `max <= min`.
    fn next_range(&mut self, min: u64, max: u64) -> u64;

    /// Uniform value in `[min, max]`; `min` when the range is empty
    fn next_between(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        (min + self.next_unit() * (max - min)).min(max)
    }
}
