//! Aligned I/O buffer
//!
//! Direct I/O requires the destination address to be aligned to the device
//! block size. Each worker owns exactly one `AlignedBuffer`, sized by
//! `util::align::buffer_size`, and the memory is released by `Drop` on every
//! exit path.

use crate::error::BenchError;
use crate::Result;
use std::alloc::{alloc_zeroed, dealloc, Layout};

/// Memory-aligned buffer suitable for O_DIRECT reads
pub struct AlignedBuffer {
    ptr: *mut u8,
    size: usize,
    alignment: usize,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocate a zeroed buffer of `size` bytes aligned to `alignment`
    ///
    /// `alignment` must be a power of two and `size` must be non-zero.
    pub fn new(size: usize, alignment: usize) -> Result<Self> {
        if !alignment.is_power_of_two() {
            return Err(BenchError::invalid_config(format!(
                "buffer alignment {} is not a power of two",
                alignment
            )));
        }
        if size == 0 {
            return Err(BenchError::invalid_config("buffer size must be greater than 0"));
        }

        let layout = Layout::from_size_align(size, alignment).map_err(|e| {
            BenchError::invalid_config(format!("invalid buffer layout: {}", e))
        })?;

        // SAFETY: layout has a non-zero size
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(BenchError::invalid_config(format!(
                "failed to allocate {} byte aligned buffer",
                size
            )));
        }

        Ok(AlignedBuffer {
            ptr,
            size,
            alignment,
            layout,
        })
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for `size` initialized bytes for the lifetime of self
        unsafe { std::slice::from_raw_parts(self.ptr, self.size) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and &mut self guarantees exclusive access
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.size) }
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Verify that the buffer is properly aligned
    #[inline(always)]
    pub fn is_aligned(&self) -> bool {
        (self.ptr as usize) % self.alignment == 0
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with exactly this layout
        unsafe {
            dealloc(self.ptr, self.layout);
        }
    }
}

// AlignedBuffer is Send because it owns its memory
unsafe impl Send for AlignedBuffer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_buffer_creation() {
        let buf = AlignedBuffer::new(4096, 4096).unwrap();
        assert_eq!(buf.size(), 4096);
        assert_eq!(buf.alignment(), 4096);
        assert!(buf.is_aligned());
    }

    #[test]
    fn test_aligned_buffer_various_alignments() {
        for alignment in [512, 1024, 2048, 4096, 8192] {
            let buf = AlignedBuffer::new(alignment * 2, alignment).unwrap();
            assert!(buf.is_aligned(), "Buffer not aligned to {}", alignment);
        }
    }

    #[test]
    fn test_aligned_buffer_starts_zeroed() {
        let buf = AlignedBuffer::new(8192, 4096).unwrap();
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_aligned_buffer_writable() {
        let mut buf = AlignedBuffer::new(512, 512).unwrap();
        buf.as_mut_slice()[511] = 0xAB;
        assert_eq!(buf.as_slice()[511], 0xAB);
    }

    #[test]
    fn test_aligned_buffer_rejects_bad_alignment() {
        assert!(matches!(
            AlignedBuffer::new(4096, 4095),
            Err(BenchError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_aligned_buffer_rejects_zero_size() {
        assert!(AlignedBuffer::new(0, 4096).is_err());
    }
}
