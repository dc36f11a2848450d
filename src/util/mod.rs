//! Utility modules: alignment arithmetic, aligned buffers and timing

pub mod align;
pub mod buffer;
pub mod time;
