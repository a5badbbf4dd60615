//! Fixed-capacity integer buffer backed by a single raw allocation.
//!
//! A [`Buffer`] owns one region of `i32` slots sized at construction, checks
//! every index against its capacity, and frees the region exactly once when
//! dropped.

pub mod buffer;
pub mod error;
pub mod ffi;
mod index;

pub use buffer::{Buffer, UNSET};
pub use error::{BufferError, Result};
pub use index::SlotIndex;
