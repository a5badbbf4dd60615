use thiserror::Error;

/// Errors raised by [`Buffer`](crate::Buffer) construction and indexed access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The index does not lie in `[0, capacity)`. Negative indices keep their sign.
    #[error("Index out of range: {index} (capacity {capacity})")]
    OutOfRange { index: i128, capacity: usize },

    #[error("Allocation failed for {capacity} slots")]
    AllocationFailure { capacity: usize },
}

pub type Result<T> = std::result::Result<T, BufferError>;
