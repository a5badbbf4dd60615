//! C ABI over boxed [`Buffer`] handles.
//!
//! Handles come from [`fixed_buffer_new`] and must be released with
//! [`fixed_buffer_free`]. Indices are signed so a negative index from C is
//! reported as out of range instead of wrapping.

use std::ptr;

use crate::buffer::Buffer;
use crate::error::BufferError;

pub const FFI_OK: i32 = 0;
pub const FFI_OUT_OF_RANGE: i32 = -1;
pub const FFI_NULL: i32 = -2;

fn status(err: BufferError) -> i32 {
    match err {
        BufferError::OutOfRange { .. } => FFI_OUT_OF_RANGE,
        BufferError::AllocationFailure { .. } => FFI_NULL,
    }
}

/// Create a buffer of `capacity` slots. Returns null if allocation fails.
#[unsafe(no_mangle)]
pub extern "C" fn fixed_buffer_new(capacity: usize) -> *mut Buffer {
    match Buffer::try_new(capacity) {
        Ok(buf) => Box::into_raw(Box::new(buf)),
        Err(_) => ptr::null_mut(),
    }
}

/// Slot count of `buf`, or 0 for null.
///
/// # Safety
/// `buf` must be null or a live handle from [`fixed_buffer_new`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixed_buffer_size(buf: *const Buffer) -> usize {
    match unsafe { buf.as_ref() } {
        Some(buf) => buf.size(),
        None => 0,
    }
}

/// Read slot `index` into `*out`.
///
/// # Safety
/// `buf` must be null or a live handle; `out` must be null or writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixed_buffer_get(buf: *const Buffer, index: i64, out: *mut i32) -> i32 {
    let Some(buf) = (unsafe { buf.as_ref() }) else {
        return FFI_NULL;
    };
    if out.is_null() {
        return FFI_NULL;
    }
    match buf.get(index) {
        Ok(value) => {
            unsafe { out.write(value) };
            FFI_OK
        }
        Err(e) => status(e),
    }
}

/// Write `value` into slot `index`.
///
/// # Safety
/// `buf` must be null or a live handle not aliased by another caller.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixed_buffer_set(buf: *mut Buffer, index: i64, value: i32) -> i32 {
    let Some(buf) = (unsafe { buf.as_mut() }) else {
        return FFI_NULL;
    };
    match buf.set(index, value) {
        Ok(()) => FFI_OK,
        Err(e) => status(e),
    }
}

/// Release a handle. Null is ignored.
///
/// # Safety
/// `buf` must be null or a live handle; it must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fixed_buffer_free(buf: *mut Buffer) {
    if !buf.is_null() {
        drop(unsafe { Box::from_raw(buf) });
    }
}
