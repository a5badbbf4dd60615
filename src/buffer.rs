use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::error::{BufferError, Result};
use crate::index::{self, SlotIndex};

/// Value held by every slot that has not been written since construction.
///
/// Storage comes straight from the allocator without zeroing; each slot is
/// stamped with this sentinel once so that reads of unwritten slots are
/// defined and stable.
pub const UNSET: i32 = i32::MIN;

/// Fixed-capacity buffer of `i32` slots backed by a single raw allocation.
///
/// The buffer owns its region exclusively and releases it exactly once in
/// [`Drop`]. Capacity is fixed at construction; there is no way to grow or
/// shrink it. Copies are explicit through [`Clone`], which allocates a new
/// region and copies every slot.
pub struct Buffer {
    ptr: NonNull<i32>,
    cap: usize,
    _marker: PhantomData<i32>,
}

// SAFETY: the buffer exclusively owns plain `i32` slots, so moving it to
// another thread moves the only handle to the region.
unsafe impl Send for Buffer {}
// SAFETY: `&Buffer` only hands out shared reads of `i32`.
unsafe impl Sync for Buffer {}

impl Buffer {
    /// Allocates `capacity` slots, each holding [`UNSET`].
    ///
    /// A zero capacity allocates nothing. Aborts through
    /// [`handle_alloc_error`] if the allocator fails.
    ///
    /// # Panics
    /// Panics if `capacity` slots would exceed `isize::MAX` bytes.
    pub fn new(capacity: usize) -> Self {
        Self::filled(capacity, UNSET)
    }

    /// Allocates `capacity` slots, each holding `value`.
    ///
    /// # Panics
    /// Panics if `capacity` slots would exceed `isize::MAX` bytes.
    pub fn filled(capacity: usize, value: i32) -> Self {
        let layout = Layout::array::<i32>(capacity).expect("Capacity overflow");
        let ptr = match allocate(layout) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        };
        // SAFETY: `ptr` is valid for `capacity` writes of `i32`.
        unsafe { Self::stamp(ptr, capacity, value) }
    }

    /// Fallible form of [`Buffer::new`].
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::try_filled(capacity, UNSET)
    }

    /// Fallible form of [`Buffer::filled`]. Overflowing capacities and
    /// allocator failures both surface as [`BufferError::AllocationFailure`].
    pub fn try_filled(capacity: usize, value: i32) -> Result<Self> {
        let failure = BufferError::AllocationFailure { capacity };
        let layout = Layout::array::<i32>(capacity).map_err(|_| failure)?;
        let ptr = allocate(layout).ok_or(failure)?;
        // SAFETY: `ptr` is valid for `capacity` writes of `i32`.
        Ok(unsafe { Self::stamp(ptr, capacity, value) })
    }

    /// Writes `value` into every slot of a fresh region and takes ownership of it.
    ///
    /// # Safety
    /// `ptr` must come from [`allocate`] with `Layout::array::<i32>(capacity)`.
    unsafe fn stamp(ptr: NonNull<i32>, capacity: usize, value: i32) -> Self {
        for i in 0..capacity {
            // SAFETY: `i < capacity`, within the allocation.
            unsafe { ptr.as_ptr().add(i).write(value) };
        }
        Self {
            ptr,
            cap: capacity,
            _marker: PhantomData,
        }
    }

    /// Number of slots, fixed at construction.
    #[inline]
    pub fn size(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cap == 0
    }

    /// Shared reference to the slot at `index`.
    pub fn at<I: SlotIndex>(&self, index: I) -> Result<&i32> {
        let i = index::resolve(index, self.cap)?;
        // SAFETY: `resolve` guarantees `i < cap`.
        Ok(unsafe { &*self.ptr.as_ptr().add(i) })
    }

    /// Mutable reference to the slot at `index`.
    pub fn at_mut<I: SlotIndex>(&mut self, index: I) -> Result<&mut i32> {
        let i = index::resolve(index, self.cap)?;
        // SAFETY: `resolve` guarantees `i < cap`, and `&mut self` is unique.
        Ok(unsafe { &mut *self.ptr.as_ptr().add(i) })
    }

    /// Reads the slot at `index`.
    #[inline]
    pub fn get<I: SlotIndex>(&self, index: I) -> Result<i32> {
        self.at(index).copied()
    }

    /// Overwrites the slot at `index`. Nothing changes when the index is out of range.
    #[inline]
    pub fn set<I: SlotIndex>(&mut self, index: I, value: i32) -> Result<()> {
        *self.at_mut(index)? = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[i32] {
        // SAFETY: `ptr` is valid (or dangling with `cap == 0`) for `cap` reads.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.cap) }
    }

    /// Mutable view of all slots. The length is always `size()`.
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        // SAFETY: as in `as_slice`, plus `&mut self` is unique.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.cap) }
    }

    /// `(index, value)` pairs from slot 0 to `size() - 1`.
    pub fn slots(&self) -> Vec<(usize, i32)> {
        self.as_slice().iter().copied().enumerate().collect()
    }

    fn layout(&self) -> Layout {
        // SAFETY: `Layout::array::<i32>(cap)` succeeded at construction.
        unsafe {
            Layout::from_size_align_unchecked(
                self.cap * mem::size_of::<i32>(),
                mem::align_of::<i32>(),
            )
        }
    }
}

fn allocate(layout: Layout) -> Option<NonNull<i32>> {
    if layout.size() == 0 {
        return Some(NonNull::dangling());
    }
    // SAFETY: `layout` has a non-zero size.
    NonNull::new(unsafe { alloc(layout) }.cast::<i32>())
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if self.cap != 0 {
            // SAFETY: the region was allocated with this layout and is freed only here.
            unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout()) };
        }
    }
}

impl Clone for Buffer {
    fn clone(&self) -> Self {
        let layout = self.layout();
        let ptr = match allocate(layout) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        };
        // SAFETY: both regions hold `cap` slots and are distinct allocations.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), ptr.as_ptr(), self.cap) };
        Self {
            ptr,
            cap: self.cap,
            _marker: PhantomData,
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Buffer {}

impl Index<usize> for Buffer {
    type Output = i32;

    fn index(&self, index: usize) -> &i32 {
        match self.at(index) {
            Ok(slot) => slot,
            Err(e) => panic!("{e}"),
        }
    }
}

impl IndexMut<usize> for Buffer {
    fn index_mut(&mut self, index: usize) -> &mut i32 {
        match self.at_mut(index) {
            Ok(slot) => slot,
            Err(e) => panic!("{e}"),
        }
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.cap)
            .field("slots", &self.as_slice())
            .finish()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.slots() {
            writeln!(f, "Element {i}: {value}")?;
        }
        Ok(())
    }
}
