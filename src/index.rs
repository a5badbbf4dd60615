use crate::error::{BufferError, Result};

/// Primitive integers accepted as slot indices.
///
/// Every implementor widens losslessly into `i128`, so a negative index is
/// rejected as negative instead of wrapping into a huge unsigned offset.
pub trait SlotIndex: Copy {
    fn to_i128(self) -> i128;
}

macro_rules! slot_index {
    ($($ty:ty),*) => {
        $(
            impl SlotIndex for $ty {
                #[inline]
                fn to_i128(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

slot_index!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

/// Checks `index` against `capacity` and returns the slot offset.
#[inline]
pub(crate) fn resolve<I: SlotIndex>(index: I, capacity: usize) -> Result<usize> {
    let wide = index.to_i128();
    if wide < 0 || wide >= capacity as i128 {
        return Err(BufferError::OutOfRange { index: wide, capacity });
    }
    Ok(wide as usize)
}
