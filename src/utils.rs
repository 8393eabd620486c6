use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::error::{allocation_error, layout_error, Result};
use crate::ALIGNMENT;

/// A zero-initialised, over-aligned `f32` buffer.
///
/// Matrices handed to the kernels by the harnesses live in these. Alignment
/// only matters for speed: the kernels accept any `&[f32]`. The buffer
/// derefs to a slice and frees its allocation on drop with the same layout
/// it was allocated with.
///
/// # Example
///
/// ```
/// use tilegemm::utils::AlignedBuf;
///
/// let buf = AlignedBuf::zeroed(16 * 16, 64).unwrap();
/// assert_eq!(buf.len(), 256);
/// assert_eq!(buf.as_ptr() as usize % 64, 0);
/// assert!(buf.iter().all(|&x| x == 0.0));
/// ```
pub struct AlignedBuf {
    ptr: NonNull<f32>,
    len: usize,
    layout: Layout,
}

// SAFETY: AlignedBuf uniquely owns its allocation, like Vec<f32>.
unsafe impl Send for AlignedBuf {}
unsafe impl Sync for AlignedBuf {}

impl AlignedBuf {
    /// Allocates `len` zeroed elements aligned to `align` bytes.
    ///
    /// # Errors
    ///
    /// - [`crate::GemmError::Layout`] if `align` is not a power of two, is
    ///   smaller than the alignment of `f32`, or the byte size overflows.
    /// - [`crate::GemmError::Allocation`] if the allocator returns null.
    pub fn zeroed(len: usize, align: usize) -> Result<Self> {
        if !align.is_power_of_two() || align < mem::align_of::<f32>() {
            return Err(layout_error(
                len.saturating_mul(mem::size_of::<f32>()),
                align,
                "alignment must be a power of two no smaller than align_of::<f32>()",
            ));
        }

        let size = len
            .checked_mul(mem::size_of::<f32>())
            .ok_or_else(|| layout_error(usize::MAX, align, "byte size overflows usize"))?;
        let layout = Layout::from_size_align(size, align)
            .map_err(|e| layout_error(size, align, e.to_string()))?;

        if size == 0 {
            // Zero-sized layouts must not reach the allocator.
            return Ok(Self {
                ptr: NonNull::dangling(),
                len: 0,
                layout,
            });
        }

        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw as *mut f32)
            .ok_or_else(|| allocation_error(size, align, "allocator returned null"))?;

        Ok(Self { ptr, len, layout })
    }

    /// Room for an `n x n` matrix, zeroed, at the crate's default alignment.
    pub fn square(n: usize) -> Result<Self> {
        let len = n
            .checked_mul(n)
            .ok_or_else(|| layout_error(usize::MAX, ALIGNMENT, "n * n overflows usize"))?;
        Self::zeroed(len, ALIGNMENT)
    }

    /// Alignment the buffer was allocated with.
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }
}

impl Drop for AlignedBuf {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: allocated in `zeroed` with exactly this layout.
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, self.layout) };
        }
    }
}

impl Deref for AlignedBuf {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        // SAFETY: ptr is valid (or dangling with len 0) for len initialised f32s.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for AlignedBuf {
    fn deref_mut(&mut self) -> &mut [f32] {
        // SAFETY: as in `deref`, and `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl std::fmt::Debug for AlignedBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish()
    }
}
