use crate::types::{Extent3D, ImageAspect};

/// Rendered image handed to a surface for presentation
pub trait PresentImage {
    /// Extent of the given mip level
    fn mip_level_extent(&self, aspect: ImageAspect, level: u32) -> Extent3D;

    /// Bytes between the starts of consecutive rows
    fn row_pitch_bytes(&self, aspect: ImageAspect, level: u32) -> usize;

    /// Backing memory starting `offset` bytes in, if the offset is in range
    fn memory_at(&self, offset: usize) -> Option<&[u8]>;
}
