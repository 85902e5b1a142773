use crate::error::Result;
use crate::traits::NativeWindow;
use crate::types::Extent2D;

/// Query the window's current drawable extent.
///
/// Pure query; cheap enough to call on every frame. Fails with
/// [`SurfaceError::InvalidHandle`](crate::SurfaceError::InvalidHandle) when the
/// window is gone rather than reporting 0x0.
pub fn probe<W: NativeWindow>(window: &W) -> Result<Extent2D> {
    let extent = window.client_extent()?;
    log::trace!("probed window extent {extent}");
    Ok(extent)
}

/// Extent of a client rectangle given by its edges. Inverted edges clamp to zero.
pub fn extent_from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Extent2D {
    let width = i64::from(right) - i64::from(left);
    let height = i64::from(bottom) - i64::from(top);
    Extent2D::new(clamp_to_u32(width), clamp_to_u32(height))
}

fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
