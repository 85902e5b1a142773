use crate::core::dib::{Blit, DibDescriptor};
use crate::error::{Result, SurfaceError};
use crate::traits::NativeWindow;
use crate::types::Extent2D;

struct BufferResources<W: NativeWindow> {
    // Dropped in declaration order: draw context first, then the header block
    draw_context: W::DrawContext,
    header: W::Header,
}

/// Draw context plus bitmap header for blitting into a window at one fixed size.
///
/// Resources are released on [`release`](Self::release) or on drop, whichever
/// comes first.
pub struct PresentationBuffer<W: NativeWindow> {
    descriptor: DibDescriptor,
    resources: Option<BufferResources<W>>,
}

impl<W: NativeWindow> PresentationBuffer<W> {
    /// Acquire a draw context from `window` and build a top-down 32-bit header
    /// of `extent`. On failure nothing stays acquired.
    pub fn allocate(window: &W, extent: Extent2D) -> Result<Self> {
        let draw_context = window.acquire_draw_context().map_err(into_allocation)?;
        let descriptor = DibDescriptor::top_down_rgb32(extent)?;
        let header = window.create_header(&descriptor).map_err(into_allocation)?;

        log::debug!("allocated presentation buffer {extent}");
        Ok(Self {
            descriptor,
            resources: Some(BufferResources {
                draw_context,
                header,
            }),
        })
    }

    /// Release the draw context and header. Calling again is a no-op.
    pub fn release(&mut self) {
        if self.resources.take().is_some() {
            log::debug!("released presentation buffer {}", self.descriptor.extent());
        }
    }

    pub fn is_released(&self) -> bool {
        self.resources.is_none()
    }

    /// Size the header describes
    pub fn extent(&self) -> Extent2D {
        self.descriptor.extent()
    }

    pub fn descriptor(&self) -> &DibDescriptor {
        &self.descriptor
    }

    /// Blit through this buffer's draw context
    pub fn blit(&mut self, window: &W, blit: &Blit<'_>) -> Result<()> {
        let resources = self
            .resources
            .as_mut()
            .ok_or_else(|| SurfaceError::presentation("presentation buffer already released"))?;
        window
            .stretch_blit(&mut resources.draw_context, &resources.header, blit)
            .map_err(|err| match err {
                SurfaceError::InvalidHandle | SurfaceError::PresentationFailed(_) => err,
                other => SurfaceError::presentation(other),
            })
    }
}

impl<W: NativeWindow> Drop for PresentationBuffer<W> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<W: NativeWindow> std::fmt::Debug for PresentationBuffer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationBuffer")
            .field("extent", &self.extent())
            .field("released", &self.is_released())
            .finish()
    }
}

/// Invalid handles keep their meaning; anything else is an allocation failure
fn into_allocation(err: SurfaceError) -> SurfaceError {
    match err {
        SurfaceError::InvalidHandle | SurfaceError::ResourceAllocationFailed(_) => err,
        other => SurfaceError::allocation(other),
    }
}
