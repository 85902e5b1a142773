use serde::Serialize;

use crate::config::{AttachPolicy, SurfaceConfig};
use crate::core::dib::Blit;
use crate::core::presentation_buffer::PresentationBuffer;
use crate::core::probe::probe;
use crate::error::{Result, SurfaceError};
use crate::traits::{NativeWindow, PresentImage, PresentationSurface};
use crate::types::{
    AllocationCallbacks, Extent2D, ImageAspect, SurfaceCapabilities, SwapchainId,
};

/// Construction input: application instance plus target window
pub struct SurfaceCreateInfo<W: NativeWindow> {
    pub instance: W::Instance,
    pub window: W,
}

impl<W: NativeWindow> SurfaceCreateInfo<W> {
    pub fn new(instance: W::Instance, window: W) -> Self {
        Self { instance, window }
    }
}

/// Running totals for one surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PresentStats {
    /// Successful presents, including skipped blits
    pub presents: u64,
    /// Buffer rebuilds after construction
    pub reallocations: u64,
    /// Presents that had nothing to paint (zero-area window or image)
    pub skipped_blits: u64,
    pub failed_presents: u64,
}

enum BufferSlot<W: NativeWindow> {
    Ready(PresentationBuffer<W>),
    /// Old buffer released, replacement not yet allocated
    Degraded,
    Destroyed,
}

/// Presentation surface over a native window.
///
/// Holds the last probed extent and a [`PresentationBuffer`] of exactly that
/// size. Every [`present`](PresentationSurface::present) re-probes the window
/// and rebuilds the buffer first if the extent moved.
pub struct Surface<W: NativeWindow> {
    // Declared before the window so it is dropped first
    buffer: BufferSlot<W>,
    instance: W::Instance,
    window: W,
    extent: Extent2D,
    config: SurfaceConfig,
    swapchain: Option<SwapchainId>,
    stats: PresentStats,
}

impl<W: NativeWindow> Surface<W> {
    /// Probe the window and allocate the initial buffer
    pub fn new(create_info: SurfaceCreateInfo<W>, config: SurfaceConfig) -> Result<Self> {
        let SurfaceCreateInfo { instance, window } = create_info;
        let extent = probe(&window)?;
        let buffer = PresentationBuffer::allocate(&window, extent)?;

        log::debug!("created surface {extent} for instance {instance:?}");
        Ok(Self {
            buffer: BufferSlot::Ready(buffer),
            instance,
            window,
            extent,
            config,
            swapchain: None,
            stats: PresentStats::default(),
        })
    }

    /// Caller-provided memory needed for a surface: none
    pub fn required_allocation_size(_create_info: &SurfaceCreateInfo<W>) -> usize {
        0
    }

    /// Extent the buffer was last reconciled to
    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn instance(&self) -> &W::Instance {
        &self.instance
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn stats(&self) -> PresentStats {
        self.stats
    }

    /// Live buffer, if any
    pub fn buffer(&self) -> Option<&PresentationBuffer<W>> {
        match &self.buffer {
            BufferSlot::Ready(buffer) => Some(buffer),
            BufferSlot::Degraded | BufferSlot::Destroyed => None,
        }
    }

    /// Last reconciliation failed; capabilities still work, the next present retries
    pub fn is_degraded(&self) -> bool {
        matches!(self.buffer, BufferSlot::Degraded)
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.buffer, BufferSlot::Destroyed)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_destroyed() {
            Err(SurfaceError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Bind a swapchain; a surface serves one swapchain at a time
    pub fn associate_swapchain(&mut self, swapchain: SwapchainId) -> Result<()> {
        self.ensure_live()?;
        if self.swapchain.is_some() {
            return Err(SurfaceError::NativeWindowInUse);
        }
        self.swapchain = Some(swapchain);
        Ok(())
    }

    pub fn disassociate_swapchain(&mut self) {
        self.swapchain = None;
    }

    pub fn has_associated_swapchain(&self) -> bool {
        self.swapchain.is_some()
    }

    pub fn associated_swapchain(&self) -> Option<SwapchainId> {
        self.swapchain
    }

    /// Bring the buffer in line with `probed`.
    ///
    /// The old buffer is released before the new one is allocated. If that
    /// allocation fails the surface stays degraded with the new extent cached.
    fn reconcile(&mut self, probed: Extent2D) -> Result<()> {
        match &self.buffer {
            BufferSlot::Destroyed => return Err(SurfaceError::Destroyed),
            BufferSlot::Ready(_) if probed == self.extent => return Ok(()),
            BufferSlot::Ready(_) | BufferSlot::Degraded => {}
        }

        log::debug!("reconciling surface {} -> {probed}", self.extent);
        // Dropping the old buffer releases its draw context and header
        self.buffer = BufferSlot::Degraded;
        self.extent = probed;

        match PresentationBuffer::allocate(&self.window, probed) {
            Ok(buffer) => {
                self.buffer = BufferSlot::Ready(buffer);
                self.stats.reallocations += 1;
                Ok(())
            }
            Err(err) => {
                log::warn!("surface degraded, buffer allocation at {probed} failed: {err}");
                Err(err)
            }
        }
    }

    fn present_inner(&mut self, image: &dyn PresentImage) -> Result<()> {
        self.ensure_live()?;
        let extent = probe(&self.window)?;
        self.reconcile(extent)?;

        let image_extent = image.mip_level_extent(ImageAspect::Color, 0).to_2d();
        if extent.is_empty() || image_extent.is_empty() {
            log::trace!("nothing to paint: window {extent}, image {image_extent}");
            self.stats.skipped_blits += 1;
            return Ok(());
        }

        let blit = Blit::from_image(image, extent)?;
        let BufferSlot::Ready(buffer) = &mut self.buffer else {
            return Err(SurfaceError::presentation("no presentation buffer"));
        };
        buffer.blit(&self.window, &blit)?;
        log::trace!("presented {image_extent} onto {extent}");
        Ok(())
    }
}

impl<W: NativeWindow> PresentationSurface for Surface<W> {
    fn capabilities(&self) -> Result<SurfaceCapabilities> {
        self.ensure_live()?;
        Ok(SurfaceCapabilities::fixed(probe(&self.window)?))
    }

    fn attach_image(&mut self, image: &dyn PresentImage) -> Result<()> {
        self.ensure_live()?;
        let image_extent = image.mip_level_extent(ImageAspect::Color, 0).to_2d();
        let row_pitch = image.row_pitch_bytes(ImageAspect::Color, 0);
        log::trace!("attached image {image_extent}, row pitch {row_pitch}");

        if self.config.attach_policy == AttachPolicy::Ignore {
            return Ok(());
        }
        // Images are sized from capabilities(), so compare against the window
        // as it is now. The cached extent is left for present to reconcile.
        let window_extent = probe(&self.window)?;
        if image_extent == window_extent {
            return Ok(());
        }
        match self.config.attach_policy {
            AttachPolicy::Ignore => Ok(()),
            AttachPolicy::Warn => {
                log::warn!("attached image {image_extent} does not match window {window_extent}");
                Ok(())
            }
            AttachPolicy::Reject => Err(SurfaceError::ExtentMismatch {
                surface: window_extent,
                image: image_extent,
            }),
        }
    }

    fn detach_image(&mut self, image: &dyn PresentImage) {
        log::trace!(
            "detached image {}",
            image.mip_level_extent(ImageAspect::Color, 0).to_2d()
        );
    }

    fn present(&mut self, image: &dyn PresentImage) -> Result<()> {
        let result = self.present_inner(image);
        match &result {
            Ok(()) => self.stats.presents += 1,
            Err(_) => self.stats.failed_presents += 1,
        }
        result
    }

    fn destroy(&mut self, _allocator: Option<&AllocationCallbacks>) {
        if self.is_destroyed() {
            return;
        }
        self.buffer = BufferSlot::Destroyed;
        self.swapchain = None;
        log::debug!("destroyed surface {}", self.extent);
    }
}

impl<W: NativeWindow> std::fmt::Debug for Surface<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.buffer {
            BufferSlot::Ready(_) => "ready",
            BufferSlot::Degraded => "degraded",
            BufferSlot::Destroyed => "destroyed",
        };
        f.debug_struct("Surface")
            .field("instance", &self.instance)
            .field("extent", &self.extent)
            .field("state", &state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
