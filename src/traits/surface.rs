use crate::error::Result;
use crate::traits::PresentImage;
use crate::types::{
    AllocationCallbacks, ColorSpace, Format, PresentMode, SurfaceCapabilities, SurfaceFormat,
};

const SURFACE_FORMATS: [SurfaceFormat; 2] = [
    SurfaceFormat {
        format: Format::B8G8R8A8Unorm,
        color_space: ColorSpace::SrgbNonlinear,
    },
    SurfaceFormat {
        format: Format::B8G8R8A8Srgb,
        color_space: ColorSpace::SrgbNonlinear,
    },
];

const PRESENT_MODES: [PresentMode; 2] = [PresentMode::Fifo, PresentMode::Mailbox];

/// Capability set shared by every surface backend.
///
/// Callers serialize access to a surface; mutating operations take `&mut self`.
pub trait PresentationSurface {
    /// Probe the window and report the single extent images must be created at
    fn capabilities(&self) -> Result<SurfaceCapabilities>;

    /// Formats images may be presented in
    fn formats(&self) -> &'static [SurfaceFormat] {
        &SURFACE_FORMATS
    }

    /// Present modes the surface accepts
    fn present_modes(&self) -> &'static [PresentMode] {
        &PRESENT_MODES
    }

    /// Notification that an image became a presentation source
    fn attach_image(&mut self, image: &dyn PresentImage) -> Result<()>;

    /// Notification that an image stopped being a presentation source
    fn detach_image(&mut self, image: &dyn PresentImage);

    /// Blit the image into the window, reallocating the backing buffer on resize
    fn present(&mut self, image: &dyn PresentImage) -> Result<()>;

    /// Release every native resource. Safe to call more than once.
    fn destroy(&mut self, allocator: Option<&AllocationCallbacks>);
}
