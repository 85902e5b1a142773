use crate::config::SurfaceConfig;
use crate::core::surface::{PresentStats, Surface, SurfaceCreateInfo};
use crate::error::Result;
use crate::platform::headless::{HeadlessInstance, HeadlessWindow};
#[cfg(windows)]
use crate::platform::win32::{Win32Instance, Win32Window};
use crate::traits::{PresentImage, PresentationSurface};
use crate::types::{AllocationCallbacks, Extent2D, SurfaceCapabilities};

/// Window a surface should be created for, tagged by backend
#[derive(Debug, Clone)]
pub enum SurfaceTarget {
    Headless(HeadlessWindow),
    #[cfg(windows)]
    Win32 {
        instance: Win32Instance,
        window: Win32Window,
    },
}

/// Surface over any supported backend, chosen at creation
#[derive(Debug)]
pub enum AnySurface {
    Headless(Surface<HeadlessWindow>),
    #[cfg(windows)]
    Win32(Surface<Win32Window>),
}

impl AnySurface {
    /// Create the surface variant matching `target`
    pub fn create(target: SurfaceTarget, config: SurfaceConfig) -> Result<Self> {
        match target {
            SurfaceTarget::Headless(window) => Ok(Self::Headless(Surface::new(
                SurfaceCreateInfo::new(HeadlessInstance, window),
                config,
            )?)),
            #[cfg(windows)]
            SurfaceTarget::Win32 { instance, window } => Ok(Self::Win32(Surface::new(
                SurfaceCreateInfo::new(instance, window),
                config,
            )?)),
        }
    }

    /// Caller-provided memory needed for any surface variant: none
    pub fn required_allocation_size(_target: &SurfaceTarget) -> usize {
        0
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Headless(_) => "headless",
            #[cfg(windows)]
            Self::Win32(_) => "win32",
        }
    }

    pub fn extent(&self) -> Extent2D {
        match self {
            Self::Headless(surface) => surface.extent(),
            #[cfg(windows)]
            Self::Win32(surface) => surface.extent(),
        }
    }

    pub fn stats(&self) -> PresentStats {
        match self {
            Self::Headless(surface) => surface.stats(),
            #[cfg(windows)]
            Self::Win32(surface) => surface.stats(),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        match self {
            Self::Headless(surface) => surface.is_destroyed(),
            #[cfg(windows)]
            Self::Win32(surface) => surface.is_destroyed(),
        }
    }
}

impl PresentationSurface for AnySurface {
    fn capabilities(&self) -> Result<SurfaceCapabilities> {
        match self {
            Self::Headless(surface) => surface.capabilities(),
            #[cfg(windows)]
            Self::Win32(surface) => surface.capabilities(),
        }
    }

    fn attach_image(&mut self, image: &dyn PresentImage) -> Result<()> {
        match self {
            Self::Headless(surface) => surface.attach_image(image),
            #[cfg(windows)]
            Self::Win32(surface) => surface.attach_image(image),
        }
    }

    fn detach_image(&mut self, image: &dyn PresentImage) {
        match self {
            Self::Headless(surface) => surface.detach_image(image),
            #[cfg(windows)]
            Self::Win32(surface) => surface.detach_image(image),
        }
    }

    fn present(&mut self, image: &dyn PresentImage) -> Result<()> {
        match self {
            Self::Headless(surface) => surface.present(image),
            #[cfg(windows)]
            Self::Win32(surface) => surface.present(image),
        }
    }

    fn destroy(&mut self, allocator: Option<&AllocationCallbacks>) {
        match self {
            Self::Headless(surface) => surface.destroy(allocator),
            #[cfg(windows)]
            Self::Win32(surface) => surface.destroy(allocator),
        }
    }
}
