use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (minimized window, empty image)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Extent2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Extent2D {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Three dimensional image extent, as reported per mip level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extent3D {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent3D {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self { width, height, depth }
    }

    /// Drop the depth component
    pub fn to_2d(self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }
}

/// Pixel rectangle anchored at (x, y)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering the whole extent, anchored at the origin
    pub const fn from_extent(extent: Extent2D) -> Self {
        Self::new(0, 0, extent.width, extent.height)
    }

    pub fn extent(&self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }
}

/// Image aspect selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageAspect {
    Color,
    Depth,
    Stencil,
}

/// Pixel formats a surface can be presented in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    B8G8R8A8Unorm,
    B8G8R8A8Srgb,
}

/// Color spaces a surface can be presented in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    SrgbNonlinear,
}

/// Format and color space pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceFormat {
    pub format: Format,
    pub color_space: ColorSpace,
}

/// Accepted present modes. Presentation is synchronous in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentMode {
    Fifo,
    Mailbox,
}

/// Surface transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceTransform {
    Identity,
}

/// Composite alpha modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeAlpha {
    Opaque,
}

/// Bitmask of image usages a presentable image may be created with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ImageUsage(u32);

impl ImageUsage {
    pub const TRANSFER_SRC: Self = Self(0x1);
    pub const TRANSFER_DST: Self = Self(0x2);
    pub const SAMPLED: Self = Self(0x4);
    pub const COLOR_ATTACHMENT: Self = Self(0x10);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for ImageUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Capability report returned by a surface query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    pub min_image_count: u32,
    /// Zero means no upper bound
    pub max_image_count: u32,
    pub current_extent: Extent2D,
    pub min_image_extent: Extent2D,
    pub max_image_extent: Extent2D,
    pub max_image_array_layers: u32,
    pub supported_transforms: SurfaceTransform,
    pub current_transform: SurfaceTransform,
    pub supported_composite_alpha: CompositeAlpha,
    pub supported_usage: ImageUsage,
}

impl SurfaceCapabilities {
    /// Capabilities of a surface pinned to a single extent
    pub fn fixed(extent: Extent2D) -> Self {
        Self {
            min_image_count: 1,
            max_image_count: 0,
            current_extent: extent,
            min_image_extent: extent,
            max_image_extent: extent,
            max_image_array_layers: 1,
            supported_transforms: SurfaceTransform::Identity,
            current_transform: SurfaceTransform::Identity,
            supported_composite_alpha: CompositeAlpha::Opaque,
            supported_usage: ImageUsage::COLOR_ATTACHMENT
                | ImageUsage::TRANSFER_SRC
                | ImageUsage::TRANSFER_DST
                | ImageUsage::SAMPLED,
        }
    }
}

/// Opaque allocator context accepted at destruction.
///
/// Surfaces allocate nothing through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationCallbacks {
    _private: (),
}

/// Identifies a swapchain bound to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapchainId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_is_empty() {
        assert!(Extent2D::ZERO.is_empty());
        assert!(Extent2D::new(0, 600).is_empty());
        assert!(Extent2D::new(800, 0).is_empty());
        assert!(!Extent2D::new(1, 1).is_empty());
    }

    #[test]
    fn test_extent_pixel_count_does_not_overflow_u32() {
        let extent = Extent2D::new(70_000, 70_000);
        assert_eq!(extent.pixel_count(), 4_900_000_000);
    }

    #[test]
    fn test_extent_display() {
        assert_eq!(Extent2D::new(1024, 768).to_string(), "1024x768");
    }

    #[test]
    fn test_rect_from_extent() {
        let rect = Rect::from_extent(Extent2D::new(1024, 768));
        assert_eq!(rect, Rect::new(0, 0, 1024, 768));
        assert_eq!(rect.extent(), Extent2D::new(1024, 768));
    }

    #[test]
    fn test_fixed_capabilities_pin_all_extents() {
        let caps = SurfaceCapabilities::fixed(Extent2D::new(800, 600));
        assert_eq!(caps.min_image_extent, caps.current_extent);
        assert_eq!(caps.max_image_extent, caps.current_extent);
        assert_eq!(caps.min_image_count, 1);
        assert_eq!(caps.max_image_count, 0);
        assert!(caps.supported_usage.contains(ImageUsage::COLOR_ATTACHMENT));
        assert!(caps.supported_usage.contains(ImageUsage::TRANSFER_DST));
    }

    #[test]
    fn test_image_usage_bits() {
        let usage = ImageUsage::SAMPLED | ImageUsage::TRANSFER_SRC;
        assert_eq!(usage.bits(), 0x5);
        assert!(usage.contains(ImageUsage::SAMPLED));
        assert!(!usage.contains(ImageUsage::COLOR_ATTACHMENT));
        assert!(usage.contains(ImageUsage::empty()));
    }
}
