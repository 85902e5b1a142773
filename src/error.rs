use crate::types::Extent2D;

/// Result alias used throughout the surface API
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Errors surfaced by presentation surfaces
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Window or application reference is not valid at the time of the call
    #[error("invalid native window handle")]
    InvalidHandle,

    /// Draw context or bitmap header could not be acquired
    #[error("resource allocation failed: {0}")]
    ResourceAllocationFailed(String),

    /// The blit did not complete
    #[error("presentation failed: {0}")]
    PresentationFailed(String),

    /// Attached image does not match the surface extent
    #[error("image extent {image} does not match surface extent {surface}")]
    ExtentMismatch { surface: Extent2D, image: Extent2D },

    /// Operation on a surface that has already been destroyed
    #[error("surface has been destroyed")]
    Destroyed,

    /// Surface is already bound to a swapchain
    #[error("surface is already associated with a swapchain")]
    NativeWindowInUse,
}

impl SurfaceError {
    pub(crate) fn allocation(what: impl std::fmt::Display) -> Self {
        Self::ResourceAllocationFailed(what.to_string())
    }

    pub(crate) fn presentation(what: impl std::fmt::Display) -> Self {
        Self::PresentationFailed(what.to_string())
    }
}
