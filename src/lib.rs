//! Presents frames from a software renderer onto a live, resizable window.
//!
//! A [`Surface`] caches the window's drawable extent together with a
//! [`PresentationBuffer`] of the same size. Each present re-probes the window,
//! rebuilds the buffer when the extent moved, then stretch-blits the image.

pub mod cli;
pub mod config;
pub mod core;
pub mod demo;
pub mod error;
pub mod frame;
pub mod platform;
pub mod traits;
pub mod types;

pub use crate::config::{AttachPolicy, Config, SurfaceConfig};
pub use crate::core::{
    AnySurface, PresentStats, PresentationBuffer, SoftwareImage, Surface, SurfaceCreateInfo,
    SurfaceTarget,
};
pub use crate::error::{Result, SurfaceError};
pub use crate::traits::{NativeWindow, PresentImage, PresentationSurface};
pub use crate::types::{Extent2D, SurfaceCapabilities};
