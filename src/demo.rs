//! Demo pieces: a small software renderer and a scripted headless run.
//!
//! ```
//! use soft_surface::config::AppConfig;
//! use soft_surface::demo::run_headless;
//!
//! let mut config = AppConfig::default();
//! config.run.frames = 4;
//! let report = run_headless(&config).unwrap();
//! assert_eq!(report.stats.presents, 4);
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::config::AppConfig;
use crate::core::image::{pack_bgra, SoftwareImage};
use crate::core::{AnySurface, PresentStats, SurfaceTarget};
use crate::error::Result;
use crate::frame::{FrameClock, FrameInfo};
use crate::platform::headless::{HeadlessWindow, ResourceCounters};
use crate::traits::PresentationSurface;
use crate::types::Extent2D;

const BAR_WIDTH_FRACTION: f32 = 0.08;
const BAR_SPEED: f32 = 0.25;

/// Animated gradient with a vertical bar sweeping across
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientRenderer;

impl GradientRenderer {
    /// Render one frame at `extent`
    pub fn render(&self, frame: &FrameInfo, extent: Extent2D) -> SoftwareImage {
        let mut image = SoftwareImage::new(extent);
        let bar_center = (frame.time * BAR_SPEED).fract();
        image.fill_with(|x, y| shade(x, y, extent, bar_center));
        image
    }
}

/// Color of one pixel: red ramps left to right, green top to bottom
fn shade(x: u32, y: u32, extent: Extent2D, bar_center: f32) -> u32 {
    let u = x as f32 / extent.width.max(1) as f32;
    let v = y as f32 / extent.height.max(1) as f32;
    if (u - bar_center).abs() < BAR_WIDTH_FRACTION * 0.5 {
        return pack_bgra(255, 255, 255, 255);
    }
    pack_bgra((u * 255.0) as u8, (v * 255.0) as u8, 96, 255)
}

/// Outcome of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub backend: &'static str,
    pub frames: u64,
    pub final_extent: Extent2D,
    pub stats: PresentStats,
    pub resources: ResourceCounters,
}

/// Present `config.run.frames` frames into an in-memory window, growing the
/// window by `resize_step` every `resize_every` frames.
pub fn run_headless(config: &AppConfig) -> Result<HeadlessReport> {
    let window = HeadlessWindow::new(config.window.extent());
    let mut surface = AnySurface::create(SurfaceTarget::Headless(window.clone()), config.surface)?;
    let renderer = GradientRenderer;
    let run = config.run;

    let mut window_extent = config.window.extent();
    for frame in FrameClock::fixed(Duration::from_secs(1) / 60).take(run.frames as usize) {
        if run.resize_every > 0 && frame.number > 0 && frame.number % run.resize_every == 0 {
            window_extent = Extent2D::new(
                window_extent.width.saturating_add(run.resize_step),
                window_extent.height.saturating_add(run.resize_step),
            );
            log::info!("frame {}: window resized to {window_extent}", frame.number);
            window.resize(window_extent);
        }

        let extent = surface.capabilities()?.current_extent;
        let image = renderer.render(&frame, extent);
        surface.attach_image(&image)?;
        surface.present(&image)?;
        surface.detach_image(&image);
    }

    let report_stats = surface.stats();
    let final_extent = surface.extent();
    let backend = surface.backend_name();
    surface.destroy(None);

    Ok(HeadlessReport {
        backend,
        frames: run.frames,
        final_extent,
        stats: report_stats,
        resources: window.counters(),
    })
}
