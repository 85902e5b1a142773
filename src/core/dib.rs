//! Device-independent bitmap description shared by every native adapter.
//!
//! The presenter only ever builds a [`DibDescriptor`] and a [`Blit`]; turning
//! them into a native header and a native stretch call is left to the
//! [`NativeWindow`](crate::traits::NativeWindow) implementation.

use bytemuck::{Pod, Zeroable};

use crate::error::{Result, SurfaceError};
use crate::traits::PresentImage;
use crate::types::{Extent2D, ImageAspect, Rect};

/// Entries in the header's color table
pub const COLOR_TABLE_LEN: usize = 256;

/// Bits per pixel of every presented image
pub const BITS_PER_PIXEL: u16 = 32;

pub const BYTES_PER_PIXEL: usize = 4;

/// One color table entry, laid out as the native imaging API expects
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RgbQuad {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl RgbQuad {
    pub const fn gray(level: u8) -> Self {
        Self {
            blue: level,
            green: level,
            red: level,
            reserved: 0,
        }
    }
}

/// Pixel compression of the bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DibCompression {
    /// Uncompressed RGB
    Rgb,
}

/// How the blit resamples when source and destination sizes differ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StretchMode {
    /// Drop eliminated scan lines, no interpolation
    #[default]
    DeleteScans,
}

/// Platform-neutral bitmap header, rebuilt on every buffer reallocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DibDescriptor {
    pub width: i32,
    /// Negative for top-down row order
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: DibCompression,
    pub color_table: Vec<RgbQuad>,
}

impl DibDescriptor {
    /// Header for a top-down, 32-bit, uncompressed RGB image of `extent`.
    ///
    /// The color table is filled from a scratch grayscale ramp which is dropped
    /// before returning. It has no effect on 32-bit output.
    pub fn top_down_rgb32(extent: Extent2D) -> Result<Self> {
        let width = to_dib_dimension(extent.width, "width")?;
        let height = to_dib_dimension(extent.height, "height")?;

        let scratch = grayscale_ramp()?;
        let mut color_table = try_vec(COLOR_TABLE_LEN)?;
        color_table.extend_from_slice(&scratch);
        drop(scratch);

        Ok(Self {
            width,
            height: -height,
            planes: 1,
            bit_count: BITS_PER_PIXEL,
            compression: DibCompression::Rgb,
            color_table,
        })
    }

    /// Image size described by the header
    pub fn extent(&self) -> Extent2D {
        Extent2D::new(self.width.unsigned_abs(), self.height.unsigned_abs())
    }

    /// Row 0 in memory is the topmost scan line
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width.unsigned_abs() as usize * usize::from(self.bit_count / 8)
    }
}

fn to_dib_dimension(value: u32, name: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| SurfaceError::allocation(format!("bitmap {name} {value} out of range")))
}

/// Scratch color table: `entry[i] = (i, i, i)`, reserved zero
pub fn grayscale_ramp() -> Result<Vec<RgbQuad>> {
    let mut ramp = try_vec(COLOR_TABLE_LEN)?;
    ramp.extend((0..=u8::MAX).map(RgbQuad::gray));
    Ok(ramp)
}

/// Empty vector with room for `len` elements, reporting allocation failure
pub(crate) fn try_vec<T>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(SurfaceError::allocation)?;
    Ok(buffer)
}

/// One stretch blit from image memory into a window
#[derive(Debug, Clone, Copy)]
pub struct Blit<'a> {
    pub destination: Rect,
    pub source: Rect,
    /// Layout of `pixels`: pixels per row (row pitch / 4) by row count
    pub memory_extent: Extent2D,
    pub pixels: &'a [u8],
    pub mode: StretchMode,
}

impl<'a> Blit<'a> {
    /// Full-image to full-window blit.
    ///
    /// Rejects layouts the blit primitive cannot read safely: a row pitch that
    /// is not a whole number of pixels or is narrower than the image, and memory
    /// shorter than `row_pitch * height`.
    pub fn from_image(image: &'a dyn PresentImage, destination: Extent2D) -> Result<Self> {
        let extent = image.mip_level_extent(ImageAspect::Color, 0).to_2d();
        let row_pitch = image.row_pitch_bytes(ImageAspect::Color, 0);

        if row_pitch % BYTES_PER_PIXEL != 0 {
            return Err(SurfaceError::presentation(format!(
                "row pitch {row_pitch} is not a whole number of 32-bit pixels"
            )));
        }
        let row_pixels = u32::try_from(row_pitch / BYTES_PER_PIXEL)
            .map_err(|_| SurfaceError::presentation(format!("row pitch {row_pitch} too large")))?;
        if row_pixels < extent.width {
            return Err(SurfaceError::presentation(format!(
                "row pitch {row_pitch} is narrower than image width {}",
                extent.width
            )));
        }

        let pixels = image
            .memory_at(0)
            .ok_or_else(|| SurfaceError::presentation("image has no backing memory"))?;
        let required = row_pitch
            .checked_mul(extent.height as usize)
            .ok_or_else(|| SurfaceError::presentation("image size overflows"))?;
        if pixels.len() < required {
            return Err(SurfaceError::presentation(format!(
                "image memory holds {} bytes, {required} required",
                pixels.len()
            )));
        }

        Ok(Self {
            destination: Rect::from_extent(destination),
            source: Rect::from_extent(extent),
            memory_extent: Extent2D::new(row_pixels, extent.height),
            pixels: &pixels[..required],
            mode: StretchMode::DeleteScans,
        })
    }

    pub fn row_pitch(&self) -> usize {
        self.memory_extent.width as usize * BYTES_PER_PIXEL
    }
}
